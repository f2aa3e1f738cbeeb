//! Lets owners drive the bot: a private message to the bot starting with
//! `simon says:` is written to the server as a raw line.

use super::{Plugin, Registrar};
use crate::bot::Bot;
use crate::handlers::{FirstDelivery, Flow, Handler, HandlerResult};
use async_trait::async_trait;
use botko_proto::Message;
use std::sync::Arc;
use tracing::info;

const TRIGGER: &str = "simon says:";

pub struct SimonSaysPlugin;

impl Plugin for SimonSaysPlugin {
    fn name(&self) -> &str {
        "simonsays"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        let owners = reg.bot().main().owner_list();
        reg.on(
            "on_privmsg",
            Arc::new(SimonSays {
                owners,
                once: FirstDelivery::new(),
            }),
        );
    }
}

struct SimonSays {
    owners: Vec<String>,
    once: FirstDelivery,
}

impl SimonSays {
    /// The command to run, if `msg` is an owner's order to the bot.
    fn order<'m>(&self, bot: &Bot, msg: &'m Message) -> Option<&'m str> {
        if msg.params[0] != bot.nick() || !self.owners.iter().any(|o| o == msg.nick()) {
            return None;
        }
        let command = msg.text().strip_prefix(TRIGGER)?.trim();
        (!command.is_empty()).then_some(command)
    }
}

#[async_trait]
impl Handler for SimonSays {
    fn name(&self) -> &str {
        "simonsays.order"
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult {
        let msg = msg.filter(|_| self.once.first(bot));
        if let Some(command) = msg.and_then(|m| self.order(bot, m)) {
            info!(nick = msg.map(Message::nick).unwrap_or(""), command, "executing command");
            bot.write(command);
        }
        Ok(Flow::Continue)
    }
}
