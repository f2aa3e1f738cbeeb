//! Plugin state persistence.
//!
//! [`dump`] writes a value as MessagePack to `<data_dir>/<name>.msgpack`
//! and [`load`] reads it back. Plugins that keep state across restarts
//! depend on `serializer`, which creates the data directory on load.

use super::{Plugin, Registrar};
use crate::bot::Bot;
use crate::error::PersistError;
use crate::handlers::{Flow, Handler, HandlerResult};
use async_trait::async_trait;
use botko_proto::Message;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info};

const EXTENSION: &str = "msgpack";

/// File holding the state saved under `name`.
pub fn path(bot: &Bot, name: &str) -> PathBuf {
    bot.data_dir().join(format!("{name}.{EXTENSION}"))
}

/// Save `value` under `name`, replacing what was there.
///
/// The file is written next to its final path and renamed into place, so
/// a crash mid-write leaves the previous state intact.
pub async fn dump<T: Serialize>(bot: &Bot, name: &str, value: &T) -> Result<(), PersistError> {
    let file = path(bot, name);
    let result = async {
        let bytes = rmp_serde::to_vec_named(value)?;
        let partial = file.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&partial, &bytes).await?;
        fs::rename(&partial, &file).await?;
        debug!(file = %file.display(), bytes = bytes.len(), "state saved");
        Ok::<_, PersistError>(())
    }
    .await;
    if let Err(e) = &result {
        error!(file = %file.display(), error = %e, "could not write state");
    }
    result
}

/// Restore the value saved under `name`; `None` when nothing was saved.
pub async fn load<T: DeserializeOwned>(bot: &Bot, name: &str) -> Result<Option<T>, PersistError> {
    let file = path(bot, name);
    let bytes = match fs::read(&file).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            error!(file = %file.display(), error = %e, "could not read state");
            return Err(e.into());
        }
    };
    rmp_serde::from_slice(&bytes).map(Some).map_err(|e| {
        error!(file = %file.display(), error = %e, "could not decode state");
        e.into()
    })
}

pub struct SerializerPlugin;

impl Plugin for SerializerPlugin {
    fn name(&self) -> &str {
        "serializer"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        reg.on("on_load", Arc::new(PrepareDataDir));
    }
}

struct PrepareDataDir;

#[async_trait]
impl Handler for PrepareDataDir {
    fn name(&self) -> &str {
        "serializer.prepare"
    }

    async fn call(&self, bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
        let dir = bot.data_dir();
        fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "data directory ready");
        Ok(Flow::Continue)
    }
}
