//! Plugin registry.
//!
//! A plugin is a named bundle of event handlers (and optionally outbound
//! interceptors) that it wires up explicitly through a [`Registrar`]. The
//! registry loads dependencies first, skips plugins whose config section has
//! `disabled` set, loads each plugin once and finally fires `load`.

mod ctcp;
mod logger;
mod ping;
mod remarks;
mod reposts;
mod serializer;
mod simonsays;

pub use ctcp::CtcpPlugin;
pub use logger::LoggerPlugin;
pub use ping::PingPlugin;
pub use remarks::RemarksPlugin;
pub use reposts::RepostsPlugin;
pub use serializer::SerializerPlugin;
pub use simonsays::SimonSaysPlugin;

use crate::bot::Bot;
use crate::error::PluginError;
use crate::handlers::{Handler, Interceptor};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A loadable bundle of handlers.
pub trait Plugin: Send + Sync {
    /// Name, also the plugin's config section.
    fn name(&self) -> &str;

    /// Plugins that must be loaded first.
    fn depends(&self) -> &[&str] {
        &[]
    }

    /// Bind handlers and interceptors.
    fn register(&self, reg: &mut Registrar<'_>);
}

/// Registration surface handed to [`Plugin::register`].
pub struct Registrar<'a> {
    bot: &'a Bot,
    plugin: &'a str,
    handlers: usize,
}

impl<'a> Registrar<'a> {
    fn new(bot: &'a Bot, plugin: &'a str) -> Self {
        Self {
            bot,
            plugin,
            handlers: 0,
        }
    }

    /// Bind `handler` under a handler name (`on_privmsg`, `on_366`,
    /// `on_every_5h`). Invalid names are logged and skipped.
    pub fn on(&mut self, handler_name: &str, handler: Arc<dyn Handler>) -> &mut Self {
        match self.bot.add_handler(handler_name, handler) {
            Ok(()) => self.handlers += 1,
            Err(e) => warn!(
                plugin = self.plugin,
                error = %e,
                "skipping unrecognized event handler"
            ),
        }
        self
    }

    /// Append an interceptor to the outbound chain.
    pub fn intercept(&mut self, interceptor: Arc<dyn Interceptor>) -> &mut Self {
        self.bot.add_interceptor(interceptor);
        self
    }

    pub fn bot(&self) -> &Bot {
        self.bot
    }

    /// The plugin's own setting, `<plugin>/<key>`, "" when absent.
    pub fn setting(&self, key: &str) -> String {
        self.bot.lookup(&format!("{}/{}", self.plugin, key))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Known plugins, in registration order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
    loaded: Vec<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every plugin shipped with the bot.
    pub fn bundled() -> Self {
        let mut registry = Self::new();
        let plugins: [Arc<dyn Plugin>; 7] = [
            Arc::new(CtcpPlugin),
            Arc::new(LoggerPlugin),
            Arc::new(PingPlugin),
            Arc::new(RemarksPlugin),
            Arc::new(RepostsPlugin),
            Arc::new(SerializerPlugin),
            Arc::new(SimonSaysPlugin),
        ];
        for plugin in plugins {
            // Names are distinct.
            let _ = registry.add(plugin);
        }
        registry
    }

    pub fn add(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(PluginError::Duplicate(plugin.name().to_owned()));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Names of the plugins loaded so far, in load order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    /// Load order: dependencies first, disabled plugins left out.
    pub fn resolve(&self, bot: &Bot) -> Result<Vec<Arc<dyn Plugin>>, PluginError> {
        let by_name: HashMap<&str, &Arc<dyn Plugin>> =
            self.plugins.iter().map(|p| (p.name(), p)).collect();
        let mut marks: HashMap<String, Mark> = HashMap::new();
        let mut order = Vec::new();

        for plugin in &self.plugins {
            if bot.config().is_disabled(plugin.name()) {
                info!(plugin = plugin.name(), "skipping disabled plugin");
                continue;
            }
            visit(plugin, &by_name, bot, &mut marks, &mut order)?;
        }
        Ok(order)
    }

    /// Register every enabled plugin, then fire `load`.
    pub async fn load(&mut self, bot: &Bot) -> Result<(), PluginError> {
        for plugin in self.resolve(bot)? {
            info!(plugin = plugin.name(), "loading plugin");
            let mut registrar = Registrar::new(bot, plugin.name());
            plugin.register(&mut registrar);
            info!(
                plugin = plugin.name(),
                handlers = registrar.handlers,
                "plugin loaded"
            );
            self.loaded.push(plugin.name().to_owned());
        }

        info!("triggering load event hooks");
        bot.trigger_event("load", None).await;
        Ok(())
    }
}

fn visit(
    plugin: &Arc<dyn Plugin>,
    by_name: &HashMap<&str, &Arc<dyn Plugin>>,
    bot: &Bot,
    marks: &mut HashMap<String, Mark>,
    order: &mut Vec<Arc<dyn Plugin>>,
) -> Result<(), PluginError> {
    match marks.get(plugin.name()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(PluginError::DependencyCycle(plugin.name().to_owned())),
        None => {}
    }
    marks.insert(plugin.name().to_owned(), Mark::Visiting);

    for &dependency in plugin.depends() {
        let Some(dep) = by_name.get(dependency) else {
            return Err(PluginError::MissingDependency {
                plugin: plugin.name().to_owned(),
                dependency: dependency.to_owned(),
            });
        };
        if bot.config().is_disabled(dependency) {
            return Err(PluginError::DisabledDependency {
                plugin: plugin.name().to_owned(),
                dependency: dependency.to_owned(),
            });
        }
        visit(dep, by_name, bot, marks, order)?;
    }

    marks.insert(plugin.name().to_owned(), Mark::Done);
    order.push(Arc::clone(plugin));
    Ok(())
}

/// Pick one line from a canned list.
pub(crate) fn pick(lines: &[&'static str]) -> &'static str {
    use rand::seq::SliceRandom;
    lines.choose(&mut rand::thread_rng()).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{Flow, FnHandler};
    use botko_proto::Message;
    use parking_lot::Mutex;

    struct Recorder {
        name: &'static str,
        depends: &'static [&'static str],
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Plugin for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn depends(&self) -> &[&str] {
            self.depends
        }

        fn register(&self, reg: &mut Registrar<'_>) {
            self.log.lock().push(self.name.to_owned());
            let log = Arc::clone(&self.log);
            let name = self.name;
            reg.on(
                "on_load",
                Arc::new(FnHandler::new(name, move |_bot: Bot, _msg: Option<Message>| {
                    let log = Arc::clone(&log);
                    async move {
                        log.lock().push(format!("{name}:load"));
                        Ok(Flow::Continue)
                    }
                })),
            );
            reg.on(
                "on_bad!",
                Arc::new(FnHandler::new(name, |_bot: Bot, _msg: Option<Message>| async {
                    Ok(Flow::Continue)
                })),
            );
        }
    }

    fn recorder(
        name: &'static str,
        depends: &'static [&'static str],
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<dyn Plugin> {
        Arc::new(Recorder {
            name,
            depends,
            log: Arc::clone(log),
        })
    }

    #[tokio::test]
    async fn test_dependencies_load_first_and_once() {
        let (bot, _rx) = Bot::for_tests();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.add(recorder("reposts", &["store"], &log)).unwrap();
        registry.add(recorder("store", &[], &log)).unwrap();
        registry.add(recorder("extra", &["store"], &log)).unwrap();

        registry.load(&bot).await.unwrap();
        assert_eq!(registry.loaded(), ["store", "reposts", "extra"]);
        assert_eq!(
            *log.lock(),
            vec![
                "store",
                "reposts",
                "extra",
                "store:load",
                "reposts:load",
                "extra:load",
            ]
        );
    }

    #[tokio::test]
    async fn test_disabled_plugin_is_skipped() {
        let (bot, _rx) = Bot::with_config_str("[quiet]\ndisabled = true\n");
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.add(recorder("quiet", &[], &log)).unwrap();
        registry.add(recorder("loud", &[], &log)).unwrap();

        registry.load(&bot).await.unwrap();
        assert_eq!(registry.loaded(), ["loud"]);
    }

    #[test]
    fn test_missing_and_disabled_dependencies() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let (bot, _rx) = Bot::for_tests();
        let mut registry = PluginRegistry::new();
        registry.add(recorder("reposts", &["serializer"], &log)).unwrap();
        assert_eq!(
            registry.resolve(&bot).err(),
            Some(PluginError::MissingDependency {
                plugin: "reposts".into(),
                dependency: "serializer".into(),
            })
        );

        let (bot, _rx) = Bot::with_config_str("[store]\ndisabled = \"yes\"\n");
        let mut registry = PluginRegistry::new();
        registry.add(recorder("reposts", &["store"], &log)).unwrap();
        registry.add(recorder("store", &[], &log)).unwrap();
        assert_eq!(
            registry.resolve(&bot).err(),
            Some(PluginError::DisabledDependency {
                plugin: "reposts".into(),
                dependency: "store".into(),
            })
        );
    }

    #[test]
    fn test_cycle_detected() {
        let (bot, _rx) = Bot::for_tests();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.add(recorder("a", &["b"], &log)).unwrap();
        registry.add(recorder("b", &["a"], &log)).unwrap();
        assert_eq!(
            registry.resolve(&bot).err(),
            Some(PluginError::DependencyCycle("a".into()))
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.add(recorder("a", &[], &log)).unwrap();
        assert_eq!(
            registry.add(recorder("a", &[], &log)),
            Err(PluginError::Duplicate("a".into()))
        );
    }

    #[test]
    fn test_bundled_names() {
        let registry = PluginRegistry::bundled();
        let names: Vec<&str> = registry.plugins.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["ctcp", "logger", "ping", "remarks", "reposts", "serializer", "simonsays"]
        );
    }
}
