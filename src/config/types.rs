//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use toml::{Table, Value};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Built-in defaults. User sections are merged over these key by key.
const DEFAULT_CONFIG: &str = r#"
[main]
nick = "botko,BOTK0,B0TKO,B0TK0"
username = "botko"
realname = "botko"
server = "chat.freenode.net"
port = 6667
data_dir = "./data/"
"#;

/// Bot configuration.
///
/// Holds the merged TOML document for free-form plugin lookups and a typed
/// view of the `[main]` section.
#[derive(Debug, Clone)]
pub struct Config {
    table: Table,
    /// Typed `[main]` section.
    pub main: MainConfig,
}

/// The `[main]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MainConfig {
    /// Comma-separated nickname candidates, tried in order.
    pub nick: String,
    pub username: String,
    pub realname: String,
    pub server: String,
    pub port: u16,
    /// `JOIN` parameter string, e.g. `"#a,#b key"`.
    #[serde(default)]
    pub channels: String,
    /// Comma-separated nicknames trusted by owner-only plugins.
    #[serde(default)]
    pub owners: String,
    pub data_dir: String,
    /// Directory for conversation logs. Defaults to `<data_dir>/logs`.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Seconds before pending registration steps are reported. 0 disables.
    #[serde(default = "default_registration_timeout")]
    pub registration_timeout: u64,
}

fn default_registration_timeout() -> u64 {
    60
}

fn comma_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

impl MainConfig {
    /// Nickname candidates in order.
    pub fn nicks(&self) -> Vec<String> {
        comma_list(&self.nick)
    }

    /// Channels named by the first (channel) group of the `JOIN` string.
    pub fn channel_list(&self) -> Vec<String> {
        comma_list(self.channels.split(' ').next().unwrap_or(""))
    }

    /// Owner nicknames.
    pub fn owner_list(&self) -> Vec<String> {
        comma_list(&self.owners)
    }

    /// Conversation log directory.
    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Path::new(&self.data_dir).join("logs"),
        }
    }

    /// Registration watchdog delay, `None` when disabled.
    pub fn registration_timeout(&self) -> Option<Duration> {
        (self.registration_timeout > 0).then(|| Duration::from_secs(self.registration_timeout))
    }
}

/// Merge `other` into `base` one level deep: sections are updated key by key,
/// other top-level values replace.
fn merge(base: &mut Table, other: Table) {
    for (key, value) in other {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(section)), Value::Table(update)) => section.extend(update),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Table(_) => String::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
        Value::Array(items) => !items.is_empty(),
        Value::Table(table) => !table.is_empty(),
        Value::Float(f) => *f != 0.0,
        Value::Datetime(_) => true,
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, filling in defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut table: Table = toml::from_str(DEFAULT_CONFIG)?;
        let user: Table = toml::from_str(content)?;
        merge(&mut table, user);

        let main_section = table.get("main").cloned().unwrap_or(Value::Table(Table::new()));
        let main: MainConfig = main_section.try_into()?;
        Ok(Self { table, main })
    }

    fn value(&self, path: &str) -> Option<&Value> {
        let mut keys = path.trim_matches('/').split('/');
        let mut current = self.table.get(keys.next()?)?;
        for key in keys {
            current = current.as_table()?.get(key)?;
        }
        Some(current)
    }

    /// Look up a slash-joined key such as `"logger/channels"`.
    ///
    /// Scalars are returned as strings, arrays comma-joined; anything
    /// missing yields `""`.
    pub fn lookup(&self, path: &str) -> String {
        self.value(path).map(stringify).unwrap_or_default()
    }

    /// Like [`Config::lookup`] but with a fallback for missing keys.
    pub fn lookup_or(&self, path: &str, default: &str) -> String {
        self.value(path)
            .map(stringify)
            .unwrap_or_else(|| default.to_owned())
    }

    /// True when `<plugin>.disabled` is set to a truthy value.
    pub fn is_disabled(&self, plugin: &str) -> bool {
        self.value(&format!("{}/disabled", plugin))
            .is_some_and(is_truthy)
    }
}
