//! Presence checks for the credentials a real deployment would use.

use crate::activity::{LogKind, LogStore};
use serde::Serialize;

/// A named configuration value read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvKey {
    pub name: &'static str,
    /// Human label used by the startup check.
    pub label: &'static str,
    /// Service a present primary key unlocks.
    pub service: Option<&'static str>,
}

impl EnvKey {
    pub fn is_primary(&self) -> bool {
        self.service.is_some()
    }
}

pub const ENV_KEYS: &[EnvKey] = &[
    EnvKey { name: "AIRTABLE_API_KEY", label: "Airtable API Key", service: Some("Airtable") },
    EnvKey { name: "LINKEDIN_CLIENT_SECRET", label: "LinkedIn Token", service: Some("LinkedIn") },
    EnvKey { name: "TELEGRAM_BOT_TOKEN", label: "Telegram Token", service: Some("Telegram") },
    EnvKey { name: "AIRTABLE_BASE_ID", label: "Airtable Base ID", service: None },
    EnvKey { name: "AIRTABLE_TABLE_ID", label: "Airtable Table ID", service: None },
    EnvKey { name: "TELEGRAM_CHAT_ID", label: "Telegram Chat ID", service: None },
    EnvKey { name: "RAPIDAPI_KEY", label: "RapidAPI Key", service: None },
    EnvKey { name: "LINKEDIN_CLIENT_ID", label: "LinkedIn Client ID", service: None },
];

pub fn primary_keys() -> impl Iterator<Item = &'static EnvKey> {
    ENV_KEYS.iter().filter(|k| k.is_primary())
}

pub fn primary_key_names() -> Vec<&'static str> {
    primary_keys().map(|k| k.name).collect()
}

fn presence(present: bool) -> &'static str {
    if present {
        "Set"
    } else {
        "Not set"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPresence {
    pub name: &'static str,
    pub present: bool,
}

/// Which configured values are present, in [`ENV_KEYS`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSnapshot {
    keys: Vec<KeyPresence>,
}

impl ConfigSnapshot {
    pub fn keys(&self) -> &[KeyPresence] {
        &self.keys
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.keys.iter().any(|k| k.name == name && k.present)
    }

    pub fn any_primary(&self) -> bool {
        primary_keys().any(|k| self.is_set(k.name))
    }

    /// Services whose primary key is present.
    pub fn available_services(&self) -> Vec<&'static str> {
        primary_keys()
            .filter(|k| self.is_set(k.name))
            .filter_map(|k| k.service)
            .collect()
    }
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct EnvProbe {
    lookup: Lookup,
}

impl EnvProbe {
    pub fn from_process() -> Self {
        Self {
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Probe over a fixed set of values instead of the process environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values: std::collections::HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            lookup: Box::new(move |name| values.get(name).cloned()),
        }
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        let keys = ENV_KEYS
            .iter()
            .map(|k| KeyPresence {
                name: k.name,
                present: (self.lookup)(k.name).is_some_and(|v| !v.trim().is_empty()),
            })
            .collect();
        ConfigSnapshot { keys }
    }

    /// Log a header plus one line per key.
    pub fn report(&self, logs: &mut LogStore) -> ConfigSnapshot {
        let snapshot = self.snapshot();
        logs.append("=== Environment Variables Status ===", LogKind::Info);
        for key in snapshot.keys() {
            logs.append(format!("{}: {}", key.name, presence(key.present)), LogKind::Info);
        }
        snapshot
    }

    /// Startup summary: either a success line with the primary keys or an error.
    pub fn startup_report(&self, logs: &mut LogStore) -> ConfigSnapshot {
        let snapshot = self.snapshot();
        if snapshot.any_primary() {
            logs.append("Environment variables loaded successfully", LogKind::Success);
            for key in primary_keys() {
                logs.append(
                    format!("{}: {}", key.label, presence(snapshot.is_set(key.name))),
                    LogKind::Info,
                );
            }
        } else {
            logs.append(
                "No environment variables found. Please configure your .env file.",
                LogKind::Error,
            );
        }
        snapshot
    }
}

impl std::fmt::Debug for EnvProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvProbe").finish_non_exhaustive()
    }
}
