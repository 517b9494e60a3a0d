use std::fmt;

use serde::Serialize;

/// Variables the dashboard reads to reach PostgreSQL.
pub const RECOGNIZED_VARS: [&str; 5] = ["PGUSER", "PGPASSWORD", "PGHOST", "PGPORT", "PGDATABASE"];

const SECRET_MARKERS: [&str; 4] = ["PASSWORD", "SECRET", "TOKEN", "KEY"];

const MASK: &str = "*****";

/// Whether a missing environment file aborts the launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvRequirement {
    #[default]
    Required,
    Optional,
}

/// Ordered `KEY -> value` mapping handed to the container.
///
/// A repeated key keeps the position of its first occurrence and the value of
/// its last. `Debug` prints keys only so a stray `{:?}` cannot leak credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvironmentConfig {
    entries: Vec<(String, String)>,
}

impl EnvironmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Recognized variables that have no entry.
    pub fn missing_recognized(&self) -> Vec<&'static str> {
        RECOGNIZED_VARS
            .into_iter()
            .filter(|name| !self.contains_key(name))
            .collect()
    }

    /// Same entries, with secret-looking values replaced by a mask.
    pub fn redacted(&self) -> Vec<RedactedVar> {
        self.entries
            .iter()
            .map(|(k, v)| RedactedVar {
                name: k.clone(),
                value: if is_secret(k) { MASK.to_string() } else { v.clone() },
            })
            .collect()
    }
}

impl fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}

/// A variable as it may be shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactedVar {
    pub name: String,
    pub value: String,
}

pub fn is_secret(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    SECRET_MARKERS.iter().any(|m| upper.contains(m))
}
