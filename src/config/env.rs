//! Environment variable lookup.
//!
//! Maintenance content and the debug switch are read on every request, so
//! the lookup is a trait object handed to whoever needs it instead of
//! direct `std::env` calls.

use std::collections::HashMap;

/// Read access to environment-style key/value pairs.
pub trait EnvLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;

    /// Returns the value only when it is set and non-empty.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.lookup(name).filter(|v| !v.is_empty())
    }
}

/// The real process environment, read fresh on each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed table of values.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: HashMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvLookup for StaticEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_env_lookup() {
        let env = StaticEnv::new().with("A", "1").with("EMPTY", "");
        assert_eq!(env.lookup("A").as_deref(), Some("1"));
        assert_eq!(env.lookup("EMPTY").as_deref(), Some(""));
        assert_eq!(env.lookup("MISSING"), None);
    }

    #[test]
    fn test_non_empty_treats_empty_as_unset() {
        let env: StaticEnv = [("EMPTY", ""), ("SET", "x")].into_iter().collect();
        assert_eq!(env.non_empty("EMPTY"), None);
        assert_eq!(env.non_empty("SET").as_deref(), Some("x"));
    }

    #[test]
    fn test_process_env_missing_variable() {
        assert_eq!(ProcessEnv.lookup("CUSTOM_ERROR_PAGES_SURELY_UNSET_VAR"), None);
    }
}
