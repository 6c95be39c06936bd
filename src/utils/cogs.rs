//! Explicit registry of the bot's cogs.
//!
//! Load state is a controlled mutation of this registry rather than any
//! dynamic module discovery: a command whose cog is unloaded is rejected by
//! the global command check before its handler runs.

use dashmap::DashMap;
use thiserror::Error;

/// Every cog the bot ships with. The registry is seeded from this list and
/// never grows at runtime.
pub const COGS: &[&str] = &["admin", "ai", "general", "moderation", "watch"];

/// The admin cog hosts the load/unload commands themselves and cannot be
/// unloaded.
pub const PROTECTED_COG: &str = "admin";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CogError {
    #[error("Unknown cog `{0}`")]
    Unknown(String),

    #[error("Cog `{0}` cannot be unloaded")]
    Protected(String),
}

pub struct CogRegistry {
    inner: DashMap<&'static str, bool>,
}

impl Default for CogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CogRegistry {
    /// All cogs start loaded.
    pub fn new() -> Self {
        let inner = DashMap::new();
        for cog in COGS {
            inner.insert(*cog, true);
        }
        Self { inner }
    }

    /// Whether a cog's commands may currently run. Unknown names are treated
    /// as enabled so commands without a registered cog are never locked out.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.inner.get(name).map(|entry| *entry).unwrap_or(true)
    }

    pub fn load(&self, name: &str) -> Result<(), CogError> {
        self.set_enabled(name, true)
    }

    pub fn unload(&self, name: &str) -> Result<(), CogError> {
        if name == PROTECTED_COG {
            return Err(CogError::Protected(name.to_string()));
        }
        self.set_enabled(name, false)
    }

    /// Reload re-enables a cog; with no dynamic modules there is nothing
    /// further to re-initialize.
    pub fn reload(&self, name: &str) -> Result<(), CogError> {
        self.set_enabled(name, true)
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), CogError> {
        let Some(key) = COGS.iter().find(|cog| **cog == name) else {
            return Err(CogError::Unknown(name.to_string()));
        };
        self.inner.insert(key, enabled);
        Ok(())
    }

    /// (name, enabled) pairs in declaration order, for the `cogs` listing.
    pub fn statuses(&self) -> Vec<(&'static str, bool)> {
        COGS.iter().map(|cog| (*cog, self.is_enabled(cog))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_cogs_start_loaded() {
        let registry = CogRegistry::new();
        for (name, enabled) in registry.statuses() {
            assert!(enabled, "cog `{}` should start loaded", name);
        }
    }

    #[test]
    fn test_unload_and_load_round_trip() {
        let registry = CogRegistry::new();

        registry.unload("ai").unwrap();
        assert!(!registry.is_enabled("ai"));

        registry.load("ai").unwrap();
        assert!(registry.is_enabled("ai"));
    }

    #[test]
    fn test_reload_enables_a_disabled_cog() {
        let registry = CogRegistry::new();
        registry.unload("watch").unwrap();

        registry.reload("watch").unwrap();

        assert!(registry.is_enabled("watch"));
    }

    #[test]
    fn test_admin_cog_is_protected() {
        let registry = CogRegistry::new();
        assert_eq!(
            registry.unload("admin"),
            Err(CogError::Protected("admin".to_string()))
        );
        assert!(registry.is_enabled("admin"));
    }

    #[test]
    fn test_unknown_cog_is_rejected() {
        let registry = CogRegistry::new();
        assert_eq!(
            registry.load("music"),
            Err(CogError::Unknown("music".to_string()))
        );
    }

    #[test]
    fn test_unknown_name_reads_as_enabled() {
        let registry = CogRegistry::new();
        assert!(registry.is_enabled("not-a-cog"));
    }
}
