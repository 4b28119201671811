//! Recognized configuration knobs (§6.4).
//!
//! Deserializable the way `freddiehaddad-oxidized`'s `core-config::ConfigFile`
//! is: `#[serde(default)]` per field plus a hand-written [`Default`] for the
//! struct, so an embedding application can load a partial TOML/JSON document
//! and fall back to the spec's defaults for anything it omits.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hard upper bound on CSP variable count per component, default 50.
const DEFAULT_MAX_COMPONENT_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Hard upper bound on CSP variable count per component (§4.I).
    #[serde(default = "SolverConfig::default_max_component_size")]
    pub max_component_size: usize,

    /// When false, no GUESS action is emitted even if nothing else is
    /// decidable (§4.I "Guess selection").
    #[serde(default = "SolverConfig::default_allow_guess")]
    pub allow_guess: bool,

    /// When false, the sweep phase (§4.K) is skipped.
    #[serde(default = "SolverConfig::default_enable_sweep")]
    pub enable_sweep: bool,
}

impl SolverConfig {
    const fn default_max_component_size() -> usize {
        DEFAULT_MAX_COMPONENT_SIZE
    }

    const fn default_allow_guess() -> bool {
        true
    }

    const fn default_enable_sweep() -> bool {
        true
    }

    /// Validate a parsed config, rejecting knob combinations that would
    /// make the solver vacuous (e.g. a zero-size component bound).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_component_size == 0 {
            return Err(ConfigError::ZeroComponentSize(self.max_component_size));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_component_size: Self::default_max_component_size(),
            allow_guess: Self::default_allow_guess(),
            enable_sweep: Self::default_enable_sweep(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_defaults() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.max_component_size, 50);
        assert!(cfg.allow_guess);
        assert!(cfg.enable_sweep);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SolverConfig = serde_json::from_str(r#"{"allow_guess": false}"#).unwrap();
        assert_eq!(cfg.max_component_size, 50);
        assert!(!cfg.allow_guess);
        assert!(cfg.enable_sweep);
    }

    #[test]
    fn zero_component_size_is_rejected() {
        let cfg = SolverConfig {
            max_component_size: 0,
            ..SolverConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroComponentSize(0)));
    }
}
