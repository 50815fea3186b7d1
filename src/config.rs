//! Packer configuration.
//!
//! Configuration via environment variables:
//!
//! - `PACKER_DEBUG` - log generated scripts and per-call results (default: off)
//! - `PACKER_API_*` / `PACKER_*TIMEOUT_SECS` - see [`TransportConfig::from_env`]

use packer_transport::TransportConfig;
use packer_types::env_utils::env_bool;

/// Settings for [`Packer::from_config`](crate::Packer::from_config).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackerConfig {
    pub transport: TransportConfig,
    /// Debug tracing of scripts and results. Never changes how calls resolve.
    pub debug: bool,
}

impl PackerConfig {
    pub fn from_env() -> Self {
        Self {
            transport: TransportConfig::from_env(),
            debug: env_bool("PACKER_DEBUG"),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_from_env() {
        std::env::set_var("PACKER_DEBUG", "yes");
        assert!(PackerConfig::from_env().debug);
        std::env::remove_var("PACKER_DEBUG");
        assert!(!PackerConfig::from_env().debug);
    }

    #[test]
    fn test_default_is_quiet() {
        let config = PackerConfig::default();
        assert!(!config.debug);
        assert!(config.with_debug(true).debug);
    }
}
