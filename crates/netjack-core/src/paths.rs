//! Standard paths used by Netjack tools

use std::path::PathBuf;

/// Standard Netjack paths
pub struct Paths {
    /// Config directory (~/.config/netjack, or $NETJACK_CONFIG_DIR)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = std::env::var_os("NETJACK_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("~/.config"))
                    .join("netjack")
            });

        Self { config }
    }

    /// Get the config file path for a tool (`<config>/<tool>.yaml`)
    pub fn config_file(&self, tool: &str) -> PathBuf {
        self.config.join(format!("{}.yaml", tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_naming() {
        let paths = Paths {
            config: PathBuf::from("/tmp/config"),
        };
        assert_eq!(paths.config_file("focus"), PathBuf::from("/tmp/config/focus.yaml"));
    }
}
