//! Config validation logic.
//! Rejects settings the copy engine cannot honour before any file is touched.

use anyhow::{Result, bail};
use tracing::debug;

use super::types::Config;

impl Config {
    /// Validate sizes and mode bits.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            bail!("buffer_size must be at least 1 byte");
        }
        if self.max_path_len == 0 {
            bail!("max_path_len must be at least 1 byte");
        }
        if self.create_mode > 0o7777 {
            bail!(
                "create_mode {:o} has bits outside 0o7777",
                self.create_mode
            );
        }
        debug!(
            buffer_size = self.buffer_size,
            max_path_len = self.max_path_len,
            create_mode = %format!("{:o}", self.create_mode),
            resolve = %self.resolve,
            "Config validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn zero_buffer_is_rejected() {
        let err = Config::with_buffer_size(0).validate().unwrap_err();
        assert!(err.to_string().contains("buffer_size"));
    }

    #[test]
    fn oversized_mode_is_rejected() {
        let cfg = Config {
            create_mode: 0o17777,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
