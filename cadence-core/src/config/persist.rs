//! Configuration persistence
//!
//! Encodes and decodes [`AdcConfig`] as postcard binary data so boards
//! can keep their acquisition setup in flash.

use super::types::{AdcConfig, ConfigError, CONFIG_VERSION, MAX_CHANNELS};

/// Upper bound on an encoded config, for sizing flash buffers
pub const MAX_ENCODED_SIZE: usize = 8 + MAX_CHANNELS * 2;

/// Serialize a config into `buffer`
///
/// Returns the used prefix of the buffer.
pub fn encode<'a>(config: &AdcConfig, buffer: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
    postcard::to_slice(config, buffer).map_err(|_| ConfigError::Serialize)
}

/// Deserialize and validate a config
pub fn decode(bytes: &[u8]) -> Result<AdcConfig, ConfigError> {
    let config: AdcConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

    if config.version != CONFIG_VERSION {
        warn!(
            "Config version mismatch: found {}, expected {}",
            config.version,
            CONFIG_VERSION
        );
        return Err(ConfigError::VersionMismatch);
    }

    config.validate()?;
    debug!("Loaded ADC config: {} channels", config.channel_count);
    Ok(config)
}
