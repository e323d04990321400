use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::DuplexError;
use super::frame::BYTES_PER_SAMPLE;

/// Default stream sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Default number of samples per callback block.
pub const DEFAULT_FRAMES_PER_BUFFER: u32 = 1024;

/// Linear mic gain applied while playback is audible (≈ -5 dB).
pub const DEFAULT_DUCKING_GAIN: f32 = 0.5623;

/// Configuration for a duplex engine.
///
/// Both streams are mono, 16-bit signed little-endian PCM and share the
/// same sample rate and block size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplexConfig {
    /// Stream sample rate in Hz (default: 24000).
    pub sample_rate: u32,

    /// Samples per capture/render block (default: 1024).
    pub frames_per_buffer: u32,

    /// Linear gain applied to mic samples while ducking (default: 0.5623).
    pub ducking_gain: f32,

    /// Capture device name, or None for the host default.
    pub capture_device: Option<String>,

    /// Playback device name, or None for the host default.
    pub playback_device: Option<String>,
}

impl DuplexConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.frames_per_buffer == 0 {
            return Err("frames per buffer must be positive".into());
        }
        if !self.ducking_gain.is_finite() || !(0.0..=1.0).contains(&self.ducking_gain) {
            return Err(format!("ducking gain out of range: {}", self.ducking_gain));
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, DuplexError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DuplexError::ConfigurationFailed(format!("invalid config json: {}", e)))?;
        config.validate().map_err(DuplexError::ConfigurationFailed)?;
        Ok(config)
    }

    /// Size in bytes of one full render or capture block.
    pub fn bytes_per_buffer(&self) -> usize {
        self.frames_per_buffer as usize * BYTES_PER_SAMPLE
    }

    /// Wall-clock duration of one block at the configured rate.
    pub fn buffer_duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames_per_buffer as f64 / self.sample_rate as f64)
    }
}

impl Default for DuplexConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frames_per_buffer: DEFAULT_FRAMES_PER_BUFFER,
            ducking_gain: DEFAULT_DUCKING_GAIN,
            capture_device: None,
            playback_device: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_device_profile() {
        let config = DuplexConfig::default();
        assert_eq!(config.sample_rate, 24_000);
        assert_eq!(config.frames_per_buffer, 1024);
        assert_eq!(config.bytes_per_buffer(), 2048);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_gain_is_minus_five_db() {
        let db = 20.0 * (DEFAULT_DUCKING_GAIN as f64).log10();
        assert_relative_eq!(db, -5.0, epsilon = 0.01);
    }

    #[test]
    fn buffer_duration() {
        let config = DuplexConfig {
            sample_rate: 16_000,
            frames_per_buffer: 160,
            ..Default::default()
        };
        assert_relative_eq!(config.buffer_duration().as_secs_f64(), 0.01, epsilon = 1e-9);
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_rate = DuplexConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(zero_rate.validate().is_err());

        let zero_frames = DuplexConfig {
            frames_per_buffer: 0,
            ..Default::default()
        };
        assert!(zero_frames.validate().is_err());

        let loud = DuplexConfig {
            ducking_gain: 1.5,
            ..Default::default()
        };
        assert!(loud.validate().is_err());

        let nan = DuplexConfig {
            ducking_gain: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn from_json_fills_defaults() {
        let config =
            DuplexConfig::from_json_str(r#"{ "sample_rate": 16000, "capture_device": "hw:1,0" }"#)
                .unwrap();
        assert_eq!(config.sample_rate, 16_000);
        assert_eq!(config.frames_per_buffer, DEFAULT_FRAMES_PER_BUFFER);
        assert_eq!(config.capture_device.as_deref(), Some("hw:1,0"));
        assert_eq!(config.playback_device, None);
    }

    #[test]
    fn from_json_rejects_bad_input() {
        assert!(matches!(
            DuplexConfig::from_json_str("not json"),
            Err(DuplexError::ConfigurationFailed(_))
        ));
        assert!(matches!(
            DuplexConfig::from_json_str(r#"{ "frames_per_buffer": 0 }"#),
            Err(DuplexError::ConfigurationFailed(_))
        ));
    }
}
