//! Audio device enumeration through the default cpal host.
//!
//! On Linux this is ALSA (or JACK when cpal is built with it), so device
//! names look like `default`, `plughw:CARD=Device,DEV=0`, `pulse`.

use cpal::traits::{DeviceTrait, HostTrait};

use duplex_audio_core::models::audio_models::{DeviceInfo, StreamDirection};
use duplex_audio_core::models::error::DuplexError;

/// Device lookup on the default cpal host.
pub struct DeviceEnumerator {
    host: cpal::Host,
}

impl DeviceEnumerator {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// List devices that can capture.
    pub fn list_capture_devices(&self) -> Result<Vec<DeviceInfo>, DuplexError> {
        let devices = self
            .host
            .input_devices()
            .map_err(|e| DuplexError::StreamFailed(format!("failed to enumerate input devices: {}", e)))?;
        let default_name = self.host.default_input_device().and_then(|d| d.name().ok());
        Ok(describe(devices, StreamDirection::Capture, default_name.as_deref()))
    }

    /// List devices that can render.
    pub fn list_render_devices(&self) -> Result<Vec<DeviceInfo>, DuplexError> {
        let devices = self
            .host
            .output_devices()
            .map_err(|e| DuplexError::StreamFailed(format!("failed to enumerate output devices: {}", e)))?;
        let default_name = self.host.default_output_device().and_then(|d| d.name().ok());
        Ok(describe(devices, StreamDirection::Render, default_name.as_deref()))
    }

    /// Resolve a capture device by name, or the host default for `None`.
    pub fn capture_device(&self, name: Option<&str>) -> Result<cpal::Device, DuplexError> {
        match name {
            None => self
                .host
                .default_input_device()
                .ok_or(DuplexError::DeviceNotAvailable),
            Some(wanted) => {
                let devices = self
                    .host
                    .input_devices()
                    .map_err(|_| DuplexError::DeviceNotAvailable)?;
                find_by_name(devices, wanted)
            }
        }
    }

    /// Resolve a render device by name, or the host default for `None`.
    pub fn render_device(&self, name: Option<&str>) -> Result<cpal::Device, DuplexError> {
        match name {
            None => self
                .host
                .default_output_device()
                .ok_or(DuplexError::DeviceNotAvailable),
            Some(wanted) => {
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|_| DuplexError::DeviceNotAvailable)?;
                find_by_name(devices, wanted)
            }
        }
    }
}

impl Default for DeviceEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(
    devices: impl Iterator<Item = cpal::Device>,
    direction: StreamDirection,
    default_name: Option<&str>,
) -> Vec<DeviceInfo> {
    describe_names(devices.filter_map(|device| device.name().ok()), direction, default_name)
}

/// Build `DeviceInfo`s from device names; the one equal to `default_name`
/// is marked as the host default.
pub(crate) fn describe_names(
    names: impl Iterator<Item = String>,
    direction: StreamDirection,
    default_name: Option<&str>,
) -> Vec<DeviceInfo> {
    names
        .map(|name| DeviceInfo {
            is_default: default_name.is_some_and(|default| name_matches(&name, default)),
            name,
            direction,
        })
        .collect()
}

fn find_by_name(
    devices: impl Iterator<Item = cpal::Device>,
    wanted: &str,
) -> Result<cpal::Device, DuplexError> {
    for device in devices {
        match device.name() {
            Ok(name) if name_matches(&name, wanted) => return Ok(device),
            Ok(_) => {}
            Err(e) => log::debug!("Skipping device without a name: {}", e),
        }
    }
    log::warn!("Audio device \"{}\" not found", wanted);
    Err(DuplexError::DeviceNotAvailable)
}

/// Device names compare exactly after trimming; ALSA names are
/// case-sensitive.
pub(crate) fn name_matches(candidate: &str, wanted: &str) -> bool {
    candidate.trim() == wanted.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_exactly() {
        assert!(name_matches("default", "default"));
        assert!(name_matches("plughw:CARD=Device,DEV=0", " plughw:CARD=Device,DEV=0 "));
        assert!(!name_matches("plughw:CARD=Device,DEV=0", "plughw:CARD=Device,DEV=1"));
        assert!(!name_matches("Default", "default"));
    }

    #[test]
    fn describe_marks_only_the_default() {
        let names = ["default", "pulse", "plughw:CARD=Device,DEV=0"].map(String::from);

        let info = describe_names(names.into_iter(), StreamDirection::Render, Some("pulse"));

        assert_eq!(info.len(), 3);
        assert!(info.iter().all(|d| d.direction == StreamDirection::Render));
        let defaults: Vec<&str> = info
            .iter()
            .filter(|d| d.is_default)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(defaults, vec!["pulse"]);
    }

    #[test]
    fn describe_without_default_device() {
        let names = ["hw:0,0", "hw:1,0"].map(String::from);

        let info = describe_names(names.into_iter(), StreamDirection::Capture, None);

        assert_eq!(info[0].name, "hw:0,0");
        assert!(info.iter().all(|d| !d.is_default));
    }
}
