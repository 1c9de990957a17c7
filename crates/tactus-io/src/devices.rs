//! Capture device enumeration via cpal.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

/// Sample rate reported when a device will not say.
const FALLBACK_SAMPLE_RATE: u32 = 48000;

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Capture device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Channel count of the default input configuration.
    pub channels: u16,
    /// Whether this is the host's default input device.
    pub is_default: bool,
}

fn describe(device: &Device, is_default: bool) -> Option<AudioDevice> {
    let name = device_name(device).ok()?;
    let (default_sample_rate, channels) = device
        .default_input_config()
        .map(|c| (c.sample_rate(), c.channels()))
        .unwrap_or((FALLBACK_SAMPLE_RATE, 1));
    Some(AudioDevice {
        name,
        default_sample_rate,
        channels,
        is_default,
    })
}

/// List all capture devices of `host`.
pub(crate) fn list_host_input_devices(host: &Host) -> Result<Vec<AudioDevice>> {
    let default_name = host
        .default_input_device()
        .and_then(|d| device_name(&d).ok());

    let devices = host
        .input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .filter_map(|device| {
            let is_default = device_name(&device).ok() == default_name;
            describe(&device, is_default)
        })
        .collect();

    Ok(devices)
}

/// Default capture device of `host`, if any.
pub(crate) fn host_default_input_device(host: &Host) -> Option<AudioDevice> {
    host.default_input_device()
        .and_then(|device| describe(&device, true))
}

/// Find a capture device whose name contains `search` (case-insensitive), or
/// the default device when `search` is `None`.
pub(crate) fn find_input_device(host: &Host, search: Option<&str>) -> Result<Device> {
    let Some(search) = search else {
        return host.default_input_device().ok_or(Error::NoDevice);
    };

    let search_lower = search.to_lowercase();
    let devices = host
        .input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    for device in devices {
        if let Ok(name) = device_name(&device)
            && name.to_lowercase().contains(&search_lower)
        {
            return Ok(device);
        }
    }
    Err(Error::DeviceNotFound(format!(
        "no input device matching '{}'",
        search
    )))
}

/// List all capture devices of the default host.
pub fn list_input_devices() -> Result<Vec<AudioDevice>> {
    list_host_input_devices(&cpal::default_host())
}

/// Default capture device of the default host, if any.
pub fn default_input_device() -> Result<Option<AudioDevice>> {
    Ok(host_default_input_device(&cpal::default_host()))
}
