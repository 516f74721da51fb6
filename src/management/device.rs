use thiserror::Error;

use crate::types::Device;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceError {
    #[error("No Spotify device found. Open Spotify on a device and try again.")]
    NoDevice,
    #[error("No playable Spotify device found. All devices are restricted.")]
    NoPlayableDevice,
}

/// Why a device was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Its name matched the requested one.
    Requested,
    /// It was active and unrestricted.
    Active,
    /// First unrestricted device, none being active.
    FirstAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelection {
    pub device: Device,
    pub device_id: String,
    pub source: SelectionSource,
    /// The requested name that matched no device, if any.
    pub missing_request: Option<String>,
}

/// Picks the playback device.
///
/// A requested name is matched case-insensitively. Without a request, or when
/// it matches nothing, an active unrestricted device wins, then the first
/// unrestricted one. Devices Spotify reports without an ID cannot be targeted
/// and are skipped.
pub fn select_device(
    devices: &[Device],
    requested: Option<&str>,
) -> Result<DeviceSelection, DeviceError> {
    if devices.is_empty() {
        return Err(DeviceError::NoDevice);
    }

    let mut missing_request = None;
    if let Some(name) = requested {
        let wanted = name.to_lowercase();
        let found = devices
            .iter()
            .find(|d| d.id.is_some() && d.name.to_lowercase() == wanted);

        match found {
            Some(device) => return Ok(selection(device, SelectionSource::Requested, None)),
            None => missing_request = Some(name.to_string()),
        }
    }

    let playable = |d: &&Device| d.id.is_some() && !d.is_restricted;

    if let Some(device) = devices.iter().filter(playable).find(|d| d.is_active) {
        return Ok(selection(device, SelectionSource::Active, missing_request));
    }

    if let Some(device) = devices.iter().find(playable) {
        return Ok(selection(
            device,
            SelectionSource::FirstAvailable,
            missing_request,
        ));
    }

    Err(DeviceError::NoPlayableDevice)
}

fn selection(
    device: &Device,
    source: SelectionSource,
    missing_request: Option<String>,
) -> DeviceSelection {
    DeviceSelection {
        device: device.clone(),
        device_id: device.id.clone().unwrap_or_default(),
        source,
        missing_request,
    }
}
