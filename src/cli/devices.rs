use tabled::Table;

use super::auth::authorized_client;
use crate::{
    Res, info,
    management::StateStore,
    spotify::SpotifyApi,
    types::{Device, DeviceTableRow},
    warning,
};

pub async fn list_devices() -> Res<()> {
    let store = StateStore::default_location();
    let client = authorized_client(&store).await?;
    print_devices(&client).await
}

/// Prints the available playback devices as a table.
pub async fn print_devices<A: SpotifyApi + ?Sized>(api: &A) -> Res<()> {
    let devices = api.devices().await?;
    if devices.is_empty() {
        warning!("No available devices found.");
        return Ok(());
    }

    info!("Available devices:");
    println!("{}", Table::new(device_rows(&devices)));
    Ok(())
}

pub fn device_rows(devices: &[Device]) -> Vec<DeviceTableRow> {
    devices
        .iter()
        .map(|d| DeviceTableRow {
            name: d.name.clone(),
            kind: d.kind.clone(),
            active: if d.is_active { "active" } else { "" }.to_string(),
        })
        .collect()
}
