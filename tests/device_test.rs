mod common;

use common::device;
use spotplay::{
    cli::device_rows,
    management::{DeviceError, SelectionSource, select_device},
    types::Device,
};

#[test]
fn test_no_devices() {
    assert_eq!(select_device(&[], None), Err(DeviceError::NoDevice));
    assert_eq!(
        select_device(&[], Some("Kitchen")),
        Err(DeviceError::NoDevice)
    );
}

#[test]
fn test_requested_device_matches_case_insensitively() {
    let devices = vec![
        device("d1", "Laptop", true, false),
        device("d2", "Kitchen Speaker", false, false),
    ];

    let selection = select_device(&devices, Some("kitchen speaker")).unwrap();
    assert_eq!(selection.device_id, "d2");
    assert_eq!(selection.source, SelectionSource::Requested);
    assert_eq!(selection.missing_request, None);
}

#[test]
fn test_missing_request_falls_back_to_active() {
    let devices = vec![
        device("d1", "Laptop", false, false),
        device("d2", "Phone", true, false),
    ];

    let selection = select_device(&devices, Some("Car")).unwrap();
    assert_eq!(selection.device_id, "d2");
    assert_eq!(selection.source, SelectionSource::Active);
    assert_eq!(selection.missing_request, Some("Car".to_string()));
}

#[test]
fn test_active_restricted_device_is_skipped() {
    let devices = vec![
        device("d1", "Smart TV", true, true),
        device("d2", "Laptop", false, false),
    ];

    let selection = select_device(&devices, None).unwrap();
    assert_eq!(selection.device_id, "d2");
    assert_eq!(selection.source, SelectionSource::FirstAvailable);
}

#[test]
fn test_only_restricted_devices() {
    let devices = vec![
        device("d1", "Smart TV", true, true),
        device("d2", "Speaker", false, true),
    ];

    assert_eq!(
        select_device(&devices, None),
        Err(DeviceError::NoPlayableDevice)
    );
}

#[test]
fn test_devices_without_id_are_skipped() {
    let mut no_id = device("ignored", "Laptop", true, false);
    no_id.id = None;
    let devices = vec![no_id, device("d2", "Phone", false, false)];

    let selection = select_device(&devices, Some("Laptop")).unwrap();
    assert_eq!(selection.device_id, "d2");
    assert_eq!(selection.source, SelectionSource::FirstAvailable);
    assert_eq!(selection.missing_request, Some("Laptop".to_string()));
}

#[test]
fn test_selection_follows_priority_for_every_flag_combination() {
    // Three devices, each either active or not and restricted or not.
    for mask in 0..64u32 {
        let devices: Vec<Device> = (0..3)
            .map(|i| {
                let active = mask & (1 << (i * 2)) != 0;
                let restricted = mask & (1 << (i * 2 + 1)) != 0;
                device(&format!("d{}", i), &format!("Device {}", i), active, restricted)
            })
            .collect();

        let expected = devices
            .iter()
            .find(|d| d.is_active && !d.is_restricted)
            .or_else(|| devices.iter().find(|d| !d.is_restricted));

        match (select_device(&devices, None), expected) {
            (Ok(selection), Some(device)) => {
                assert_eq!(selection.device, *device, "mask {}", mask);
                assert!(!selection.device.is_restricted);
            }
            (Err(error), None) => assert_eq!(error, DeviceError::NoPlayableDevice),
            (got, want) => panic!("mask {}: got {:?}, expected {:?}", mask, got, want),
        }
    }
}

#[test]
fn test_device_rows() {
    let devices = vec![
        device("d1", "Laptop", true, false),
        device("d2", "Phone", false, false),
    ];

    let rows = device_rows(&devices);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Laptop");
    assert_eq!(rows[0].kind, "Computer");
    assert_eq!(rows[0].active, "active");
    assert_eq!(rows[1].active, "");
}
