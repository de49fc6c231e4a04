use glamour::{
    error::GlamourError,
    mask::{EquipMask, SnapshotFlags},
    snapshot::{format_size, Snapshot, TOTAL_SIZE_V1, TOTAL_SIZE_V2, TOTAL_SIZE_V3},
};

/// A capture body as older clients wrote it: full mask, a few pieces, a Hyur.
fn legacy_bytes(version: u8, flags: u8) -> Vec<u8> {
    let mut bytes = vec![0u8; format_size(version).unwrap()];
    bytes[0] = version;
    bytes[1] = flags;
    bytes[2..4].copy_from_slice(&0x0FFFu16.to_le_bytes());
    // main hand: set 201, type 7, variant 1, dye 4
    bytes[4..11].copy_from_slice(&[201, 0, 7, 0, 1, 0, 4]);
    // body armor: set 6016, variant 1, dye 36
    let body = 4 + 14 + 2 + 4;
    bytes[body..body + 4].copy_from_slice(&[0x80, 0x17, 1, 36]);
    // customization race, gender, height
    let customize = 4 + 14 + 2 + 40;
    bytes[customize..customize + 4].copy_from_slice(&[1, 0, 1, 50]);
    bytes
}

#[test]
fn decode_v1_single_flag() {
    let snapshot = Snapshot::from_bytes(&legacy_bytes(1, 1)).unwrap();

    assert!(snapshot.flags().contains(SnapshotFlags::WRITE_CUSTOMIZATIONS));
    assert!(snapshot.flags().contains(SnapshotFlags::IS_WET));
    assert_eq!(snapshot.alpha(), 1.0);
    assert_eq!(snapshot.equip_mask, EquipMask::all());
    assert_eq!(snapshot.equipment.main_hand.set(), 201);
    assert_eq!(snapshot.equipment.main_hand.dye(), 4);
    assert_eq!(snapshot.equipment.armor[1].set(), 6016);
    assert_eq!(snapshot.customize.as_bytes()[3], 50);

    let cleared = Snapshot::from_bytes(&legacy_bytes(1, 0)).unwrap();
    assert_eq!(cleared.flags(), SnapshotFlags::empty());
}

#[test]
fn decode_v2_trailing_state() {
    let mut bytes = legacy_bytes(2, SnapshotFlags::WRITE_CUSTOMIZATIONS.bits());
    bytes[TOTAL_SIZE_V1] = 0b001;
    let snapshot = Snapshot::from_bytes(&bytes).unwrap();

    assert!(snapshot.flags().contains(SnapshotFlags::HAT_STATE));
    assert!(snapshot.flags().contains(SnapshotFlags::WRITE_CUSTOMIZATIONS));
    assert!(!snapshot.flags().contains(SnapshotFlags::WEAPON_STATE));
    assert_eq!(snapshot.alpha(), 1.0);
}

#[test]
fn decode_v2_ignores_high_state_bits() {
    let mut bytes = legacy_bytes(2, SnapshotFlags::WRITE_CUSTOMIZATIONS.bits());
    bytes[TOTAL_SIZE_V1] = 0x81;
    let snapshot = Snapshot::from_bytes(&bytes).unwrap();

    assert!(snapshot.flags().contains(SnapshotFlags::HAT_STATE));
    assert!(!snapshot.flags().contains(SnapshotFlags::WEAPON_STATE));
    assert!(!snapshot.flags().contains(SnapshotFlags::VISOR_STATE));
    assert_eq!(snapshot.equipment.main_hand.set(), 201);
}

#[test]
fn unknown_sizes_are_rejected() {
    for len in [0, 1, 2, 85, 88, 89, 91, 128] {
        let mut bytes = vec![0u8; len];
        if let Some(first) = bytes.first_mut() {
            *first = 3;
        }
        assert!(
            matches!(
                Snapshot::from_bytes(&bytes),
                Err(GlamourError::SizeMismatch { actual, .. }) if actual == len
            ),
            "length {len} should not decode"
        );
    }
}

#[test]
fn unknown_version_is_rejected() {
    let mut bytes = legacy_bytes(1, 0);
    bytes[0] = 4;
    assert!(matches!(
        Snapshot::from_bytes(&bytes),
        Err(GlamourError::UnsupportedVersion(4))
    ));
}

#[test]
fn migrate_v1_to_current() {
    let old = legacy_bytes(1, 1);
    let migrated = Snapshot::from_bytes(&old).unwrap().to_bytes().unwrap();

    assert_eq!(migrated.len(), TOTAL_SIZE_V3);
    assert_eq!(migrated[0], 3);
    assert_eq!(
        migrated[1],
        (SnapshotFlags::WRITE_CUSTOMIZATIONS | SnapshotFlags::IS_WET).bits()
    );
    assert_eq!(&migrated[2..TOTAL_SIZE_V1], &old[2..]);
    assert_eq!(&migrated[TOTAL_SIZE_V1..], &1.0f32.to_le_bytes());
}

#[test]
fn migrate_v2_to_current() {
    let mut old = legacy_bytes(2, 0x1D);
    old[TOTAL_SIZE_V2 - 1] = 0b110;
    let snapshot = Snapshot::from_bytes(&old).unwrap();
    assert_eq!(snapshot.hat_state(), Some(false));
    assert_eq!(snapshot.weapon_state(), Some(true));
    assert_eq!(snapshot.visor_state(), Some(true));

    let migrated = snapshot.to_bytes().unwrap();
    assert_eq!(migrated[1], 0x1D | 0b110 << 5);
    assert_eq!(&migrated[2..TOTAL_SIZE_V1], &old[2..TOTAL_SIZE_V1]);

    assert_eq!(Snapshot::from_bytes(&migrated).unwrap(), snapshot);
}

#[test]
fn base64_text() {
    let mut snapshot = Snapshot::from_bytes(&legacy_bytes(1, 1)).unwrap();
    snapshot.set_alpha(0.25).unwrap();
    snapshot.equip_mask = EquipMask::WEAPONS;

    let text = snapshot.to_base64().unwrap();
    assert_eq!(text.len(), 120);
    assert_eq!(text, snapshot.to_string());
    assert_eq!(format!(" {text}\n").parse::<Snapshot>().unwrap(), snapshot);

    assert!(matches!(
        Snapshot::from_base64("not base64 at all!"),
        Err(GlamourError::Base64(_))
    ));
}

#[test]
fn out_of_range_fields_are_rejected() {
    let mut bytes = legacy_bytes(1, 0);
    bytes[2..4].copy_from_slice(&0x1000u16.to_le_bytes());
    assert!(matches!(
        Snapshot::from_bytes(&bytes),
        Err(GlamourError::OutOfRangeValue { index: 2, .. })
    ));

    let mut bytes = legacy_bytes(3, 0);
    bytes[TOTAL_SIZE_V1..].copy_from_slice(&2.0f32.to_le_bytes());
    assert!(matches!(
        Snapshot::from_bytes(&bytes),
        Err(GlamourError::OutOfRangeValue { index, .. }) if index == TOTAL_SIZE_V1
    ));
}
