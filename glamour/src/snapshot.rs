use crate::{
    customize::CustomizationSet,
    equipment::{ArmorPiece, EquipmentSet, WeaponPiece},
    error::GlamourError,
    mask::{EquipMask, SnapshotFlags},
};
use base64::prelude::*;
use binrw::{binrw, BinRead, BinWrite};
use std::{fmt, io::Cursor};
use tracing::debug;

pub const CURRENT_VERSION: u8 = 3;

const BODY_SIZE: usize =
    2 + 2 * WeaponPiece::SIZE + 2 + 10 * ArmorPiece::SIZE + CustomizationSet::SIZE;

pub const TOTAL_SIZE_V1: usize = 2 + BODY_SIZE;
pub const TOTAL_SIZE_V2: usize = TOTAL_SIZE_V1 + 1;
pub const TOTAL_SIZE_V3: usize = TOTAL_SIZE_V1 + 4;

/// Offset of the little endian f32 alpha in the current layout.
const ALPHA_OFFSET: usize = TOTAL_SIZE_V1;

#[binrw]
#[brw(little)]
struct Body {
    equip_mask: u16,
    main_hand: WeaponPiece,
    off_hand: WeaponPiece,
    #[brw(pad_before = 2)]
    armor: [ArmorPiece; 10],
    customize: CustomizationSet,
}

#[binrw]
#[brw(little)]
struct CurrentLayout {
    version: u8,
    flags: u8,
    body: Body,
    alpha: f32,
}

struct Format {
    version: u8,
    size: usize,
    decode: fn(&[u8]) -> Result<Snapshot, GlamourError>,
}

/// Known versions.
const FORMATS: [Format; 3] = [
    Format {
        version: 1,
        size: TOTAL_SIZE_V1,
        decode: decode_v1,
    },
    Format {
        version: 2,
        size: TOTAL_SIZE_V2,
        decode: decode_v2,
    },
    Format {
        version: 3,
        size: TOTAL_SIZE_V3,
        decode: decode_v3,
    },
];

/// Exact byte size of a serialized snapshot of `version`.
pub fn format_size(version: u8) -> Option<usize> {
    FORMATS.iter().find(|f| f.version == version).map(|f| f.size)
}

/// Captured equipment, customization and display state of one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    flags: SnapshotFlags,
    pub equip_mask: EquipMask,
    pub equipment: EquipmentSet,
    pub customize: CustomizationSet,
    alpha: f32,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            flags: SnapshotFlags::empty(),
            equip_mask: EquipMask::all(),
            equipment: EquipmentSet::default(),
            customize: CustomizationSet::default(),
            alpha: 1.0,
        }
    }
}

impl Snapshot {
    pub fn new(equipment: EquipmentSet, customize: CustomizationSet) -> Self {
        Self {
            flags: SnapshotFlags::WRITE_CUSTOMIZATIONS,
            equipment,
            customize,
            ..Self::default()
        }
    }

    pub fn version(&self) -> u8 {
        CURRENT_VERSION
    }

    pub fn flags(&self) -> SnapshotFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: SnapshotFlags) {
        self.flags = flags;
    }

    pub fn write_customizations(&self) -> bool {
        self.flags.contains(SnapshotFlags::WRITE_CUSTOMIZATIONS)
    }

    pub fn set_write_customizations(&mut self, value: bool) {
        self.flags.set(SnapshotFlags::WRITE_CUSTOMIZATIONS, value);
    }

    pub fn is_wet(&self) -> bool {
        self.flags.contains(SnapshotFlags::IS_WET)
    }

    pub fn set_wet(&mut self, value: bool) {
        self.flags.set(SnapshotFlags::IS_WET, value);
    }

    fn state(&self, set: SnapshotFlags, state: SnapshotFlags) -> Option<bool> {
        self.flags
            .contains(set)
            .then(|| self.flags.contains(state))
    }

    fn set_state(&mut self, set: SnapshotFlags, state: SnapshotFlags, value: Option<bool>) {
        self.flags.set(set, value.is_some());
        self.flags.set(state, value.unwrap_or(false));
    }

    /// Headgear visibility, `None` if the snapshot leaves it alone.
    pub fn hat_state(&self) -> Option<bool> {
        self.state(SnapshotFlags::SET_HAT_STATE, SnapshotFlags::HAT_STATE)
    }

    pub fn set_hat_state(&mut self, value: Option<bool>) {
        self.set_state(SnapshotFlags::SET_HAT_STATE, SnapshotFlags::HAT_STATE, value)
    }

    pub fn weapon_state(&self) -> Option<bool> {
        self.state(SnapshotFlags::SET_WEAPON_STATE, SnapshotFlags::WEAPON_STATE)
    }

    pub fn set_weapon_state(&mut self, value: Option<bool>) {
        self.set_state(
            SnapshotFlags::SET_WEAPON_STATE,
            SnapshotFlags::WEAPON_STATE,
            value,
        )
    }

    pub fn visor_state(&self) -> Option<bool> {
        self.state(SnapshotFlags::SET_VISOR_STATE, SnapshotFlags::VISOR_STATE)
    }

    pub fn set_visor_state(&mut self, value: Option<bool>) {
        self.set_state(
            SnapshotFlags::SET_VISOR_STATE,
            SnapshotFlags::VISOR_STATE,
            value,
        )
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) -> Result<(), GlamourError> {
        if !valid_alpha(alpha) {
            return Err(GlamourError::InvalidAlpha(alpha));
        }
        self.alpha = alpha;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Box<[u8]>, GlamourError> {
        let layout = CurrentLayout {
            version: CURRENT_VERSION,
            flags: self.flags.bits(),
            body: Body {
                equip_mask: self.equip_mask.bits(),
                main_hand: self.equipment.main_hand,
                off_hand: self.equipment.off_hand,
                armor: self.equipment.armor,
                customize: self.customize,
            },
            alpha: self.alpha,
        };

        let mut out = Cursor::new(Vec::with_capacity(TOTAL_SIZE_V3));
        layout.write(&mut out).map_err(GlamourError::Snapshot)?;
        Ok(out.into_inner().into_boxed_slice())
    }

    /// Decodes any known version. The length must match that version exactly.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GlamourError> {
        let version = bytes.first().copied().unwrap_or(0);
        if !FORMATS.iter().any(|f| f.size == bytes.len()) {
            return Err(GlamourError::SizeMismatch {
                version,
                actual: bytes.len(),
            });
        }

        let format = FORMATS
            .iter()
            .find(|f| f.version == version)
            .ok_or(GlamourError::UnsupportedVersion(version))?;
        if bytes.len() != format.size {
            return Err(GlamourError::SizeMismatch {
                version,
                actual: bytes.len(),
            });
        }

        if version != CURRENT_VERSION {
            debug!("migrating snapshot from version {version} to {CURRENT_VERSION}");
        }
        (format.decode)(bytes)
    }

    pub fn to_base64(&self) -> Result<String, GlamourError> {
        Ok(BASE64_STANDARD.encode(self.to_bytes()?))
    }

    pub fn from_base64(text: &str) -> Result<Self, GlamourError> {
        let bytes = BASE64_STANDARD
            .decode(text.trim())
            .map_err(GlamourError::Base64)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_base64().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl std::str::FromStr for Snapshot {
    type Err = GlamourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

fn valid_alpha(alpha: f32) -> bool {
    (0.0..=1.0).contains(&alpha)
}

fn check_flags(version: u8, value: u8, max: u8) -> Result<u8, GlamourError> {
    if value > max {
        Err(GlamourError::OutOfRangeFlags { version, value })
    } else {
        Ok(value)
    }
}

fn read_body(bytes: &[u8]) -> Result<Body, GlamourError> {
    Body::read(&mut Cursor::new(&bytes[2..TOTAL_SIZE_V1])).map_err(GlamourError::Snapshot)
}

fn assemble(body: Body, flags: SnapshotFlags, alpha: f32) -> Result<Snapshot, GlamourError> {
    let equip_mask =
        EquipMask::from_bits(body.equip_mask).ok_or_else(|| GlamourError::OutOfRangeValue {
            index: 2,
            value: format!("{:#06x}", body.equip_mask).into(),
        })?;

    Ok(Snapshot {
        flags,
        equip_mask,
        equipment: EquipmentSet {
            main_hand: body.main_hand,
            off_hand: body.off_hand,
            armor: body.armor,
        },
        customize: body.customize,
        alpha,
    })
}

/// v1 flags: a single byte, 1 sets both customization and wetness.
fn decode_v1(bytes: &[u8]) -> Result<Snapshot, GlamourError> {
    let flags = match check_flags(1, bytes[1], 1)? {
        0 => SnapshotFlags::empty(),
        _ => SnapshotFlags::WRITE_CUSTOMIZATIONS | SnapshotFlags::IS_WET,
    };
    assemble(read_body(bytes)?, flags, 1.0)
}

fn decode_v2(bytes: &[u8]) -> Result<Snapshot, GlamourError> {
    let mut flags = SnapshotFlags::from_bits_retain(check_flags(2, bytes[1], 0x3F)?);

    // only the low three bits carry state, the rest is ignored
    let state = bytes[TOTAL_SIZE_V1];
    if state & 0b001 != 0 {
        flags |= SnapshotFlags::HAT_STATE;
    }
    if state & 0b010 != 0 {
        flags |= SnapshotFlags::WEAPON_STATE;
    }
    if state & 0b100 != 0 {
        flags |= SnapshotFlags::VISOR_STATE;
    }

    assemble(read_body(bytes)?, flags, 1.0)
}

fn decode_v3(bytes: &[u8]) -> Result<Snapshot, GlamourError> {
    let layout =
        CurrentLayout::read(&mut Cursor::new(bytes)).map_err(GlamourError::Snapshot)?;
    if !valid_alpha(layout.alpha) {
        return Err(GlamourError::OutOfRangeValue {
            index: ALPHA_OFFSET,
            value: layout.alpha.to_string().into(),
        });
    }
    assemble(layout.body, SnapshotFlags::from_bits_retain(layout.flags), layout.alpha)
}
