use crate::ids::{DyeId, EquipSlot, ItemSetId, WeaponTypeId};
use binrw::binrw;
use std::fmt;

/// Set id and variant packed as `set | variant << 16`, the form used by the
/// Item sheet's model columns and by the restricted gear tables.
pub fn pack_model(set: ItemSetId, variant: u8) -> u32 {
    set as u32 | (variant as u32) << 16
}

pub fn unpack_model(value: u32) -> (ItemSetId, u8) {
    ((value & 0xFFFF) as u16, (value >> 16) as u8)
}

/// One armor or accessory slot: 4 bytes, `[set:u16][variant:u8][dye:u8]`.
#[binrw]
#[brw(little)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ArmorPiece {
    set: ItemSetId,
    variant: u8,
    dye: DyeId,
}

impl ArmorPiece {
    pub const SIZE: usize = 4;
    pub const NOTHING: Self = Self::new(0, 0, 0);

    pub const fn new(set: ItemSetId, variant: u8, dye: DyeId) -> Self {
        Self { set, variant, dye }
    }

    pub fn from_packed(model: u32, dye: DyeId) -> Self {
        let (set, variant) = unpack_model(model);
        Self::new(set, variant, dye)
    }

    pub fn set(&self) -> ItemSetId {
        self.set
    }

    pub fn variant(&self) -> u8 {
        self.variant
    }

    pub fn dye(&self) -> DyeId {
        self.dye
    }

    pub fn packed_model(&self) -> u32 {
        pack_model(self.set, self.variant)
    }

    pub fn with_model(self, set: ItemSetId, variant: u8) -> Self {
        Self { set, variant, ..self }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let [s0, s1] = self.set.to_le_bytes();
        [s0, s1, self.variant, self.dye]
    }

    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self::new(u16::from_le_bytes([bytes[0], bytes[1]]), bytes[2], bytes[3])
    }
}

impl fmt::Debug for ArmorPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.set, self.variant, self.dye)
    }
}

/// Main hand or off hand: 7 bytes, `[set:u16][type:u16][variant:u16][dye:u8]`.
///
/// A zero set id means the slot is empty, and its dye always reads as 0.
#[binrw]
#[brw(little)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeaponPiece {
    set: ItemSetId,
    weapon_type: WeaponTypeId,
    variant: u16,
    #[br(map = |dye: DyeId| if set == 0 { 0 } else { dye })]
    dye: DyeId,
}

impl WeaponPiece {
    pub const SIZE: usize = 7;
    pub const NOTHING: Self = Self::new(0, 0, 0, 0);

    pub const fn new(set: ItemSetId, weapon_type: WeaponTypeId, variant: u16, dye: DyeId) -> Self {
        Self {
            set,
            weapon_type,
            variant,
            dye: if set == 0 { 0 } else { dye },
        }
    }

    pub fn set(&self) -> ItemSetId {
        self.set
    }

    pub fn weapon_type(&self) -> WeaponTypeId {
        self.weapon_type
    }

    pub fn variant(&self) -> u16 {
        self.variant
    }

    pub fn dye(&self) -> DyeId {
        if self.set == 0 {
            0
        } else {
            self.dye
        }
    }

    pub fn is_empty(&self) -> bool {
        self.set == 0
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let [s0, s1] = self.set.to_le_bytes();
        let [t0, t1] = self.weapon_type.to_le_bytes();
        let [v0, v1] = self.variant.to_le_bytes();
        [s0, s1, t0, t1, v0, v1, self.dye()]
    }

    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self::new(
            u16::from_le_bytes([bytes[0], bytes[1]]),
            u16::from_le_bytes([bytes[2], bytes[3]]),
            u16::from_le_bytes([bytes[4], bytes[5]]),
            bytes[6],
        )
    }
}

impl fmt::Debug for WeaponPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.set,
            self.weapon_type,
            self.variant,
            self.dye()
        )
    }
}

/// A slot's contents regardless of slot kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPiece {
    Weapon(WeaponPiece),
    Armor(ArmorPiece),
}

impl SlotPiece {
    pub fn set(&self) -> ItemSetId {
        match self {
            Self::Weapon(w) => w.set(),
            Self::Armor(a) => a.set(),
        }
    }

    pub fn dye(&self) -> DyeId {
        match self {
            Self::Weapon(w) => w.dye(),
            Self::Armor(a) => a.dye(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EquipmentSet {
    pub main_hand: WeaponPiece,
    pub off_hand: WeaponPiece,
    pub armor: [ArmorPiece; 10],
}

impl EquipmentSet {
    /// Something is equipped, which at minimum means a main hand.
    pub fn is_set(&self) -> bool {
        self.main_hand.set() != 0
    }

    pub fn weapon(&self, slot: EquipSlot) -> Option<WeaponPiece> {
        match slot {
            EquipSlot::MainHand => Some(self.main_hand),
            EquipSlot::OffHand => Some(self.off_hand),
            _ => None,
        }
    }

    pub fn armor(&self, slot: EquipSlot) -> Option<ArmorPiece> {
        slot.armor_index().map(|i| self.armor[i])
    }

    pub fn get(&self, slot: EquipSlot) -> SlotPiece {
        match slot.armor_index() {
            Some(i) => SlotPiece::Armor(self.armor[i]),
            None if slot == EquipSlot::MainHand => SlotPiece::Weapon(self.main_hand),
            None => SlotPiece::Weapon(self.off_hand),
        }
    }

    pub fn set_weapon(&mut self, slot: EquipSlot, piece: WeaponPiece) {
        match slot {
            EquipSlot::MainHand => self.main_hand = piece,
            EquipSlot::OffHand => self.off_hand = piece,
            _ => {}
        }
    }

    pub fn set_armor(&mut self, slot: EquipSlot, piece: ArmorPiece) {
        if let Some(i) = slot.armor_index() {
            self.armor[i] = piece;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, SlotPiece)> + '_ {
        EquipSlot::ALL.into_iter().map(|slot| (slot, self.get(slot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_layout() {
        let piece = ArmorPiece::new(0x1234, 7, 42);
        assert_eq!(piece.to_bytes(), [0x34, 0x12, 7, 42]);
        assert_eq!(ArmorPiece::from_bytes(piece.to_bytes()), piece);
        assert_eq!(piece.packed_model(), 0x07_1234);
        assert_eq!(ArmorPiece::from_packed(0x07_1234, 42), piece);
    }

    #[test]
    fn empty_weapon_reads_without_dye() {
        let raw = WeaponPiece::from_bytes([0, 0, 1, 0, 1, 0, 99]);
        assert!(raw.is_empty());
        assert_eq!(raw.dye(), 0);
        assert_eq!(raw.to_bytes()[6], 0);
        assert_eq!(raw, WeaponPiece::new(0, 1, 1, 0));

        let equipped = WeaponPiece::new(201, 3, 1, 12);
        assert_eq!(equipped.dye(), 12);
        assert_eq!(equipped.to_bytes(), [201, 0, 3, 0, 1, 0, 12]);
    }

    #[test]
    fn equipment_access_by_slot() {
        let mut set = EquipmentSet::default();
        assert!(!set.is_set());

        set.set_weapon(EquipSlot::MainHand, WeaponPiece::new(301, 1, 2, 0));
        set.set_armor(EquipSlot::Feet, ArmorPiece::new(6016, 1, 3));
        assert!(set.is_set());
        assert_eq!(set.armor(EquipSlot::Feet), Some(ArmorPiece::new(6016, 1, 3)));
        assert_eq!(set.armor(EquipSlot::MainHand), None);
        assert_eq!(set.get(EquipSlot::Feet).dye(), 3);
        assert_eq!(set.iter().count(), 12);
    }
}
