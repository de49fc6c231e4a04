use crate::{
    customize::CustomizationSet,
    equipment::{ArmorPiece, WeaponPiece},
    error::GlamourError,
    ids::{DyeId, EquipSlot, Gender, ItemSetId, Race, WeaponTypeId},
};
use byteorder::{ByteOrder, LE};

/// Byte offsets of an actor's appearance data within a host memory region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorLayout {
    pub customize: usize,
    /// Start of the 10 contiguous 4 byte armor records.
    pub armor: usize,
    pub main_hand: usize,
    pub off_hand: usize,
    /// Visibility bits, see [`ActorView::HAT_VISIBLE`] and friends.
    pub state: usize,
    pub wetness: usize,
    /// Little endian f32.
    pub alpha: usize,
}

impl Default for ActorLayout {
    /// Layout of a compact actor dump, 88 bytes long.
    fn default() -> Self {
        Self {
            customize: 0x00,
            state: 0x1A,
            wetness: 0x1B,
            armor: 0x1C,
            main_hand: 0x44,
            off_hand: 0x4B,
            alpha: 0x54,
        }
    }
}

impl ActorLayout {
    /// Smallest region length that covers every field.
    pub fn required_len(&self) -> usize {
        [
            self.customize + CustomizationSet::SIZE,
            self.armor + 10 * ArmorPiece::SIZE,
            self.main_hand + WeaponPiece::SIZE,
            self.off_hand + WeaponPiece::SIZE,
            self.state + 1,
            self.wetness + 1,
            self.alpha + 4,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

const ARMOR_SET: usize = 0;
const ARMOR_VARIANT: usize = 2;
const ARMOR_DYE: usize = 3;

const WEAPON_SET: usize = 0;
const WEAPON_TYPE: usize = 2;
const WEAPON_VARIANT: usize = 4;
const WEAPON_DYE: usize = 6;

/// Bounds checked view over a live actor's memory.
///
/// Every write touches only the bytes of the field it names, so a model write
/// never clobbers the dye sharing its record and vice versa.
pub struct ActorView<'a> {
    mem: &'a mut [u8],
    layout: ActorLayout,
}

impl<'a> ActorView<'a> {
    pub const HAT_VISIBLE: u8 = 1 << 0;
    pub const WEAPON_VISIBLE: u8 = 1 << 1;
    pub const VISOR_TOGGLED: u8 = 1 << 2;

    pub fn new(mem: &'a mut [u8], layout: ActorLayout) -> Result<Self, GlamourError> {
        let required = layout.required_len();
        if mem.len() < required {
            return Err(GlamourError::ActorBufferTooSmall {
                required,
                actual: mem.len(),
            });
        }
        Ok(Self { mem, layout })
    }

    pub fn customize(&self) -> CustomizationSet {
        let mut data = [0u8; CustomizationSet::SIZE];
        data.copy_from_slice(&self.mem[self.layout.customize..][..CustomizationSet::SIZE]);
        CustomizationSet::from_bytes(data)
    }

    pub fn set_customize(&mut self, customize: &CustomizationSet) {
        self.mem[self.layout.customize..][..CustomizationSet::SIZE]
            .copy_from_slice(customize.as_bytes());
    }

    /// Body the actor currently has, `None` for non-human models.
    pub fn body(&self) -> Option<(Race, Gender)> {
        let customize = self.customize();
        customize.race().ok().map(|race| (race, customize.gender()))
    }

    fn armor_offset(&self, slot: EquipSlot) -> Option<usize> {
        slot.armor_index()
            .map(|i| self.layout.armor + i * ArmorPiece::SIZE)
    }

    fn weapon_offset(&self, slot: EquipSlot) -> Option<usize> {
        match slot {
            EquipSlot::MainHand => Some(self.layout.main_hand),
            EquipSlot::OffHand => Some(self.layout.off_hand),
            _ => None,
        }
    }

    pub fn armor(&self, slot: EquipSlot) -> Option<ArmorPiece> {
        let offset = self.armor_offset(slot)?;
        let record = &self.mem[offset..][..ArmorPiece::SIZE];
        Some(ArmorPiece::new(
            LE::read_u16(&record[ARMOR_SET..]),
            record[ARMOR_VARIANT],
            record[ARMOR_DYE],
        ))
    }

    pub fn weapon(&self, slot: EquipSlot) -> Option<WeaponPiece> {
        let offset = self.weapon_offset(slot)?;
        let record = &self.mem[offset..][..WeaponPiece::SIZE];
        Some(WeaponPiece::new(
            LE::read_u16(&record[WEAPON_SET..]),
            LE::read_u16(&record[WEAPON_TYPE..]),
            LE::read_u16(&record[WEAPON_VARIANT..]),
            record[WEAPON_DYE],
        ))
    }

    /// Writes set id and, if given, the variant of an armor slot.
    pub fn write_armor_model(&mut self, slot: EquipSlot, set: ItemSetId, variant: Option<u8>) {
        if let Some(offset) = self.armor_offset(slot) {
            LE::write_u16(&mut self.mem[offset + ARMOR_SET..], set);
            if let Some(variant) = variant {
                self.mem[offset + ARMOR_VARIANT] = variant;
            }
        }
    }

    pub fn write_armor_dye(&mut self, slot: EquipSlot, dye: DyeId) {
        if let Some(offset) = self.armor_offset(slot) {
            self.mem[offset + ARMOR_DYE] = dye;
        }
    }

    pub fn write_weapon_model(
        &mut self,
        slot: EquipSlot,
        set: ItemSetId,
        weapon_type: WeaponTypeId,
        variant: u16,
    ) {
        if let Some(offset) = self.weapon_offset(slot) {
            LE::write_u16(&mut self.mem[offset + WEAPON_SET..], set);
            LE::write_u16(&mut self.mem[offset + WEAPON_TYPE..], weapon_type);
            LE::write_u16(&mut self.mem[offset + WEAPON_VARIANT..], variant);
        }
    }

    pub fn write_weapon_dye(&mut self, slot: EquipSlot, dye: DyeId) {
        if let Some(offset) = self.weapon_offset(slot) {
            self.mem[offset + WEAPON_DYE] = dye;
        }
    }

    /// The 10 armor records as one contiguous block.
    pub fn armor_block(&self) -> &[u8] {
        &self.mem[self.layout.armor..][..10 * ArmorPiece::SIZE]
    }

    pub fn armor_block_mut(&mut self) -> &mut [u8] {
        &mut self.mem[self.layout.armor..][..10 * ArmorPiece::SIZE]
    }

    pub fn state(&self) -> u8 {
        self.mem[self.layout.state]
    }

    pub fn set_state_bit(&mut self, bit: u8, value: bool) {
        let state = &mut self.mem[self.layout.state];
        if value {
            *state |= bit;
        } else {
            *state &= !bit;
        }
    }

    pub fn is_wet(&self) -> bool {
        self.mem[self.layout.wetness] != 0
    }

    pub fn set_wet(&mut self, wet: bool) {
        self.mem[self.layout.wetness] = wet as u8;
    }

    pub fn alpha(&self) -> f32 {
        LE::read_f32(&self.mem[self.layout.alpha..])
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        LE::write_f32(&mut self.mem[self.layout.alpha..], alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_fits() {
        let layout = ActorLayout::default();
        assert_eq!(layout.required_len(), 88);

        let mut small = [0u8; 60];
        assert!(matches!(
            ActorView::new(&mut small, layout),
            Err(GlamourError::ActorBufferTooSmall { required: 88, actual: 60 })
        ));
    }

    #[test]
    fn field_writes_stay_in_place() {
        let mut mem = [0xAAu8; 88];
        let mut view = ActorView::new(&mut mem, ActorLayout::default()).unwrap();

        view.write_armor_model(EquipSlot::Hands, 0x0102, None);
        assert_eq!(view.armor(EquipSlot::Hands), Some(ArmorPiece::new(0x0102, 0xAA, 0xAA)));
        view.write_armor_dye(EquipSlot::Hands, 5);
        assert_eq!(view.armor(EquipSlot::Hands), Some(ArmorPiece::new(0x0102, 0xAA, 5)));
        assert_eq!(view.armor(EquipSlot::Body), Some(ArmorPiece::new(0xAAAA, 0xAA, 0xAA)));

        view.write_weapon_model(EquipSlot::OffHand, 7, 8, 9);
        assert_eq!(view.weapon(EquipSlot::OffHand), Some(WeaponPiece::new(7, 8, 9, 0xAA)));
        assert_eq!(view.weapon(EquipSlot::Head), None);

        view.set_alpha(0.25);
        assert_eq!(view.alpha(), 0.25);
        drop(view);
        assert_eq!(&mem[0x1C + 8..0x1C + 12], &[0x02, 0x01, 0xAA, 5]);
    }

    #[test]
    fn state_bits() {
        let mut mem = [0u8; 88];
        let mut view = ActorView::new(&mut mem, ActorLayout::default()).unwrap();
        view.set_state_bit(ActorView::VISOR_TOGGLED, true);
        view.set_state_bit(ActorView::HAT_VISIBLE, true);
        view.set_state_bit(ActorView::HAT_VISIBLE, false);
        assert_eq!(view.state(), ActorView::VISOR_TOGGLED);
        assert_eq!(view.body(), None);
    }
}
