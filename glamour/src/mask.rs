use crate::ids::EquipSlot;
use bitflags::bitflags;

bitflags! {
    /// Set of equipment slots, one bit per slot in [`EquipSlot::ALL`] order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EquipMask: u16 {
        const MAIN_HAND = 1 << 0;
        const OFF_HAND = 1 << 1;
        const HEAD = 1 << 2;
        const BODY = 1 << 3;
        const HANDS = 1 << 4;
        const LEGS = 1 << 5;
        const FEET = 1 << 6;
        const EARS = 1 << 7;
        const NECK = 1 << 8;
        const WRISTS = 1 << 9;
        const R_FINGER = 1 << 10;
        const L_FINGER = 1 << 11;

        const WEAPONS = Self::MAIN_HAND.bits() | Self::OFF_HAND.bits();
        const ARMOR = 0x0FFC;
    }
}

impl EquipMask {
    pub fn slot(slot: EquipSlot) -> Self {
        Self::from_bits_retain(1 << slot.index())
    }

    pub fn slots(self) -> impl Iterator<Item = EquipSlot> {
        EquipSlot::ALL
            .into_iter()
            .filter(move |s| self.contains(Self::slot(*s)))
    }
}

impl FromIterator<EquipSlot> for EquipMask {
    fn from_iter<T: IntoIterator<Item = EquipSlot>>(iter: T) -> Self {
        iter.into_iter().map(Self::slot).collect()
    }
}

/// Selects which fields of which slots take part in a write.
/// Model and dye are independent even though they share a packed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotFieldMask {
    pub models: EquipMask,
    pub dyes: EquipMask,
}

impl SlotFieldMask {
    pub const ALL: Self = Self {
        models: EquipMask::all(),
        dyes: EquipMask::all(),
    };
    pub const NONE: Self = Self {
        models: EquipMask::empty(),
        dyes: EquipMask::empty(),
    };

    pub fn new(models: EquipMask, dyes: EquipMask) -> Self {
        Self { models, dyes }
    }

    pub fn is_all(self) -> bool {
        self.models.is_all() && self.dyes.is_all()
    }

    pub fn touches(self, slot: EquipSlot) -> bool {
        (self.models | self.dyes).contains(EquipMask::slot(slot))
    }
}

impl From<EquipMask> for SlotFieldMask {
    fn from(mask: EquipMask) -> Self {
        Self::new(mask, mask)
    }
}

bitflags! {
    /// Snapshot state bits, stored as byte 1 of the serialized form.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SnapshotFlags: u8 {
        const WRITE_CUSTOMIZATIONS = 1 << 0;
        const IS_WET = 1 << 1;
        const SET_HAT_STATE = 1 << 2;
        const SET_WEAPON_STATE = 1 << 3;
        const SET_VISOR_STATE = 1 << 4;
        const HAT_STATE = 1 << 5;
        const WEAPON_STATE = 1 << 6;
        const VISOR_STATE = 1 << 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_bits_follow_slot_order() {
        for (slot, flag) in EquipSlot::ALL.into_iter().zip(EquipMask::all().iter()) {
            assert_eq!(EquipMask::slot(slot), flag);
        }
        assert_eq!(EquipMask::slot(EquipSlot::LFinger), EquipMask::L_FINGER);
        assert_eq!(EquipMask::WEAPONS | EquipMask::ARMOR, EquipMask::all());
        assert!(!EquipMask::ARMOR.intersects(EquipMask::WEAPONS));
    }

    #[test]
    fn mask_rejects_unknown_bits() {
        assert!(EquipMask::from_bits(0x1000).is_none());
        assert_eq!(EquipMask::from_bits(0x0FFF), Some(EquipMask::all()));
    }

    #[test]
    fn mask_collects_slots() {
        let mut mask: EquipMask = [EquipSlot::Body, EquipSlot::Feet, EquipSlot::Neck]
            .into_iter()
            .collect();
        mask.remove(EquipMask::NECK);
        assert!(mask.contains(EquipMask::slot(EquipSlot::Body)));
        assert!(!mask.contains(EquipMask::slot(EquipSlot::Legs)));
        assert_eq!(mask.slots().collect::<Vec<_>>(), [EquipSlot::Body, EquipSlot::Feet]);
    }

    #[test]
    fn field_mask_touches_either_field() {
        let mask = SlotFieldMask::new(EquipMask::HEAD, EquipMask::MAIN_HAND);
        assert!(mask.touches(EquipSlot::Head));
        assert!(mask.touches(EquipSlot::MainHand));
        assert!(!mask.touches(EquipSlot::Body));
        assert!(!mask.is_all());
        assert!(SlotFieldMask::from(EquipMask::all()).is_all());
    }

    #[test]
    fn flags_set_and_clear() {
        let mut flags = SnapshotFlags::empty();
        flags.set(SnapshotFlags::IS_WET, true);
        flags |= SnapshotFlags::HAT_STATE;
        assert_eq!(flags.bits(), 0b0010_0010);
        flags.set(SnapshotFlags::IS_WET, false);
        assert!(!flags.contains(SnapshotFlags::IS_WET));
        assert!(flags.contains(SnapshotFlags::HAT_STATE));
    }
}
