use crate::{
    actor::ActorView,
    equipment::{ArmorPiece, EquipmentSet, WeaponPiece},
    error::GlamourError,
    ids::{EquipSlot, Gender, Race, VARIANT_NO_WRITE},
    mask::{EquipMask, SlotFieldMask},
    restricted::RestrictedGear,
    snapshot::Snapshot,
};
use tracing::debug;

/// Writes equipment onto actors, substituting restricted gear on the way if
/// it was given a [`RestrictedGear`] table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Applier<'g> {
    gear: Option<&'g RestrictedGear>,
}

impl<'g> Applier<'g> {
    pub fn new(gear: &'g RestrictedGear) -> Self {
        Self { gear: Some(gear) }
    }

    /// Writes models exactly as given.
    pub fn unrestricted() -> Self {
        Self { gear: None }
    }

    /// The armor `body` should actually wear when asked for `armor`.
    fn normalize(
        &self,
        armor: ArmorPiece,
        slot: EquipSlot,
        body: Option<(Race, Gender)>,
    ) -> (bool, ArmorPiece) {
        match (self.gear, body) {
            (Some(gear), Some((race, gender))) => gear.resolve(armor, slot, race, gender),
            _ => (false, armor),
        }
    }

    /// Writes the masked fields of `set` onto `view`.
    pub fn apply_equipment(&self, view: &mut ActorView, set: &EquipmentSet, mask: SlotFieldMask) {
        if mask.is_all() {
            self.apply_all(view, set);
        } else {
            for slot in EquipSlot::ALL {
                if mask.touches(slot) {
                    self.apply_slot(view, slot, set, mask);
                }
            }
        }
        debug!(
            "applied equipment with models {:?}, dyes {:?}",
            mask.models, mask.dyes
        );
    }

    fn apply_all(&self, view: &mut ActorView, set: &EquipmentSet) {
        let body = view.body();
        let mut block = [0u8; 10 * ArmorPiece::SIZE];
        block.copy_from_slice(view.armor_block());

        let pieces = EquipSlot::ARMOR.into_iter().zip(set.armor);
        for ((slot, requested), record) in pieces.zip(block.chunks_exact_mut(ArmorPiece::SIZE)) {
            // [set:u16][variant:u8][dye:u8]
            let current_variant = record[2];

            let (replaced, armor) = self.normalize(
                effective_variant(requested, current_variant),
                slot,
                body,
            );
            let variant = if replaced || requested.variant() != VARIANT_NO_WRITE {
                armor.variant()
            } else {
                current_variant
            };
            record.copy_from_slice(&armor.with_model(armor.set(), variant).to_bytes());
        }
        view.armor_block_mut().copy_from_slice(&block);

        for slot in [EquipSlot::MainHand, EquipSlot::OffHand] {
            if let Some(weapon) = set.weapon(slot) {
                write_weapon(view, slot, weapon, true, true);
            }
        }
    }

    /// Writes one slot of `set`, touching only the fields `mask` selects.
    pub fn apply_slot(
        &self,
        view: &mut ActorView,
        slot: EquipSlot,
        set: &EquipmentSet,
        mask: SlotFieldMask,
    ) {
        let models = mask.models.contains(EquipMask::slot(slot));
        let dyes = mask.dyes.contains(EquipMask::slot(slot));

        if let Some(weapon) = set.weapon(slot) {
            write_weapon(view, slot, weapon, models, dyes);
            return;
        }

        let Some(requested) = set.armor(slot) else {
            return;
        };
        if models {
            let current = view.armor(slot).map(|a| a.variant()).unwrap_or_default();
            let (replaced, armor) =
                self.normalize(effective_variant(requested, current), slot, view.body());
            let variant = (replaced || requested.variant() != VARIANT_NO_WRITE)
                .then_some(armor.variant());
            view.write_armor_model(slot, armor.set(), variant);
        }
        if dyes {
            view.write_armor_dye(slot, requested.dye());
        }
    }

    /// Panics if `slot` is not a known slot id.
    pub fn apply_slot_id(
        &self,
        view: &mut ActorView,
        slot: u8,
        set: &EquipmentSet,
        mask: SlotFieldMask,
    ) {
        match EquipSlot::try_from(slot) {
            Ok(slot) => self.apply_slot(view, slot, set, mask),
            Err(err) => panic!("{err}"),
        }
    }

    /// Applies a whole snapshot with its own equipment mask.
    pub fn apply_snapshot(&self, view: &mut ActorView, snapshot: &Snapshot) {
        self.apply_snapshot_masked(view, snapshot, snapshot.equip_mask.into())
    }

    /// Customization goes first so restricted gear resolves against the new body.
    pub fn apply_snapshot_masked(
        &self,
        view: &mut ActorView,
        snapshot: &Snapshot,
        mask: SlotFieldMask,
    ) {
        if snapshot.write_customizations() {
            view.set_customize(&snapshot.customize);
            view.set_wet(snapshot.is_wet());
        }
        if let Some(visible) = snapshot.hat_state() {
            view.set_state_bit(ActorView::HAT_VISIBLE, visible);
        }
        if let Some(visible) = snapshot.weapon_state() {
            view.set_state_bit(ActorView::WEAPON_VISIBLE, visible);
        }
        if let Some(toggled) = snapshot.visor_state() {
            view.set_state_bit(ActorView::VISOR_TOGGLED, toggled);
        }
        view.set_alpha(snapshot.alpha());

        self.apply_equipment(view, &snapshot.equipment, mask);
    }

    /// Restricted armor is stored as worn.
    pub fn capture(&self, view: &ActorView) -> Result<Snapshot, GlamourError> {
        let body = view.body();
        let mut equipment = EquipmentSet::default();
        for slot in EquipSlot::ALL {
            if let Some(weapon) = view.weapon(slot) {
                equipment.set_weapon(slot, weapon);
            } else if let Some(armor) = view.armor(slot) {
                let (_, armor) = self.normalize(armor, slot, body);
                equipment.set_armor(slot, armor);
            }
        }

        let state = view.state();
        let mut snapshot = Snapshot::new(equipment, view.customize());
        snapshot.set_wet(view.is_wet());
        snapshot.set_hat_state(Some(state & ActorView::HAT_VISIBLE != 0));
        snapshot.set_weapon_state(Some(state & ActorView::WEAPON_VISIBLE != 0));
        snapshot.set_visor_state(Some(state & ActorView::VISOR_TOGGLED != 0));
        snapshot.set_alpha(view.alpha())?;
        Ok(snapshot)
    }
}

/// Substitutes the actor's current variant when the request asks to keep it.
fn effective_variant(requested: ArmorPiece, current: u8) -> ArmorPiece {
    if requested.variant() == VARIANT_NO_WRITE {
        requested.with_model(requested.set(), current)
    } else {
        requested
    }
}

/// An empty weapon slot always ends up without dye, whatever the mask says.
fn write_weapon(
    view: &mut ActorView,
    slot: EquipSlot,
    weapon: WeaponPiece,
    models: bool,
    dyes: bool,
) {
    if models {
        view.write_weapon_model(slot, weapon.set(), weapon.weapon_type(), weapon.variant());
    }
    if dyes {
        view.write_weapon_dye(slot, weapon.dye());
    }
    if view.weapon(slot).is_some_and(|w| w.is_empty()) {
        view.write_weapon_dye(slot, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actor::ActorLayout,
        customize::{CustomizationSet, CustomizeIndex},
    };

    fn sample_set() -> EquipmentSet {
        let mut set = EquipmentSet::default();
        set.main_hand = WeaponPiece::new(2001, 12, 3, 7);
        set.off_hand = WeaponPiece::new(0, 0, 0, 0);
        for (i, slot) in EquipSlot::ARMOR.into_iter().enumerate() {
            set.set_armor(slot, ArmorPiece::new(6000 + i as u16, 1 + i as u8, 20 + i as u8));
        }
        set
    }

    fn actor() -> [u8; 88] {
        let mut mem = [0x11u8; 88];
        mem[CustomizeIndex::Race as usize] = Race::Hyur as u8;
        mem[CustomizeIndex::Gender as usize] = 0;
        mem
    }

    #[test]
    fn variant_sentinel_keeps_current_variant() {
        let mut mem = actor();
        let mut view = ActorView::new(&mut mem, ActorLayout::default()).unwrap();
        let mut set = sample_set();
        set.set_armor(EquipSlot::Head, ArmorPiece::new(77, VARIANT_NO_WRITE, 5));

        let mask = SlotFieldMask::new(EquipMask::slot(EquipSlot::Head), EquipMask::empty());
        Applier::unrestricted().apply_equipment(&mut view, &set, mask);
        assert_eq!(view.armor(EquipSlot::Head), Some(ArmorPiece::new(77, 0x11, 0x11)));

        Applier::unrestricted().apply_equipment(&mut view, &set, SlotFieldMask::ALL);
        assert_eq!(view.armor(EquipSlot::Head), Some(ArmorPiece::new(77, 0x11, 5)));
    }

    #[test]
    fn empty_weapon_drops_dye() {
        let mut mem = actor();
        let mut view = ActorView::new(&mut mem, ActorLayout::default()).unwrap();
        let mut set = sample_set();
        set.off_hand = WeaponPiece::new(0, 5, 1, 0);

        // model only, the stored dye byte 0x11 must still be cleared
        let mask = SlotFieldMask::new(EquipMask::slot(EquipSlot::OffHand), EquipMask::empty());
        Applier::unrestricted().apply_equipment(&mut view, &set, mask);
        drop(view);
        assert_eq!(mem[0x4B + 6], 0);
    }

    #[test]
    #[should_panic(expected = "not one of the 12 declared slots")]
    fn raw_slot_id_must_be_declared() {
        let mut mem = actor();
        let mut view = ActorView::new(&mut mem, ActorLayout::default()).unwrap();
        Applier::unrestricted().apply_slot_id(&mut view, 6, &sample_set(), SlotFieldMask::ALL);
    }

    #[test]
    fn snapshot_sets_state_only_when_asked() {
        let mut mem = actor();
        let mut view = ActorView::new(&mut mem, ActorLayout::default()).unwrap();
        view.set_state_bit(ActorView::HAT_VISIBLE, true);

        let mut snapshot = Snapshot::new(sample_set(), CustomizationSet::default());
        snapshot.set_visor_state(Some(true));
        snapshot.set_wet(true);
        snapshot.set_alpha(0.75).unwrap();
        Applier::unrestricted().apply_snapshot(&mut view, &snapshot);

        assert_ne!(view.state() & ActorView::HAT_VISIBLE, 0);
        assert_ne!(view.state() & ActorView::VISOR_TOGGLED, 0);
        assert!(view.is_wet());
        assert_eq!(view.alpha(), 0.75);
        assert_eq!(view.customize(), CustomizationSet::default());
    }

    #[test]
    fn capture_reads_back_applied_state() {
        let mut mem = [0u8; 88];
        let mut view = ActorView::new(&mut mem, ActorLayout::default()).unwrap();

        let mut snapshot = Snapshot::new(sample_set(), CustomizationSet::default());
        snapshot.set_hat_state(Some(true));
        snapshot.set_weapon_state(Some(false));
        snapshot.set_visor_state(Some(false));
        Applier::unrestricted().apply_snapshot(&mut view, &snapshot);

        let captured = Applier::unrestricted().capture(&view).unwrap();
        assert_eq!(captured, snapshot);
    }
}
