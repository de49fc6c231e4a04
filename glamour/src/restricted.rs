use crate::{
    equipment::{unpack_model, ArmorPiece},
    ids::{EquipSlot, Gender, ItemId, Race},
    items::{ItemInfo, ItemSheet},
};
use nohash_hasher::IntMap;
use tracing::{debug, trace, warn};

/// Starter gear model per `(race - 1) * 2 + gender`.
/// Female Hrothgar have no starter model, `u32::MAX` never matches.
const RACE_GENDER_SETS: [u32; 16] = [
    0x02_0054, 0x02_0055, // Hyur
    0x02_0056, 0x02_0057, // Elezen
    0x02_005C, 0x02_005D, // Lalafell
    0x02_0058, 0x02_0059, // Miqo'te
    0x02_005A, 0x02_005B, // Roegadyn
    0x02_0101, 0x02_0102, // Au Ra
    0x01_0255, u32::MAX, // Hrothgar
    0x01_02E8, 0x01_0245, // Viera
];

const EMPEROR_HAT: ItemId = 10032;
const EMPEROR_ROBE: ItemId = 10033;
const EMPEROR_GLOVES: ItemId = 10034;
const EMPEROR_BREECHES: ItemId = 10035;
const EMPEROR_BOOTS: ItemId = 10036;
const EMPEROR_NECKLACE: ItemId = 9292;
const EMPEROR_EARRINGS: ItemId = 9293;
const EMPEROR_BRACELET: ItemId = 9294;
const EMPEROR_RING: ItemId = 9295;

fn emperor_item(slot: EquipSlot) -> Option<ItemId> {
    match slot {
        EquipSlot::Head => Some(EMPEROR_HAT),
        EquipSlot::Body => Some(EMPEROR_ROBE),
        EquipSlot::Hands => Some(EMPEROR_GLOVES),
        EquipSlot::Legs => Some(EMPEROR_BREECHES),
        EquipSlot::Feet => Some(EMPEROR_BOOTS),
        EquipSlot::Ears => Some(EMPEROR_EARRINGS),
        EquipSlot::Neck => Some(EMPEROR_NECKLACE),
        EquipSlot::Wrists => Some(EMPEROR_BRACELET),
        EquipSlot::RFinger | EquipSlot::LFinger => Some(EMPEROR_RING),
        EquipSlot::MainHand | EquipSlot::OffHand => None,
    }
}

/// Rings share one key space regardless of finger.
fn key(model: u32, slot: EquipSlot) -> u32 {
    let slot = match slot {
        EquipSlot::LFinger => EquipSlot::RFinger,
        slot => slot,
    };
    (model & 0xFF_FFFF) | (slot as u32) << 24
}

/// One curated pairing of a male and a female item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub male: ItemId,
    pub female: ItemId,
    /// Female bodies requesting `male` get `female`.
    pub to_female: bool,
    /// Male bodies requesting `female` get `male`.
    pub to_male: bool,
}

impl Directive {
    pub const fn pair(male: ItemId, female: ItemId) -> Self {
        Self {
            male,
            female,
            to_female: true,
            to_male: true,
        }
    }

    /// Only the male item is restricted.
    pub const fn male_only(male: ItemId, female: ItemId) -> Self {
        Self {
            male,
            female,
            to_female: true,
            to_male: false,
        }
    }

    /// Only the female item is restricted.
    pub const fn female_only(male: ItemId, female: ItemId) -> Self {
        Self {
            male,
            female,
            to_female: false,
            to_male: true,
        }
    }
}

/// Hand maintained pairs of gender locked items that look alike.
pub const CURATED: &[Directive] = &[
    // Event and seasonal gear
    Directive::pair(2966, 2967),
    Directive::pair(2968, 2969),
    Directive::pair(2970, 2971),
    Directive::pair(3644, 3645),
    Directive::pair(5543, 5546),
    Directive::pair(5544, 5547),
    Directive::pair(5545, 5548),
    Directive::pair(6087, 6088),
    Directive::pair(6089, 6090),
    Directive::pair(7546, 7547),
    Directive::pair(7548, 7549),
    Directive::pair(8541, 8542),
    Directive::pair(8543, 8544),
    Directive::pair(8545, 8546),
    Directive::pair(9224, 9225),
    Directive::pair(9226, 9227),
    Directive::pair(9228, 9229),
    // Wedding attire
    Directive::pair(13700, 13701),
    Directive::pair(13702, 13703),
    Directive::pair(13704, 13705),
    Directive::pair(13706, 13707),
    // Swimwear
    Directive::pair(16465, 16466),
    Directive::pair(16467, 16468),
    Directive::pair(21867, 21868),
    Directive::pair(21869, 21870),
    // Uniforms with one gendered half
    Directive::male_only(17422, 17419),
    Directive::male_only(17423, 17420),
    Directive::female_only(17424, 17421),
    Directive::female_only(24637, 24638),
    Directive::female_only(24639, 24640),
    // Dresses and suits
    Directive::pair(28599, 28600),
    Directive::pair(28601, 28602),
    Directive::pair(33650, 33651),
    Directive::pair(33652, 33653),
    Directive::male_only(36336, 36337),
    Directive::female_only(36338, 36339),
];

#[derive(Debug, Default, Clone)]
pub struct RestrictedGear {
    male_to_female: IntMap<u32, u32>,
    female_to_male: IntMap<u32, u32>,
}

impl RestrictedGear {
    /// Builds the table from the curated pairs plus placeholder fallbacks.
    pub fn build(sheet: &impl ItemSheet) -> Self {
        Self::build_with(sheet, CURATED)
    }

    pub fn build_with(sheet: &impl ItemSheet, directives: &[Directive]) -> Self {
        let mut gear = Self::default();
        for directive in directives {
            gear.add(sheet, *directive);
        }
        gear.add_unhandled(sheet);

        debug!(
            "built restricted gear table: {} male to female, {} female to male",
            gear.male_to_female.len(),
            gear.female_to_male.len()
        );
        gear
    }

    pub fn len(&self) -> usize {
        self.male_to_female.len() + self.female_to_male.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Skips the directive with a warning if it no longer matches the items.
    fn add(&mut self, sheet: &impl ItemSheet, directive: Directive) {
        let (Some(male), Some(female)) = (sheet.item(directive.male), sheet.item(directive.female))
        else {
            warn!(
                "restricted gear pair {} <-> {} references an unknown item",
                directive.male, directive.female
            );
            return;
        };

        if directive.to_female && !male.is_male_only() {
            warn!(
                "item {} ({}) is not restricted to male bodies anymore",
                male.id, male.name
            );
            return;
        }
        if directive.to_male && !female.is_female_only() {
            warn!(
                "item {} ({}) is not restricted to female bodies anymore",
                female.id, female.name
            );
            return;
        }

        let (Some(slot), Some(female_slot)) = (male.slot(), female.slot()) else {
            warn!(
                "restricted gear pair {} <-> {} has an item without an equip slot",
                male.id, female.id
            );
            return;
        };
        if slot != female_slot {
            warn!(
                "items {} ({slot}) and {} ({female_slot}) are not in the same slot",
                male.id, female.id
            );
            return;
        }

        if directive.to_female {
            self.male_to_female
                .entry(key(male.armor_model(), slot))
                .or_insert(female.armor_model());
        }
        if directive.to_male {
            self.female_to_male
                .entry(key(female.armor_model(), slot))
                .or_insert(male.armor_model());
        }
    }

    fn add_unhandled(&mut self, sheet: &impl ItemSheet) {
        let restricted: Vec<&ItemInfo> = sheet
            .items()
            .into_iter()
            .filter(|item| item.is_male_only() || item.is_female_only())
            .collect();

        let mut added = 0usize;
        for item in restricted {
            let Some(slot) = item.slot() else {
                continue;
            };
            let Some(emperor) = emperor_item(slot) else {
                continue;
            };
            let needle = key(item.armor_model(), slot);

            if item.is_male_only() && !self.male_to_female.contains_key(&needle) {
                self.add(sheet, Directive::male_only(item.id, emperor));
                added += 1;
            } else if item.is_female_only() && !self.female_to_male.contains_key(&needle) {
                self.add(sheet, Directive::female_only(emperor, item.id));
                added += 1;
            }
        }
        debug!("paired {added} uncurated restricted items with placeholders");
    }

    /// Racial starter gear check. Ignores the slot.
    pub fn resolve_racial(&self, model: u32, race: Race, gender: Gender) -> Option<(bool, u32)> {
        if !RACE_GENDER_SETS.contains(&model) {
            return None;
        }
        let target = RACE_GENDER_SETS[(race as usize - 1) * 2 + gender.bit()];
        if target == u32::MAX {
            return Some((false, model));
        }
        Some((target != model, target))
    }

    pub fn resolve_gendered(
        &self,
        model: u32,
        slot: EquipSlot,
        gender: Gender,
    ) -> Option<(bool, u32)> {
        let map = match gender {
            Gender::Female => &self.male_to_female,
            Gender::Male => &self.female_to_male,
        };
        map.get(&key(model, slot))
            .map(|&target| (target != model, target))
    }

    /// Returns the armor `race` and `gender` should wear instead of `armor`,
    /// and whether it differs. The dye is kept.
    pub fn resolve(
        &self,
        armor: ArmorPiece,
        slot: EquipSlot,
        race: Race,
        gender: Gender,
    ) -> (bool, ArmorPiece) {
        let model = armor.packed_model();
        let resolved = self
            .resolve_racial(model, race, gender)
            .or_else(|| self.resolve_gendered(model, slot, gender));

        match resolved {
            Some((true, target)) => {
                let (set, variant) = unpack_model(target);
                trace!("{slot} {model:#08x} resolved to {target:#08x} for {race} {gender}");
                (true, armor.with_model(set, variant))
            }
            _ => (false, armor),
        }
    }
}
