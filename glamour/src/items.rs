use crate::ids::{EquipSlot, ItemId};
use nohash_hasher::IntMap;
use serde::{Deserialize, Serialize};

/// The columns of an Item sheet row that appearance handling cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub id: ItemId,
    pub name: String,
    pub equip_slot_category: u8,
    pub model_main: u64,
    pub equip_restriction: u8,
}

impl ItemInfo {
    pub const RESTRICTION_MALE: u8 = 2;
    pub const RESTRICTION_FEMALE: u8 = 3;

    pub fn slot(&self) -> Option<EquipSlot> {
        EquipSlot::from_category(self.equip_slot_category)
    }

    /// Armor set id and variant, packed as `set | variant << 16`.
    pub fn armor_model(&self) -> u32 {
        (self.model_main & 0xFF_FFFF) as u32
    }

    pub fn is_male_only(&self) -> bool {
        self.equip_restriction == Self::RESTRICTION_MALE
    }

    pub fn is_female_only(&self) -> bool {
        self.equip_restriction == Self::RESTRICTION_FEMALE
    }
}

/// Item lookups the restricted gear table is built from.
pub trait ItemSheet {
    fn item(&self, id: ItemId) -> Option<&ItemInfo>;

    /// Every item, ordered by id.
    fn items(&self) -> Vec<&ItemInfo>;
}

#[derive(Debug, Default, Clone)]
pub struct ItemCatalog {
    items: IntMap<ItemId, ItemInfo>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: ItemInfo) {
        self.items.insert(item.id, item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ItemInfo> for ItemCatalog {
    fn from_iter<T: IntoIterator<Item = ItemInfo>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for item in iter {
            catalog.insert(item);
        }
        catalog
    }
}

impl ItemSheet for ItemCatalog {
    fn item(&self, id: ItemId) -> Option<&ItemInfo> {
        self.items.get(&id)
    }

    fn items(&self) -> Vec<&ItemInfo> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_unstable_by_key(|item| item.id);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ItemId, category: u8, model_main: u64, restriction: u8) -> ItemInfo {
        ItemInfo {
            id,
            name: format!("Item #{id}"),
            equip_slot_category: category,
            model_main,
            equip_restriction: restriction,
        }
    }

    #[test]
    fn model_and_slot() {
        let info = item(1, 4, 0x0000_0000_0203_0102, ItemInfo::RESTRICTION_FEMALE);
        assert_eq!(info.slot(), Some(EquipSlot::Body));
        assert_eq!(info.armor_model(), 0x03_0102);
        assert!(info.is_female_only());
        assert!(!info.is_male_only());
    }

    #[test]
    fn catalog_orders_by_id() {
        let catalog: ItemCatalog = [item(30, 3, 0, 1), item(10, 3, 0, 1), item(20, 5, 0, 1)]
            .into_iter()
            .collect();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.item(20).map(|i| i.slot()), Some(Some(EquipSlot::Hands)));
        let ids: Vec<_> = catalog.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, [10, 20, 30]);
    }
}
