use crate::error::GlamourError;
use std::fmt;

/// Model set identifier shared by armor and weapon models.
pub type ItemSetId = u16;
/// Weapon body identifier, only meaningful for main hand and off hand.
pub type WeaponTypeId = u16;
/// Stain identifier, 0 means "no dye".
pub type DyeId = u8;
/// Row id within the Item sheet.
pub type ItemId = u32;

/// Armor variant value that tells the write path to leave the variant byte alone.
pub const VARIANT_NO_WRITE: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EquipSlot {
    MainHand = 1,
    OffHand = 2,
    Head = 3,
    Body = 4,
    Hands = 5,
    Legs = 7,
    Feet = 8,
    Ears = 9,
    Neck = 10,
    Wrists = 11,
    RFinger = 12,
    LFinger = 14,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 12] = [
        Self::MainHand,
        Self::OffHand,
        Self::Head,
        Self::Body,
        Self::Hands,
        Self::Legs,
        Self::Feet,
        Self::Ears,
        Self::Neck,
        Self::Wrists,
        Self::RFinger,
        Self::LFinger,
    ];

    /// Armor slots in the order the game lays them out in memory.
    pub const ARMOR: [EquipSlot; 10] = [
        Self::Head,
        Self::Body,
        Self::Hands,
        Self::Legs,
        Self::Feet,
        Self::Ears,
        Self::Neck,
        Self::Wrists,
        Self::RFinger,
        Self::LFinger,
    ];

    pub fn is_weapon(self) -> bool {
        matches!(self, Self::MainHand | Self::OffHand)
    }

    /// Position within [`EquipSlot::ALL`], which is also the slot's bit in an equipment mask.
    pub fn index(self) -> usize {
        match self {
            Self::MainHand => 0,
            Self::OffHand => 1,
            Self::Head => 2,
            Self::Body => 3,
            Self::Hands => 4,
            Self::Legs => 5,
            Self::Feet => 6,
            Self::Ears => 7,
            Self::Neck => 8,
            Self::Wrists => 9,
            Self::RFinger => 10,
            Self::LFinger => 11,
        }
    }

    /// Position within the contiguous armor block, `None` for weapons.
    pub fn armor_index(self) -> Option<usize> {
        self.index().checked_sub(2)
    }

    /// Maps an EquipSlotCategory row id onto the slot the item is worn in.
    /// Categories covering several slots resolve to their primary slot, rings
    /// resolve to the right finger.
    pub fn from_category(category: u8) -> Option<Self> {
        match category {
            1 | 13 | 14 => Some(Self::MainHand),
            2 => Some(Self::OffHand),
            3 => Some(Self::Head),
            4 | 15 | 16 | 19 | 20 | 21 | 22 => Some(Self::Body),
            5 => Some(Self::Hands),
            7 | 18 => Some(Self::Legs),
            8 => Some(Self::Feet),
            9 => Some(Self::Ears),
            10 => Some(Self::Neck),
            11 => Some(Self::Wrists),
            12 => Some(Self::RFinger),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MainHand => "MainHand",
            Self::OffHand => "OffHand",
            Self::Head => "Head",
            Self::Body => "Body",
            Self::Hands => "Hands",
            Self::Legs => "Legs",
            Self::Feet => "Feet",
            Self::Ears => "Ears",
            Self::Neck => "Neck",
            Self::Wrists => "Wrists",
            Self::RFinger => "RFinger",
            Self::LFinger => "LFinger",
        }
    }
}

impl TryFrom<u8> for EquipSlot {
    type Error = GlamourError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|slot| *slot as u8 == value)
            .ok_or(GlamourError::InvalidSlot(value))
    }
}

impl std::str::FromStr for EquipSlot {
    type Err = GlamourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GlamourError::UnknownName(s.into()))
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Race {
    Hyur = 1,
    Elezen,
    Lalafell,
    Miqote,
    Roegadyn,
    AuRa,
    Hrothgar,
    Viera,
}

impl Race {
    pub const ALL: [Race; 8] = [
        Self::Hyur,
        Self::Elezen,
        Self::Lalafell,
        Self::Miqote,
        Self::Roegadyn,
        Self::AuRa,
        Self::Hrothgar,
        Self::Viera,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hyur => "Hyur",
            Self::Elezen => "Elezen",
            Self::Lalafell => "Lalafell",
            Self::Miqote => "Miqote",
            Self::Roegadyn => "Roegadyn",
            Self::AuRa => "AuRa",
            Self::Hrothgar => "Hrothgar",
            Self::Viera => "Viera",
        }
    }
}

impl TryFrom<u8> for Race {
    type Error = GlamourError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|race| *race as u8 == value)
            .ok_or(GlamourError::InvalidRace(value))
    }
}

impl std::str::FromStr for Race {
    type Err = GlamourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|race| race.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GlamourError::UnknownName(s.into()))
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-race, two per race. Odd values are the first clan of `race`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Clan {
    Midlander = 1,
    Highlander,
    Wildwood,
    Duskwight,
    Plainsfolk,
    Dunesfolk,
    SeekerOfTheSun,
    KeeperOfTheMoon,
    SeaWolf,
    Hellsguard,
    Raen,
    Xaela,
    Helion,
    Lost,
    Rava,
    Veena,
}

impl Clan {
    pub fn race(self) -> Race {
        match (self as u8 + 1) / 2 {
            1 => Race::Hyur,
            2 => Race::Elezen,
            3 => Race::Lalafell,
            4 => Race::Miqote,
            5 => Race::Roegadyn,
            6 => Race::AuRa,
            7 => Race::Hrothgar,
            _ => Race::Viera,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Gender {
    Male = 0,
    Female = 1,
}

impl Gender {
    /// Customization bytes store 0 for male, anything else is treated as female.
    pub fn from_byte(value: u8) -> Self {
        if value == 0 {
            Self::Male
        } else {
            Self::Female
        }
    }

    pub fn bit(self) -> usize {
        self as usize
    }
}

impl std::str::FromStr for Gender {
    type Err = GlamourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(GlamourError::UnknownName(s.into())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
        }
    }
}
