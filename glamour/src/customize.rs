use crate::{
    error::GlamourError,
    ids::{Clan, Gender, Race},
};
use binrw::binrw;
use std::fmt;

/// Byte positions of the customization options, in the game's own order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CustomizeIndex {
    Race = 0,
    Gender,
    BodyType,
    Height,
    Clan,
    Face,
    Hairstyle,
    Highlights,
    SkinColor,
    EyeColorRight,
    HairColor,
    HighlightsColor,
    FacialFeatures,
    TattooColor,
    Eyebrows,
    EyeColorLeft,
    EyeShape,
    Nose,
    Jaw,
    Mouth,
    LipColor,
    MuscleMass,
    TailShape,
    BustSize,
    FacePaint,
    FacePaintColor,
}

impl CustomizeIndex {
    pub const COUNT: usize = 26;

    const ALL: [Self; Self::COUNT] = [
        Self::Race,
        Self::Gender,
        Self::BodyType,
        Self::Height,
        Self::Clan,
        Self::Face,
        Self::Hairstyle,
        Self::Highlights,
        Self::SkinColor,
        Self::EyeColorRight,
        Self::HairColor,
        Self::HighlightsColor,
        Self::FacialFeatures,
        Self::TattooColor,
        Self::Eyebrows,
        Self::EyeColorLeft,
        Self::EyeShape,
        Self::Nose,
        Self::Jaw,
        Self::Mouth,
        Self::LipColor,
        Self::MuscleMass,
        Self::TailShape,
        Self::BustSize,
        Self::FacePaint,
        Self::FacePaintColor,
    ];

    pub fn from_index(index: usize) -> Result<Self, GlamourError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GlamourError::InvalidCustomizeIndex(index))
    }
}

const FLAG_BIT: u8 = 0x80;

/// The 26 byte customization block.
///
/// Four options share their byte with a one bit flag in bit 7: highlights,
/// small iris (eye shape), lipstick (mouth) and reversed face paint.
#[binrw]
#[brw(little)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomizationSet {
    data: [u8; CustomizeIndex::COUNT],
}

impl Default for CustomizationSet {
    /// A default Midlander male, which is also what an empty actor resolves to.
    fn default() -> Self {
        let mut data = [0u8; CustomizeIndex::COUNT];
        data[CustomizeIndex::Race as usize] = Race::Hyur as u8;
        data[CustomizeIndex::Clan as usize] = Clan::Midlander as u8;
        data[CustomizeIndex::BodyType as usize] = 1;
        data[CustomizeIndex::Face as usize] = 1;
        data[CustomizeIndex::Hairstyle as usize] = 1;
        Self { data }
    }
}

impl CustomizationSet {
    pub const SIZE: usize = CustomizeIndex::COUNT;

    pub fn from_bytes(data: [u8; Self::SIZE]) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.data
    }

    pub fn get(&self, index: CustomizeIndex) -> u8 {
        self.data[index as usize]
    }

    pub fn set(&mut self, index: CustomizeIndex, value: u8) {
        self.data[index as usize] = value;
    }

    /// Index-addressed read, for callers holding a raw option id.
    pub fn get_raw(&self, index: usize) -> Result<u8, GlamourError> {
        CustomizeIndex::from_index(index).map(|i| self.get(i))
    }

    pub fn set_raw(&mut self, index: usize, value: u8) -> Result<(), GlamourError> {
        CustomizeIndex::from_index(index).map(|i| self.set(i, value))
    }

    fn flag(&self, index: CustomizeIndex) -> bool {
        self.get(index) & FLAG_BIT != 0
    }

    fn set_flag(&mut self, index: CustomizeIndex, value: bool) {
        let byte = &mut self.data[index as usize];
        if value {
            *byte |= FLAG_BIT;
        } else {
            *byte &= !FLAG_BIT;
        }
    }

    pub fn race(&self) -> Result<Race, GlamourError> {
        Race::try_from(self.get(CustomizeIndex::Race))
    }

    pub fn clan(&self) -> u8 {
        self.get(CustomizeIndex::Clan)
    }

    pub fn gender(&self) -> Gender {
        Gender::from_byte(self.get(CustomizeIndex::Gender))
    }

    pub fn highlights_on(&self) -> bool {
        self.flag(CustomizeIndex::Highlights)
    }

    pub fn set_highlights_on(&mut self, value: bool) {
        self.set_flag(CustomizeIndex::Highlights, value)
    }

    pub fn small_iris(&self) -> bool {
        self.flag(CustomizeIndex::EyeShape)
    }

    pub fn set_small_iris(&mut self, value: bool) {
        self.set_flag(CustomizeIndex::EyeShape, value)
    }

    pub fn lipstick(&self) -> bool {
        self.flag(CustomizeIndex::Mouth)
    }

    pub fn set_lipstick(&mut self, value: bool) {
        self.set_flag(CustomizeIndex::Mouth, value)
    }

    pub fn face_paint_reversed(&self) -> bool {
        self.flag(CustomizeIndex::FacePaint)
    }

    pub fn set_face_paint_reversed(&mut self, value: bool) {
        self.set_flag(CustomizeIndex::FacePaint, value)
    }

    /// Eye shape without the small iris bit.
    pub fn eye_shape(&self) -> u8 {
        self.get(CustomizeIndex::EyeShape) & !FLAG_BIT
    }

    pub fn mouth(&self) -> u8 {
        self.get(CustomizeIndex::Mouth) & !FLAG_BIT
    }

    pub fn face_paint(&self) -> u8 {
        self.get(CustomizeIndex::FacePaint) & !FLAG_BIT
    }

    pub fn facial_feature(&self, index: u8) -> Result<bool, GlamourError> {
        if index >= 8 {
            return Err(GlamourError::InvalidFeatureIndex(index));
        }
        Ok(self.get(CustomizeIndex::FacialFeatures) & (1 << index) != 0)
    }

    pub fn set_facial_feature(&mut self, index: u8, value: bool) -> Result<(), GlamourError> {
        if index >= 8 {
            return Err(GlamourError::InvalidFeatureIndex(index));
        }
        let byte = &mut self.data[CustomizeIndex::FacialFeatures as usize];
        if value {
            *byte |= 1 << index;
        } else {
            *byte &= !(1 << index);
        }
        Ok(())
    }
}

impl fmt::Debug for CustomizationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomizationSet({:02x?})", self.data)
    }
}
