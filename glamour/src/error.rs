use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlamourError {
    #[error("Snapshot text is not valid base64")]
    Base64(#[source] base64::DecodeError),
    #[error("Snapshot of {actual} bytes does not match the size of format version {version}")]
    SizeMismatch { version: u8, actual: usize },
    #[error("Snapshot version {0} is not supported")]
    UnsupportedVersion(u8),
    #[error("Invalid flags value {value:#04x} in byte 1 of a version {version} snapshot")]
    OutOfRangeFlags { version: u8, value: u8 },
    #[error("Invalid value {value} at byte {index}")]
    OutOfRangeValue { index: usize, value: Box<str> },
    #[error("Alpha {0} is outside of [0, 1]")]
    InvalidAlpha(f32),
    #[error("Failed to read or write snapshot body")]
    Snapshot(#[source] binrw::Error),

    #[error("Customization index {0} is not a declared option")]
    InvalidCustomizeIndex(usize),
    #[error("Facial feature index {0} is outside of [0, 8)")]
    InvalidFeatureIndex(u8),

    #[error("Equipment slot id {0} is not one of the 12 declared slots")]
    InvalidSlot(u8),
    #[error("Unknown race id {0}")]
    InvalidRace(u8),
    #[error("Unknown slot, race or gender name \"{0}\"")]
    UnknownName(Box<str>),

    #[error("Actor memory of {actual} bytes is smaller than the {required} its layout needs")]
    ActorBufferTooSmall { required: usize, actual: usize },
}
