pub mod actor;
pub mod apply;
pub mod customize;
pub mod equipment;
pub mod error;
pub mod ids;
pub mod items;
pub mod mask;
pub mod restricted;
pub mod snapshot;
