pub mod adaptors;
pub mod intake;
pub mod management;
pub mod store;
pub mod uploads;
