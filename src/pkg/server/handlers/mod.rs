pub mod applications;
pub mod probes;
