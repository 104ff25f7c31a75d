pub mod access_log;
pub mod cors;
pub mod errors;
pub mod ratelimit;
pub mod security;
