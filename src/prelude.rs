pub use crate::error::{ApiError, ResultExt};

pub type Result<T> = std::result::Result<T, ApiError>;
