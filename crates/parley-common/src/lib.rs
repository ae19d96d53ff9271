pub mod errors;

pub use errors::{ConfigError, ParleyError};

pub type Result<T> = std::result::Result<T, ParleyError>;
