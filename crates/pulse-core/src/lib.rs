pub mod config;
pub mod error;
pub mod types;

pub use config::PulseConfig;
pub use error::{PulseError, Result};
pub use types::*;
