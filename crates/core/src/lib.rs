pub mod config;
pub mod error;
pub mod frame;
pub mod input;

pub use config::PlaybackConfig;
pub use error::*;
pub use frame::{Frame, Observer};
pub use input::parse_values;
