pub mod clock;
pub mod config;
pub mod consts;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, JwtKey, KeyMaterial};
pub use consts::*;
