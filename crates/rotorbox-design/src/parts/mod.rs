//! Part generators
//!
//! Each generator takes already-derived dimensions and returns one solid.
//! Generators never read the parameter set directly.

pub mod baseplate;
pub mod battery_bay;
pub mod body;
pub mod cover;
pub mod posts;

pub use baseplate::Baseplate;
pub use battery_bay::BatteryBay;
pub use body::BodyShell;
pub use cover::Cover;
pub use posts::{PostLayout, Shoulder};
