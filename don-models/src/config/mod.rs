//! Default values used through the onboarding crates, and the layered
//! settings loader.
//!
//! The constants are defaults only. When you need one of these values in a
//! worker, read it from the `cfg` parameter; the only places where it is
//! safe to use them directly are `settings.rs` and `config.rs` files.

mod constants;
mod don_settings;

pub use constants::*;
pub use don_settings::{build_don_settings, build_don_settings_from};
