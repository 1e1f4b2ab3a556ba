//! Battle ticking and the main loop

pub mod driver;
pub mod tick;

pub use driver::Driver;
pub use tick::{advance_battle, BattleTick};
