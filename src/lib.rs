//! Warboard - a grid skirmish arbiter
//!
//! Players send short text commands that deploy troops onto a battle grid;
//! deployed troops march toward the enemy edge on their own, fighting
//! whatever they run into, until the battle's time runs out.

pub mod battle;
pub mod channel;
pub mod command;
pub mod core;
pub mod simulation;
pub mod store;
pub mod world;
