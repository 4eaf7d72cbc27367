//! Item system

pub mod item;

pub use item::{Item, ItemKind};
