//! Core math types shared by the zone runtime

pub mod transform;

pub use transform::{Transform, UP};
