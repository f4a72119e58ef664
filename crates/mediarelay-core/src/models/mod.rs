//! Domain models

pub mod media;

pub use media::{MediaKind, MediaLocation, MediaRecord};
