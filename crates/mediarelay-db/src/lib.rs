//! Mediarelay Catalog Library
//!
//! The metadata store seam. The relay only ever reads records, once per request,
//! through the [`MediaCatalog`] trait; persistence lives behind it.

pub mod catalog;
pub mod memory;

pub use catalog::MediaCatalog;
pub use memory::InMemoryMediaCatalog;
