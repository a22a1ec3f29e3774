// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod attribute;
pub mod catalog_row;
pub mod record;

pub use attribute::{Attribute, AttributeSpec};
pub use catalog_row::{CatalogRow, GALLERY_SLOTS, GalleryImage};
pub use record::{COLUMN_COUNT, COLUMNS, EAN_COLUMN, ExportRecord};
