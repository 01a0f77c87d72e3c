//! WooCommerce resource schemas
//!
//! Plain data containers exchanged with the REST API. The dispatcher never
//! looks inside them; the planners only need an item's identifier.

pub mod attribute;
pub mod category;
pub mod product;

pub use attribute::Attribute;
pub use category::{Category, CategoryLink, CategoryLinks};
pub use product::{CustomPrice, Dimensions, Image, Product, Tag};

/// Anything the REST API identifies by a numeric id
///
/// `None` means the item has not been created on the backend yet.
pub trait WooItem {
    fn id(&self) -> Option<u64>;
}

/// Bare identifier, handy for requests that only reference existing items
impl WooItem for u64 {
    fn id(&self) -> Option<u64> {
        Some(*self)
    }
}
