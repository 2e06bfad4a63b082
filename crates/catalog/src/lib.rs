//! Product catalog.
//!
//! The catalog is static configuration: an ordered list of products that the
//! cart engine reads but never mutates.

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::Product;
