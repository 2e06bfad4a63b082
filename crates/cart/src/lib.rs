//! Cart aggregation engine.
//!
//! Owns the product→quantity lines of one shopping session and derives the
//! running total from them. Pure, synchronous domain logic: no IO, no
//! persistence, no global state. Callers construct a [`CartEngine`], own it,
//! and hand out [`CartSnapshot`]s for rendering.

pub mod engine;
pub mod line;
pub mod snapshot;

pub use engine::{
    AddProduct, CartCleared, CartCommand, CartEngine, CartEvent, ClearCart, LineAdded,
    LineRemoved, QuantityChanged, RemoveProduct, SetQuantity,
};
pub use line::CartLine;
pub use snapshot::CartSnapshot;
