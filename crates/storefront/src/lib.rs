//! Storefront session and presentation glue.
//!
//! A [`Storefront`] is the explicitly owned state of one shopping session:
//! catalog, cart engine, checkout bridge and a change-notification bus. Front
//! ends (the terminal shell in `main.rs`, tests) hold it by reference and render
//! from the view models in [`views`].

pub mod session;
pub mod shell;
pub mod views;

pub use session::Storefront;
pub use views::{CartLineView, CartView, CatalogView, ConfirmationPage, ProductCardView};
