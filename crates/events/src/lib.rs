//! Domain events and their in-process distribution.
//!
//! The cart engine emits events describing each change; the presentation layer
//! subscribes to them to know when to re-render.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
