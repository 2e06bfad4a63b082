use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are **immutable** facts with a stable, dotted type name
/// (e.g. "cart.line.added") and a schema version.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier.
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}
