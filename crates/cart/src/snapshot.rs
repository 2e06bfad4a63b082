use serde::Serialize;

use storefront_core::ProductId;

use crate::line::CartLine;

/// Read-only copy of the cart for rendering and checkout.
///
/// Owns its data; changing the engine afterwards does not affect a snapshot
/// already taken, and nothing in a snapshot can reach back into the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
    total: f64,
}

impl CartSnapshot {
    pub(crate) fn capture(lines: &[CartLine]) -> Self {
        Self {
            lines: lines.to_vec(),
            total: crate::engine::sum_lines(lines),
        }
    }

    /// Lines in first-add order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity())).sum()
    }
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self::capture(&[])
    }
}
