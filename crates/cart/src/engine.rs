use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Aggregate, AggregateRoot, ProductId};
use storefront_events::Event;

use crate::line::CartLine;
use crate::snapshot::CartSnapshot;

/// Sum of `unit_price * quantity` over `lines`, starting from `0.0`.
pub(crate) fn sum_lines(lines: &[CartLine]) -> f64 {
    lines.iter().fold(0.0, |acc, line| acc + line.line_total())
}

/// Aggregate: the shopping cart of one session.
///
/// The total is never stored. Every read recomputes it from the lines, so it
/// cannot drift from them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartEngine {
    lines: Vec<CartLine>,
    version: u64,
}

impl CartEngine {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, merging into an existing line if present.
    pub fn add(&mut self, product: &Product) -> Vec<CartEvent> {
        self.run(CartCommand::AddProduct(AddProduct {
            product: product.clone(),
            occurred_at: Utc::now(),
        }))
    }

    /// Delete the line for `product_id`. Unknown ids are a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> Vec<CartEvent> {
        self.run(CartCommand::RemoveProduct(RemoveProduct {
            product_id,
            occurred_at: Utc::now(),
        }))
    }

    /// Replace the quantity of an existing line. Unknown ids are a no-op.
    ///
    /// A quantity of zero keeps the line with no contribution to the total;
    /// it is not treated as a removal.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Vec<CartEvent> {
        self.run(CartCommand::SetQuantity(SetQuantity {
            product_id,
            quantity,
            occurred_at: Utc::now(),
        }))
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> Vec<CartEvent> {
        self.run(CartCommand::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        }))
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.lines)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    pub fn total(&self) -> f64 {
        sum_lines(&self.lines)
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

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id() == product_id)
    }

    fn run(&mut self, command: CartCommand) -> Vec<CartEvent> {
        let events = match self.execute(&command) {
            Ok(events) => events,
            Err(never) => match never {},
        };

        tracing::debug!(
            command = command.name(),
            events = events.len(),
            lines = self.lines.len(),
            total = self.total(),
            "cart command executed"
        );

        events
    }
}

impl AggregateRoot for CartEngine {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddProduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddProduct {
    pub product: Product,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveProduct {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartCommand {
    AddProduct(AddProduct),
    RemoveProduct(RemoveProduct),
    SetQuantity(SetQuantity),
    ClearCart(ClearCart),
}

impl CartCommand {
    fn name(&self) -> &'static str {
        match self {
            CartCommand::AddProduct(_) => "add",
            CartCommand::RemoveProduct(_) => "remove",
            CartCommand::SetQuantity(_) => "set_quantity",
            CartCommand::ClearCart(_) => "clear",
        }
    }
}

/// Event: LineAdded (new line with quantity 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAdded {
    pub product: Product,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub product_id: ProductId,
    pub previous: u32,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    QuantityChanged(QuantityChanged),
    LineRemoved(LineRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "cart.line.added",
            CartEvent::QuantityChanged(_) => "cart.line.quantity_changed",
            CartEvent::LineRemoved(_) => "cart.line.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for CartEngine {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => {
                self.lines.push(CartLine::new(e.product.clone(), 1));
            }
            CartEvent::QuantityChanged(e) => {
                if let Some(idx) = self.position(e.product_id) {
                    self.lines[idx].set_quantity(e.quantity);
                }
            }
            CartEvent::LineRemoved(e) => {
                self.lines.retain(|l| l.product_id() != e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = match command {
            CartCommand::AddProduct(cmd) => self.handle_add(cmd),
            CartCommand::RemoveProduct(cmd) => self.handle_remove(cmd),
            CartCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            CartCommand::ClearCart(cmd) => vec![CartEvent::CartCleared(CartCleared {
                occurred_at: cmd.occurred_at,
            })],
        };
        Ok(events)
    }
}

impl CartEngine {
    fn handle_add(&self, cmd: &AddProduct) -> Vec<CartEvent> {
        let product_id = cmd.product.id_typed();
        match self.line(product_id) {
            Some(line) => vec![CartEvent::QuantityChanged(QuantityChanged {
                product_id,
                previous: line.quantity(),
                quantity: line.quantity().saturating_add(1),
                occurred_at: cmd.occurred_at,
            })],
            None => vec![CartEvent::LineAdded(LineAdded {
                product: cmd.product.clone(),
                occurred_at: cmd.occurred_at,
            })],
        }
    }

    fn handle_remove(&self, cmd: &RemoveProduct) -> Vec<CartEvent> {
        match self.line(cmd.product_id) {
            Some(line) => vec![CartEvent::LineRemoved(LineRemoved {
                product_id: cmd.product_id,
                quantity: line.quantity(),
                occurred_at: cmd.occurred_at,
            })],
            None => Vec::new(),
        }
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Vec<CartEvent> {
        match self.line(cmd.product_id) {
            Some(line) if line.quantity() != cmd.quantity => {
                vec![CartEvent::QuantityChanged(QuantityChanged {
                    product_id: cmd.product_id,
                    previous: line.quantity(),
                    quantity: cmd.quantity,
                    occurred_at: cmd.occurred_at,
                })]
            }
            _ => Vec::new(),
        }
    }
}
