//! Line-oriented terminal front end.
//!
//! Parses one command per line and renders the session's view models as
//! plain text.

use core::str::FromStr;

use thiserror::Error;

use storefront_checkout::{PaymentProvider, ReturnRoute};
use storefront_core::{DomainError, ProductId};

use crate::session::Storefront;
use crate::views::{CartView, CatalogView, ConfirmationPage, QUANTITY_CHOICES};

pub const HELP: &str = "\
commands:
  list                 show the catalog (filtered by the current search)
  search [text]        filter products by name; no text clears the filter
  add <id>             add one unit of a product to the cart
  remove <id>          remove a product from the cart
  qty <id> <1-5>       set the quantity of a cart line
  cart                 show the cart
  checkout             proceed to the hosted payment page
  success | cancel     simulate returning from the payment page
  help                 show this help
  quit                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Add(ProductId),
    Remove(ProductId),
    Quantity(ProductId, u32),
    Cart,
    Checkout,
    Return(ReturnRoute),
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error(transparent)]
    InvalidId(#[from] DomainError),
    #[error("quantity must be a whole number from 1 to 5, got '{0}'")]
    InvalidQuantity(String),
}

impl FromStr for ShellCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();

        let command = match verb.as_str() {
            "list" | "ls" => Self::List,
            "search" => Self::Search(line.trim()[verb.len()..].trim().to_string()),
            "add" => Self::Add(next_product_id(&mut parts)?),
            "remove" | "rm" => Self::Remove(next_product_id(&mut parts)?),
            "qty" | "quantity" => {
                let id = next_product_id(&mut parts)?;
                let raw = parts.next().ok_or(ParseError::MissingArgument("quantity"))?;
                let quantity = raw
                    .parse::<u32>()
                    .ok()
                    .filter(|q| QUANTITY_CHOICES.contains(q))
                    .ok_or_else(|| ParseError::InvalidQuantity(raw.to_string()))?;
                Self::Quantity(id, quantity)
            }
            "cart" => Self::Cart,
            "checkout" => Self::Checkout,
            "success" => Self::Return(ReturnRoute::Success),
            "cancel" => Self::Return(ReturnRoute::Cancel),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn next_product_id<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<ProductId, ParseError> {
    let raw = parts.next().ok_or(ParseError::MissingArgument("product id"))?;
    Ok(raw.parse::<ProductId>()?)
}

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

pub async fn execute<P>(session: &mut Storefront<P>, command: ShellCommand) -> Outcome
where
    P: PaymentProvider,
{
    let output = match command {
        ShellCommand::List => render_catalog(&session.catalog_view()),
        ShellCommand::Search(query) => {
            session.set_query(query);
            render_catalog(&session.catalog_view())
        }
        ShellCommand::Add(id) => match session.add_to_cart(id) {
            Ok(_) => render_cart(&session.cart_view()),
            Err(DomainError::NotFound) => format!("no product with id {id}"),
            Err(e) => e.to_string(),
        },
        ShellCommand::Remove(id) => {
            session.remove_from_cart(id);
            render_cart(&session.cart_view())
        }
        ShellCommand::Quantity(id, quantity) => {
            if session.cart().line(id).is_none() {
                format!("product {id} is not in the cart")
            } else {
                session.set_quantity(id, quantity);
                render_cart(&session.cart_view())
            }
        }
        ShellCommand::Cart => render_cart(&session.cart_view()),
        ShellCommand::Checkout => {
            if !session.can_checkout() {
                checkout_unavailable(session.cart().is_empty()).to_string()
            } else {
                match session.checkout().await {
                    Ok(redirect) => format!("Redirecting to {}", redirect.url()),
                    Err(notice) => notice.to_string(),
                }
            }
        }
        ShellCommand::Return(route) => render_confirmation(&session.handle_return(route)),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => return Outcome::Quit,
    };

    Outcome::Continue(output)
}

/// Why the checkout control is disabled.
fn checkout_unavailable(cart_is_empty: bool) -> &'static str {
    if cart_is_empty {
        "checkout is unavailable: your cart is empty"
    } else {
        "checkout is unavailable: another checkout is in progress"
    }
}

pub fn render_catalog(view: &CatalogView) -> String {
    let mut lines = Vec::new();
    if !view.query.trim().is_empty() {
        lines.push(format!("search: {}", view.query));
    }
    if view.products.is_empty() {
        lines.push("no products match".to_string());
    }
    lines.extend(view.products.iter().map(|card| {
        format!(
            "[{}] {} - {} ({})\n    {}",
            card.id, card.name, card.price_label, card.category, card.description
        )
    }));
    if let Some(count) = view.cart_badge {
        lines.push(format!("cart: {count}"));
    }
    lines.join("\n").trim_end().to_string()
}

pub fn render_cart(view: &CartView) -> String {
    if view.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut lines: Vec<String> = view
        .lines
        .iter()
        .map(|line| {
            format!(
                "[{}] {} x{} @ {} = {}",
                line.product_id, line.name, line.quantity, line.price_label, line.line_total_label
            )
        })
        .collect();
    lines.push(format!("Total {}", view.total_label));
    lines.join("\n")
}

pub fn render_confirmation(page: &ConfirmationPage) -> String {
    format!(
        "{}\n{}\n{} ({})",
        page.title, page.message, page.link_label, page.link_href
    )
}
