use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use storefront::Storefront;
use storefront::shell::{self, Outcome, ShellCommand};
use storefront_catalog::Catalog;
use storefront_checkout::{CheckoutBridge, CheckoutConfig, HttpPaymentProvider, ProviderError};

/// Optional path to a JSON catalog; the built-in fixture is used otherwise.
const CATALOG_VAR: &str = "STOREFRONT_CATALOG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let catalog = Arc::new(load_catalog()?);
    let checkout = build_checkout(catalog.clone());
    let mut session = Storefront::new(catalog, checkout);

    println!("{}", shell::render_catalog(&session.catalog_view()));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match shell::execute(&mut session, command).await {
            Outcome::Continue(output) => println!("{output}"),
            Outcome::Quit => break,
        }
    }

    Ok(())
}

fn load_catalog() -> anyhow::Result<Catalog> {
    match std::env::var(CATALOG_VAR) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read catalog {path}"))?;
            let catalog =
                Catalog::from_json(&json).with_context(|| format!("invalid catalog {path}"))?;
            tracing::info!(path = %path, products = catalog.len(), "catalog loaded from file");
            Ok(catalog)
        }
        Err(_) => Ok(Catalog::fixture()),
    }
}

/// Configuration problems surface as an initialization failure of checkout
/// only; the rest of the storefront still runs.
fn build_checkout(
    catalog: Arc<Catalog>,
) -> Result<CheckoutBridge<HttpPaymentProvider>, ProviderError> {
    let config = CheckoutConfig::from_env()
        .map_err(|e| ProviderError::Initialization(e.to_string()))?;
    let provider = HttpPaymentProvider::new(&config)?;

    // Line items are priced from the catalog, not from the cart lines.
    Ok(CheckoutBridge::new(config, provider).with_price_authority(catalog))
}
