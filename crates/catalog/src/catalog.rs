use std::collections::HashSet;

use storefront_core::{DomainError, DomainResult, Price, ProductId};

use crate::product::Product;

/// Ordered, read-only product list.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids.
    ///
    /// Duplicate ids would make cart lines ambiguous, so they are refused here
    /// rather than letting the cart merge two different products.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id_typed()) {
                return Err(DomainError::conflict(format!(
                    "duplicate product id {}",
                    product.id_typed()
                )));
            }
        }

        tracing::debug!(products = products.len(), "catalog loaded");
        Ok(Self { products })
    }

    /// Parse a JSON array of product records.
    ///
    /// Only field presence and price validity are checked.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("catalog: {e}")))?;
        Self::new(products)
    }

    /// The built-in storefront fixture.
    pub fn fixture() -> Self {
        let products = vec![
            Product::new(
                ProductId::new(1),
                "Modern Minimalist Watch",
                Price::from_minor_units(19999),
                "Elegant timepiece with a clean, minimalist design perfect for any occasion.",
                "https://images.unsplash.com/photo-1523275335684-37898b6baf30",
                "Accessories",
            ),
            Product::new(
                ProductId::new(2),
                "Premium Wireless Headphones",
                Price::from_minor_units(29999),
                "High-fidelity audio with active noise cancellation and premium build quality.",
                "https://images.unsplash.com/photo-1505740420928-5e560c06d30e",
                "Electronics",
            ),
            Product::new(
                ProductId::new(3),
                "Leather Weekend Bag",
                Price::from_minor_units(24999),
                "Handcrafted genuine leather bag perfect for short trips and daily use.",
                "https://images.unsplash.com/photo-1553062407-98eeb64c6a62",
                "Bags",
            ),
            Product::new(
                ProductId::new(4),
                "Smart Home Speaker",
                Price::from_minor_units(17999),
                "Voice-controlled speaker with premium sound quality and smart home integration.",
                "https://images.unsplash.com/photo-1589003077984-894e133dabab",
                "Electronics",
            ),
            Product::new(
                ProductId::new(5),
                "Ceramic Pour-Over Coffee Set",
                Price::from_minor_units(8999),
                "Artisanal coffee brewing set for the perfect morning ritual.",
                "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085",
                "Home",
            ),
            Product::new(
                ProductId::new(6),
                "Minimalist Desk Lamp",
                Price::from_minor_units(12999),
                "Modern LED desk lamp with wireless charging base.",
                "https://images.unsplash.com/photo-1507473885765-e6ed057f782c",
                "Home",
            ),
        ];

        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id_typed() == id)
    }

    /// Like [`Catalog::get`], but a missing id is a `NotFound` error.
    pub fn require(&self, id: ProductId) -> DomainResult<&Product> {
        self.get(id).ok_or_else(DomainError::not_found)
    }

    /// Products whose name contains `query`, case-insensitively, in catalog
    /// order. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim();
        self.products
            .iter()
            .filter(|p| query.is_empty() || p.matches_query(query))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::fixture()
    }
}
