//! Producers and their products

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::Creditable;
use crate::error::{Result, ValidationError};
use crate::tasks::TaskBook;

/// Product points accepted at registration
pub const PRODUCT_POINT_VALUES: [u8; 4] = [1, 2, 3, 5];

/// Product points needed for one credit
pub const POINTS_PER_CREDIT: u32 = 10;

/// A good logged by a producer.
///
/// Products compare and hash by name only: two products with the same name
/// and different points are the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    name: String,
    points: u8,
}

impl Product {
    pub fn new(name: &str, points: i64) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("product name").into());
        }
        let points = u8::try_from(points)
            .ok()
            .filter(|p| PRODUCT_POINT_VALUES.contains(p))
            .ok_or(ValidationError::ProductPoints(points))?;

        Ok(Self {
            name: name.to_string(),
            points,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> u8 {
        self.points
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} points)", self.name, self.points)
    }
}

/// Producer-specific state
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProducerProfile {
    products: Vec<Product>,
}

impl ProducerProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a product; no deduplication
    pub fn register_product(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product_points(&self) -> u32 {
        self.products.iter().map(|p| u32::from(p.points)).sum()
    }
}

impl Creditable for ProducerProfile {
    fn earned(&self, _tasks: &TaskBook) -> i64 {
        i64::from(self.product_points() / POINTS_PER_CREDIT)
    }
}
