//! # Product Catalog
//! Immutable keyed lookup from product id / class name to catalog entries.
//! Loaded once at startup and never mutated — so, unlike the reference
//! service's `SourceWeightsConfig` (which is wrapped in an `RwLock` and
//! admin-reloadable), this is a plain `Arc`-shared value safe for concurrent
//! readers with no synchronization at all.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Closed set of product categories, each with a fixed fractional weight
/// tolerance. Fixed by design; not runtime-configurable (see DESIGN.md
/// open-question resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Beverage,
    Snack,
    Candy,
    Food,
    Dairy,
    Health,
    Frozen,
    Etc,
}

impl Category {
    /// Fractional weight tolerance for this category (closed set).
    pub fn tolerance(self) -> f64 {
        match self {
            Category::Beverage => 0.05,
            Category::Snack => 0.10,
            Category::Candy => 0.10,
            Category::Food => 0.08,
            Category::Dairy => 0.07,
            Category::Health => 0.10,
            Category::Frozen => 0.15,
            Category::Etc => 0.15,
        }
    }
}

impl Default for Category {
    /// Missing category falls back to `etc`.
    fn default() -> Self {
        Category::Etc
    }
}

/// One immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub unit_weight_g: f64,
    pub unit_price: i64,
    #[serde(default)]
    pub category: Category,
}

impl Product {
    /// Zero means "weight-unknown" — excluded from weight matching.
    pub fn has_known_weight(&self) -> bool {
        self.unit_weight_g > 0.0
    }
}

const BUILT_IN_CATALOG_JSON: &str = include_str!("../data/catalog.json");

/// Immutable, concurrently-readable product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    by_id: HashMap<u32, Product>,
    by_name: HashMap<String, u32>,
}

impl Catalog {
    /// Build a catalog directly from an explicit product list, bypassing
    /// the embedded/override JSON loaders. Used by tests and by callers
    /// assembling a catalog from another source.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_name = HashMap::with_capacity(products.len());
        for p in products {
            by_name.insert(p.name.clone(), p.id);
            by_id.insert(p.id, p);
        }
        Self { by_id, by_name }
    }

    /// The built-in ~50-entry table embedded at compile time.
    pub fn built_in() -> Self {
        let products: Vec<Product> =
            serde_json::from_str(BUILT_IN_CATALOG_JSON).expect("built-in catalog is valid JSON");
        Self::from_products(products)
    }

    /// Load an override catalog from a JSON file, falling back to
    /// [`Catalog::built_in`] if the file is missing or malformed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Vec<Product>>(&raw) {
                Ok(products) => Self::from_products(products),
                Err(err) => {
                    tracing::warn!(error = %err, "catalog override malformed; using built-in catalog");
                    Self::built_in()
                }
            },
            Err(_) => Self::built_in(),
        }
    }

    pub fn lookup_by_id(&self, id: u32) -> Option<&Product> {
        self.by_id.get(&id)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&Product> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    pub fn tolerance_of(&self, category: Category) -> f64 {
        category.tolerance()
    }

    pub fn all(&self) -> impl Iterator<Item = &Product> {
        self.by_id.values()
    }
}
