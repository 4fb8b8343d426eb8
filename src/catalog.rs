//! Product catalog sources and the built-in fallback list.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{ManufacturingOrigin, MountingType, Product};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog \"{path}\": {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed catalog \"{path}\": {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Source of catalog products.
pub trait CatalogProvider {
    /// Returns every product the source knows about.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the source cannot be read or parsed.
    fn products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Catalog stored as a JSON array of products.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for JsonFileCatalog {
    fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Where the loaded products came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Provider,
    Builtin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCatalog {
    pub products: Vec<Product>,
    pub source: CatalogSource,
}

/// Loads products from `provider`, falling back to [`builtin_catalog`] when
/// the provider fails or returns nothing.
pub fn load_catalog(provider: &dyn CatalogProvider) -> LoadedCatalog {
    match provider.products() {
        Ok(products) if !products.is_empty() => {
            info!(products = products.len(), "catalog loaded");
            LoadedCatalog {
                products,
                source: CatalogSource::Provider,
            }
        }
        Ok(_) => {
            warn!("catalog provider returned no products, using built-in catalog");
            builtin()
        }
        Err(e) => {
            warn!("{e}, using built-in catalog");
            builtin()
        }
    }
}

fn builtin() -> LoadedCatalog {
    LoadedCatalog {
        products: builtin_catalog(),
        source: CatalogSource::Builtin,
    }
}

/// Small static catalog covering the common product classes.
pub fn builtin_catalog() -> Vec<Product> {
    use MountingType::{FlatRoof, Ground, Railing, Wall};

    vec![
        Product {
            id: "starter-400".to_string(),
            brand: "Sonnenkraft".to_string(),
            name: "Starter 400".to_string(),
            wattage_wp: 400.0,
            module_count: 1,
            price_eur: 349.0,
            has_inverter: true,
            inverter_power_w: Some(400.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: [Railing, Wall].into_iter().collect(),
            bifacial: false,
            module_efficiency_pct: 20.5,
            warranty_years: 12,
            origin: ManufacturingOrigin::China,
            manufacturing_co2_kg: None,
            description: "Single module kit for small balconies.".to_string(),
        },
        Product {
            id: "duo-800".to_string(),
            brand: "Sonnenkraft".to_string(),
            name: "Duo 800".to_string(),
            wattage_wp: 820.0,
            module_count: 2,
            price_eur: 549.0,
            has_inverter: true,
            inverter_power_w: Some(800.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: [Railing, Wall, FlatRoof].into_iter().collect(),
            bifacial: false,
            module_efficiency_pct: 21.3,
            warranty_years: 15,
            origin: ManufacturingOrigin::China,
            manufacturing_co2_kg: None,
            description: "Two module kit with 800 W micro-inverter.".to_string(),
        },
        Product {
            id: "bifacial-900".to_string(),
            brand: "Nordlicht".to_string(),
            name: "Bifacial 900".to_string(),
            wattage_wp: 900.0,
            module_count: 2,
            price_eur: 799.0,
            has_inverter: true,
            inverter_power_w: Some(800.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: [Railing, FlatRoof, Ground].into_iter().collect(),
            bifacial: true,
            module_efficiency_pct: 22.0,
            warranty_years: 25,
            origin: ManufacturingOrigin::Europe,
            manufacturing_co2_kg: None,
            description: "Glass-glass bifacial modules assembled in Europe.".to_string(),
        },
        Product {
            id: "heimat-800".to_string(),
            brand: "Heimatstrom".to_string(),
            name: "Made in Germany 800".to_string(),
            wattage_wp: 860.0,
            module_count: 2,
            price_eur: 1099.0,
            has_inverter: true,
            inverter_power_w: Some(800.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: [Railing, Wall, FlatRoof, Ground].into_iter().collect(),
            bifacial: false,
            module_efficiency_pct: 21.8,
            warranty_years: 25,
            origin: ManufacturingOrigin::Domestic,
            manufacturing_co2_kg: Some(300.0),
            description: "Modules and inverter produced in Germany.".to_string(),
        },
        Product {
            id: "storage-1600".to_string(),
            brand: "Nordlicht".to_string(),
            name: "Speicher 1.6".to_string(),
            wattage_wp: 1780.0,
            module_count: 4,
            price_eur: 1899.0,
            has_inverter: true,
            inverter_power_w: Some(800.0),
            has_storage: true,
            storage_capacity_kwh: Some(1.6),
            mounting_types: [FlatRoof, Ground].into_iter().collect(),
            bifacial: false,
            module_efficiency_pct: 21.5,
            warranty_years: 10,
            origin: ManufacturingOrigin::OtherAsia,
            manufacturing_co2_kg: None,
            description: "Four modules with a 1.6 kWh battery.".to_string(),
        },
        Product {
            id: "budget-600".to_string(),
            brand: "Lumo".to_string(),
            name: "Budget 600".to_string(),
            wattage_wp: 600.0,
            module_count: 2,
            price_eur: 299.0,
            has_inverter: true,
            inverter_power_w: Some(600.0),
            has_storage: false,
            storage_capacity_kwh: None,
            mounting_types: [Railing].into_iter().collect(),
            bifacial: false,
            module_efficiency_pct: 19.8,
            warranty_years: 5,
            origin: ManufacturingOrigin::Unknown,
            manufacturing_co2_kg: None,
            description: "Entry level kit from an unlisted manufacturer.".to_string(),
        },
    ]
}
