//! The fixed, ordered list of brand feeds shown on the board.
//!
//! The built-in registry mirrors the brands the ingestion job publishes.
//! A YAML file can replace it:
//!
//! ```yaml
//! brands:
//!   - key: vodafone
//!     name: Vodafone
//!     location: ./data/vodafone.json
//! ```

use crate::error::RegistryError;
use crate::models::SourceDescriptor;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// Ordered, immutable set of [`SourceDescriptor`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandRegistry {
    brands: Vec<SourceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    brands: Vec<SourceDescriptor>,
}

impl Default for BrandRegistry {
    fn default() -> Self {
        Self {
            brands: vec![
                SourceDescriptor::new("vodafone", "Vodafone", "./data/vodafone.json"),
                SourceDescriptor::new(
                    "virginmediao2",
                    "Virgin Media O2",
                    "./data/virginmediao2.json",
                ),
            ],
        }
    }
}

impl BrandRegistry {
    /// Build a registry, rejecting empty, blank or duplicate entries.
    pub fn new(brands: Vec<SourceDescriptor>) -> Result<Self, RegistryError> {
        if brands.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, brand) in brands.iter().enumerate() {
            for (field, value) in [
                ("key", &brand.key),
                ("name", &brand.name),
                ("location", &brand.location),
            ] {
                if value.trim().is_empty() {
                    return Err(RegistryError::EmptyField { index, field });
                }
            }
            if !seen.insert(brand.key.as_str()) {
                return Err(RegistryError::DuplicateKey(brand.key.clone()));
            }
        }

        Ok(Self { brands })
    }

    pub fn from_yaml_str(yaml: &str, path: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_yaml::from_str(yaml).map_err(|source| RegistryError::Yaml {
            path: path.to_string(),
            source,
        })?;
        Self::new(file.brands)
    }

    /// Load a registry from a YAML file on disk.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let display = path.as_ref().display().to_string();
        let yaml = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|source| RegistryError::Io {
                path: display.clone(),
                source,
            })?;
        let registry = Self::from_yaml_str(&yaml, &display)?;
        info!(brands = registry.len(), "Loaded brand registry");
        Ok(registry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.brands.iter()
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}
