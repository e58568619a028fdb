use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::CatalogError;
use crate::proto::CatalogRecord;
use crate::reference::item_href;
use crate::reference::slugify;

/// Grouped catalog the navigation tree is rendered from.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default)]
    pub groups: Vec<CatalogGroup>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogGroup {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub extended: Extended,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extended {
    #[serde(default)]
    pub shadows: Vec<Shadow>,
}

/// Nested entry shown underneath its item in the navigation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shadow {
    pub name: String,
    #[serde(default)]
    pub qualities: Vec<String>,
}

impl Catalog {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_json::from_str(raw)?;
        catalog.fill_slugs();
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Flattens items with their group metadata, in catalog order.
    pub fn records(&self) -> Vec<CatalogRecord> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.items.iter().map(move |item| CatalogRecord {
                    name: item.name.clone(),
                    qualities: item.qualities.clone(),
                    group: group.name.clone(),
                    group_slug: group.slug.clone(),
                    slug: item.slug.clone(),
                    href: Some(item_href(&group.slug, &item.slug)),
                })
            })
            .collect()
    }

    fn fill_slugs(&mut self) {
        for group in &mut self.groups {
            if group.slug.trim().is_empty() {
                group.slug = slugify(&group.name);
            }
            for item in &mut group.items {
                if item.slug.trim().is_empty() {
                    item.slug = slugify(&item.name);
                }
            }
        }
    }
}
