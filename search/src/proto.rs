use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::reference::normalize_href;
use crate::reference::reference_path;

/// One searchable entry of `search.json`.
///
/// Missing or `null` fields decode to empty values so one sloppy record
/// cannot sink the whole index; the matcher skips records it cannot use.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qualities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl CatalogRecord {
    /// Reference path used to correlate this record with its navigation
    /// node. A rendered `href` wins over the slug pair.
    pub fn reference_path(&self) -> Option<String> {
        if let Some(href) = self.href.as_deref()
            && !href.trim().is_empty()
        {
            return Some(normalize_href(href.trim()));
        }
        if self.group_slug.is_empty() || self.slug.is_empty() {
            return None;
        }
        Some(reference_path(&self.group_slug, &self.slug))
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload served as `search.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchIndex {
    pub items: Vec<CatalogRecord>,
}

impl SearchIndex {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
