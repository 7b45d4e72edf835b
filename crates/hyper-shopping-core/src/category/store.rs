//! Category Store
//!
//! Durable category vocabulary, hypernym synonyms and item assignments.
//! Every mutation is written to disk before it returns.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::route::DepartmentLookup;

use super::builtin::{DEFAULT_CATEGORIES, DEFAULT_CATEGORY_SYNONYMS};

/// On-disk layout of `store.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub known_categories: BTreeSet<String>,
    #[serde(default)]
    pub category_synonyms: BTreeMap<String, String>,
    #[serde(default)]
    pub item_categories: BTreeMap<String, String>,
}

/// File-backed category store
#[derive(Debug)]
pub struct CategoryStore {
    path: PathBuf,
    data: StoreData,
}

impl CategoryStore {
    pub const FILENAME: &'static str = "store.toml";

    /// Open the store in a base directory
    pub fn open_in(base_dir: &Path) -> Result<Self> {
        Self::open(base_dir.join(Self::FILENAME))
    }

    /// Open the store file, seeding defaults into empty tables
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            StoreData::default()
        };

        let mut store = Self { path, data };
        if store.seed_defaults() {
            store.save()?;
        }
        Ok(store)
    }

    fn seed_defaults(&mut self) -> bool {
        let mut seeded = false;
        if self.data.known_categories.is_empty() {
            self.data
                .known_categories
                .extend(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()));
            seeded = true;
        }
        if self.data.category_synonyms.is_empty() {
            self.data.category_synonyms.extend(
                DEFAULT_CATEGORY_SYNONYMS
                    .iter()
                    .map(|(h, c)| (h.to_string(), c.to_string())),
            );
            seeded = true;
        }
        seeded
    }

    /// Write the whole state atomically
    fn save(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(&self.data)?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content.as_bytes())?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn known_categories(&self) -> &BTreeSet<String> {
        &self.data.known_categories
    }

    pub fn is_known_category(&self, category: &str) -> bool {
        self.data.known_categories.contains(category)
    }

    pub fn add_category(&mut self, category: &str) -> Result<()> {
        if self.data.known_categories.insert(category.to_string()) {
            tracing::info!(category, "added category");
        }
        self.save()
    }

    pub fn item_category(&self, item: &str) -> Option<&str> {
        self.data.item_categories.get(item).map(String::as_str)
    }

    pub fn item_categories(&self) -> &BTreeMap<String, String> {
        &self.data.item_categories
    }

    /// Assign a category to an item; the category becomes known as a side effect
    pub fn set_item_category(&mut self, item: &str, category: &str) -> Result<()> {
        self.add_category(category)?;
        self.data
            .item_categories
            .insert(item.to_string(), category.to_string());
        tracing::info!(item, category, "stored item category");
        self.save()
    }

    pub fn category_synonyms(&self) -> &BTreeMap<String, String> {
        &self.data.category_synonyms
    }

    pub fn add_category_synonym(&mut self, hypernym: &str, category: &str) -> Result<()> {
        self.data
            .category_synonyms
            .insert(hypernym.to_string(), category.to_string());
        tracing::info!(hypernym, category, "stored category synonym");
        self.save()
    }
}

/// Items are stored with their original case. An exact key hit wins; when
/// only case variants exist (`Milk`, `MILK`) the first in key order is used.
impl DepartmentLookup for CategoryStore {
    fn department_of(&self, item_key: &str) -> Option<String> {
        let items = &self.data.item_categories;
        items
            .get(item_key)
            .or_else(|| {
                items
                    .iter()
                    .find(|(item, _)| item.to_lowercase() == item_key)
                    .map(|(_, category)| category)
            })
            .cloned()
    }
}
