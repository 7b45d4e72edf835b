//! Route-based checklist sorting
//!
//! A route is the order in which a shop's departments are walked. Sorting a
//! checklist groups its items by department in that order; items in the same
//! department are ordered by lower-cased name.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::card::{Card, CheckItem, Checklist};
use crate::error::{Result, ShoppingError};
use crate::normalize::normalize_key;

/// Item -> department resolution used by the sorter
pub trait DepartmentLookup {
    /// Department of an item, keyed by [`normalize_key`] of its display name
    fn department_of(&self, item_key: &str) -> Option<String>;
}

impl DepartmentLookup for HashMap<String, String> {
    fn department_of(&self, item_key: &str) -> Option<String> {
        self.get(item_key).cloned()
    }
}

/// Department names in walking order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Route {
    pub route: Vec<String>,
}

impl Route {
    pub fn new<I, S>(departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            route: departments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn departments(&self) -> &[String] {
        &self.route
    }

    pub fn position(&self, department: &str) -> Option<usize> {
        self.route.iter().position(|d| d == department)
    }
}

/// Configured item -> department assignments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentMap {
    items: BTreeMap<String, String>,
}

impl DepartmentMap {
    pub fn set(&mut self, item: &str, department: &str) {
        self.items
            .insert(normalize_key(item), department.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl DepartmentLookup for DepartmentMap {
    fn department_of(&self, item_key: &str) -> Option<String> {
        // hand-edited config keys may not be normalized
        self.items
            .get(item_key)
            .or_else(|| {
                self.items
                    .iter()
                    .find(|(item, _)| normalize_key(item) == item_key)
                    .map(|(_, department)| department)
            })
            .cloned()
    }
}

/// Return a copy of `items` ordered by `route`, positions renumbered from 1.
///
/// Every item must have a department, and every department must be on the
/// route; otherwise the whole sort fails and nothing is returned.
pub fn sort_checklist(
    items: &[CheckItem],
    route: &Route,
    departments: &dyn DepartmentLookup,
) -> Result<Vec<CheckItem>> {
    let mut keyed = Vec::with_capacity(items.len());
    for item in items {
        let key = normalize_key(&item.name);
        let department =
            departments
                .department_of(&key)
                .ok_or_else(|| ShoppingError::DepartmentUnknown {
                    item: item.name.clone(),
                })?;
        let index =
            route
                .position(&department)
                .ok_or_else(|| ShoppingError::DepartmentNotOnRoute {
                    item: item.name.clone(),
                    department: department.clone(),
                })?;
        keyed.push(((index, item.name.to_lowercase()), item.clone()));
    }

    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    Ok(keyed
        .into_iter()
        .enumerate()
        .map(|(i, (_, mut item))| {
            item.pos = (i + 1).to_string();
            item
        })
        .collect())
}

/// Sort every checklist of a card
pub fn sort_card(
    card: &Card,
    route: &Route,
    departments: &dyn DepartmentLookup,
) -> Result<Vec<Checklist>> {
    card.checklists
        .iter()
        .map(|checklist| {
            Ok(Checklist {
                check_items: sort_checklist(&checklist.check_items, route, departments)?,
                ..checklist.clone()
            })
        })
        .collect()
}
