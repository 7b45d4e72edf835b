//! # Category Module
//!
//! Assigns shopping categories to free-text items.
//!
//! ## Module layout
//!
//! - `builtin`: default category vocabulary and synonyms
//! - `store`: durable categories, synonyms and item assignments
//! - `resolver`: the interactive resolution pipeline
//!
//! ## Usage
//!
//! ### CategoryStore
//!
//! ```rust
//! use hyper_shopping_core::category::CategoryStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut store = CategoryStore::open_in(dir.path()).unwrap();
//! assert!(store.is_known_category("dairy"));
//!
//! store.set_item_category("Toilet_paper", "house_hold").unwrap();
//! assert_eq!(store.item_category("Toilet_paper"), Some("house_hold"));
//! ```
//!
//! ### Resolving items (needs a dataset and a terminal)
//!
//! ```rust,ignore
//! use hyper_shopping_core::category::{CategoryResolver, CategoryStore};
//!
//! let mut resolver = CategoryResolver::new(&mut store, &wordnet, &mut speller, &mut prompter);
//! let resolution = resolver.resolve("Sour cream")?;
//! println!("{} -> {}", resolution.key, resolution.category);
//! ```

mod builtin;
mod resolver;
mod store;

// Re-exports
pub use builtin::{DEFAULT_CATEGORIES, DEFAULT_CATEGORY_SYNONYMS};
pub use resolver::{valid_categories, CategoryResolver, Resolution, CUSTOM_OPTION};
pub use store::{CategoryStore, StoreData};
