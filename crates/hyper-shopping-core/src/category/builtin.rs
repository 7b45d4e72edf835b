//! Builtin Category Definitions
//!
//! Baseline shopping departments and hypernym synonyms.
//! A fresh store is seeded from these.

/// Default category vocabulary
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "baked_goods",
    "baking",
    "canned_food",
    "dairy",
    "diy",
    "drink",
    "frozen_food",
    "house_hold",
    "meat",
    "snacks",
    "vegetable",
];

/// Default hypernym -> category synonyms
pub const DEFAULT_CATEGORY_SYNONYMS: &[(&str, &str)] = &[
    ("component", "baking"),
    ("dairy_product", "dairy"),
    ("eggs", "vegetable"),
    ("juice", "drink"),
    ("pastry", "snacks"),
    ("picnic", "house_hold"),
    ("plant", "vegetable"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories_exist() {
        assert!(!DEFAULT_CATEGORIES.is_empty());
        assert!(DEFAULT_CATEGORIES.contains(&"dairy"));
        assert!(DEFAULT_CATEGORIES.contains(&"meat"));
        assert!(DEFAULT_CATEGORIES.contains(&"house_hold"));
    }

    #[test]
    fn test_synonym_targets_are_default_categories() {
        for (hypernym, category) in DEFAULT_CATEGORY_SYNONYMS {
            assert!(
                DEFAULT_CATEGORIES.contains(category),
                "synonym '{}' points at unknown category '{}'",
                hypernym,
                category
            );
        }
    }
}
