use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShoppingError {
    #[error("WordNet dataset is missing: {path}")]
    DatasetMissing { path: PathBuf },

    #[error("Failed to fetch WordNet dataset: {message}")]
    DatasetFetch { message: String },

    #[error("Invalid WordNet data in {path} (line {line}): {message}")]
    InvalidDataset {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Cannot resolve '{item}': no generalization and no spelling candidates")]
    UnresolvableWord { item: String },

    #[error("No category chosen for '{item}'")]
    NoCategoryChosen { item: String },

    #[error("No department known for item '{item}'")]
    DepartmentUnknown { item: String },

    #[error("Department '{department}' of item '{item}' is not on the route")]
    DepartmentNotOnRoute { item: String, department: String },

    #[error("Shop not found: {name}")]
    ShopNotFound { name: String },

    #[error("No card found in {path}")]
    CardNotFound { path: PathBuf },

    #[error("Checklist not found: {name}")]
    ChecklistNotFound { name: String },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config key not found: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidConfigValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ShoppingError>;

impl ShoppingError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DatasetMissing { .. } | Self::DatasetFetch { .. } => 2,
            Self::UnresolvableWord { .. } | Self::NoCategoryChosen { .. } => 3,
            Self::DepartmentUnknown { .. } | Self::DepartmentNotOnRoute { .. } => 4,
            Self::ShopNotFound { .. }
            | Self::CardNotFound { .. }
            | Self::ChecklistNotFound { .. } => 5,
            Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::InvalidConfigValue { .. } => 6,
            _ => 1,
        }
    }

    /// Errors that only abort the item being resolved, not the whole batch
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableWord { .. } | Self::NoCategoryChosen { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_item_errors() {
        let err = ShoppingError::UnresolvableWord {
            item: "pop tards".to_string(),
        };
        assert!(err.is_per_item());
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("pop tards"));

        let err = ShoppingError::DepartmentUnknown {
            item: "glycerine".to_string(),
        };
        assert!(!err.is_per_item());
        assert_eq!(err.exit_code(), 4);
    }
}
