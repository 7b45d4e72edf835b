use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShoppingError};
use crate::lexical::{WordNet, DEFAULT_WORDNET_URL};
use crate::route::{DepartmentMap, Route};
use crate::spelling::DEFAULT_MAX_EDIT_DISTANCE;

const CONFIG_FILE: &str = "config.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# hyper-shopping configuration file
# Location: ~/.hyper-shopping/config.toml

[wordnet]
# Directory holding the WordNet database files (index.noun, data.noun, ...)
# Default: <base dir>/wordnet/dict
# dir = "/usr/share/wordnet/dict"

# Where `hyper-shopping wordnet fetch` downloads the dataset from
url = "https://wordnetcode.princeton.edu/wn3.1.dict.tar.gz"

[spelling]
# Word list used for spelling suggestions, relative to the base dir
# Words you confirm are appended here
dictionary = "dictionary.txt"

# Largest edit distance for a suggestion
max_edit_distance = 2

# Shop routes: departments in walking order
[shops.smart]
route = ["bbq", "drinks", "diy", "vegetables", "dairy"]

# Item -> department used when sorting by route
[departments]
milk = "dairy"
parmesan = "dairy"
tomatoes = "vegetables"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wordnet: WordNetConfig,

    #[serde(default)]
    pub spelling: SpellingConfig,

    #[serde(default = "default_shops")]
    pub shops: BTreeMap<String, Route>,

    #[serde(default = "default_departments")]
    pub departments: DepartmentMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordNetConfig {
    /// Dataset directory (default: <base dir>/wordnet/dict)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_wordnet_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellingConfig {
    #[serde(default = "default_dictionary")]
    pub dictionary: PathBuf,

    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,
}

fn default_wordnet_url() -> String {
    DEFAULT_WORDNET_URL.to_string()
}

fn default_dictionary() -> PathBuf {
    PathBuf::from("dictionary.txt")
}

fn default_max_edit_distance() -> usize {
    DEFAULT_MAX_EDIT_DISTANCE
}

fn default_shops() -> BTreeMap<String, Route> {
    [(
        "smart".to_string(),
        Route::new(["bbq", "drinks", "diy", "vegetables", "dairy"]),
    )]
    .into_iter()
    .collect()
}

fn default_departments() -> DepartmentMap {
    let mut map = DepartmentMap::default();
    map.set("tomatoes", "vegetables");
    map.set("milk", "dairy");
    map.set("parmesan", "dairy");
    map
}

impl Default for WordNetConfig {
    fn default() -> Self {
        Self {
            dir: None,
            url: default_wordnet_url(),
        }
    }
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
            max_edit_distance: default_max_edit_distance(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wordnet: WordNetConfig::default(),
            spelling: SpellingConfig::default(),
            shops: default_shops(),
            departments: default_departments(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| ShoppingError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| ShoppingError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// WordNet directory, relative paths resolved against the base dir
    pub fn wordnet_dir(&self, base_dir: &Path) -> PathBuf {
        match &self.wordnet.dir {
            Some(dir) => base_dir.join(dir),
            None => WordNet::default_dir(base_dir),
        }
    }

    /// Spelling dictionary path, relative paths resolved against the base dir
    pub fn dictionary_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.spelling.dictionary)
    }

    pub fn shop(&self, name: &str) -> Result<&Route> {
        self.shops.get(name).ok_or_else(|| ShoppingError::ShopNotFound {
            name: name.to_string(),
        })
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "wordnet.dir" => Some(
                self.wordnet
                    .dir
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default(),
            ),
            "wordnet.url" => Some(self.wordnet.url.clone()),
            "spelling.dictionary" => Some(self.spelling.dictionary.display().to_string()),
            "spelling.max_edit_distance" => Some(self.spelling.max_edit_distance.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "wordnet.dir" => {
                let value = value.trim();
                self.wordnet.dir = (!value.is_empty()).then(|| PathBuf::from(value));
                Ok(())
            }
            "wordnet.url" => {
                self.wordnet.url = value.trim().to_string();
                Ok(())
            }
            "spelling.dictionary" => {
                self.spelling.dictionary = PathBuf::from(value.trim());
                Ok(())
            }
            "spelling.max_edit_distance" => {
                self.spelling.max_edit_distance =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ShoppingError::InvalidConfigValue {
                            key: key.to_string(),
                            message: format!("expected a number, got '{}'", value),
                        })?;
                Ok(())
            }
            _ => Err(ShoppingError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        [
            "wordnet.dir",
            "wordnet.url",
            "spelling.dictionary",
            "spelling.max_edit_distance",
        ]
        .iter()
        .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::DepartmentLookup;
    use tempfile::TempDir;

    #[test]
    fn test_default_has_smart_shop() {
        let config = Config::default();
        let route = config.shop("smart").unwrap();
        assert_eq!(route.departments()[0], "bbq");
        assert!(config.shop("lidl").is_err());
        assert_eq!(
            config.departments.department_of("milk"),
            Some("dairy".to_string())
        );
    }

    #[test]
    fn test_template_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(config.shops, defaults.shops);
        assert_eq!(config.departments, defaults.departments);
        assert_eq!(config.wordnet.url, defaults.wordnet.url);
        assert_eq!(config.spelling.max_edit_distance, 2);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert!(config.wordnet.dir.is_none());
        assert_eq!(
            config.dictionary_path(temp.path()),
            temp.path().join("dictionary.txt")
        );
        assert_eq!(
            config.wordnet_dir(temp.path()),
            temp.path().join("wordnet").join("dict")
        );
    }

    #[test]
    fn test_save_load_roundtrip_with_shop() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config
            .shops
            .insert("greens".to_string(), Route::new(["bakery", "dairy"]));
        config.departments.set("Bread", "bakery");
        config.set("spelling.max_edit_distance", "1").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = Config::load(temp.path()).unwrap();
        assert_eq!(loaded.shop("greens").unwrap().departments(), ["bakery", "dairy"]);
        assert_eq!(
            loaded.departments.department_of("bread"),
            Some("bakery".to_string())
        );
        assert_eq!(loaded.spelling.max_edit_distance, 1);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();
        config.set("wordnet.dir", "/usr/share/wordnet").unwrap();
        assert_eq!(config.get("wordnet.dir").unwrap(), "/usr/share/wordnet");
        assert_eq!(
            config.wordnet_dir(Path::new("/home/me/.hyper-shopping")),
            PathBuf::from("/usr/share/wordnet")
        );

        config.set("wordnet.dir", "").unwrap();
        assert!(config.wordnet.dir.is_none());

        assert!(config.set("spelling.max_edit_distance", "far").is_err());
        assert!(matches!(
            config.set("nope", "1"),
            Err(ShoppingError::ConfigKeyNotFound { .. })
        ));
        assert_eq!(config.list().len(), 4);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[spelling\n").unwrap();
        match Config::load(temp.path()).unwrap_err() {
            ShoppingError::ConfigParse { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("unexpected error: {}", other),
        }
    }
}
