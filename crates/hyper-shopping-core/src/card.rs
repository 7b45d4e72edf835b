//! Card and checklist records
//!
//! Shopping lists arrive as card exports in the Trello JSON shape:
//!
//! ```text
//! Card { id, name, dateLastActivity, checklists }
//! └── Checklist { id, idCard, name, checkItems }
//!     └── CheckItem { id, name, pos }
//! ```
//!
//! A card file holds either a single card or an array of cards.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, ShoppingError};

/// One line of a checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckItem {
    pub id: String,
    pub name: String,
    /// Display position; exports may carry it as a number
    #[serde(deserialize_with = "position_string")]
    pub pos: String,
}

impl CheckItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pos: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pos: pos.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: String,
    #[serde(default)]
    pub id_card: String,
    pub name: String,
    #[serde(default)]
    pub check_items: Vec<CheckItem>,
}

impl Checklist {
    /// Item names in list order
    pub fn item_names(&self) -> Vec<&str> {
        self.check_items.iter().map(|i| i.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub date_last_activity: DateTime<Utc>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

impl Card {
    pub fn checklist(&self, name: &str) -> Result<&Checklist> {
        self.checklists
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ShoppingError::ChecklistNotFound {
                name: name.to_string(),
            })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CardFile {
    Many(Vec<Card>),
    One(Box<Card>),
}

/// Read every card in a card file
pub fn load_cards(path: &Path) -> Result<Vec<Card>> {
    let content = fs::read_to_string(path)?;
    let cards = match serde_json::from_str::<CardFile>(&content)? {
        CardFile::Many(cards) => cards,
        CardFile::One(card) => vec![*card],
    };
    Ok(cards)
}

/// Most recently active card named "shopping", falling back to the most
/// recently active card of any name
pub fn select_shopping_card(cards: &[Card]) -> Option<&Card> {
    cards
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case("shopping"))
        .max_by_key(|c| c.date_last_activity)
        .or_else(|| cards.iter().max_by_key(|c| c.date_last_activity))
}

/// Load a card file and pick the shopping card from it
pub fn load_shopping_card(path: &Path) -> Result<Card> {
    let cards = load_cards(path)?;
    select_shopping_card(&cards)
        .cloned()
        .ok_or_else(|| ShoppingError::CardNotFound {
            path: path.to_path_buf(),
        })
}

fn position_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Position {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Position::deserialize(deserializer)? {
        Position::Text(s) => s,
        Position::Number(n) => n.to_string(),
    })
}
