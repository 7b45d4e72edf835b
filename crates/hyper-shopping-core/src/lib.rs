pub mod card;
pub mod category;
pub mod config;
pub mod error;
pub mod lexical;
pub mod normalize;
pub mod prompt;
pub mod route;
pub mod spelling;

#[cfg(test)]
mod testing;

pub use card::{load_cards, load_shopping_card, select_shopping_card, Card, CheckItem, Checklist};
pub use category::{
    valid_categories, CategoryResolver, CategoryStore, Resolution, CUSTOM_OPTION,
    DEFAULT_CATEGORIES, DEFAULT_CATEGORY_SYNONYMS,
};
pub use config::Config;
pub use error::{Result, ShoppingError};
pub use lexical::{fetch_dataset, LexicalBase, LexicalExpander, PartOfSpeech, Sense, WordNet};
pub use normalize::{normalize, normalize_key};
pub use prompt::{Prompt, Prompter};
pub use route::{sort_card, sort_checklist, DepartmentLookup, DepartmentMap, Route};
pub use spelling::{SpellingAdvisor, SpellingDictionary};
