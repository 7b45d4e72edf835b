//! # Lexical Module
//!
//! Generalization terms ("hypernyms") for item words.
//!
//! The resolver never talks to a dataset directly; it goes through
//! [`LexicalBase`], which models a word-sense database: a word has senses,
//! each sense has one or more generalization paths up to a root, and each
//! sense carries one or more names.
//!
//! ```rust,ignore
//! use hyper_shopping_core::lexical::{LexicalExpander, WordNet};
//!
//! let wordnet = WordNet::open(&dict_dir)?;
//! let expander = LexicalExpander::new(&wordnet);
//! let terms = expander.expand("milk");
//! assert!(terms.iter().any(|t| t == "dairy_product"));
//! ```

mod wordnet;

pub use wordnet::{fetch_dataset, WordNet, DEFAULT_WORDNET_URL, REQUIRED_FILES};

/// Part of speech of a sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    pub fn all() -> &'static [PartOfSpeech] {
        &[
            PartOfSpeech::Noun,
            PartOfSpeech::Verb,
            PartOfSpeech::Adjective,
            PartOfSpeech::Adverb,
        ]
    }

    /// File suffix used by the WordNet database (`index.noun`, `verb.exc`, ...)
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adj",
            Self::Adverb => "adv",
        }
    }

    /// Pointer target marker in `data.*` lines; satellites (`s`) are adjectives
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "n" => Some(Self::Noun),
            "v" => Some(Self::Verb),
            "a" | "s" => Some(Self::Adjective),
            "r" => Some(Self::Adverb),
            _ => None,
        }
    }
}

/// One distinct meaning of a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sense {
    pub pos: PartOfSpeech,
    pub offset: u64,
}

impl Sense {
    pub fn new(pos: PartOfSpeech, offset: u64) -> Self {
        Self { pos, offset }
    }
}

/// Word-sense knowledge base
pub trait LexicalBase {
    /// All senses of a word; empty when the word is unknown
    fn senses_of(&self, word: &str) -> Vec<Sense>;

    /// Every path from a root down to `sense`, inclusive at both ends
    fn generalization_paths(&self, sense: &Sense) -> Vec<Vec<Sense>>;

    /// Names (lemmas) of a sense
    fn names_of(&self, sense: &Sense) -> Vec<String>;
}

/// Turns a word into its flattened generalization terms
pub struct LexicalExpander<'a> {
    base: &'a dyn LexicalBase,
}

impl<'a> LexicalExpander<'a> {
    pub fn new(base: &'a dyn LexicalBase) -> Self {
        Self { base }
    }

    /// Names of every sense on every generalization path of every sense of
    /// `word`, in traversal order. Duplicates are kept.
    pub fn expand(&self, word: &str) -> Vec<String> {
        let terms: Vec<String> = self
            .base
            .senses_of(word)
            .iter()
            .flat_map(|sense| self.base.generalization_paths(sense))
            .flatten()
            .flat_map(|sense| self.base.names_of(&sense))
            .collect();

        tracing::debug!(word, count = terms.len(), "expanded word");
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryLexicon;

    fn lexicon() -> MemoryLexicon {
        let mut lex = MemoryLexicon::default();
        lex.sense(1, &["entity"], &[]);
        lex.sense(2, &["food", "nutrient"], &[1]);
        lex.sense(3, &["dairy_product"], &[2]);
        lex.sense(4, &["milk"], &[3]);
        lex.sense(5, &["beverage", "drink"], &[2]);
        lex.sense(6, &["milk"], &[5, 3]);
        lex.word("milk", &[4, 6]);
        lex
    }

    #[test]
    fn expand_flattens_paths_in_order() {
        let lex = lexicon();
        let expander = LexicalExpander::new(&lex);
        let terms = expander.expand("milk");

        assert_eq!(
            terms,
            vec![
                // sense 4
                "entity", "food", "nutrient", "dairy_product", "milk",
                // sense 6, via beverage
                "entity", "food", "nutrient", "beverage", "drink", "milk",
                // sense 6, via dairy_product
                "entity", "food", "nutrient", "dairy_product", "milk",
            ]
        );
    }

    #[test]
    fn expand_unknown_word_is_empty() {
        let lex = lexicon();
        let expander = LexicalExpander::new(&lex);
        assert!(expander.expand("pop_tards").is_empty());
    }
}
