//! Category Resolver
//!
//! Finds the category of a free-text shopping item. The resolver tries, in
//! order: a remembered assignment, the item's generalization terms, a word
//! picked from the item by the user, a spelling correction, and finally a
//! category typed by the user. Every successful answer is written to the
//! store before it is returned.
//!
//! ```text
//! normalize ── remembered? ──────────────────────────────────────┐
//!     │                                                          │
//!  expand ── terms ──> categorize ── declined ──> synonym ──┐    │
//!     │ none                ^                               │    │
//!  choose word ── terms ────┤                               ├─> commit
//!     │ declined    │ none  │                               │
//!  spell-correct    └──────────────> unknown category ──────┘
//!     │ corrected ── terms ─┘               ^
//!     └──────────── none ───────────────────┘
//! ```

use std::collections::BTreeSet;

use crate::error::{Result, ShoppingError};
use crate::lexical::{LexicalBase, LexicalExpander};
use crate::normalize::{normalize, normalize_key};
use crate::prompt::{Prompt, Prompter};
use crate::spelling::SpellingAdvisor;

use super::store::CategoryStore;

/// Extra option offered next to spelling suggestions
pub const CUSTOM_OPTION: &str = "*Custom*";

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Normalized item name the category is stored under
    pub key: String,
    pub category: String,
    /// Answered from the store without asking anything
    pub remembered: bool,
}

/// Categories reachable from generalization terms.
///
/// Known categories that appear among `terms` come first, in order of first
/// appearance, followed by synonym targets in order of the first term that
/// triggers them. No category appears twice.
pub fn valid_categories(store: &CategoryStore, terms: &[String]) -> Vec<String> {
    let mut valid: Vec<String> = Vec::new();

    for term in terms {
        if store.is_known_category(term) && !valid.contains(term) {
            valid.push(term.clone());
        }
    }

    let synonyms = store.category_synonyms();
    for term in terms {
        if let Some(category) = synonyms.get(term) {
            if !valid.contains(category) {
                valid.push(category.clone());
            }
        }
    }

    valid
}

pub struct CategoryResolver<'a> {
    store: &'a mut CategoryStore,
    expander: LexicalExpander<'a>,
    speller: &'a mut SpellingAdvisor,
    prompter: &'a mut dyn Prompter,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(
        store: &'a mut CategoryStore,
        lexicon: &'a dyn LexicalBase,
        speller: &'a mut SpellingAdvisor,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            store,
            expander: LexicalExpander::new(lexicon),
            speller,
            prompter,
        }
    }

    /// Resolve one item to a category, asking the user where needed
    pub fn resolve(&mut self, item: &str) -> Result<Resolution> {
        let key = normalize(item);
        if key.is_empty() {
            return Err(unresolvable(item));
        }

        if let Some(category) = self.store.item_category(&key) {
            tracing::debug!(item, category, "remembered category");
            return Ok(Resolution {
                category: category.to_string(),
                key,
                remembered: true,
            });
        }

        let category = self.find_category(item, &key)?;
        self.store.set_item_category(&key, &category)?;

        Ok(Resolution {
            key,
            category,
            remembered: false,
        })
    }

    fn find_category(&mut self, item: &str, key: &str) -> Result<String> {
        let terms = self.expander.expand(key);
        if !terms.is_empty() {
            return self.categorize(item, &terms);
        }

        tracing::debug!(item, "no generalization for item");
        if let Some(word) = self.choose_word(item)? {
            let terms = self.expander.expand(&normalize(&word));
            if !terms.is_empty() {
                return self.categorize(item, &terms);
            }
            tracing::debug!(item, word = %word, "no generalization for chosen word");
            return self.ask_category(item);
        }

        let corrected = self.correct_spelling(item)?;
        let terms = self.expander.expand(&normalize(&corrected));
        if !terms.is_empty() {
            return self.categorize(item, &terms);
        }
        tracing::debug!(item, corrected = %corrected, "no generalization after correction");
        self.ask_category(item)
    }

    /// Let the user pick the word that describes a multi-word item
    fn choose_word(&mut self, item: &str) -> Result<Option<String>> {
        let words: Vec<String> = item.split_whitespace().map(str::to_string).collect();
        if words.len() < 2 {
            return Ok(None);
        }

        let answer = self.prompter.choose_one(
            Prompt::new(
                "Complex item found",
                "Which of the words generally describes your item best?",
            ),
            &words,
        )?;
        Ok(non_blank(answer))
    }

    fn correct_spelling(&mut self, item: &str) -> Result<String> {
        let mut options = self.speller.suggest(item);
        if options.is_empty() {
            return Err(unresolvable(item));
        }
        options.push(CUSTOM_OPTION.to_string());

        let text = format!("Did you mean one of these for '{}'?", item);
        let choice = non_blank(
            self.prompter
                .choose_one(Prompt::new("Unknown word", &text), &options)?,
        );
        if let Some(choice) = choice.filter(|c| c != CUSTOM_OPTION) {
            return Ok(choice);
        }

        let text = format!("Spelling not found, please enter the correct word for '{}'", item);
        let custom = non_blank(self.prompter.ask_text(Prompt::new("Custom value", &text))?)
            .ok_or_else(|| unresolvable(item))?;
        if custom == item {
            self.speller.learn(&custom)?;
        }
        Ok(custom)
    }

    fn categorize(&mut self, item: &str, terms: &[String]) -> Result<String> {
        let valid = valid_categories(self.store, terms);
        let unique_terms: Vec<String> = terms
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let options = if valid.is_empty() {
            &unique_terms
        } else {
            &valid
        };

        let text = format!("Which of the categories describes '{}' best?", item);
        let choice = self
            .prompter
            .choose_one(Prompt::new("Many categories found", &text), options)?;
        if let Some(category) = non_blank(choice) {
            return Ok(category);
        }

        self.resolve_synonym(item, &unique_terms)
    }

    /// Map one of the item's terms to a category and remember the mapping
    fn resolve_synonym(&mut self, item: &str, terms: &[String]) -> Result<String> {
        let text = format!(
            "Which hypernym is synonymous with a category for the item '{}'?",
            item
        );
        let synonym = non_blank(self.prompter.choose_one(
            Prompt::new("Hypernyms without category found", &text),
            terms,
        )?)
        .ok_or_else(|| no_category(item))?;

        let known: Vec<String> = self.store.known_categories().iter().cloned().collect();
        let title = format!("Choose category for '{}'", synonym);
        let text = format!("Which category is '{}' synonymous with?", synonym);
        let mut category = non_blank(
            self.prompter
                .choose_one(Prompt::new(&title, &text), &known)?,
        );

        if category.is_none() {
            let title = format!("Add a new category synonymous with '{}'", synonym);
            category = self
                .prompter
                .ask_text(Prompt::new(&title, "Category name"))?
                .and_then(category_from_text);
        }
        if category.is_none() {
            category = self.ask_category_text(item)?;
        }

        let category = category.ok_or_else(|| no_category(item))?;
        self.store.add_category(&category)?;
        self.store.add_category_synonym(&synonym, &category)?;
        Ok(category)
    }

    fn ask_category(&mut self, item: &str) -> Result<String> {
        self.ask_category_text(item)?
            .ok_or_else(|| no_category(item))
    }

    fn ask_category_text(&mut self, item: &str) -> Result<Option<String>> {
        let text = format!("What is the category for '{}'?", item);
        Ok(self
            .prompter
            .ask_text(Prompt::new("Unknown category", &text))?
            .and_then(category_from_text))
    }
}

fn non_blank(answer: Option<String>) -> Option<String> {
    answer
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

fn category_from_text(text: String) -> Option<String> {
    let category = normalize_key(&text);
    (!category.is_empty()).then_some(category)
}

fn unresolvable(item: &str) -> ShoppingError {
    ShoppingError::UnresolvableWord {
        item: item.to_string(),
    }
}

fn no_category(item: &str) -> ShoppingError {
    ShoppingError::NoCategoryChosen {
        item: item.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::{SpellingDictionary, DEFAULT_MAX_EDIT_DISTANCE};
    use crate::testing::{Answer, MemoryLexicon, ScriptedPrompter};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        store: CategoryStore,
        speller: SpellingAdvisor,
        lexicon: MemoryLexicon,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let store = CategoryStore::open_in(temp.path()).unwrap();

        let dictionary_path = temp.path().join("dictionary.txt");
        fs::write(&dictionary_path, "tomato 5\npotato 3\npastizzo 1\n").unwrap();
        let dictionary = SpellingDictionary::load(&dictionary_path).unwrap();
        let speller = SpellingAdvisor::new(dictionary, DEFAULT_MAX_EDIT_DISTANCE);

        let mut lexicon = MemoryLexicon::default();
        lexicon
            .sense(1, &["entity"], &[])
            .sense(2, &["food", "nutrient"], &[1])
            .sense(3, &["dairy_product"], &[2])
            .sense(4, &["milk"], &[3])
            .sense(10, &["meat"], &[2])
            .sense(11, &["sausage"], &[10])
            .sense(20, &["vegetable"], &[2])
            .sense(21, &["tomato"], &[20])
            .sense(30, &["alcohol"], &[1])
            .sense(31, &["glycerin", "glycerine"], &[30])
            .word("milk", &[4])
            .word("sausages", &[11])
            .word("tomato", &[21])
            .word("glycerine", &[31]);

        Fixture {
            temp,
            store,
            speller,
            lexicon,
        }
    }

    fn resolve(
        f: &mut Fixture,
        item: &str,
        answers: Vec<Answer>,
    ) -> (Result<Resolution>, ScriptedPrompter) {
        let mut prompter = ScriptedPrompter::new(answers);
        let result = {
            let mut resolver =
                CategoryResolver::new(&mut f.store, &f.lexicon, &mut f.speller, &mut prompter);
            resolver.resolve(item)
        };
        assert_eq!(prompter.remaining(), 0, "unused answers for '{}'", item);
        (result, prompter)
    }

    #[test]
    fn synonym_match_is_offered_and_committed() {
        let mut f = fixture();
        let (result, prompter) = resolve(&mut f, "Milk", vec![Answer::Choose("dairy")]);

        let resolution = result.unwrap();
        assert_eq!(resolution.category, "dairy");
        assert_eq!(resolution.key, "Milk");
        assert!(!resolution.remembered);
        assert_eq!(prompter.shown, vec![vec!["dairy".to_string()]]);
        assert_eq!(f.store.item_category("Milk"), Some("dairy"));
    }

    #[test]
    fn second_resolution_never_prompts() {
        let mut f = fixture();
        let (first, _) = resolve(&mut f, "Milk", vec![Answer::Choose("dairy")]);
        let (second, prompter) = resolve(&mut f, "Milk", vec![]);

        let second = second.unwrap();
        assert!(second.remembered);
        assert_eq!(second.category, first.unwrap().category);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn remembered_across_reopen() {
        let mut f = fixture();
        let (_, _) = resolve(&mut f, "Milk", vec![Answer::Choose("dairy")]);
        f.store = CategoryStore::open_in(f.temp.path()).unwrap();
        let (result, _) = resolve(&mut f, "Milk", vec![]);
        assert!(result.unwrap().remembered);
    }

    #[test]
    fn valid_categories_order() {
        let f = fixture();
        let terms: Vec<String> = ["entity", "drink", "meat", "drink", "juice", "plant"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            valid_categories(&f.store, &terms),
            vec!["drink", "meat", "vegetable"]
        );
    }

    #[test]
    fn every_synonym_reaches_its_category() {
        let f = fixture();
        for (hypernym, category) in f.store.category_synonyms() {
            let terms = vec!["entity".to_string(), hypernym.clone()];
            assert!(valid_categories(&f.store, &terms).contains(category));
        }
    }

    #[test]
    fn falls_back_to_terms_when_no_category_matches() {
        let mut f = fixture();
        let (result, prompter) = resolve(&mut f, "Glycerine", vec![Answer::Choose("alcohol")]);

        assert_eq!(result.unwrap().category, "alcohol");
        assert_eq!(
            prompter.shown[0],
            vec!["alcohol", "entity", "glycerin", "glycerine"]
        );
        assert!(f.store.is_known_category("alcohol"));
    }

    #[test]
    fn declined_category_maps_synonym_to_known_category() {
        let mut f = fixture();
        let (result, prompter) = resolve(
            &mut f,
            "Glycerine",
            vec![
                Answer::Decline,
                Answer::Choose("alcohol"),
                Answer::Choose("house_hold"),
            ],
        );

        assert_eq!(result.unwrap().category, "house_hold");
        assert_eq!(prompter.asked.len(), 3);
        assert_eq!(
            f.store.category_synonyms().get("alcohol").map(String::as_str),
            Some("house_hold")
        );
        assert_eq!(f.store.item_category("Glycerine"), Some("house_hold"));
    }

    #[test]
    fn declined_category_accepts_new_category() {
        let mut f = fixture();
        let (result, _) = resolve(
            &mut f,
            "Glycerine",
            vec![
                Answer::Decline,
                Answer::Choose("alcohol"),
                Answer::Decline,
                Answer::Text("Cleaning Products"),
            ],
        );

        assert_eq!(result.unwrap().category, "cleaning_products");
        assert!(f.store.is_known_category("cleaning_products"));
        assert_eq!(
            f.store.category_synonyms().get("alcohol").map(String::as_str),
            Some("cleaning_products")
        );
    }

    #[test]
    fn last_resort_item_category_is_stored_as_synonym() {
        let mut f = fixture();
        let (result, prompter) = resolve(
            &mut f,
            "Glycerine",
            vec![
                Answer::Decline,
                Answer::Choose("glycerin"),
                Answer::Decline,
                Answer::Decline,
                Answer::Text("pharmacy"),
            ],
        );

        assert_eq!(result.unwrap().category, "pharmacy");
        assert_eq!(prompter.asked.last().unwrap(), "Unknown category");
        assert_eq!(
            f.store.category_synonyms().get("glycerin").map(String::as_str),
            Some("pharmacy")
        );
    }

    #[test]
    fn declining_every_synonym_step_is_no_category() {
        let mut f = fixture();
        let (result, _) = resolve(&mut f, "Glycerine", vec![Answer::Decline, Answer::Decline]);

        assert!(matches!(
            result,
            Err(ShoppingError::NoCategoryChosen { ref item }) if item == "Glycerine"
        ));
        assert_eq!(f.store.item_category("Glycerine"), None);
    }

    #[test]
    fn chosen_word_is_expanded() {
        let mut f = fixture();
        let (result, prompter) = resolve(
            &mut f,
            "Sausages pig",
            vec![Answer::Choose("Sausages"), Answer::Choose("meat")],
        );

        let resolution = result.unwrap();
        assert_eq!(resolution.category, "meat");
        assert_eq!(resolution.key, "Sausages_pig");
        assert_eq!(prompter.shown[0], vec!["Sausages", "pig"]);
        assert_eq!(f.store.item_category("Sausages_pig"), Some("meat"));
    }

    #[test]
    fn unknown_chosen_word_asks_for_category() {
        let mut f = fixture();
        let (result, prompter) = resolve(
            &mut f,
            "Marinated gogosari",
            vec![Answer::Choose("gogosari"), Answer::Text("Vegetable")],
        );

        assert_eq!(result.unwrap().category, "vegetable");
        assert_eq!(prompter.asked, vec!["Complex item found", "Unknown category"]);
    }

    #[test]
    fn declined_unknown_category_is_no_category() {
        let mut f = fixture();
        let (result, _) = resolve(
            &mut f,
            "Marinated gogosari",
            vec![Answer::Choose("gogosari"), Answer::Decline],
        );
        assert!(matches!(result, Err(ShoppingError::NoCategoryChosen { .. })));
    }

    #[test]
    fn misspelled_word_is_corrected() {
        let mut f = fixture();
        let (result, prompter) = resolve(
            &mut f,
            "tomatto",
            vec![Answer::Choose("tomato"), Answer::Choose("vegetable")],
        );

        assert_eq!(result.unwrap().category, "vegetable");
        assert_eq!(prompter.shown[0], vec!["tomato", CUSTOM_OPTION]);
        assert_eq!(f.store.item_category("tomatto"), Some("vegetable"));
    }

    #[test]
    fn custom_spelling_of_the_same_word_is_learned() {
        let mut f = fixture();
        let (result, prompter) = resolve(
            &mut f,
            "pastizzi",
            vec![
                Answer::Choose(CUSTOM_OPTION),
                Answer::Text("pastizzi"),
                Answer::Text("snacks"),
            ],
        );

        assert_eq!(result.unwrap().category, "snacks");
        assert_eq!(
            prompter.asked,
            vec!["Unknown word", "Custom value", "Unknown category"]
        );
        assert_eq!(f.speller.suggest("pastizzi"), vec!["pastizzi"]);
        let content = fs::read_to_string(f.temp.path().join("dictionary.txt")).unwrap();
        assert!(content.lines().any(|l| l == "pastizzi"));
    }

    #[test]
    fn custom_spelling_of_another_word_is_not_learned() {
        let mut f = fixture();
        let (result, _) = resolve(
            &mut f,
            "tomatto",
            vec![
                Answer::Decline,
                Answer::Text("tomato"),
                Answer::Choose("vegetable"),
            ],
        );
        assert_eq!(result.unwrap().category, "vegetable");
        assert!(!f.speller.dictionary().contains("tomatto"));
    }

    #[test]
    fn no_spelling_candidates_is_unresolvable() {
        let mut f = fixture();
        let (result, prompter) = resolve(&mut f, "Pop tards", vec![Answer::Decline]);

        assert!(matches!(
            result,
            Err(ShoppingError::UnresolvableWord { ref item }) if item == "Pop tards"
        ));
        assert_eq!(prompter.asked, vec!["Complex item found"]);
        assert_eq!(f.store.item_category("Pop_tards"), None);
    }

    #[test]
    fn declined_custom_spelling_is_unresolvable() {
        let mut f = fixture();
        let (result, _) = resolve(&mut f, "tomatto", vec![Answer::Decline, Answer::Decline]);
        assert!(matches!(result, Err(ShoppingError::UnresolvableWord { .. })));
    }

    #[test]
    fn punctuation_only_item_is_unresolvable() {
        let mut f = fixture();
        let (result, prompter) = resolve(&mut f, " *** ", vec![]);
        assert!(matches!(result, Err(ShoppingError::UnresolvableWord { .. })));
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn failed_item_keeps_earlier_assignments() {
        let mut f = fixture();
        let (_, _) = resolve(&mut f, "Milk", vec![Answer::Choose("dairy")]);
        let (failed, _) = resolve(&mut f, "Pop tards", vec![Answer::Decline]);
        assert!(failed.is_err());

        let reopened = CategoryStore::open_in(f.temp.path()).unwrap();
        assert_eq!(reopened.item_category("Milk"), Some("dairy"));
    }
}
