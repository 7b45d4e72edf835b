//! # Spelling Module
//!
//! Spelling suggestions for words the lexical base does not know.
//!
//! The dictionary is a user-editable word list. Each line is a
//! `word<TAB>count` entry, a `word count` pair, or free text whose words are
//! counted. Words the user confirms are appended as tab entries so the next
//! run knows them exactly as typed.

mod symspell;

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use symspell::SymSpell;

/// Default maximum edit distance for suggestions
pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;

/// Word frequencies backed by a text file
#[derive(Debug, Clone)]
pub struct SpellingDictionary {
    path: PathBuf,
    frequencies: HashMap<String, u64>,
}

impl SpellingDictionary {
    /// Load the word list, creating an empty file when it does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&path)?;
            tracing::info!(path = %path.display(), "created spelling dictionary");
        }

        let content = fs::read_to_string(&path)?;
        let mut frequencies = HashMap::new();
        for line in content.lines() {
            if let Some((word, count)) = counted_entry(line) {
                *frequencies.entry(word).or_insert(0) += count;
                continue;
            }
            for word in tokenize(line) {
                *frequencies.entry(word).or_insert(0) += 1;
            }
        }

        Ok(Self { path, frequencies })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    pub fn frequency(&self, word: &str) -> u64 {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.frequencies.keys().map(String::as_str)
    }

    /// Add a word in memory only
    fn insert(&mut self, word: &str) -> bool {
        let entry = self.frequencies.entry(word.to_string()).or_insert(0);
        *entry += 1;
        *entry == 1
    }

    /// Add a word and append it to the file as a tab-separated entry
    pub fn learn(&mut self, word: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}\t1", word)?;
        self.insert(word);
        Ok(())
    }
}

/// `word<TAB>count` keeps the word verbatim (digits, spaces and all);
/// `word count` is accepted for single-token words
fn counted_entry(line: &str) -> Option<(String, u64)> {
    let (word, count) = match line.rsplit_once('\t') {
        Some((word, count)) => (word.trim(), count.trim()),
        None => match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [word, count] => (*word, *count),
            _ => return None,
        },
    };
    let count = count.parse::<u64>().ok()?;
    (!word.is_empty()).then(|| (word.to_lowercase(), count))
}

/// Lower-cased alphabetic words of a line
fn tokenize(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Suggests corrections from a [`SpellingDictionary`]
#[derive(Debug)]
pub struct SpellingAdvisor {
    dictionary: SpellingDictionary,
    index: SymSpell,
}

impl SpellingAdvisor {
    pub fn new(dictionary: SpellingDictionary, max_edit_distance: usize) -> Self {
        let mut index = SymSpell::new(max_edit_distance);
        for word in dictionary.words() {
            index.add_word(word);
        }
        Self { dictionary, index }
    }

    pub fn dictionary(&self) -> &SpellingDictionary {
        &self.dictionary
    }

    /// Seed extra known words without writing them to the word list
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().to_lowercase();
            if self.dictionary.insert(&word) {
                self.index.add_word(&word);
            }
        }
    }

    /// Candidate spellings for `word`.
    ///
    /// A known word is its own only candidate. Otherwise the dictionary words
    /// at the smallest edit distance are returned, most frequent first.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Vec::new();
        }
        if self.dictionary.contains(&word) {
            return vec![word];
        }

        let scored: Vec<(usize, &str)> = self
            .index
            .lookup(&word)
            .into_iter()
            .map(|candidate| (strsim::osa_distance(&word, candidate), candidate))
            .filter(|(distance, _)| *distance <= self.index.max_edit_distance())
            .collect();

        let Some(best) = scored.iter().map(|(d, _)| *d).min() else {
            return Vec::new();
        };

        let mut suggestions: Vec<&str> = scored
            .into_iter()
            .filter(|(d, _)| *d == best)
            .map(|(_, w)| w)
            .collect();
        suggestions.sort_by(|a, b| {
            self.dictionary
                .frequency(b)
                .cmp(&self.dictionary.frequency(a))
                .then_with(|| a.cmp(b))
        });
        suggestions.into_iter().map(str::to_string).collect()
    }

    /// Remember a word permanently
    pub fn learn(&mut self, word: &str) -> Result<()> {
        let word = word.trim().to_lowercase();
        let is_new = !self.dictionary.contains(&word);
        self.dictionary.learn(&word)?;
        if is_new {
            self.index.add_word(&word);
        }
        tracing::info!(word = %word, "learned dictionary word");
        Ok(())
    }
}
