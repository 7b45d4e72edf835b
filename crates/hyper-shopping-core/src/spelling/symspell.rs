use std::collections::{HashMap, HashSet};

/// Symmetric delete index: every word is stored under all of its delete
/// variants up to `max_edit_distance`, so lookup cost depends on the input
/// length rather than on the dictionary size.
#[derive(Debug, Clone)]
pub struct SymSpell {
    deletes: HashMap<String, HashSet<String>>,
    max_edit_distance: usize,
}

impl SymSpell {
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            deletes: HashMap::new(),
            max_edit_distance,
        }
    }

    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    pub fn add_word(&mut self, word: &str) {
        for edit in self.generate_edits(word) {
            self.deletes.entry(edit).or_default().insert(word.to_string());
        }
    }

    /// Words sharing a delete variant with `input`. A superset of the words
    /// within `max_edit_distance`; callers verify the real distance.
    pub fn lookup(&self, input: &str) -> HashSet<&str> {
        self.generate_edits(input)
            .iter()
            .filter_map(|edit| self.deletes.get(edit))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    fn generate_edits(&self, word: &str) -> HashSet<String> {
        let mut edits = HashSet::new();
        edits.insert(word.to_string());

        let mut current = edits.clone();
        for _ in 0..self.max_edit_distance {
            let mut next = HashSet::new();
            for edit in &current {
                let chars: Vec<char> = edit.chars().collect();
                for i in 0..chars.len() {
                    let variant: String = chars
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, c)| *c)
                        .collect();
                    next.insert(variant);
                }
            }
            edits.extend(next.iter().cloned());
            current = next;
        }

        edits
    }
}
