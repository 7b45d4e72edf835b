//! Test doubles shared by the unit tests

use std::collections::{HashMap, VecDeque};

use crate::error::Result;
use crate::lexical::{LexicalBase, PartOfSpeech, Sense};
use crate::prompt::{Prompt, Prompter};

/// Hand-built sense graph
#[derive(Debug, Default)]
pub struct MemoryLexicon {
    words: HashMap<String, Vec<u64>>,
    names: HashMap<u64, Vec<String>>,
    parents: HashMap<u64, Vec<u64>>,
}

impl MemoryLexicon {
    pub fn sense(&mut self, offset: u64, names: &[&str], parents: &[u64]) -> &mut Self {
        self.names
            .insert(offset, names.iter().map(|n| n.to_string()).collect());
        self.parents.insert(offset, parents.to_vec());
        self
    }

    pub fn word(&mut self, word: &str, senses: &[u64]) -> &mut Self {
        self.words.insert(word.to_string(), senses.to_vec());
        self
    }
}

impl LexicalBase for MemoryLexicon {
    fn senses_of(&self, word: &str) -> Vec<Sense> {
        self.words
            .get(&word.to_lowercase())
            .map(|offsets| {
                offsets
                    .iter()
                    .map(|&o| Sense::new(PartOfSpeech::Noun, o))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn generalization_paths(&self, sense: &Sense) -> Vec<Vec<Sense>> {
        let parents = self.parents.get(&sense.offset).cloned().unwrap_or_default();
        if parents.is_empty() {
            return vec![vec![*sense]];
        }
        parents
            .into_iter()
            .flat_map(|p| self.generalization_paths(&Sense::new(PartOfSpeech::Noun, p)))
            .map(|mut path| {
                path.push(*sense);
                path
            })
            .collect()
    }

    fn names_of(&self, sense: &Sense) -> Vec<String> {
        self.names.get(&sense.offset).cloned().unwrap_or_default()
    }
}

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Answer {
    Choose(&'static str),
    Text(&'static str),
    Yes,
    Decline,
}

/// Replays answers in order and records the options it was shown
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
    pub shown: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: Prompt<'_>) -> Answer {
        self.asked.push(prompt.title.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {}", prompt.title))
    }
}

impl Prompter for ScriptedPrompter {
    fn choose_one(&mut self, prompt: Prompt<'_>, options: &[String]) -> Result<Option<String>> {
        self.shown.push(options.to_vec());
        match self.next(prompt) {
            Answer::Choose(choice) => {
                assert!(
                    options.iter().any(|o| o == choice),
                    "'{}' is not among {:?}",
                    choice,
                    options
                );
                Ok(Some(choice.to_string()))
            }
            Answer::Decline => Ok(None),
            other => panic!("expected a choice for '{}', got {:?}", prompt.title, other),
        }
    }

    fn ask_text(&mut self, prompt: Prompt<'_>) -> Result<Option<String>> {
        match self.next(prompt) {
            Answer::Text(text) => Ok(Some(text.to_string())),
            Answer::Decline => Ok(None),
            other => panic!("expected text for '{}', got {:?}", prompt.title, other),
        }
    }

    fn confirm(&mut self, prompt: Prompt<'_>) -> Result<bool> {
        match self.next(prompt) {
            Answer::Yes => Ok(true),
            Answer::Decline => Ok(false),
            other => panic!("expected yes/no for '{}', got {:?}", prompt.title, other),
        }
    }
}
