//! WordNet lexical base
//!
//! Reads the plain-text WordNet database (`index.*`, `data.*`, `*.exc`) into
//! memory and answers sense and hypernym queries. Noun and verb files are
//! required; adjective and adverb files are loaded when present. Adjective and
//! adverb senses have no hypernyms, so each is its own single-sense path.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, ShoppingError};

use super::{LexicalBase, PartOfSpeech, Sense};

/// Default download location of the WordNet database files
pub const DEFAULT_WORDNET_URL: &str = "https://wordnetcode.princeton.edu/wn3.1.dict.tar.gz";

/// Files that must be present in the dataset directory; `*.adj` and `*.adv`
/// are optional
pub const REQUIRED_FILES: &[&str] = &["index.noun", "data.noun", "index.verb", "data.verb"];

const HYPERNYM: &str = "@";
const INSTANCE_HYPERNYM: &str = "@i";

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const ADJECTIVE_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

#[derive(Debug, Default)]
struct Synset {
    names: Vec<String>,
    hypernyms: Vec<Sense>,
}

/// In-memory WordNet database
#[derive(Debug)]
pub struct WordNet {
    dir: PathBuf,
    index: HashMap<PartOfSpeech, HashMap<String, Vec<u64>>>,
    exceptions: HashMap<PartOfSpeech, HashMap<String, Vec<String>>>,
    synsets: HashMap<Sense, Synset>,
}

impl WordNet {
    /// Dataset directory inside a base directory
    pub fn default_dir(base_dir: &Path) -> PathBuf {
        base_dir.join("wordnet").join("dict")
    }

    /// Check that every required file exists without loading anything
    pub fn check(dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(ShoppingError::DatasetMissing {
                path: dir.to_path_buf(),
            });
        }
        for file in REQUIRED_FILES {
            let path = dir.join(file);
            if !path.is_file() {
                return Err(ShoppingError::DatasetMissing { path });
            }
        }
        Ok(())
    }

    /// Load the database from a `dict` directory
    pub fn open(dir: &Path) -> Result<Self> {
        Self::check(dir)?;

        let mut wordnet = Self {
            dir: dir.to_path_buf(),
            index: HashMap::new(),
            exceptions: HashMap::new(),
            synsets: HashMap::new(),
        };

        for &pos in PartOfSpeech::all() {
            let suffix = pos.file_suffix();
            let index_path = dir.join(format!("index.{}", suffix));
            let data_path = dir.join(format!("data.{}", suffix));
            if !index_path.is_file() || !data_path.is_file() {
                tracing::debug!(pos = suffix, "part of speech not in dataset");
                continue;
            }
            wordnet.index.insert(pos, parse_index(&index_path)?);
            parse_data(&data_path, pos, &mut wordnet.synsets)?;

            let exc_path = dir.join(format!("{}.exc", suffix));
            let exceptions = if exc_path.is_file() {
                parse_exceptions(&exc_path)?
            } else {
                HashMap::new()
            };
            wordnet.exceptions.insert(pos, exceptions);
        }

        tracing::debug!(
            dir = %dir.display(),
            synsets = wordnet.synsets.len(),
            "loaded WordNet"
        );
        Ok(wordnet)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every lemma in the index, all parts of speech, sorted
    pub fn lemmas(&self) -> Vec<String> {
        let mut lemmas: Vec<String> = self
            .index
            .values()
            .flat_map(|index| index.keys().cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        lemmas.sort();
        lemmas
    }

    /// Base forms of `form` that are present in the index
    fn base_forms(&self, form: &str, pos: PartOfSpeech) -> Vec<String> {
        let Some(index) = self.index.get(&pos) else {
            return Vec::new();
        };
        let rules = match pos {
            PartOfSpeech::Noun => NOUN_RULES,
            PartOfSpeech::Verb => VERB_RULES,
            PartOfSpeech::Adjective => ADJECTIVE_RULES,
            PartOfSpeech::Adverb => &[],
        };

        let known = |forms: Vec<String>| -> Vec<String> {
            let mut seen = HashSet::new();
            forms
                .into_iter()
                .filter(|f| index.contains_key(f) && seen.insert(f.clone()))
                .collect()
        };

        if let Some(bases) = self.exceptions.get(&pos).and_then(|e| e.get(form)) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return known(forms);
        }

        let mut forms = apply_rules(&[form.to_string()], rules);
        let mut candidates = vec![form.to_string()];
        candidates.extend(forms.iter().cloned());
        let results = known(candidates);
        if !results.is_empty() {
            return results;
        }

        // every rule but "men" shortens the form, so this is bounded anyway
        let mut rounds = form.len();
        while !forms.is_empty() && rounds > 0 {
            forms = apply_rules(&forms, rules);
            let results = known(forms.clone());
            if !results.is_empty() {
                return results;
            }
            rounds -= 1;
        }
        Vec::new()
    }

    fn paths_to(&self, sense: Sense, visiting: &mut Vec<Sense>) -> Vec<Vec<Sense>> {
        visiting.push(sense);
        let hypernyms: Vec<Sense> = self
            .synsets
            .get(&sense)
            .map(|s| {
                s.hypernyms
                    .iter()
                    .filter(|h| !visiting.contains(h))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        let paths = if hypernyms.is_empty() {
            vec![vec![sense]]
        } else {
            let mut paths = Vec::new();
            for hypernym in hypernyms {
                for mut path in self.paths_to(hypernym, visiting) {
                    path.push(sense);
                    paths.push(path);
                }
            }
            paths
        };
        visiting.pop();
        paths
    }
}

impl LexicalBase for WordNet {
    fn senses_of(&self, word: &str) -> Vec<Sense> {
        let lemma = word.trim().to_lowercase().replace(' ', "_");
        if lemma.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut senses = Vec::new();
        for &pos in PartOfSpeech::all() {
            for form in self.base_forms(&lemma, pos) {
                let offsets = self
                    .index
                    .get(&pos)
                    .and_then(|index| index.get(&form))
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                for &offset in offsets {
                    let sense = Sense::new(pos, offset);
                    if seen.insert(sense) {
                        senses.push(sense);
                    }
                }
            }
        }
        senses
    }

    fn generalization_paths(&self, sense: &Sense) -> Vec<Vec<Sense>> {
        self.paths_to(*sense, &mut Vec::new())
    }

    fn names_of(&self, sense: &Sense) -> Vec<String> {
        self.synsets
            .get(sense)
            .map(|s| s.names.clone())
            .unwrap_or_default()
    }
}

fn apply_rules(forms: &[String], rules: &[(&str, &str)]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            rules.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old)
                    .map(|stem| format!("{}{}", stem, new))
            })
        })
        .collect()
}

fn invalid(path: &Path, line: usize, message: impl Into<String>) -> ShoppingError {
    ShoppingError::InvalidDataset {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

/// License header lines start with whitespace
fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(' '))
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt [synset_offset...]`
fn parse_index(path: &Path) -> Result<HashMap<String, Vec<u64>>> {
    let content = fs::read_to_string(path)?;
    let mut index = HashMap::new();

    for (n, line) in data_lines(&content) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(invalid(path, n, "too few fields"));
        }
        let synset_cnt: usize = fields[2]
            .parse()
            .map_err(|_| invalid(path, n, "bad synset count"))?;
        let p_cnt: usize = fields[3]
            .parse()
            .map_err(|_| invalid(path, n, "bad pointer count"))?;
        if fields.len() != 4 + p_cnt + 2 + synset_cnt {
            return Err(invalid(path, n, "field count mismatch"));
        }

        let offsets = fields[fields.len() - synset_cnt..]
            .iter()
            .map(|f| f.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| invalid(path, n, "bad synset offset"))?;
        index.insert(fields[0].to_string(), offsets);
    }

    Ok(index)
}

/// `offset lex_filenum ss_type w_cnt [word lex_id...] p_cnt [ptr...] ... | gloss`
fn parse_data(path: &Path, pos: PartOfSpeech, synsets: &mut HashMap<Sense, Synset>) -> Result<()> {
    let content = fs::read_to_string(path)?;

    for (n, line) in data_lines(&content) {
        let body = line.split('|').next().unwrap_or_default();
        let fields: Vec<&str> = body.split_whitespace().collect();
        let field = |i: usize| {
            fields
                .get(i)
                .copied()
                .ok_or_else(|| invalid(path, n, format!("missing field {}", i)))
        };

        let offset: u64 = field(0)?
            .parse()
            .map_err(|_| invalid(path, n, "bad offset"))?;
        let w_cnt = usize::from_str_radix(field(3)?, 16)
            .map_err(|_| invalid(path, n, "bad word count"))?;

        let mut synset = Synset::default();
        for i in 0..w_cnt {
            synset.names.push(strip_marker(field(4 + 2 * i)?).to_string());
        }

        let p_start = 4 + 2 * w_cnt;
        let p_cnt: usize = field(p_start)?
            .parse()
            .map_err(|_| invalid(path, n, "bad pointer count"))?;
        for i in 0..p_cnt {
            let base = p_start + 1 + 4 * i;
            let symbol = field(base)?;
            if symbol != HYPERNYM && symbol != INSTANCE_HYPERNYM {
                continue;
            }
            let target: u64 = field(base + 1)?
                .parse()
                .map_err(|_| invalid(path, n, "bad pointer offset"))?;
            let target_pos = PartOfSpeech::from_marker(field(base + 2)?)
                .ok_or_else(|| invalid(path, n, "bad pointer part of speech"))?;
            synset.hypernyms.push(Sense::new(target_pos, target));
        }

        synsets.insert(Sense::new(pos, offset), synset);
    }

    Ok(())
}

/// `inflected base [base...]`
fn parse_exceptions(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            let inflected = words.next()?;
            Some((inflected.to_string(), words.map(str::to_string).collect()))
        })
        .collect())
}

/// Adjective lemmas carry a syntactic marker: `galore(ip)`
fn strip_marker(word: &str) -> &str {
    match word.find('(') {
        Some(idx) if word.ends_with(')') => &word[..idx],
        _ => word,
    }
}

/// Download and unpack the dataset into `dest`; returns the `dict` directory
pub fn fetch_dataset(url: &str, dest: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dest)?;
    let archive = dest.join("wordnet.tar.gz");

    let output = Command::new("curl")
        .args(["-fsSL", "-o"])
        .arg(&archive)
        .arg(url)
        .output()
        .map_err(|e| ShoppingError::DatasetFetch {
            message: format!("Failed to run curl: {}", e),
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ShoppingError::DatasetFetch {
            message: format!("download of {} failed: {}", url, stderr),
        });
    }

    let output = Command::new("tar")
        .arg("-xzf")
        .arg(&archive)
        .arg("-C")
        .arg(dest)
        .output()
        .map_err(|e| ShoppingError::DatasetFetch {
            message: format!("Failed to run tar: {}", e),
        })?;
    fs::remove_file(&archive)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ShoppingError::DatasetFetch {
            message: format!("extraction failed: {}", stderr),
        });
    }

    let dict = dest.join("dict");
    WordNet::check(&dict)?;
    tracing::info!(dir = %dict.display(), "fetched WordNet dataset");
    Ok(dict)
}
