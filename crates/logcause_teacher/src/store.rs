//! Configuration store: parser naming and rule persistence.
//!
//! The teacher never touches files or the network itself. It asks a
//! [`ConfigStore`] to propose parser names and to persist finished rules.

use std::collections::BTreeSet;

use logcause_foundation::{Error, ErrorKind, Result};
use logcause_pattern::spans_from_regex;

use crate::intent::RuleIntent;
use crate::serialize;

const FALLBACK_NAME: &str = "parser";
const NAME_WORDS: usize = 3;
const MIN_WORD_LEN: usize = 3;

/// Collaborator that names parsers and stores rules.
pub trait ConfigStore {
    /// Returns true if `name` is neither in `blacklist` nor otherwise taken.
    fn is_free_parser_name(&self, name: &str, blacklist: &BTreeSet<String>) -> bool {
        !blacklist.contains(name)
    }

    /// Proposes a parser name for a line that is free under
    /// [`is_free_parser_name`](Self::is_free_parser_name).
    fn propose_parser_name(
        &self,
        line_text: &str,
        pattern: &str,
        blacklist: &BTreeSet<String>,
    ) -> String {
        propose_name(line_text, pattern, |name| {
            self.is_free_parser_name(name, blacklist)
        })
    }

    /// Persists a validated rule.
    ///
    /// # Errors
    ///
    /// Implementation defined; the teacher passes the error through.
    fn add_rule(&mut self, rule: &RuleIntent) -> Result<()>;
}

/// Builds a parser name from the literal words of `line_text`.
///
/// Up to three lowercase words of at least three letters are taken from
/// the parts of the line that `pattern` does not capture and joined with
/// `_`. Without such words the name is `parser`. A numeric suffix
/// (`_2`, `_3`, ...) is appended until `is_free` accepts the name.
pub fn propose_name(line_text: &str, pattern: &str, is_free: impl Fn(&str) -> bool) -> String {
    let base = name_base(&literal_text(line_text, pattern));
    if is_free(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{base}_{suffix}");
        if is_free(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// The line with every captured span blanked out. A pattern that does not
/// match leaves the whole line literal.
fn literal_text(line_text: &str, pattern: &str) -> String {
    let Ok(spans) = spans_from_regex(pattern, line_text) else {
        return line_text.to_string();
    };
    line_text
        .char_indices()
        .map(|(offset, c)| {
            if spans.iter().any(|span| (span.start..span.end).contains(&offset)) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn name_base(literal: &str) -> String {
    let words: Vec<String> = literal
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .take(NAME_WORDS)
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        words.join("_")
    }
}

/// In-memory [`ConfigStore`].
///
/// Saved rules are kept `MessagePack` encoded, as they would be on disk.
/// Parser names of saved rules are taken for every later session.
#[derive(Clone, Debug, Default)]
pub struct MemoryConfigStore {
    rules: Vec<Vec<u8>>,
    parser_names: BTreeSet<String>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Decodes every saved rule, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error if a stored rule does not decode.
    pub fn rules(&self) -> Result<Vec<RuleIntent>> {
        self.rules.iter().map(|bytes| serialize::from_bytes(bytes)).collect()
    }

    /// Names of all parsers in saved rules.
    #[must_use]
    pub fn parser_names(&self) -> &BTreeSet<String> {
        &self.parser_names
    }
}

impl ConfigStore for MemoryConfigStore {
    fn is_free_parser_name(&self, name: &str, blacklist: &BTreeSet<String>) -> bool {
        !blacklist.contains(name) && !self.parser_names.contains(name)
    }

    fn add_rule(&mut self, rule: &RuleIntent) -> Result<()> {
        if let Some(taken) = rule
            .parser_names()
            .into_iter()
            .find(|name| self.parser_names.contains(*name))
        {
            return Err(Error::new(ErrorKind::ConfigStore(format!(
                "parser name already registered: {taken}"
            ))));
        }
        let bytes = serialize::to_bytes(rule)?;
        self.rules.push(bytes);
        self.parser_names
            .extend(rule.parser_names().into_iter().map(str::to_string));
        tracing::debug!(rules = self.rules.len(), "stored rule");
        Ok(())
    }
}
