//! Supervisor column discovery
//!
//! Header text varies between exports ("Team Leader", "team_leader",
//! "Supervisor Name", ...), so the column is located by a case-insensitive
//! substring scan against a vocabulary rather than by exact name.

use serde::Deserialize;

/// Header terms that identify the supervisor column
pub const DEFAULT_VOCABULARY: [&str; 4] =
    ["team leader", "team_leader", "teamleader", "supervisor"];

/// Lower-cased header terms, matched as substrings
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether a header names the supervisor column
    pub fn matches(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.terms.iter().any(|term| header.contains(term.as_str()))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY)
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        Self::new(terms)
    }
}

/// Index of the leftmost header matching the vocabulary
pub fn resolve_supervisor_column<S: AsRef<str>>(
    headers: &[S],
    vocabulary: &Vocabulary,
) -> Option<usize> {
    headers
        .iter()
        .position(|header| vocabulary.matches(header.as_ref()))
}
