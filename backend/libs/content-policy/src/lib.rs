//! # Content Policy
//!
//! Banned-term matching shared by the censor service (pre-write gate) and the
//! comments service moderation worker (post-write re-check).
//!
//! Matching is a case-insensitive substring search against a fixed list of terms.
//! Both sides must load the same list so that text accepted by the gate is not
//! later rejected by the worker for a different reason.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Terms rejected when no list is configured
pub const DEFAULT_BANNED_TERMS: &[&str] = &["qwerty", "йцукен", "zxvbnm"];

/// Comma separated list of banned terms
pub const BANNED_TERMS_ENV: &str = "BANNED_TERMS";

/// Path to a file with one banned term per line (`#` starts a comment)
pub const BANNED_TERMS_PATH_ENV: &str = "BANNED_TERMS_PATH";

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Failed to load banned terms from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Banned term list is empty")]
    Empty,
}

/// Outcome of checking a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Clean,
    /// Text contains the given (lowercased) term
    Banned(String),
}

impl Verdict {
    pub fn is_clean(&self) -> bool {
        matches!(self, Verdict::Clean)
    }
}

/// Lowercased list of banned terms
#[derive(Debug, Clone)]
pub struct BannedTerms {
    terms: Vec<String>,
}

impl Default for BannedTerms {
    fn default() -> Self {
        Self::from_list(DEFAULT_BANNED_TERMS.iter().copied())
    }
}

impl BannedTerms {
    /// Build from an iterator of terms. Blank entries are skipped.
    pub fn from_list<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort();
        terms.dedup();

        Self { terms }
    }

    /// Load from a file with one term per line
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| PolicyError::Load {
            path: path.as_ref().display().to_string(),
            source,
        })?;

        let terms = Self::from_list(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );

        if terms.is_empty() {
            return Err(PolicyError::Empty);
        }

        Ok(terms)
    }

    /// Resolve the list from configuration lookups.
    ///
    /// Priority: `BANNED_TERMS_PATH` file, then `BANNED_TERMS` list, then the defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, PolicyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(BANNED_TERMS_PATH_ENV) {
            let terms = Self::from_file(&path)?;
            tracing::info!(path = %path, count = terms.len(), "Loaded banned terms from file");
            return Ok(terms);
        }

        if let Some(list) = lookup(BANNED_TERMS_ENV) {
            let terms = Self::from_list(list.split(','));
            if terms.is_empty() {
                return Err(PolicyError::Empty);
            }
            return Ok(terms);
        }

        Ok(Self::default())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check text against the list
    pub fn check(&self, text: &str) -> Verdict {
        if text.is_empty() {
            return Verdict::Clean;
        }

        let normalized = text.to_lowercase();
        match self.terms.iter().find(|term| normalized.contains(term.as_str())) {
            Some(term) => {
                tracing::debug!(term = %term, "Text matched banned term");
                Verdict::Banned(term.clone())
            }
            None => Verdict::Clean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_terms() {
        let terms = BannedTerms::default();
        assert_eq!(terms.len(), 3);
        assert_eq!(terms.check("qwerty"), Verdict::Banned("qwerty".into()));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let terms = BannedTerms::default();

        assert_eq!(terms.check("QWERTY"), Verdict::Banned("qwerty".into()));
        assert_eq!(terms.check("my qwerty keyboard"), Verdict::Banned("qwerty".into()));
        assert_eq!(terms.check("xxQwErTyxx"), Verdict::Banned("qwerty".into()));
        assert_eq!(terms.check("ЙЦУКЕН"), Verdict::Banned("йцукен".into()));
    }

    #[test]
    fn test_clean_text() {
        let terms = BannedTerms::default();

        assert!(terms.check("A perfectly polite comment").is_clean());
        assert!(terms.check("").is_clean());
        assert!(terms.check("qwert y").is_clean());
    }

    #[test]
    fn test_from_list_normalizes() {
        let terms = BannedTerms::from_list([" Spam ", "", "SPAM", "scam"]);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms.check("no SPAM here"), Verdict::Banned("spam".into()));
        assert_eq!(terms.check("a scam"), Verdict::Banned("scam".into()));
    }

    #[test]
    fn test_from_file_skips_comments_and_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "badword").unwrap();
        writeln!(file, "# Comment line").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Offensive").unwrap();

        let terms = BannedTerms::from_file(file.path()).unwrap();
        assert_eq!(terms.len(), 2);
        assert!(!terms.check("so OFFENSIVE").is_clean());
    }

    #[test]
    fn test_from_file_missing() {
        let err = BannedTerms::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, PolicyError::Load { .. }));
    }

    #[test]
    fn test_from_vars_priority() {
        let vars: HashMap<&str, &str> = HashMap::from([("BANNED_TERMS", "foo, bar")]);
        let terms = BannedTerms::from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(terms.len(), 2);
        assert!(!terms.check("FOO fighters").is_clean());
        assert!(terms.check("qwerty").is_clean());

        let defaults = BannedTerms::from_vars(|_| None).unwrap();
        assert_eq!(defaults.len(), 3);

        let empty: HashMap<&str, &str> = HashMap::from([("BANNED_TERMS", " , ")]);
        assert!(matches!(
            BannedTerms::from_vars(|k| empty.get(k).map(|v| v.to_string())),
            Err(PolicyError::Empty)
        ));
    }
}
