use crate::{counter::AtomicCounter, site::SiteError};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Mutex, PoisonError},
};
use thiserror::Error;

/// Why a problem did not archive cleanly. Kept per problem for the end-of-run listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("network failure: {0}")]
    Network(String),
    #[error("parse failure: {0}")]
    Parse(String),
    #[error("code extension not found, please add the extension into the language table, lang code [{0}]")]
    UnsupportedLanguage(String),
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("i/o failure: {0}")]
    Io(String),
}

impl From<&SiteError> for Warning {
    fn from(e: &SiteError) -> Self {
        match e {
            SiteError::RequestError(inner) if inner.is_decode() => Warning::Parse(e.to_string()),
            SiteError::RequestError(_)
            | SiteError::StatusError { .. }
            | SiteError::InvalidHeaderError(_) => Warning::Network(e.to_string()),
            SiteError::DeserializeError(_)
            | SiteError::InvalidUrlError(_)
            | SiteError::ParseError(_) => Warning::Parse(e.to_string()),
            SiteError::DecodeError(_) => Warning::Decode(e.to_string()),
        }
    }
}

impl From<std::io::Error> for Warning {
    fn from(e: std::io::Error) -> Self {
        Warning::Io(e.to_string())
    }
}

/// Counters and warnings shared by every archive task of a run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub requested_submissions: AtomicCounter,
    pub dumped_questions: AtomicCounter,
    pub dumped_submissions: AtomicCounter,
    pub skipped_questions: AtomicCounter,
    pub skipped_submissions: AtomicCounter,
    warnings: Mutex<BTreeMap<String, Warning>>,
}

impl RunStats {
    /// Attaches a warning to a problem. A later warning replaces an earlier one.
    pub fn warn(&self, problem_id: &str, warning: Warning) {
        tracing::warn!("question #{}: {}", problem_id, warning);
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(problem_id.to_string(), warning);
    }

    pub fn warnings(&self) -> BTreeMap<String, Warning> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn summary(&self, requested_questions: usize) -> RunSummary {
        RunSummary {
            requested_questions: requested_questions as i64,
            dumped_questions: self.dumped_questions.get(),
            skipped_questions: self.skipped_questions.get(),
            requested_submissions: self.requested_submissions.get(),
            dumped_submissions: self.dumped_submissions.get(),
            skipped_submissions: self.skipped_submissions.get(),
        }
    }
}

/// Snapshot of the counters after every task joined.
///
/// Failures are never counted; they are whatever was requested but neither dumped nor skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub requested_questions: i64,
    pub dumped_questions: i64,
    pub skipped_questions: i64,
    pub requested_submissions: i64,
    pub dumped_submissions: i64,
    pub skipped_submissions: i64,
}

impl RunSummary {
    pub fn failed_questions(&self) -> i64 {
        self.requested_questions - self.dumped_questions - self.skipped_questions
    }

    pub fn failed_submissions(&self) -> i64 {
        self.requested_submissions - self.dumped_submissions - self.skipped_submissions
    }
}

/// Per problem, the languages that have an accepted solution in the dump directory.
#[derive(Debug, Default)]
pub struct Ledger {
    languages: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl Ledger {
    /// Returns false when the pair was already recorded.
    pub fn record(&self, problem_id: &str, language: &str) -> bool {
        self.languages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(problem_id.to_string())
            .or_default()
            .insert(language.to_string())
    }

    pub fn languages(&self, problem_id: &str) -> BTreeSet<String> {
        self.languages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(problem_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every language recorded for any problem.
    pub fn all_languages(&self) -> BTreeSet<String> {
        self.languages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flatten()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{sync::Arc, thread};

    #[test]
    fn failed_counts_are_derived() {
        let stats = RunStats::default();
        stats.requested_submissions.increment(5);
        stats.dumped_submissions.increment(2);
        stats.skipped_submissions.inc();
        stats.dumped_questions.inc();
        stats.skipped_questions.inc();

        let summary = stats.summary(4);

        assert_eq!(summary.failed_submissions(), 2);
        assert_eq!(summary.failed_questions(), 2);
    }

    #[test]
    fn later_warning_replaces_earlier_one() {
        let stats = RunStats::default();
        stats.warn("1", Warning::Network(String::from("timeout")));
        stats.warn("1", Warning::UnsupportedLanguage(String::from("rust")));
        stats.warn("2", Warning::Io(String::from("disk full")));

        let warnings = stats.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings["1"],
            Warning::UnsupportedLanguage(String::from("rust"))
        );
    }

    #[test]
    fn classify_site_errors() {
        let status = SiteError::StatusError {
            status: 500,
            url: String::from("https://leetcode.com/graphql/"),
        };
        assert!(matches!(Warning::from(&status), Warning::Network(_)));
        assert!(matches!(
            Warning::from(&SiteError::ParseError(String::from("no code"))),
            Warning::Parse(_)
        ));
        assert!(matches!(
            Warning::from(&SiteError::DecodeError(String::from("bad escape"))),
            Warning::Decode(_)
        ));
    }

    #[test]
    fn concurrent_ledger_updates_are_not_lost() {
        let ledger = Arc::new(Ledger::default());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for problem in 0..100 {
                        ledger.record(&problem.to_string(), "python3");
                        ledger.record(&problem.to_string(), &format!("lang{}", t));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for problem in 0..100 {
            assert_eq!(ledger.languages(&problem.to_string()).len(), 9);
        }
        assert_eq!(ledger.all_languages().len(), 9);
        assert!(!ledger.record("0", "python3"));
        assert!(ledger.languages("unknown").is_empty());
    }
}
