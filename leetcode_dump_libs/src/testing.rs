//! In-memory site used by the catalog and archiver tests.

use crate::site::{
    model::{Difficulty, Problem, SolveStatus, Submission},
    Region, Result, SiteAdapter, SiteError,
};
use async_trait::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
};

#[derive(Default)]
pub struct FakeSite {
    pub problems: Vec<Problem>,
    pub failing_pages: HashSet<usize>,
    pub failing_slugs: HashSet<String>,
    pub submissions: HashMap<String, Vec<Submission>>,
    pub sources: HashMap<String, String>,
    pub source_requests: AtomicUsize,
}

#[async_trait]
impl SiteAdapter for FakeSite {
    fn region(&self) -> Region {
        Region::International
    }

    async fn count_problems(&self) -> Result<usize> {
        Ok(self.problems.len())
    }

    async fn list_problems_page(&self, offset: usize, limit: usize) -> Result<Vec<Problem>> {
        tokio::task::yield_now().await;
        if self.failing_pages.contains(&offset) {
            return Err(status_error(500));
        }

        Ok(self
            .problems
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_submissions(&self, title_slug: &str) -> Result<Vec<Submission>> {
        tokio::task::yield_now().await;
        if self.failing_slugs.contains(title_slug) {
            return Err(status_error(502));
        }

        Ok(self.submissions.get(title_slug).cloned().unwrap_or_default())
    }

    async fn fetch_submission_source(&self, submission: &Submission) -> Result<String> {
        self.source_requests.fetch_add(1, Ordering::SeqCst);
        self.sources
            .get(&submission.id)
            .cloned()
            .ok_or_else(|| status_error(404))
    }
}

fn status_error(status: u16) -> SiteError {
    SiteError::StatusError {
        status,
        url: String::from("fake://site"),
    }
}

pub fn problem(id: &str, difficulty: Difficulty, status: Option<SolveStatus>) -> Problem {
    Problem {
        ordinal: 0,
        frontend_question_id: id.to_string(),
        title: format!("Problem {}", id),
        title_slug: format!("problem-{}", id),
        difficulty,
        paid_only: false,
        ac_rate: 50.0,
        status,
        topic_tags: Vec::new(),
    }
}

pub fn submission(id: &str, lang: &str, status_display: &str) -> Submission {
    Submission {
        id: id.to_string(),
        status_display: status_display.to_string(),
        lang: lang.to_string(),
        timestamp: None,
        url: Some(format!("/submissions/detail/{}/", id)),
    }
}
