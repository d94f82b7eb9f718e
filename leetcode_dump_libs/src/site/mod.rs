pub mod china;
pub mod client;
pub mod international;
pub mod model;

use crate::site::{
    china::ChinaSite,
    client::SiteClient,
    international::InternationalSite,
    model::{Problem, Submission},
};
use async_trait::async_trait;
use std::{fmt, sync::Arc, time::Duration};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to request to the site: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data: {0}")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid site url given: {0}")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("invalid header value given: {0}")]
    InvalidHeaderError(#[from] reqwest::header::InvalidHeaderValue),
    #[error("unexpected status [{status}] returned from {url}")]
    StatusError { status: u16, url: String },
    #[error("{0}")]
    ParseError(String),
    #[error("{0}")]
    DecodeError(String),
}

/// Which deployment of the site the run talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Region {
    #[default]
    International,
    China,
}

impl Region {
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::International => "https://leetcode.com",
            Region::China => "https://leetcode.cn",
        }
    }

    /// Short label used in report links.
    pub fn domain(&self) -> &'static str {
        match self {
            Region::International => "com",
            Region::China => "cn",
        }
    }

    pub fn dump_dir(&self) -> &'static str {
        match self {
            Region::International => "./dump/",
            Region::China => "./dump-cn/",
        }
    }

    /// Converts a problem's raw `acRate` into a ratio in `[0, 1]`.
    ///
    /// The international site reports a percentage, the China site a ratio.
    pub fn acceptance_ratio(&self, ac_rate: f64) -> f64 {
        match self {
            Region::International => ac_rate / 100.0,
            Region::China => ac_rate,
        }
    }

    /// Builds the site adapter for this region against its public endpoint.
    pub fn connect(&self, cookie: &str, timeout: Option<Duration>) -> Result<Arc<dyn SiteAdapter>> {
        self.connect_to(self.base_url(), cookie, timeout)
    }

    pub fn connect_to(
        &self,
        base_url: &str,
        cookie: &str,
        timeout: Option<Duration>,
    ) -> Result<Arc<dyn SiteAdapter>> {
        let client = SiteClient::new(base_url, cookie, timeout)?;
        let site: Arc<dyn SiteAdapter> = match self {
            Region::International => Arc::new(InternationalSite::new(client)),
            Region::China => Arc::new(ChinaSite::new(client)),
        };
        Ok(site)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Region::International => write!(f, "LeetCode International"),
            Region::China => write!(f, "LeetCode China"),
        }
    }
}

/// Region-specific access to the site.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn region(&self) -> Region;

    /// Total number of problems on the site.
    async fn count_problems(&self) -> Result<usize>;

    /// Problems `[offset, offset + limit)` in canonical order. Ordinals are left unset.
    async fn list_problems_page(&self, offset: usize, limit: usize) -> Result<Vec<Problem>>;

    /// Most recent submissions of the signed-in user for a problem, newest first.
    async fn list_submissions(&self, title_slug: &str) -> Result<Vec<Submission>>;

    /// Full source code of a submission.
    async fn fetch_submission_source(&self, submission: &Submission) -> Result<String>;
}
