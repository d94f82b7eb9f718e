use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Easy", alias = "EASY", alias = "easy")]
    Easy,
    #[serde(rename = "Medium", alias = "MEDIUM", alias = "medium")]
    Medium,
    #[serde(rename = "Hard", alias = "HARD", alias = "hard")]
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Solve state of a problem for the signed-in user. A missing status means untried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    #[serde(rename = "ac", alias = "AC")]
    Accepted,
    #[serde(rename = "notac", alias = "TRIED")]
    NotAccepted,
    #[serde(rename = "NOT_STARTED")]
    Untried,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Position of the problem in the site's canonical ordering, assigned while paging.
    #[serde(skip)]
    pub ordinal: usize,
    pub frontend_question_id: String,
    pub title: String,
    pub title_slug: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub paid_only: bool,
    #[serde(default)]
    pub ac_rate: f64,
    #[serde(default)]
    pub status: Option<SolveStatus>,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
}

impl Problem {
    pub fn is_accepted(&self) -> bool {
        self.status == Some(SolveStatus::Accepted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub status_display: String,
    pub lang: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Detail page path. Only the international site links to one.
    #[serde(default)]
    pub url: Option<String>,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.status_display == "Accepted"
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ProblemCount {
    pub num_total: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemsetQuestionListData {
    pub problemset_question_list: QuestionList,
}

#[derive(Debug, Deserialize)]
pub struct QuestionList {
    pub questions: Vec<Problem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListData {
    pub submission_list: SubmissionList,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionList {
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetailData {
    pub submission_detail: Option<SubmissionDetail>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionDetail {
    pub code: String,
}
