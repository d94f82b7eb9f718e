use crate::site::{
    client::SiteClient,
    model::{Problem, Submission, SubmissionDetailData},
    Region, Result, SiteAdapter, SiteError,
};
use async_trait::async_trait;
use serde_json::json;

const PROBLEM_LIST_QUERY: &str = r#"query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList(
    categorySlug: $categorySlug
    limit: $limit
    skip: $skip
    filters: $filters
  ) {
    hasMore
    total
    questions {
      acRate
      difficulty
      frontendQuestionId
      paidOnly
      status
      title
      titleCn
      titleSlug
      topicTags {
        name
        nameTranslated
        id
        slug
      }
    }
  }
}
"#;

const SUBMISSION_DETAIL_QUERY: &str = r#"query mySubmissionDetail($id: ID!) {
  submissionDetail(submissionId: $id) {
    id
    code
    statusDisplay
    timestamp
    lang
    question {
      titleSlug
      questionId
    }
  }
}
"#;

/// leetcode.cn: source code is served by a dedicated GraphQL query.
pub struct ChinaSite {
    client: SiteClient,
}

impl ChinaSite {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SiteAdapter for ChinaSite {
    fn region(&self) -> Region {
        Region::China
    }

    async fn count_problems(&self) -> Result<usize> {
        self.client.problem_count().await
    }

    async fn list_problems_page(&self, offset: usize, limit: usize) -> Result<Vec<Problem>> {
        self.client
            .problem_page(PROBLEM_LIST_QUERY, offset, limit)
            .await
    }

    async fn list_submissions(&self, title_slug: &str) -> Result<Vec<Submission>> {
        self.client.recent_submissions(title_slug).await
    }

    async fn fetch_submission_source(&self, submission: &Submission) -> Result<String> {
        let body = json!({
            "operationName": "mySubmissionDetail",
            "variables": {
                "id": submission.id,
            },
            "query": SUBMISSION_DETAIL_QUERY,
        });
        let data: SubmissionDetailData = self.client.query(&body).await?;

        data.submission_detail
            .map(|detail| detail.code)
            .ok_or_else(|| {
                SiteError::ParseError(format!(
                    "no detail returned for submission #{}",
                    submission.id
                ))
            })
    }
}
