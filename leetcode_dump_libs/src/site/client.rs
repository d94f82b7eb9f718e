use crate::site::{
    model::{
        GraphQLResponse, Problem, ProblemCount, ProblemsetQuestionListData, Submission,
        SubmissionListData,
    },
    Result, SiteError,
};
use itertools::Itertools;
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE, REFERER},
    Client, Response, Url,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

/// Number of most recent submissions requested per problem.
pub const SUBMISSION_PAGE_SIZE: usize = 20;

const SUBMISSIONS_QUERY: &str = r#"query Submissions($offset: Int!, $limit: Int!, $lastKey: String, $questionSlug: String!) {
  submissionList(offset: $offset, limit: $limit, lastKey: $lastKey, questionSlug: $questionSlug) {
    lastKey
    hasNext
    submissions {
      id
      statusDisplay
      lang
      runtime
      timestamp
      url
      isPending
      memory
    }
  }
}
"#;

/// HTTP client carrying the session credential and the headers every request needs.
pub struct SiteClient {
    base_url: Url,
    graphql_url: Url,
    client: Client,
}

impl SiteClient {
    pub fn new(base_url: &str, cookie: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let graphql_url = base_url.join("graphql/")?;

        let mut headers = HeaderMap::new();
        headers.insert(
            REFERER,
            HeaderValue::from_str(base_url.as_str().trim_end_matches('/'))?,
        );
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(COOKIE, HeaderValue::from_str(cookie)?);

        let mut builder = Client::builder().gzip(true).default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            graphql_url,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn check_status(res: Response) -> Result<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let url = res.url().to_string();
        let body = res.text().await.unwrap_or_default();
        tracing::error!("error response [{}] returned from {}: {}", status, url, body);
        Err(SiteError::StatusError {
            status: status.as_u16(),
            url,
        })
    }

    pub async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.base_url.join(path)?;
        let res = self.client.get(url).send().await?;
        let res = Self::check_status(res).await?;

        Ok(res.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path)?;
        let res = self.client.get(url).send().await?;
        let res = Self::check_status(res).await?;

        Ok(res.json().await?)
    }

    /// Posts a GraphQL operation and returns its `data` object.
    pub async fn query<T: DeserializeOwned>(&self, body: &Value) -> Result<T> {
        let res = self
            .client
            .post(self.graphql_url.clone())
            .json(body)
            .send()
            .await?;
        let res = Self::check_status(res).await?;

        let response: GraphQLResponse<T> = res.json().await?;
        match response.data {
            Some(data) => Ok(data),
            None => Err(SiteError::ParseError(format!(
                "no data in GraphQL response: [{}]",
                response.errors.iter().map(|error| &error.message).join(", ")
            ))),
        }
    }

    pub async fn problem_count(&self) -> Result<usize> {
        let count: ProblemCount = self.get_json("api/problems/all/").await?;
        Ok(count.num_total)
    }

    pub async fn problem_page(&self, query: &str, offset: usize, limit: usize) -> Result<Vec<Problem>> {
        let body = json!({
            "operationName": "problemsetQuestionList",
            "variables": {
                "categorySlug": "",
                "skip": offset,
                "limit": limit,
                "filters": {},
            },
            "query": query,
        });
        let data: ProblemsetQuestionListData = self.query(&body).await?;

        Ok(data.problemset_question_list.questions)
    }

    pub async fn recent_submissions(&self, title_slug: &str) -> Result<Vec<Submission>> {
        let body = json!({
            "operationName": "Submissions",
            "variables": {
                "offset": 0,
                "limit": SUBMISSION_PAGE_SIZE,
                "lastKey": null,
                "questionSlug": title_slug,
            },
            "query": SUBMISSIONS_QUERY,
        });
        let data: SubmissionListData = self.query(&body).await?;

        Ok(data.submission_list.submissions)
    }
}
