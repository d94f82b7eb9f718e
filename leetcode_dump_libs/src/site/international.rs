use crate::site::{
    client::SiteClient,
    model::{Problem, Submission},
    Region, Result, SiteAdapter, SiteError,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::Chars;

static SUBMISSION_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"submissionCode: '(.*)',").unwrap());

const PROBLEM_LIST_QUERY: &str = r#"query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList: questionList(
    categorySlug: $categorySlug
    limit: $limit
    skip: $skip
    filters: $filters
  ) {
    total: totalNum
    questions: data {
      acRate
      difficulty
      frontendQuestionId: questionFrontendId
      paidOnly: isPaidOnly
      status
      title
      titleSlug
      topicTags {
        name
        id
        slug
      }
    }
  }
}
"#;

/// leetcode.com: source code is embedded in the submission detail page.
pub struct InternationalSite {
    client: SiteClient,
}

impl InternationalSite {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SiteAdapter for InternationalSite {
    fn region(&self) -> Region {
        Region::International
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
        let url = submission.url.as_deref().ok_or_else(|| {
            SiteError::ParseError(format!("submission #{} has no detail url", submission.id))
        })?;
        let html = self.client.get_text(url).await?;

        let raw = extract_submission_code(&html).ok_or_else(|| {
            SiteError::ParseError(format!(
                "can not parse the submitted code block of submission #{}",
                submission.id
            ))
        })?;

        decode_escaped(raw)
    }
}

/// Finds the escaped source string assigned to `submissionCode` in the detail page.
pub fn extract_submission_code(html: &str) -> Option<&str> {
    SUBMISSION_CODE
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str())
        .filter(|code| !code.is_empty())
}

/// Decodes backslash escapes in the embedded source string.
///
/// Octal escapes take up to three digits. Unknown escapes are kept verbatim. Surrogate
/// pairs written as two `\u` escapes are combined; a lone surrogate is a decode error.
pub fn decode_escaped(raw: &str) -> Result<String> {
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('r') => decoded.push('\r'),
            Some('\\') => decoded.push('\\'),
            Some('\'') => decoded.push('\''),
            Some('"') => decoded.push('"'),
            Some('a') => decoded.push('\u{07}'),
            Some('b') => decoded.push('\u{08}'),
            Some('f') => decoded.push('\u{0c}'),
            Some('v') => decoded.push('\u{0b}'),
            Some(first @ '0'..='7') => decoded.push(read_octal(&mut chars, first)?),
            Some('x') => decoded.push(read_char(&mut chars, 2)?),
            Some('U') => decoded.push(read_char(&mut chars, 8)?),
            Some('u') => {
                let high = read_hex(&mut chars, 4)?;
                if (0xD800..0xDC00).contains(&high) {
                    decoded.push(read_low_surrogate(&mut chars, high)?);
                } else {
                    decoded.push(to_char(high)?);
                }
            }
            Some(other) => {
                decoded.push('\\');
                decoded.push(other);
            }
            None => decoded.push('\\'),
        }
    }

    Ok(decoded)
}

fn read_hex(chars: &mut Chars, digits: usize) -> Result<u32> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.chars().count() != digits {
        return Err(SiteError::DecodeError(format!(
            "truncated escape sequence [{}]",
            hex
        )));
    }

    u32::from_str_radix(&hex, 16)
        .map_err(|_| SiteError::DecodeError(format!("invalid escape sequence [{}]", hex)))
}

fn to_char(code: u32) -> Result<char> {
    char::from_u32(code)
        .ok_or_else(|| SiteError::DecodeError(format!("invalid code point [{:#x}]", code)))
}

fn read_char(chars: &mut Chars, digits: usize) -> Result<char> {
    to_char(read_hex(chars, digits)?)
}

fn read_octal(chars: &mut Chars, first: char) -> Result<char> {
    let mut code = first.to_digit(8).unwrap_or(0);
    for _ in 0..2 {
        let mut lookahead = chars.clone();
        match lookahead.next().and_then(|c| c.to_digit(8)) {
            Some(digit) => {
                code = code * 8 + digit;
                *chars = lookahead;
            }
            None => break,
        }
    }

    to_char(code)
}

fn read_low_surrogate(chars: &mut Chars, high: u32) -> Result<char> {
    let mut lookahead = chars.clone();
    if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
        let low = read_hex(&mut lookahead, 4)?;
        if (0xDC00..0xE000).contains(&low) {
            *chars = lookahead;
            return to_char(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
        }
    }

    Err(SiteError::DecodeError(format!(
        "unpaired surrogate [{:#x}]",
        high
    )))
}
