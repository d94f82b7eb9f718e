use crate::{
    catalog::Catalog,
    context::RunContext,
    language,
    pool,
    site::model::{Problem, Submission},
    stats::Warning,
};
use itertools::Itertools;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

/// Result of archiving one problem or one of its submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Dumped,
    Skipped,
    Failed,
}

/// Path of the archived solution: `<dump_dir>/<problem_id>.<title_slug>.<extension>`.
pub fn solution_path(dump_dir: &Path, problem_id: &str, title_slug: &str, extension: &str) -> PathBuf {
    dump_dir.join(format!("{}.{}.{}", problem_id, title_slug, extension))
}

/// Keeps the first accepted submission of every language.
///
/// Submissions arrive newest first, so the first one seen is the most recent.
pub fn latest_accepted(submissions: impl IntoIterator<Item = Submission>) -> Vec<Submission> {
    submissions
        .into_iter()
        .filter(Submission::is_accepted)
        .unique_by(|submission| submission.lang.clone())
        .collect()
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Sibling file the source is staged in until it is completely written.
fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    PathBuf::from(partial)
}

/// Writes `content` so that `path` only ever holds a complete solution.
///
/// The content goes to a `.part` sibling first and is renamed into place once flushed.
/// A failed write removes the staged file and leaves `path` absent.
async fn write_new_file(path: &Path, content: &str) -> std::io::Result<()> {
    let partial = partial_path(path);
    let staged = async {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&partial)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&partial, path).await
    }
    .await;

    if staged.is_err() {
        if let Err(e) = tokio::fs::remove_file(&partial).await {
            tracing::debug!("staged file {} not removed: {}", partial.display(), e);
        }
    }

    staged
}

/// Downloads the latest accepted solutions of the selected problems.
#[derive(Clone)]
pub struct SubmissionArchiver {
    context: Arc<RunContext>,
    catalog: Arc<Catalog>,
}

impl SubmissionArchiver {
    pub fn new(context: Arc<RunContext>, catalog: Arc<Catalog>) -> Self {
        Self { context, catalog }
    }

    /// Archives every problem as its own task under the worker pool and waits for all of them.
    pub async fn run(&self, problem_ids: &[String]) -> Vec<Outcome> {
        tracing::info!("Start to archive {} questions.", problem_ids.len());

        let handles: Vec<_> = problem_ids
            .iter()
            .cloned()
            .map(|problem_id| {
                let archiver = self.clone();
                self.context
                    .pool
                    .spawn(async move { archiver.archive(&problem_id).await })
            })
            .collect();

        pool::join_all(handles).await
    }

    /// Archives one problem. Errors end up as the problem's warning, never as a panic.
    pub async fn archive(&self, problem_id: &str) -> Outcome {
        let stats = &self.context.stats;

        let problem = match self.catalog.get(problem_id) {
            Some(problem) => problem,
            None => {
                tracing::warn!("question #{} is not in the catalog - skipping", problem_id);
                stats.skipped_questions.inc();
                return Outcome::Skipped;
            }
        };

        tracing::info!("downloading #{} {}", problem_id, problem.title);

        let submissions = match self.context.site.list_submissions(&problem.title_slug).await {
            Ok(submissions) => {
                tracing::info!("fetch submission list for #{} - ok", problem_id);
                submissions
            }
            Err(e) => {
                tracing::error!("fetch submission list for #{} - fail: {}", problem_id, e);
                stats.warn(problem_id, Warning::from(&e));
                return Outcome::Failed;
            }
        };

        let representatives = latest_accepted(submissions);
        stats
            .requested_submissions
            .increment(representatives.len() as i64);

        let mut dumped = false;
        let mut attempted = false;
        for submission in representatives.iter() {
            match self.archive_submission(problem, submission).await {
                Outcome::Dumped => {
                    dumped = true;
                    attempted = true;
                }
                Outcome::Failed => attempted = true,
                Outcome::Skipped => {}
            }
        }

        if dumped {
            stats.dumped_questions.inc();
            Outcome::Dumped
        } else if !attempted {
            stats.skipped_questions.inc();
            Outcome::Skipped
        } else {
            Outcome::Failed
        }
    }

    async fn archive_submission(&self, problem: &Problem, submission: &Submission) -> Outcome {
        let context = &self.context;
        let problem_id = problem.frontend_question_id.as_str();

        let language = match language::lookup(&submission.lang) {
            Some(language) => language,
            None => {
                context.stats.warn(
                    problem_id,
                    Warning::UnsupportedLanguage(submission.lang.clone()),
                );
                context.stats.skipped_submissions.inc();
                return Outcome::Skipped;
            }
        };

        let path = solution_path(
            &context.dump_dir,
            problem_id,
            &problem.title_slug,
            language.extension,
        );
        if file_exists(&path).await {
            tracing::info!("code for #{} in {} exists - skipping", problem_id, language.display);
            context.ledger.record(problem_id, language.code);
            context.stats.skipped_submissions.inc();
            return Outcome::Skipped;
        }

        let code = match context.site.fetch_submission_source(submission).await {
            Ok(code) => {
                tracing::info!(
                    "fetch submission detail for #{} - submission #{} - ok",
                    problem_id,
                    submission.id
                );
                code
            }
            Err(e) => {
                tracing::error!(
                    "fetch submission detail for #{} - submission #{} - fail: {}",
                    problem_id,
                    submission.id,
                    e
                );
                context.stats.warn(problem_id, Warning::from(&e));
                return Outcome::Failed;
            }
        };

        if let Err(e) = write_new_file(&path, &code).await {
            tracing::error!("failed to write {}: {:?}", path.display(), e);
            context.stats.warn(problem_id, Warning::from(e));
            return Outcome::Failed;
        }

        tracing::info!("wrote to {}", path.display());
        context.ledger.record(problem_id, language.code);
        context.stats.dumped_submissions.inc();

        Outcome::Dumped
    }
}
