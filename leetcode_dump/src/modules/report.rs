use anyhow::{Context, Result};
use askama::Template;
use chrono::NaiveDate;
use itertools::Itertools;
use leetcode_dump_libs::{
    language,
    site::model::{Difficulty, Problem},
    Catalog, Ledger, Region, RunSummary, Warning,
};
use std::{collections::BTreeMap, fmt::Write, path::Path, time::Duration};

#[derive(Debug, Template)]
#[template(path = "readme.md", escape = "none")]
pub struct Readme {
    pub language: String,
    pub time: NaiveDate,
    pub total: usize,
    pub locked: usize,
    pub solved: usize,
    pub hard: usize,
    pub medium: usize,
    pub easy: usize,
    pub solutions: Vec<SolutionRow>,
}

#[derive(Debug)]
pub struct SolutionRow {
    pub id: String,
    pub domain: &'static str,
    pub title: String,
    pub solution_links: String,
    pub difficulty: Difficulty,
    pub paid_only: &'static str,
    pub acceptance: String,
    pub tags: String,
}

impl SolutionRow {
    fn new(problem: &Problem, ledger: &Ledger, region: Region, dump_dir: &Path) -> Self {
        let solution_links = ledger
            .languages(&problem.frontend_question_id)
            .iter()
            .filter_map(|code| language::lookup(code))
            .map(|language| {
                let path = dump_dir.join(format!(
                    "{}.{}.{}",
                    problem.frontend_question_id, problem.title_slug, language.extension
                ));
                format!("[{}]({})", language.display, path.display()).replace(' ', "-")
            })
            .join(" ");

        Self {
            id: problem.frontend_question_id.clone(),
            domain: region.domain(),
            title: problem.title_slug.clone(),
            solution_links,
            difficulty: problem.difficulty,
            paid_only: if problem.paid_only {
                ":heavy_check_mark:"
            } else {
                ""
            },
            acceptance: format!("{:.2}%", region.acceptance_ratio(problem.ac_rate) * 100.0),
            tags: problem.topic_tags.iter().map(|tag| &tag.name).join(" \\| "),
        }
    }
}

impl Readme {
    /// Collects the summary data. Must run after every archive task has finished.
    pub fn build(
        catalog: &Catalog,
        ledger: &Ledger,
        region: Region,
        dump_dir: &Path,
        time: NaiveDate,
    ) -> Self {
        let accepted: Vec<&Problem> = catalog.accepted().collect();
        let solved_with = |difficulty: Difficulty| {
            accepted
                .iter()
                .filter(|problem| problem.difficulty == difficulty)
                .count()
        };

        Self {
            language: ledger
                .all_languages()
                .iter()
                .filter_map(|code| language::lookup(code))
                .map(|language| language.display)
                .join(", "),
            time,
            total: catalog.len(),
            locked: catalog.iter().filter(|problem| problem.paid_only).count(),
            solved: accepted.len(),
            hard: solved_with(Difficulty::Hard),
            medium: solved_with(Difficulty::Medium),
            easy: solved_with(Difficulty::Easy),
            solutions: accepted
                .iter()
                .map(|problem| SolutionRow::new(problem, ledger, region, dump_dir))
                .collect(),
        }
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = self.render().context("failed to render the summary template")?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        Ok(())
    }
}

/// End-of-run printout: every warning, then question and submission counts.
pub fn run_summary(
    warnings: &BTreeMap<String, Warning>,
    summary: &RunSummary,
    elapsed: Duration,
) -> String {
    let mut text = String::from("Warning Messages\n");
    for (id, warning) in warnings.iter() {
        let _ = writeln!(text, "\tQuestion #{} - {}", id, warning);
    }

    let seconds = elapsed.as_secs();
    let _ = write!(
        text,
        "\nFinished\n\
         Requested Questions - {}\n\
         \tDumped - {}\n\
         \tSkipped - {}\n\
         \tFailed - {}\n\
         Requested Submissions - {}\n\
         \tDumped - {}\n\
         \tSkipped - {}\n\
         \tFailed - {}\n\
         Total Time - {} min {} sec",
        summary.requested_questions,
        summary.dumped_questions,
        summary.skipped_questions,
        summary.failed_questions(),
        summary.requested_submissions,
        summary.dumped_submissions,
        summary.skipped_submissions,
        summary.failed_submissions(),
        seconds / 60,
        seconds % 60,
    );

    text
}
