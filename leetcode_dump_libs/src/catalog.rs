use crate::{
    pool::{self, WorkerPool},
    site::{model::Problem, SiteAdapter},
};
use itertools::Itertools;
use std::{
    collections::HashMap,
    mem,
    sync::{Arc, Mutex, PoisonError},
};

/// Number of problems requested per catalog page.
pub const PAGE_SIZE: usize = 100;

/// All problems of the site for one run, iterated in canonical order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    problems: Vec<Problem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog sorted by ordinal. For a repeated identifier the last one wins.
    pub fn from_problems(problems: impl IntoIterator<Item = Problem>) -> Self {
        let unique: HashMap<String, Problem> = problems
            .into_iter()
            .map(|problem| (problem.frontend_question_id.clone(), problem))
            .collect();

        let problems: Vec<Problem> = unique
            .into_values()
            .sorted_by_key(|problem| problem.ordinal)
            .collect();
        let index = problems
            .iter()
            .enumerate()
            .map(|(i, problem)| (problem.frontend_question_id.clone(), i))
            .collect();

        Self { problems, index }
    }

    pub fn get(&self, problem_id: &str) -> Option<&Problem> {
        self.index.get(problem_id).map(|&i| &self.problems[i])
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    pub fn accepted(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(|problem| problem.is_accepted())
    }

    /// Resolves the user's selection into problem ids to archive.
    ///
    /// `0` selects every accepted problem in catalog order. Otherwise the whitespace
    /// separated ids are kept in input order when they name an accepted problem.
    pub fn select(&self, input: &str) -> Vec<String> {
        let input = input.trim();
        if input == "0" {
            return self
                .accepted()
                .map(|problem| problem.frontend_question_id.clone())
                .collect();
        }

        input
            .split_whitespace()
            .unique()
            .filter(|id| match self.get(id) {
                Some(problem) if problem.is_accepted() => true,
                Some(_) => {
                    tracing::warn!("question #{} is not accepted yet - ignored", id);
                    false
                }
                None => {
                    tracing::warn!("question #{} does not exist - ignored", id);
                    false
                }
            })
            .map(String::from)
            .collect()
    }
}

/// Fetches the problem list page by page under the worker pool.
pub struct CatalogBuilder {
    site: Arc<dyn SiteAdapter>,
    pool: WorkerPool,
}

impl CatalogBuilder {
    pub fn new(site: Arc<dyn SiteAdapter>, pool: WorkerPool) -> Self {
        Self { site, pool }
    }

    /// Requests every page covering `total_count` problems and waits for all of them.
    ///
    /// A page that fails is logged and left out of the catalog.
    pub async fn build(&self, total_count: usize, page_size: usize) -> Catalog {
        let page_size = page_size.max(1);
        tracing::info!(
            "Start to retrieve {} problems in pages of {}.",
            total_count,
            page_size
        );

        let merged: Arc<Mutex<HashMap<String, Problem>>> = Arc::new(Mutex::new(HashMap::new()));
        let handles: Vec<_> = (0..total_count)
            .step_by(page_size)
            .map(|offset| {
                let site = Arc::clone(&self.site);
                let merged = Arc::clone(&merged);
                self.pool
                    .spawn(async move { fetch_page(site, merged, offset, page_size).await })
            })
            .collect();
        pool::join_all(handles).await;

        let problems = mem::take(&mut *merged.lock().unwrap_or_else(PoisonError::into_inner));
        let catalog = Catalog::from_problems(problems.into_values());
        tracing::info!("{} problems collected.", catalog.len());

        catalog
    }
}

async fn fetch_page(
    site: Arc<dyn SiteAdapter>,
    merged: Arc<Mutex<HashMap<String, Problem>>>,
    offset: usize,
    page_size: usize,
) {
    let problems = match site.list_problems_page(offset, page_size).await {
        Ok(problems) => {
            tracing::info!(
                "fetch problem list {} - {} - ok",
                offset + 1,
                offset + page_size
            );
            problems
        }
        Err(e) => {
            tracing::error!(
                "fetch problem list {} - {} - fail: {}",
                offset + 1,
                offset + page_size,
                e
            );
            return;
        }
    };

    let mut merged = merged.lock().unwrap_or_else(PoisonError::into_inner);
    for (i, mut problem) in problems.into_iter().take(page_size).enumerate() {
        problem.ordinal = offset + i;
        merged.insert(problem.frontend_question_id.clone(), problem);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        site::model::{Difficulty, SolveStatus},
        testing::{problem, FakeSite},
    };
    use std::collections::HashSet;

    fn site_with(count: usize) -> FakeSite {
        FakeSite {
            problems: (1..=count)
                .map(|i| problem(&i.to_string(), Difficulty::Easy, None))
                .collect(),
            ..Default::default()
        }
    }

    fn ids(catalog: &Catalog) -> Vec<String> {
        catalog
            .iter()
            .map(|problem| problem.frontend_question_id.clone())
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn build_partial_last_page() {
        let site = Arc::new(site_with(250));
        let builder = CatalogBuilder::new(site, WorkerPool::new(3));

        let catalog = builder.build(250, PAGE_SIZE).await;

        assert_eq!(catalog.len(), 250);
        assert_eq!(ids(&catalog), (1..=250).map(|i| i.to_string()).collect::<Vec<_>>());
        assert!(catalog
            .iter()
            .enumerate()
            .all(|(i, problem)| problem.ordinal == i));
        assert_eq!(catalog.get("101").unwrap().ordinal, 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn failed_page_is_missing() {
        let mut site = site_with(250);
        site.failing_pages.insert(100);
        let builder = CatalogBuilder::new(Arc::new(site), WorkerPool::new(8));

        let catalog = builder.build(250, PAGE_SIZE).await;

        assert_eq!(catalog.len(), 150);
        assert!(catalog.get("100").is_some());
        assert!(catalog.get("101").is_none());
        assert!(catalog.get("200").is_none());
        assert!(catalog.get("201").is_some());
        let ordinals: Vec<usize> = catalog.iter().map(|problem| problem.ordinal).collect();
        assert!(ordinals.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn duplicate_identifiers_are_merged() {
        let mut site = site_with(30);
        site.problems[25].frontend_question_id = String::from("3");
        let builder = CatalogBuilder::new(Arc::new(site), WorkerPool::new(4));

        let catalog = builder.build(30, 7).await;

        let unique: HashSet<String> = ids(&catalog).into_iter().collect();
        assert_eq!(catalog.len(), 29);
        assert_eq!(unique.len(), 29);
    }

    #[tokio::test]
    async fn later_duplicate_in_page_wins() {
        let mut site = site_with(5);
        site.problems[3].frontend_question_id = String::from("2");
        site.problems[3].title = String::from("Replacement");
        let builder = CatalogBuilder::new(Arc::new(site), WorkerPool::new(2));

        let catalog = builder.build(5, 10).await;

        assert_eq!(ids(&catalog), vec!["1", "3", "2", "5"]);
        let replaced = catalog.get("2").unwrap();
        assert_eq!(replaced.title, "Replacement");
        assert_eq!(replaced.ordinal, 3);
    }

    #[tokio::test]
    async fn empty_site_builds_empty_catalog() {
        let builder = CatalogBuilder::new(Arc::new(FakeSite::default()), WorkerPool::new(2));

        let catalog = builder.build(0, PAGE_SIZE).await;

        assert!(catalog.is_empty());
    }

    #[test]
    fn from_problems_sorts_by_ordinal_and_overwrites() {
        let mut first = problem("1", Difficulty::Easy, None);
        first.ordinal = 2;
        let mut second = problem("2", Difficulty::Hard, None);
        second.ordinal = 0;
        let mut replaced = problem("1", Difficulty::Medium, None);
        replaced.ordinal = 1;

        let catalog = Catalog::from_problems(vec![first, second, replaced]);

        assert_eq!(ids(&catalog), vec!["2", "1"]);
        assert_eq!(catalog.get("1").unwrap().difficulty, Difficulty::Medium);
    }

    fn solved_catalog() -> Catalog {
        let problems = vec![
            problem("1", Difficulty::Easy, Some(SolveStatus::Accepted)),
            problem("2", Difficulty::Medium, Some(SolveStatus::NotAccepted)),
            problem("3", Difficulty::Hard, Some(SolveStatus::Accepted)),
            problem("4", Difficulty::Hard, None),
        ];
        Catalog::from_problems(problems.into_iter().enumerate().map(|(i, mut problem)| {
            problem.ordinal = i;
            problem
        }))
    }

    #[test]
    fn select_all_accepted() {
        let catalog = solved_catalog();

        assert_eq!(catalog.select("0"), vec!["1", "3"]);
        assert_eq!(catalog.select(" 0\n"), vec!["1", "3"]);
    }

    #[test]
    fn select_explicit_ids() {
        let catalog = solved_catalog();

        assert_eq!(catalog.select("3 2 1 3 99 4"), vec!["3", "1"]);
        assert!(catalog.select("").is_empty());
        assert!(catalog.select("   ").is_empty());
    }
}
