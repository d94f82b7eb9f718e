use crate::{
    cmd::Domain,
    modules::{
        prompt,
        report::{self, Readme},
    },
};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use leetcode_dump_libs::{
    catalog::PAGE_SIZE, pool::DEFAULT_CAPACITY, CatalogBuilder, Region, RunContext,
    SubmissionArchiver,
};
use std::{env, path::PathBuf, sync::Arc};
use tokio::time::{Duration, Instant};

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Site to dump from
    #[arg(short, long, value_enum, default_value_t = Domain::Intl)]
    domain: Domain,
    /// Cookie of the LeetCode endpoint [env: LEETCODE_COOKIE]
    #[arg(short, long)]
    cookie: Option<String>,
    /// Number of concurrent requests
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    pub threads: usize,
    /// Problem ids to download separated by whitespace, 0 means all solved. Prompted when omitted
    #[arg(short, long)]
    select: Option<String>,
    /// Directory to save solutions in [env: LEETCODE_DUMP_DIR]
    #[arg(long)]
    dump_dir: Option<PathBuf>,
    /// Path of the generated summary
    #[arg(long, default_value = "./dumped-readme.md")]
    report: PathBuf,
    /// Request timeout in seconds. Requests never time out when omitted
    #[arg(long)]
    timeout: Option<u64>,
}

/// Values taken from the environment when the matching flag is absent.
#[derive(Debug, Default)]
struct Fallback {
    cookie: Option<String>,
    dump_dir: Option<PathBuf>,
}

impl Fallback {
    fn from_env() -> Self {
        Self {
            cookie: env::var("LEETCODE_COOKIE").ok(),
            dump_dir: env::var_os("LEETCODE_DUMP_DIR").map(PathBuf::from),
        }
    }
}

pub async fn run(args: DumpArgs) -> Result<()> {
    let base_url = Region::from(args.domain).base_url();
    dump(args, Fallback::from_env(), base_url).await
}

/// Runs one dump against `base_url`. Every fatal precondition is checked before any pool work.
async fn dump(args: DumpArgs, fallback: Fallback, base_url: &str) -> Result<()> {
    let started = Instant::now();
    let region = Region::from(args.domain);
    tracing::info!("dumping {} ...", region);

    let cookie: String = args
        .cookie
        .filter(|cookie| !cookie.is_empty())
        .or_else(|| fallback.cookie.filter(|cookie| !cookie.is_empty()))
        .with_context(|| {
            let message =
                "You must set cookie by adding option '-c' or LEETCODE_COOKIE before running.";
            tracing::error!(message);
            message
        })?;

    let dump_dir: PathBuf = args
        .dump_dir
        .or(fallback.dump_dir)
        .unwrap_or_else(|| PathBuf::from(region.dump_dir()));
    tokio::fs::create_dir_all(&dump_dir).await.with_context(|| {
        let message = format!("failed to create dump directory {}", dump_dir.display());
        tracing::error!(message);
        message
    })?;

    let site = region
        .connect_to(base_url, &cookie, args.timeout.map(Duration::from_secs))
        .with_context(|| {
            let message = "failed to create the site client";
            tracing::error!(message);
            message
        })?;

    let total = site.count_problems().await.with_context(|| {
        let message = "failed to get the number of problems";
        tracing::error!(message);
        message
    })?;

    let context = Arc::new(RunContext::new(site, args.threads, &dump_dir));
    let catalog = CatalogBuilder::new(Arc::clone(&context.site), context.pool.clone())
        .build(total, PAGE_SIZE)
        .await;

    let selection = match args.select {
        Some(selection) => selection,
        None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            prompt::read_selection(stdin, tokio::io::stdout())
                .await
                .context("failed to read problem ids")?
        }
    };
    let ids = catalog.select(&selection);

    let catalog = Arc::new(catalog);
    SubmissionArchiver::new(Arc::clone(&context), Arc::clone(&catalog))
        .run(&ids)
        .await;

    let readme = Readme::build(
        &catalog,
        &context.ledger,
        context.region(),
        &dump_dir,
        Local::now().date_naive(),
    );
    match readme.write(&args.report).await {
        Ok(_) => tracing::info!("wrote to {}", args.report.display()),
        Err(e) => tracing::error!("failed to generate summary: {:?}", e),
    }

    println!(
        "{}",
        report::run_summary(
            &context.stats.warnings(),
            &context.stats.summary(ids.len()),
            started.elapsed(),
        )
    );

    Ok(())
}
