mod cmd;
mod modules;

use crate::cmd::dump::{self, DumpArgs};
use clap::Parser;
use dotenvy::dotenv;
use std::{env, process, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "leetcode_dump")]
#[command(about = "Dump accepted LeetCode solutions and generate a summary")]
struct Cli {
    #[command(flatten)]
    dump: DumpArgs,
}

fn main() {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .expect("couldn't parse specified log level")
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().expect("couldn't determine local time offset"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let cli = Cli::parse();

    // One runtime worker per pool permit.
    let runtime = Builder::new_multi_thread()
        .worker_threads(cli.dump.threads.max(1))
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    if let Err(e) = runtime.block_on(dump::run(cli.dump)) {
        tracing::error!("command failed: {:#}", e);
        process::exit(1);
    }
}
