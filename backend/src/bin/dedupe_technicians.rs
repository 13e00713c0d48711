//! Collapse duplicate technician rows so each name appears once.
//!
//! The most recently created row per name survives; requests pointing at a
//! removed row are moved to the survivor first.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin dedupe-technicians -- --dry-run
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk::domain::{DeduplicationReport, TechnicianDeduplicator};
use helpdesk::outbound::persistence::{DbPool, DieselTechnicianRepository, PoolConfig};

/// `dedupe-technicians` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dedupe-technicians",
    about = "Remove duplicate technician rows, keeping the newest per name",
    version
)]
struct CliArgs {
    /// Report the merges without applying them.
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url, env::var("DATABASE_URL").ok())?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let deduplicator =
        TechnicianDeduplicator::new(Arc::new(DieselTechnicianRepository::new(pool)));
    let report = deduplicator
        .run(args.dry_run)
        .await
        .map_err(|error| io::Error::other(format!("deduplication failed: {error}")))?;

    write_report(&mut io::stdout().lock(), &report)
}

fn write_report(out: &mut impl Write, report: &DeduplicationReport) -> io::Result<()> {
    let verb = if report.applied { "removed" } else { "would remove" };
    for merge in &report.plan.merges {
        writeln!(
            out,
            "{verb} technician {} ({}), keeping {}",
            merge.duplicate, merge.name, merge.survivor
        )?;
    }
    writeln!(out, "duplicates={}", report.plan.merges.len())?;
    writeln!(out, "applied={}", report.applied)
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    explicit
        .or(from_env)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url or DATABASE_URL",
            )
        })
}
