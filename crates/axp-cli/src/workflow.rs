use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::info;

use axp_bundle::JsonBundleLoader;
use axp_config::load_config;
use axp_index::ContentIndex;
use axp_log::LogGroup;
use axp_manifest::load_manifest;
use axp_pool::ConcurrencyEngine;
use axp_sched::Scheduler;
use axp_store::{AssetStore, MirrorFetcher};

use crate::cli::Cli;
use crate::env::Environment;

/// Run the whole pipeline for one manifest version.
pub fn run(args: Cli) -> anyhow::Result<()> {
    let config = load_config(&args.config_path)
        .with_context(|| format!("loading config {}", args.config_path.display()))?;
    let env = Environment::new(args, config);

    env.init_dirs()?;
    axp_log::init(Some(env.config.paths.log.as_path()))
        .context("installing the log subscriber")?;
    env.print_info();

    let Some(mirror) = env.config.paths.mirror.as_deref() else {
        // The HTTP transport lives outside this tool; runs feed from a
        // synced mirror directory.
        bail!("no bundle mirror configured (paths.mirror)");
    };

    let manifest = {
        let _group = LogGroup::begin("Manifest loading");
        load_manifest(&env.manifest_dir()).context("loading manifest documents")?
    };

    let mut index = ContentIndex::load(
        &env.config.paths.index,
        &env.config.paths.updated,
        &env.args.version_code,
        env.index_enabled(),
        env.config.index.export_updated,
    );

    let fetcher = Arc::new(MirrorFetcher::new(mirror));
    let store = AssetStore::new(env.config.paths.assets_dir(), fetcher);
    let loader = JsonBundleLoader::new();
    let engine = ConcurrencyEngine::new(
        env.config.concurrency.workers,
        env.config.concurrency.batch_size,
    );
    let scheduler = Scheduler::new(&manifest, &store, &loader, engine, &env.config.paths);

    for task in &env.config.tasks {
        scheduler
            .run_task(task, &mut index)
            .with_context(|| format!("running task {}", task.title))?;
    }
    for raw_task in &env.config.raw_tasks {
        scheduler
            .run_raw_task(raw_task, &mut index)
            .with_context(|| format!("running raw task {}", raw_task.title))?;
    }

    {
        let _group = LogGroup::begin("Index flushing");
        index.flush().context("flushing the content index")?;
    }

    info!(
        "{} task(s) and {} raw task(s) completed",
        env.config.tasks.len(),
        env.config.raw_tasks.len()
    );
    println!(
        "{} Export for version {} complete",
        "✓".green().bold(),
        env.args.version_code.bold()
    );
    Ok(())
}
