//! Offline migration of a config file.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use ledfx_config::writer::{persisted_view, to_pretty_json, write_json};
use ledfx_config::{ConfigDocument, Migrator, TracingObserver, core_config_schema};
use ledfx_registry::StaticRegistry;
use serde_json::Value;

#[derive(Args)]
pub struct MigrateArgs {
    /// Old config file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write the result here instead of printing it
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let old: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.input.display()))?;

    let registry = StaticRegistry::new();
    let migrated = Migrator::new(&registry, &TracingObserver).migrate(&old)?;
    let doc = ConfigDocument::new(
        core_config_schema()
            .normalize(&migrated)
            .context("migrated document is not valid")?,
    );
    let view = persisted_view(&doc);

    match args.output {
        Some(path) => {
            write_json(&path, &view)?;
            tracing::info!(path = %path.display(), "wrote migrated config");
        }
        None => println!("{}", to_pretty_json(&view)?),
    }
    Ok(())
}
