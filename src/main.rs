//! Gridcalc - evaluate a spreadsheet from the command line

mod cli;
mod output;

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use gridcalc_core::storage::FileStore;
use gridcalc_core::{Config, Document};
use tracing_subscriber::EnvFilter;

use cli::Args;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_document(config: &Config) -> Result<Document> {
    if !config.save_to_store {
        return Ok(Document::new(config));
    }
    let dir = config
        .resolved_store_dir()
        .ok_or_else(|| anyhow!("no store directory; pass --store DIR or --no-save"))?;
    tracing::debug!(dir = %dir.display(), "using file store");
    Document::open(config, Box::new(FileStore::new(dir)))
        .with_context(|| format!("failed to open sheet {}", config.table_key()))
}

fn run(args: Args) -> Result<()> {
    let config = args.load_config()?;
    let mut doc = open_document(&config)?;

    for _ in 0..args.add_rows {
        doc.add_row();
    }
    for _ in 0..args.add_cols {
        doc.add_column();
    }
    for (name, value) in &args.sets {
        doc.set_cell_a1(name, value.as_str())
            .with_context(|| format!("cannot set {}", name))?;
    }
    doc.save()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.evals.is_empty() {
        let table = if args.raw { doc.render_raw() } else { doc.render() };
        output::write_table(&mut out, &table)?;
    } else {
        for name in &args.evals {
            let coord = Document::coord_of(name)?;
            output::write_evaluation(&mut out, &doc, coord, args.raw)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
