use std::fs;

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vocabulary::{
    loader::{DirectoryLoader, JsonLinesLoader},
    sink::CsvSink,
    Config, Lexicon, Pipeline,
};

mod cli;

use cli::{Cli, Format};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| eyre::eyre!(e))?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("failed to load configuration {}", path.display()))?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate().wrap_err("invalid configuration")?;

    let lexicon = Lexicon::load(&config).wrap_err("failed to load lexicon")?;
    let pipeline = Pipeline::new(&config, lexicon).wrap_err("failed to set up the pipeline")?;

    fs::create_dir_all(&cli.output)
        .wrap_err_with(|| format!("failed to create {}", cli.output.display()))?;
    let mut sink = CsvSink::create(&cli.output, config.lookup).wrap_err("failed to open result sink")?;

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        language = %config.language,
        threshold = config.stopword_threshold,
        "starting run"
    );

    let report = match cli.format() {
        Format::Jsonl => {
            let loader = JsonLinesLoader::open(&cli.input)
                .wrap_err_with(|| format!("failed to open {}", cli.input.display()))?;
            pipeline.run(loader, &mut sink)
        }
        Format::Dir => {
            let loader = DirectoryLoader::open(&cli.input)
                .wrap_err_with(|| format!("failed to open {}", cli.input.display()))?;
            pipeline.run(loader, &mut sink)
        }
    }
    .wrap_err("run aborted")?;

    println!(
        " :: {} documents ({} skipped), {} keywords, {} auto-stopwords",
        report.documents, report.skipped, report.kept, report.auto_stopwords
    );

    Ok(())
}
