use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use vocabulary::{Config, Language};

/// Extract keywords and automatically discovered stop words from a corpus of package inserts.
#[derive(Debug, Parser)]
#[command(name = "smartinfo", version)]
pub struct Cli {
    /// JSON lines export or directory of HTML files.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Input format. Inferred from the input path if omitted.
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Directory receiving the result files. Created if missing.
    #[arg(short, long)]
    pub output: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub language: Option<Language>,

    /// Document frequency above which a term is an auto-stopword.
    #[arg(long)]
    pub threshold: Option<usize>,

    #[arg(long)]
    pub min_token_chars: Option<usize>,

    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    #[arg(long)]
    pub whitelist: Option<PathBuf>,

    #[arg(long)]
    pub multiwords: Option<PathBuf>,

    /// List every chapter at most once per term and document.
    #[arg(long)]
    pub dedup_chapters: bool,

    /// Also write the digest keyed lookup table.
    #[arg(long)]
    pub lookup: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Jsonl,
    Dir,
}

impl Cli {
    pub fn format(&self) -> Format {
        self.format.unwrap_or_else(|| infer_format(&self.input))
    }

    /// Override the configuration with the flags given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(threshold) = self.threshold {
            config.stopword_threshold = threshold;
        }
        if let Some(chars) = self.min_token_chars {
            config.min_token_chars = chars;
        }
        if let Some(path) = &self.stopwords {
            config.lexicon.stopwords = Some(path.clone());
        }
        if let Some(path) = &self.whitelist {
            config.lexicon.whitelist = Some(path.clone());
        }
        if let Some(path) = &self.multiwords {
            config.lexicon.multiwords = Some(path.clone());
        }
        config.dedup_chapter_ids |= self.dedup_chapters;
        config.lookup |= self.lookup;
    }
}

fn infer_format(input: &Path) -> Format {
    if input.is_dir() {
        Format::Dir
    } else {
        Format::Jsonl
    }
}
