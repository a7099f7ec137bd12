use glove_cooc::config::files_handling;
use glove_cooc::errors::{CoocError, Result};
use glove_cooc::cleaning::{find_dump_files, TextCleaner};

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use clap::Parser;
use env_logger::Env;
use log::info;


// turns a wikiextractor json dump into the one-document-per-line corpus read
// by the vocab and glove_cooc binaries

#[derive(Parser, Debug)]
#[clap(name = "clean", about = "Cleans a Wikipedia json dump into a one document per line corpus")]
struct Args {
    /// Dump output directory, one sub folder per extraction chunk.
    #[clap(long)]
    output_dir: String,

    /// Stopwords file, one word per line.
    #[clap(long)]
    stopwords: String,

    /// Corpus file to write (`.gz` accepted).
    #[clap(long)]
    csv: String,

    /// Documents need more than this many words after cleaning.
    #[clap(long, default_value_t = TextCleaner::DEFAULT_MIN_WORDS)]
    min_words: usize,

    /// Words need more than this many letters.
    #[clap(long, default_value_t = TextCleaner::DEFAULT_MIN_WORD_LENGTH)]
    min_word_length: usize,

    /// Dump files cleaned in parallel before their documents are written.
    #[clap(long, default_value_t = 64)]
    files_per_round: usize,

    #[clap(long, default_value = "wiki_")]
    pattern: String,
}

fn run(args: &Args) -> Result<()> {

    let timer = Instant::now();

    let stopwords = TextCleaner::load_stopwords(files_handling::open_reader(&args.stopwords, "stopwords")?)?;
    info!("loaded {} stopwords", stopwords.len());
    let cleaner = TextCleaner::new(stopwords, args.min_word_length, args.min_words);

    let files = find_dump_files(&args.output_dir, &args.pattern)?;

    if let Some(parent) = Path::new(&args.csv).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CoocError::file_open("output", parent, e))?;
    }
    let mut out = files_handling::create_writer(&args.csv, "output")?;
    let stats = cleaner.run(&files, args.files_per_round, &mut out)?;
    out.finish()?;

    info!("kept {} of {} documents ({} undecodable) from {} files in {} seconds",
        stats.kept, stats.documents, stats.malformed, stats.files, timer.elapsed().as_secs());
    info!("text-only file created at: {}", args.csv);
    Ok(())
}

fn main() -> ExitCode {

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
