
use glove_cooc::config::files_handling;
use glove_cooc::errors::Result;
use glove_cooc::VocabCounts;

use std::process::ExitCode;
use std::time::Instant;
use clap::Parser;
use env_logger::Env;
use log::info;


// builds the vocabulary file (word, index, word_count, document_count) that
// the cooccurrence binary expects, one corpus line being one document

#[derive(Parser, Debug)]
#[clap(name = "vocab", about = "Counts word and document frequencies of a corpus")]
struct Args {
    /// Corpus, one document per line (`.gz` accepted).
    #[clap(long, default_value = "cleaned_wiki_text.csv")]
    input: String,

    /// Vocabulary csv to write.
    #[clap(long, default_value = "vocabulary.csv")]
    output: String,

    /// Lines per batch.
    #[clap(long, default_value_t = 100000)]
    batch_size: usize,
}

fn run(args: &Args) -> Result<()> {

    let timer = Instant::now();
    info!("input file: {}, output file: {}, batch size: {}", args.input, args.output, args.batch_size);

    let corpus = files_handling::open_reader(&args.input, "input")?;
    let (counts, stats) = VocabCounts::run(corpus, args.batch_size)?;

    let mut out = files_handling::create_writer(&args.output, "output")?;
    counts.write_csv(&mut out)?;
    out.finish()?;
    info!("vocabulary written to {}", args.output);

    info!("processing completed in {} seconds", timer.elapsed().as_secs());
    info!("final vocabulary size: {} words from {} lines", counts.len(), stats.lines);
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
