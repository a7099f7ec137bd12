
use crate::config::{files_handling, Params};
use crate::cooccurrence::{Counts, StreamParams, StreamStats};
use crate::errors::Result;
use crate::matrix::CoocMatrix;
use crate::tokenizer::VocabTokenizer;
use crate::vocab::VocabIndex;
use crate::window::WeightTable;

use std::time::Instant;
use log::{info, warn};


/// What a finished run produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub vocab_size: usize,
    pub pairs: usize,
    pub stream: StreamStats,
}

pub struct Run {}

impl Run {

    // runs the three phases -
    // -> vocabulary loading (top words only)
    // -> streaming cooccurrence counting over the corpus
    // -> writing the matrix
    pub fn run(params: &Params) -> Result<RunSummary> {

        let timer = Instant::now();
        info!("{}", params);
        info!("processing with window size: {}, top words: {}", params.window_size, params.top_words);

        // every file is opened up front so a bad path fails before the long pass
        info!("loading vocabulary...");
        let vocab_in = files_handling::open_reader(&params.vocab_file, "vocabulary")?;
        let (index, report) = VocabIndex::from_csv(vocab_in, params.top_words)?;
        if report.malformed > 0 {
            warn!("skipped {} malformed vocabulary rows out of {}", report.malformed, report.rows);
        }
        info!("using top {} words from vocabulary", index.len());

        let corpus = files_handling::open_reader(&params.corpus_file, "text")?;
        let mut out = files_handling::create_writer(&params.output_file, "output")?;

        info!("processing text file...");
        let weights = WeightTable::new(params.window_size);
        let tokenizer = VocabTokenizer::new(&index);
        let (acc, stream) = Counts::run(corpus, &StreamParams::from(params), &tokenizer, &weights)?;

        info!("writing final matrix with {} pairs to output file...", acc.len());
        CoocMatrix::new(&acc, &index).write_csv(&mut out)?;
        out.finish()?;

        info!("finished processing in {} seconds", timer.elapsed().as_secs());
        info!("processed {} lines in {} batches", stream.lines, stream.batches);
        info!("output saved to: {}", params.output_file);

        Ok(RunSummary { vocab_size: index.len(), pairs: acc.len(), stream })
    }

}
