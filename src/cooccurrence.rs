
// imports
use crate::accumulator::Accumulator;
use crate::config::Params;
use crate::errors::Result;
use crate::tokenizer::Tokenizer;
use crate::window::{window_pass, WeightTable};

use std::io::BufRead;
use std::time::{Duration, Instant};
use log::info;
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};


// batches larger than this grow as lines arrive instead of being reserved up front
const MAX_PREALLOC_LINES: usize = 1 << 16;

/// Streaming knobs. None of them changes the resulting counts.
#[derive(Clone, Debug)]
pub struct StreamParams {
    pub batch_lines: usize,
    pub num_threads: usize,
    pub reserve_pairs: usize,
    pub report_every: Duration,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            batch_lines: 10000,
            num_threads: 1,
            reserve_pairs: Accumulator::DEFAULT_RESERVE,
            report_every: Duration::from_secs(30),
        }
    }
}

impl From<&Params> for StreamParams {
    fn from(params: &Params) -> Self {
        Self {
            batch_lines: params.batch_lines,
            num_threads: params.num_threads,
            reserve_pairs: params.reserve_pairs,
            report_every: Duration::from_secs(params.report_secs),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines: u64,
    pub batches: u64,
}


/// Iterator over batches of at most `batch_lines` corpus lines. The last
/// batch may be shorter, an empty corpus yields no batch at all.
pub struct Batches<R> {
    reader: R,
    batch_lines: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> Batches<R> {

    pub fn new(reader: R, batch_lines: usize) -> Self {
        Self { reader, batch_lines: batch_lines.max(1), buf: Vec::new(), done: false }
    }

    // invalid utf-8 is replaced rather than rejected, the bytes could not be
    // alphanumeric anyway
    fn read_line(&mut self) -> Result<Option<String>> {

        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None)
        }
        while matches!(self.buf.last(), Some(b'\n') | Some(b'\r')) {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

}

impl<R: BufRead> Iterator for Batches<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {

        if self.done {
            return None
        }

        let mut chunk = Vec::with_capacity(self.batch_lines.min(MAX_PREALLOC_LINES));
        while chunk.len() < self.batch_lines {
            match self.read_line() {
                Ok(Some(line)) => chunk.push(line),
                Ok(None) => {
                    self.done = true;
                    break
                },
                Err(e) => {
                    self.done = true;
                    return Some(Err(e))
                }
            }
        }

        if chunk.is_empty() { None } else { Some(Ok(chunk)) }
    }
}


/// Wall clock progress reporting, checked at batch boundaries.
pub struct Progress {
    every: Duration,
    last_report: Instant,
}

impl Progress {

    pub fn new(every: Duration) -> Self {
        Self { every, last_report: Instant::now() }
    }

    pub fn tick(&mut self, stats: &StreamStats, pairs: usize) -> bool {

        let now = Instant::now();
        if now.duration_since(self.last_report) < self.every {
            return false
        }
        info!("processed {} lines, {} batches, {} pairs in memory", stats.lines, stats.batches, pairs);
        self.last_report = now;
        true
    }

}


pub struct Counts {}

impl Counts {

    // `ids` is scratch space reused between lines
    pub fn process_batch<T: Tokenizer>(batch: &[String], tokenizer: &T, weights: &WeightTable, acc: &mut Accumulator, ids: &mut Vec<u32>) {

        for line in batch {
            tokenizer.tokenize(line, ids);
            window_pass(ids, weights, acc);
        }
    }

    /// Parallel version of `process_batch`, each worker folds lines into a
    /// private accumulator and the partials are summed once the batch is done.
    pub fn process_batch_par<T: Tokenizer + Sync>(pool: &ThreadPool, batch: &[String], tokenizer: &T, weights: &WeightTable) -> Accumulator {

        pool.install(|| {
            batch
            .par_iter()
            .fold(|| (Accumulator::new(), Vec::new()), |(mut acc, mut ids), line| {
                tokenizer.tokenize(line, &mut ids);
                window_pass(&ids, weights, &mut acc);
                (acc, ids)
            })
            .map(|(acc, _)| acc)
            .reduce(Accumulator::new, |mut a, b| {
                a.merge(b);
                a
            })
        })
    }

    /// Streams `corpus` batch by batch into one accumulator. Lines are dropped
    /// as soon as their batch is counted.
    pub fn run<R: BufRead, T: Tokenizer + Sync>(corpus: R, params: &StreamParams, tokenizer: &T, weights: &WeightTable) -> Result<(Accumulator, StreamStats)> {

        let pool = if params.num_threads > 1 {
            Some(ThreadPoolBuilder::new().num_threads(params.num_threads).build()?)
        } else {
            None
        };

        let mut acc = Accumulator::with_capacity(params.reserve_pairs);
        let mut stats = StreamStats::default();
        let mut progress = Progress::new(params.report_every);
        let mut ids: Vec<u32> = Vec::new();

        for batch in Batches::new(corpus, params.batch_lines) {

            let batch = batch?;
            match &pool {
                Some(pool) => acc.merge(Counts::process_batch_par(pool, &batch, tokenizer, weights)),
                None => Counts::process_batch(&batch, tokenizer, weights, &mut acc, &mut ids),
            }

            stats.lines += batch.len() as u64;
            stats.batches += 1;
            progress.tick(&stats, acc.len());
        }

        Ok((acc, stats))
    }

}


#[cfg(test)]
mod tests {

    use super::{Batches, Counts, Progress, StreamParams, StreamStats};
    use crate::accumulator::Accumulator;
    use crate::tokenizer::VocabTokenizer;
    use crate::vocab::VocabIndex;
    use crate::window::WeightTable;

    use std::io::Cursor;
    use std::time::Duration;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-4 * b.abs().max(1.0)
    }

    fn same_counts(a: &Accumulator, b: &Accumulator) -> bool {
        a.len() == b.len() && a.iter().all(|(k, v)| b.get(k.lo, k.hi).map_or(false, |w| close(v, w)))
    }

    fn params(batch_lines: usize, num_threads: usize) -> StreamParams {
        StreamParams { batch_lines, num_threads, reserve_pairs: 64, report_every: Duration::from_secs(3600) }
    }

    fn count(corpus: &str, index: &VocabIndex, window_size: i64, p: &StreamParams) -> (Accumulator, StreamStats) {
        let tok = VocabTokenizer::new(index);
        Counts::run(Cursor::new(corpus.as_bytes().to_vec()), p, &tok, &WeightTable::new(window_size)).unwrap()
    }

    #[test]
    fn batches_split_and_keep_tail() {

        let batches = Batches::new(Cursor::new("a\nb\nc\nd\ne"), 2)
        .collect::<Result<Vec<Vec<String>>, _>>()
        .unwrap();
        assert_eq!(batches, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    }

    #[test]
    fn batches_strip_line_endings_and_decode_lossily() {

        let raw: &[u8] = b"one\r\ntw\xffo\n\nthree\n";
        let batches = Batches::new(Cursor::new(raw), 10).collect::<Result<Vec<Vec<String>>, _>>().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec!["one".to_string(), "tw\u{fffd}o".to_string(), String::new(), "three".to_string()]);
    }

    #[test]
    fn empty_corpus_has_no_batches() {
        assert_eq!(Batches::new(Cursor::new(""), 3).count(), 0);
    }

    #[test]
    fn zero_batch_size_acts_as_one() {
        assert_eq!(Batches::new(Cursor::new("x\ny\n"), 0).count(), 2);
    }

    #[test]
    fn huge_batch_size_reads_whole_corpus() {
        let batches = Batches::new(Cursor::new("a\nb\nc\n"), usize::MAX / 2).collect::<Result<Vec<Vec<String>>, _>>().unwrap();
        assert_eq!(batches, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn huge_stream_knobs_still_count() {

        let index = VocabIndex::build(vec![("cat".to_string(), 2), ("sat".to_string(), 1)], 10);
        let p = StreamParams { batch_lines: usize::MAX / 2, reserve_pairs: usize::MAX, ..params(1, 1) };
        let (acc, stats) = count("cat sat\n", &index, 10, &p);

        assert_eq!(stats, StreamStats { lines: 1, batches: 1 });
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.get(0, 1), Some(1.0));
    }

    #[test]
    fn huge_window_counts_like_line_length() {
        let index = VocabIndex::build(vec![("cat".to_string(), 2), ("sat".to_string(), 1)], 10);
        let corpus = "cat sat cat sat cat\n";
        let (huge, _) = count(corpus, &index, i64::MAX, &params(1, 1));
        let (exact, _) = count(corpus, &index, 5, &params(1, 1));
        assert!(same_counts(&huge, &exact));
    }

    #[test]
    fn progress_respects_interval() {
        let stats = StreamStats { lines: 10, batches: 1 };
        assert!(!Progress::new(Duration::from_secs(3600)).tick(&stats, 5));
        assert!(Progress::new(Duration::ZERO).tick(&stats, 5));
    }

    #[test]
    fn cooc_test() {

        // golden counts computed by hand. short words ("a", "of", "me", ...) are
        // dropped before windowing, so distances are over the kept words only
        let sentences = "What you say makes a lot of sense to me , you are right\n\
                         Are you playing basketball just for fun or are you a pro ?\n";
        let index = VocabIndex::build(vec![("you".to_string(), 4), ("are".to_string(), 3), ("playing".to_string(), 1)], 3);

        let (acc, stats) = count(sentences, &index, 10, &params(1, 1));

        assert_eq!(stats, StreamStats { lines: 2, batches: 2 });
        let golden: [((u32, u32), f32); 5] = [
            ((0, 0), 1.0 + 1.0 / 3.0),
            ((0, 1), 1.5 + 1.0 + 0.25 + 0.5 + 1.0),
            ((1, 2), 0.5 + 1.0),
            ((1, 1), 1.0 / 3.0),
            ((0, 2), 1.0 + 0.5),
        ];
        assert_eq!(acc.len(), golden.len());
        for ((a, b), w) in golden {
            assert!(close(acc.get(a, b).unwrap(), w), "pair ({}, {})", a, b);
        }
    }

    #[test]
    fn filtered_line_gives_single_pair() {

        let index = VocabIndex::build(vec![("cat".to_string(), 2), ("sat".to_string(), 1)], 10);
        let (acc, _) = count("the cat sat on it\n", &index, 10, &params(10, 1));

        assert_eq!(acc.len(), 1);
        assert_eq!(acc.get(0, 1), Some(1.0));
    }

    #[test]
    fn zero_window_counts_nothing() {
        let index = VocabIndex::build(vec![("cat".to_string(), 2), ("sat".to_string(), 1)], 10);
        let (acc, stats) = count("cat sat cat sat\nsat cat\n", &index, 0, &params(10, 1));
        assert!(acc.is_empty());
        assert_eq!(stats.lines, 2);
    }

    #[test]
    fn empty_corpus_counts_nothing() {
        let index = VocabIndex::build(vec![("cat".to_string(), 2)], 10);
        let (acc, stats) = count("", &index, 10, &params(10, 1));
        assert!(acc.is_empty());
        assert_eq!(stats, StreamStats::default());
    }

    #[test]
    fn batch_size_and_threads_do_not_change_counts() {

        let words = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "oov", "xx"];
        let mut rng = StdRng::seed_from_u64(7);
        let mut corpus = String::new();
        for _ in 0..300 {
            let n = rng.gen_range(0..25);
            let line = (0..n).map(|_| words[rng.gen_range(0..words.len())]).collect::<Vec<&str>>().join(" ");
            corpus.push_str(&line);
            corpus.push('\n');
        }

        let ranked = words[..8].iter().enumerate().map(|(i, w)| (w.to_string(), (10 - i) as u64)).collect();
        let index = VocabIndex::build(ranked, 6);

        let (reference, _) = count(&corpus, &index, 4, &params(10000, 1));
        assert!(!reference.is_empty());
        for (batch_lines, threads) in [(1, 1), (7, 1), (64, 1), (1, 4), (13, 3), (1000, 2)] {
            let (acc, stats) = count(&corpus, &index, 4, &params(batch_lines, threads));
            assert_eq!(stats.lines, 300);
            assert!(same_counts(&acc, &reference), "batch_lines {} threads {}", batch_lines, threads);
        }
    }

    #[test]
    fn keys_stay_inside_vocabulary() {
        let index = VocabIndex::build(vec![("one".to_string(), 3), ("two".to_string(), 2), ("three".to_string(), 1)], 2);
        let (acc, _) = count("one two three one three two\n", &index, 5, &params(1, 1));
        for (key, _) in &acc {
            assert!(key.lo <= key.hi);
            assert!((key.hi as usize) < index.len());
        }
    }

}
