
// imports
use crate::cooccurrence::{Batches, StreamStats};
use crate::errors::Result;

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Write};
use csv::WriterBuilder;
use log::info;
use rayon::prelude::*;


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordStats {
    pub word_count: u64,     // total occurrences
    pub document_count: u64, // number of lines containing the word
}

/// Word and document frequencies of a corpus, one line being one document.
/// Produces the vocabulary file consumed by `VocabIndex::from_csv`.
#[derive(Clone, Debug, Default)]
pub struct VocabCounts {
    vocabulary: HashMap<String, WordStats>,
}

impl VocabCounts {

    pub fn new() -> Self {
        Self::default()
    }

    // lower cased, ascii punctuation removed, empty leftovers dropped
    pub fn clean_words(line: &str) -> Vec<String> {
        line
        .split_whitespace()
        .map(|w| w.to_lowercase().chars().filter(|c| !c.is_ascii_punctuation()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect()
    }

    pub fn add_line(&mut self, line: &str) {

        let words = VocabCounts::clean_words(line);
        let mut unique: HashSet<&str> = HashSet::with_capacity(words.len());

        for word in &words {
            if unique.insert(word) {
                // first sighting in this document
                let stats = self.vocabulary.entry(word.to_owned()).or_default();
                stats.word_count += 1;
                stats.document_count += 1;
            } else if let Some(stats) = self.vocabulary.get_mut(word.as_str()) {
                stats.word_count += 1;
            }
        }
    }

    pub fn merge(&mut self, other: VocabCounts) {
        for (word, stats) in other.vocabulary {
            let entry = self.vocabulary.entry(word).or_default();
            entry.word_count += stats.word_count;
            entry.document_count += stats.document_count;
        }
    }

    /// Counts a batch of lines on the rayon pool.
    pub fn count_batch(batch: &[String]) -> VocabCounts {
        batch
        .par_iter()
        .fold(VocabCounts::new, |mut counts, line| {
            counts.add_line(line);
            counts
        })
        .reduce(VocabCounts::new, |mut a, b| {
            a.merge(b);
            a
        })
    }

    pub fn run<R: BufRead>(corpus: R, batch_size: usize) -> Result<(VocabCounts, StreamStats)> {

        let mut counts = VocabCounts::new();
        let mut stats = StreamStats::default();

        for batch in Batches::new(corpus, batch_size) {

            let batch = batch?;
            let first = stats.lines + 1;
            counts.merge(VocabCounts::count_batch(&batch));
            stats.lines += batch.len() as u64;
            stats.batches += 1;

            info!("processed rows: {:>8} - {:>8} ({} rows) | total processed: {} | vocabulary size: {}",
                first, stats.lines, batch.len(), stats.lines, counts.len());
        }

        Ok((counts, stats))
    }

    pub fn get(&self, word: &str) -> Option<WordStats> {
        self.vocabulary.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Most frequent first, ties broken alphabetically.
    pub fn ranked(&self) -> Vec<(&str, WordStats)> {
        let mut tup = self.vocabulary
        .iter()
        .map(|(w, s)| (w.as_str(), *s))
        .collect::<Vec<(&str, WordStats)>>();
        tup.sort_by(|a, b| b.1.word_count.cmp(&a.1.word_count).then_with(|| a.0.cmp(b.0)));
        tup
    }

    /// Writes `word,index,word_count,document_count` rows in rank order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {

        let mut wrt = WriterBuilder::new().from_writer(writer);
        wrt.write_record(["word", "index", "word_count", "document_count"])?;

        let ranked = self.ranked();
        for (index, (word, stats)) in ranked.iter().enumerate() {
            wrt.serialize((word, index, stats.word_count, stats.document_count))?;
        }
        wrt.flush()?;
        Ok(ranked.len())
    }

}
