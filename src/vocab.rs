
// imports
use crate::errors::{CoocError, Result};
use crate::tokenizer::{is_countable, normalize};

use std::collections::HashMap;
use std::io::Read;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;


/// Immutable word <-> id mapping. Ids are dense in `[0, len)` and follow the
/// frequency rank, the most frequent word gets id 0.
#[derive(Clone, Debug, Default)]
pub struct VocabIndex {
    t2i: HashMap<String, u32>,
    i2t: Vec<String>,
}

/// What happened to the rows of a vocabulary file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: u64,
    pub malformed: u64,
    pub too_short: u64,
}

impl VocabIndex {

    pub fn build(ranked_words: Vec<(String, u64)>, limit: usize) -> VocabIndex {

        // words are normalized the same way corpus tokens are, so that lookups agree.
        // the sort is stable: input order breaks ties, and pre-sorted input stays as is
        let mut tup = ranked_words
        .into_iter()
        .map(|(w, c)| (normalize(&w), c))
        .filter(|(w, _)| is_countable(w))
        .collect::<Vec<(String, u64)>>();
        tup.sort_by(|a, b| b.1.cmp(&a.1));

        let cap = limit.min(tup.len());
        let mut t2i: HashMap<String, u32> = HashMap::with_capacity(cap);
        let mut i2t: Vec<String> = Vec::with_capacity(cap);

        for (word, _) in tup {
            if i2t.len() >= limit {
                break
            }
            // first occurrence wins when two raw words normalize to the same key
            if t2i.contains_key(&word) {
                debug!("duplicate vocabulary word '{}' skipped", word);
                continue
            }
            t2i.insert(word.clone(), i2t.len() as u32);
            i2t.push(word);
        }

        VocabIndex { t2i, i2t }
    }

    /// Reads a `word,id,word_count,document_count` file with a header row and
    /// keeps the `limit` most frequent words. Unusable rows are skipped.
    pub fn from_csv<R: Read>(reader: R, limit: usize) -> Result<(VocabIndex, LoadReport)> {

        let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

        let mut report = LoadReport::default();
        let mut ranked: Vec<(String, u64)> = Vec::new();
        let mut record = StringRecord::new();

        loop {
            match rdr.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {},
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    // a row that is not valid utf-8 and such
                    report.rows += 1;
                    report.malformed += 1;
                    debug!("skipping vocabulary row: {}", e);
                    continue
                }
            }
            report.rows += 1;

            match VocabIndex::parse_record(&record) {
                Ok(Some(entry)) => ranked.push(entry),
                Ok(None) => report.too_short += 1,
                Err(e) => {
                    report.malformed += 1;
                    debug!("skipping vocabulary row: {}", e);
                }
            }
        }

        Ok((VocabIndex::build(ranked, limit), report))
    }

    /// Extracts `(normalized word, word_count)` from one vocabulary row.
    /// `Ok(None)` means the word is too short to be indexed.
    pub fn parse_record(record: &StringRecord) -> Result<Option<(String, u64)>> {

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() < 4 {
            return Err(CoocError::MalformedRecord { line, reason: format!("expected 4 fields, found {}", record.len()) });
        }

        let count_str = &record[2];
        let count = count_str.parse::<u64>().map_err(|_| {
            CoocError::MalformedRecord { line, reason: format!("word_count '{}' is not a number", count_str) }
        })?;

        let word = normalize(&record[0]);
        if !is_countable(&word) {
            return Ok(None)
        }
        Ok(Some((word, count)))
    }

    pub fn id_of(&self, word: &str) -> Option<u32> {
        self.t2i.get(word).copied()
    }

    pub fn word_of(&self, id: u32) -> Option<&str> {
        self.i2t.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2t.is_empty()
    }

    /// Words in id order.
    pub fn words(&self) -> &[String] {
        &self.i2t
    }

}
