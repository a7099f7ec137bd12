
// imports
use crate::accumulator::{Accumulator, PairKey};
use crate::errors::Result;
use crate::vocab::VocabIndex;

use std::io::Write;
use csv::WriterBuilder;
use serde::Serialize;


#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record<'a> {
    pub word1: &'a str,
    pub word2: &'a str,
    pub weight: f32,
}

/// Read-only view joining accumulated pairs with their words.
pub struct CoocMatrix<'a> {
    accumulator: &'a Accumulator,
    index: &'a VocabIndex,
}

impl<'a> CoocMatrix<'a> {

    pub fn new(accumulator: &'a Accumulator, index: &'a VocabIndex) -> Self {
        Self { accumulator, index }
    }

    pub fn len(&self) -> usize {
        self.accumulator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulator.is_empty()
    }

    fn resolve(&self, key: PairKey, weight: f32) -> Option<Record<'a>> {
        Some(Record {
            word1: self.index.word_of(key.lo)?,
            word2: self.index.word_of(key.hi)?,
            weight,
        })
    }

    // hash order, word1 carries the lower id
    pub fn records(&self) -> impl Iterator<Item = Record<'a>> + '_ {

        // ids only ever come from the index, so every key resolves
        self.accumulator.iter().filter_map(move |(key, weight)| {
            let record = self.resolve(key, weight);
            debug_assert!(record.is_some(), "pair {:?} is outside the vocabulary", key);
            record
        })
    }

    /// Writes `word1,word2,weight` and one row per entry, returns the row count.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {

        let mut wrt = WriterBuilder::new().has_headers(false).from_writer(writer);
        wrt.write_record(["word1", "word2", "weight"])?;

        let mut rows = 0;
        for record in self.records() {
            wrt.serialize(&record)?;
            rows += 1;
        }
        wrt.flush()?;
        Ok(rows)
    }

}
