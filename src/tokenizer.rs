
// imports
use crate::vocab::VocabIndex;

/// Words of this many chars or fewer are never counted.
pub const MIN_WORD_LEN: usize = 2;

/// Keeps the alphanumeric chars of `raw`, lower cased. Char based, so
/// non-ascii letters survive (`Éte` -> `éte`).
pub fn normalize(raw: &str) -> String {

    let mut clean = String::with_capacity(raw.len());
    for c in raw.chars().filter(|c| c.is_alphanumeric()) {
        clean.extend(c.to_lowercase());
    }
    clean
}

/// A normalized word long enough to be indexed or counted.
pub fn is_countable(clean: &str) -> bool {
    clean.chars().count() > MIN_WORD_LEN
}


// defines the behavior needed for turning a corpus line into token ids
pub trait Tokenizer {
    // `out` is cleared first, it is reused across lines to avoid allocations
    fn tokenize(&self, line: &str, out: &mut Vec<u32>);
}


/// Whitespace tokenizer that keeps only in-vocabulary words.
pub struct VocabTokenizer<'a> {
    index: &'a VocabIndex,
}

impl<'a> VocabTokenizer<'a> {

    pub fn new(index: &'a VocabIndex) -> Self {
        Self { index }
    }

}

impl Tokenizer for VocabTokenizer<'_> {

    fn tokenize(&self, line: &str, out: &mut Vec<u32>) {

        // short and out of vocabulary tokens are elided, not replaced, so the
        // window runs over the surviving ids only
        out.clear();
        for raw in line.split_whitespace() {
            let clean = normalize(raw);
            if !is_countable(&clean) {
                continue
            }
            if let Some(id) = self.index.id_of(&clean) {
                out.push(id);
            }
        }
    }
}

/// Convenience wrapper returning a fresh id sequence.
pub fn tokenize(line: &str, index: &VocabIndex) -> Vec<u32> {
    let mut ids = Vec::new();
    VocabTokenizer::new(index).tokenize(line, &mut ids);
    ids
}
