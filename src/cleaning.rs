
// imports
use crate::config::files_handling;
use crate::errors::{CoocError, Result};

use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use log::{info, warn};
use rayon::prelude::*;
use serde::Deserialize;


// one line of a wikiextractor json dump, other fields are ignored
#[derive(Deserialize)]
struct DumpEntry {
    text: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub files: u64,
    pub documents: u64,
    pub kept: u64,
    pub malformed: u64,
}

impl CleanStats {
    fn merge(&mut self, other: CleanStats) {
        self.files += other.files;
        self.documents += other.documents;
        self.kept += other.kept;
        self.malformed += other.malformed;
    }
}


/// Turns raw dump documents into single-line corpus documents: lower case
/// ascii letters separated by one space, stopwords and short words removed.
#[derive(Clone, Debug)]
pub struct TextCleaner {
    stopwords: HashSet<String>,
    min_word_length: usize,
    min_words: usize,
}

impl TextCleaner {

    pub const DEFAULT_MIN_WORD_LENGTH: usize = 2;
    pub const DEFAULT_MIN_WORDS: usize = 200;

    /// Words are kept when longer than `min_word_length`, documents when they
    /// keep more than `min_words` words.
    pub fn new(stopwords: HashSet<String>, min_word_length: usize, min_words: usize) -> Self {
        Self { stopwords, min_word_length, min_words }
    }

    // one stopword per line, blank lines ignored
    pub fn load_stopwords<R: BufRead>(reader: R) -> Result<HashSet<String>> {
        let mut stopwords = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                stopwords.insert(word.to_owned());
            }
        }
        Ok(stopwords)
    }

    /// `None` when too few words survive.
    pub fn clean_text(&self, text: &str) -> Option<String> {

        // anything that is not an ascii letter separates words, non ascii included
        let folded = text
        .chars()
        .map(|c| if c.is_ascii_alphabetic() { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>();

        let words = folded
        .split_whitespace()
        .filter(|w| w.len() > self.min_word_length && !self.stopwords.contains(*w))
        .collect::<Vec<&str>>();

        if words.len() > self.min_words { Some(words.join(" ")) } else { None }
    }

    /// Cleans the `text` field of one json line. Lines without it give `Ok(None)`.
    pub fn clean_json_line(&self, line: &str) -> Result<Option<String>> {
        let entry: DumpEntry = serde_json::from_str(line)?;
        Ok(entry.text.and_then(|text| self.clean_text(&text)))
    }

    /// Cleans every line of one dump file. Undecodable lines are logged and skipped.
    pub fn clean_file<R: BufRead>(&self, reader: R, name: &str) -> Result<(Vec<String>, CleanStats)> {

        let mut docs = Vec::new();
        let mut stats = CleanStats { files: 1, ..CleanStats::default() };

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue
            }
            stats.documents += 1;
            match self.clean_json_line(&line) {
                Ok(Some(doc)) => {
                    stats.kept += 1;
                    docs.push(doc);
                },
                Ok(None) => {},
                Err(e) => {
                    stats.malformed += 1;
                    warn!("error decoding json in {}: {}", name, e);
                }
            }
        }
        Ok((docs, stats))
    }

    /// Cleans `files` on the rayon pool, `files_per_round` at a time, and
    /// writes the kept documents one per line in file order.
    pub fn run<W: Write>(&self, files: &[PathBuf], files_per_round: usize, out: &mut W) -> Result<CleanStats> {

        let mut total = CleanStats::default();

        for round in files.chunks(files_per_round.max(1)) {

            let cleaned = round
            .par_iter()
            .map(|path| {
                let reader = files_handling::open_reader(path, "dump")?;
                self.clean_file(reader, &path.display().to_string())
            })
            .collect::<Result<Vec<(Vec<String>, CleanStats)>>>()?;

            for (docs, stats) in cleaned {
                for doc in docs {
                    out.write_all(doc.as_bytes())?;
                    out.write_all(b"\n")?;
                }
                total.merge(stats);
            }
            info!("processed {} of {} files, {} documents kept", total.files, files.len(), total.kept);
        }

        Ok(total)
    }

}


/// Files under the sub folders of `root` whose name contains `pattern`,
/// folders and files both in name order. Files directly under `root` are ignored.
pub fn find_dump_files<P: AsRef<Path>>(root: P, pattern: &str) -> Result<Vec<PathBuf>> {

    let root = root.as_ref();
    let mut files = Vec::new();

    for folder in sorted_entries(root)? {
        if !folder.is_dir() {
            continue
        }
        info!("processing folder: {}", folder.display());
        for file in sorted_entries(&folder)? {
            let matches = file.file_name().map_or(false, |n| n.to_string_lossy().contains(pattern));
            if file.is_file() && matches {
                files.push(file);
            }
        }
    }

    info!("found {} matching files to process", files.len());
    Ok(files)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
    .map_err(|e| CoocError::file_open("dump directory", dir, e))?
    .map(|entry| entry.map(|e| e.path()))
    .collect::<std::io::Result<Vec<PathBuf>>>()?;
    entries.sort();
    Ok(entries)
}
