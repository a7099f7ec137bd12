
use crate::errors::{CoocError, Result};

use serde::Deserialize;
use std::fmt::Display;
use std::fs::File;
use std::path::Path;


pub const USAGE: &str = "<vocabulary_file> <text_file> <output_file> [window_size=10] [top_words=50000]";

fn default_window_size() -> i64 { 10 }
fn default_top_words() -> usize { 50000 }
fn default_batch_lines() -> usize { 10000 }
fn default_num_threads() -> usize { 1 }
fn default_reserve_pairs() -> usize { 1_000_000 }
fn default_report_secs() -> u64 { 30 }

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Params {
    pub vocab_file: String,
    pub corpus_file: String,
    pub output_file: String,
    #[serde(default = "default_window_size")]
    pub window_size: i64,
    #[serde(default = "default_top_words")]
    pub top_words: usize,
    #[serde(default = "default_batch_lines")]
    pub batch_lines: usize,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    #[serde(default = "default_reserve_pairs")]
    pub reserve_pairs: usize,
    #[serde(default = "default_report_secs")]
    pub report_secs: u64,
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using params:
        vocab_file: {}
        corpus_file: {}
        output_file: {}
        window_size: {}
        top_words: {}
        batch_lines: {}
        num_threads: {}
        reserve_pairs: {}
        report_secs: {}",
        self.vocab_file, self.corpus_file, self.output_file, self.window_size, self.top_words,
        self.batch_lines, self.num_threads, self.reserve_pairs, self.report_secs)
    }
}

pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        self.params.clone()
    }

    /// `args` includes the program name, as returned by `env::args`.
    pub fn new(args: &[String]) -> Result<Config> {

        // a lone json argument carries every parameter, tunables included
        if args.len() == 2 && args[1].ends_with(".json") {
            return Config::from_json(&args[1])
        }

        if args.len() < 4 {
            return Err(CoocError::argument(format!("expected at least 3 arguments, got {}", args.len().saturating_sub(1))));
        }
        if args.len() > 6 {
            return Err(CoocError::argument(format!("expected at most 5 arguments, got {}", args.len() - 1)));
        }

        let window_size = match args.get(4) {
            Some(window_size) => window_size.trim().parse::<i64>()
                .map_err(|_| CoocError::argument(format!("window_size '{}' is not an integer", window_size)))?,
            None => default_window_size()
        };
        let top_words = match args.get(5) {
            Some(top_words) => top_words.trim().parse::<usize>()
                .map_err(|_| CoocError::argument(format!("top_words '{}' is not a non negative integer", top_words)))?,
            None => default_top_words()
        };

        let params = Params {
            vocab_file: args[1].to_owned(),
            corpus_file: args[2].to_owned(),
            output_file: args[3].to_owned(),
            window_size,
            top_words,
            batch_lines: default_batch_lines(),
            num_threads: default_num_threads(),
            reserve_pairs: default_reserve_pairs(),
            report_secs: default_report_secs(),
        };

        Config::validated(params)
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Config> {

        let path = path.as_ref();
        let f = File::open(path).map_err(|e| CoocError::file_open("parameter", path, e))?;
        let params: Params = serde_json::from_reader(std::io::BufReader::new(f))?;
        Config::validated(params)
    }

    fn validated(params: Params) -> Result<Config> {

        if params.batch_lines == 0 {
            return Err(CoocError::argument("batch_lines must be at least 1"));
        }
        if params.num_threads == 0 {
            return Err(CoocError::argument("num_threads must be at least 1"));
        }
        Ok(Config { params })
    }

}


pub mod files_handling {

    // opening of input and output files, `.gz` paths are (de)compressed on the fly

    use crate::errors::{CoocError, Result};

    use std::fs::File;
    use std::io::{BufRead, BufReader, BufWriter, Write};
    use std::path::Path;
    use flate2::Compression;
    use flate2::read::MultiGzDecoder;
    use flate2::write::GzEncoder;

    fn is_gz(path: &Path) -> bool {
        path.extension().map_or(false, |ext| ext == "gz")
    }

    /// `role` names the file in the error ("vocabulary", "text", ...).
    pub fn open_reader<P: AsRef<Path>>(path: P, role: &'static str) -> Result<Box<dyn BufRead + Send>> {

        let path = path.as_ref();
        let f = File::open(path).map_err(|e| CoocError::file_open(role, path, e))?;
        if is_gz(path) {
            Ok(Box::new(BufReader::new(MultiGzDecoder::new(BufReader::new(f)))))
        } else {
            Ok(Box::new(BufReader::new(f)))
        }
    }

    pub fn create_writer<P: AsRef<Path>>(path: P, role: &'static str) -> Result<OutputFile> {

        let path = path.as_ref();
        let f = BufWriter::new(File::create(path).map_err(|e| CoocError::file_open(role, path, e))?);
        if is_gz(path) {
            Ok(OutputFile::Gz(GzEncoder::new(f, Compression::default())))
        } else {
            Ok(OutputFile::Plain(f))
        }
    }

    /// Output sink, call `finish` so that errors on the last write (or the gzip
    /// trailer) are reported instead of lost on drop.
    pub enum OutputFile {
        Plain(BufWriter<File>),
        Gz(GzEncoder<BufWriter<File>>),
    }

    impl OutputFile {

        pub fn finish(self) -> Result<()> {
            match self {
                OutputFile::Plain(mut w) => w.flush()?,
                OutputFile::Gz(w) => w.finish()?.flush()?,
            }
            Ok(())
        }

    }

    impl Write for OutputFile {

        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            match self {
                OutputFile::Plain(w) => w.write(buf),
                OutputFile::Gz(w) => w.write(buf),
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            match self {
                OutputFile::Plain(w) => w.flush(),
                OutputFile::Gz(w) => w.flush(),
            }
        }
    }

}
