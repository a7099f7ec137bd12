
pub mod accumulator;
pub mod cleaning;
pub mod config;
pub mod cooccurrence;
pub mod counting;
pub mod errors;
pub mod matrix;
pub mod run;
pub mod tokenizer;
pub mod vocab;
pub mod window;

pub use accumulator::{Accumulator, PairKey};
pub use cleaning::{find_dump_files, CleanStats, TextCleaner};
pub use config::{files_handling, Config, Params, USAGE};
pub use cooccurrence::{Counts, StreamParams, StreamStats};
pub use counting::VocabCounts;
pub use errors::{CoocError, Result};
pub use matrix::{CoocMatrix, Record};
pub use run::{Run, RunSummary};
pub use tokenizer::{tokenize, Tokenizer, VocabTokenizer};
pub use vocab::VocabIndex;
pub use window::{window_pass, WeightTable};
