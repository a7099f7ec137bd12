
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;


const VOCAB: &str = "word,id,word_count,document_count\n\
                     \"cat\",0,50,10\n\
                     \"sat\",1,40,10\n";

fn glove_cooc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_glove_cooc"))
    .args(args)
    .env("RUST_LOG", "warn")
    .output()
    .unwrap()
}

fn setup() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("vocab.csv"), VOCAB).unwrap();
    fs::write(dir.path().join("corpus.txt"), "the cat sat\n").unwrap();
    dir
}

fn path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).display().to_string()
}


#[test]
fn success_exits_zero_and_writes_matrix() {

    let dir = setup();
    let out = glove_cooc(&[&path(&dir, "vocab.csv"), &path(&dir, "corpus.txt"), &path(&dir, "out.csv"), "10", "50000"]);

    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let text = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let lines = text.lines().collect::<Vec<&str>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "word1,word2,weight");
    assert!(lines[1].starts_with("cat,sat,"));
    assert_eq!(lines[1].rsplit(',').next().unwrap().parse::<f32>().unwrap(), 1.0);
}

#[test]
fn optional_arguments_take_defaults() {
    let dir = setup();
    let out = glove_cooc(&[&path(&dir, "vocab.csv"), &path(&dir, "corpus.txt"), &path(&dir, "out.csv")]);
    assert_eq!(out.status.code(), Some(0));
    assert!(dir.path().join("out.csv").exists());
}

#[test]
fn too_few_arguments_print_usage_and_exit_one() {

    let dir = setup();
    let out = glove_cooc(&[&path(&dir, "vocab.csv"), &path(&dir, "corpus.txt")]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn no_arguments_exit_one() {
    let out = glove_cooc(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn bad_window_size_exits_one() {
    let dir = setup();
    let out = glove_cooc(&[&path(&dir, "vocab.csv"), &path(&dir, "corpus.txt"), &path(&dir, "out.csv"), "ten"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn missing_vocabulary_exits_one_with_role() {

    let dir = setup();
    let out = glove_cooc(&[&path(&dir, "nope.csv"), &path(&dir, "corpus.txt"), &path(&dir, "out.csv")]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to open vocabulary file"), "stderr: {}", stderr);
}

#[test]
fn missing_corpus_exits_one_with_role() {
    let dir = setup();
    let out = glove_cooc(&[&path(&dir, "vocab.csv"), &path(&dir, "nope.txt"), &path(&dir, "out.csv")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to open text file"));
}

#[test]
fn clean_writes_corpus_from_dump() {

    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("dump");
    fs::create_dir_all(dump.join("AA")).unwrap();
    fs::write(dump.join("AA").join("wiki_00"), "{\"id\": \"1\", \"text\": \"The cat sat on the mat.\"}\n{oops\n").unwrap();
    fs::write(dir.path().join("stop.txt"), "the\n").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_clean"))
    .arg("--output-dir").arg(&dump)
    .arg("--stopwords").arg(dir.path().join("stop.txt"))
    .arg("--csv").arg(dir.path().join("nested").join("corpus.txt"))
    .arg("--min-words").arg("1")
    .env("RUST_LOG", "error")
    .output()
    .unwrap();

    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read_to_string(dir.path().join("nested").join("corpus.txt")).unwrap(), "cat sat mat\n");
}

#[test]
fn clean_without_dump_directory_exits_one() {
    let dir = setup();
    fs::write(dir.path().join("stop.txt"), "the\n").unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_clean"))
    .arg("--output-dir").arg(dir.path().join("missing"))
    .arg("--stopwords").arg(dir.path().join("stop.txt"))
    .arg("--csv").arg(dir.path().join("c.txt"))
    .output()
    .unwrap();
    assert_eq!(out.status.code(), Some(1));
}
