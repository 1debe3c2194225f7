use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::word::{classify, CharClass, Word};

static BOOK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/books");

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("no built-in book named `{0}`")]
    UnknownBook(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid word list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("book `{0}` has no spellable words")]
    Empty(String),
}

/// A named list of words to practise.
#[derive(Deserialize, Clone, Debug)]
pub struct Book {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub words: Vec<Word>,
}

// Word files may be a full book or just an array of words.
#[derive(Deserialize)]
#[serde(untagged)]
enum BookFile {
    Book(Book),
    Words(Vec<Word>),
}

impl Book {
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.words.shuffle(rng);
    }

    pub fn truncate(&mut self, limit: usize) {
        self.words.truncate(limit.max(1));
    }
}

/// Names of the books compiled into the binary, sorted.
pub fn builtin_names() -> Vec<String> {
    BOOK_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
        .filter_map(|f| f.path().file_stem()?.to_str().map(str::to_string))
        .sorted()
        .collect()
}

pub fn load_builtin(name: &str) -> Result<Book, WordSourceError> {
    let file = BOOK_DIR
        .get_file(format!("{name}.json"))
        .ok_or_else(|| WordSourceError::UnknownBook(name.to_string()))?;
    let contents = file
        .contents_utf8()
        .ok_or_else(|| WordSourceError::UnknownBook(name.to_string()))?;
    parse_book(contents, name)
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Book, WordSourceError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| WordSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fallback = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("custom");
    parse_book(&contents, fallback)
}

/// Parses a book and drops words that have nothing to type.
pub fn parse_book(json: &str, fallback_name: &str) -> Result<Book, WordSourceError> {
    let mut book = match serde_json::from_str::<BookFile>(json)? {
        BookFile::Book(book) => book,
        BookFile::Words(words) => Book {
            name: fallback_name.to_string(),
            description: String::new(),
            words,
        },
    };

    book.words.retain(|word| {
        if word.inputtable_count() == 0 {
            warn!("dropping word {} ({:?}): no letters to type", word.id, word.text);
            return false;
        }
        if word.text.chars().any(|c| classify(c) == CharClass::Other) {
            warn!(
                "word {} ({:?}) has characters that are filled in, not typed",
                word.id, word.text
            );
        }
        true
    });

    if book.words.is_empty() {
        return Err(WordSourceError::Empty(book.name));
    }
    Ok(book)
}
