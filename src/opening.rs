//! Persisting the opening guess between runs.
//!
//! Computing the best first guess against a full answer list is by far the
//! most expensive step of a batch, and its result only depends on the word
//! lists and scoring. [`OpeningCache`] stores it as a single word in a text
//! file.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    words::{Dictionary, Word},
    Result,
};

/// The file conventionally used to cache the opening guess.
pub const DEFAULT_PATH: &str = "first_guess.txt";

/// A text file holding one precomputed opening guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpeningCache {
    path: PathBuf,
}

impl Default for OpeningCache {
    fn default() -> Self {
        OpeningCache::new(DEFAULT_PATH)
    }
}

impl OpeningCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OpeningCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached word, if there is a usable one.
    ///
    /// A missing or empty file yields `None`. So does a word that is not in
    /// `dict`, which means the file was written for different word lists. I/O
    /// errors other than a missing file are logged and treated as a miss.
    pub fn load(&self, dict: &Dictionary) -> Option<Word> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no cached opening at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("could not read {}: {}", self.path.display(), e);
                return None;
            }
        };

        let text = contents.trim();
        if text.is_empty() {
            warn!("{} is empty, ignoring it", self.path.display());
            return None;
        }

        match dict.word(text) {
            Ok(word) => {
                info!("using cached opening {} from {}", text, self.path.display());
                Some(word)
            }
            Err(_) => {
                warn!(
                    "cached opening \"{}\" in {} is not in the current word list, recomputing",
                    text,
                    self.path.display()
                );
                None
            }
        }
    }

    /// Overwrites the file with `word`.
    pub fn store(&self, dict: &Dictionary, word: Word) -> Result<()> {
        fs::write(&self.path, format!("{}\n", dict.text(word)))?;
        info!("cached opening {} in {}", dict.text(word), self.path.display());
        Ok(())
    }
}
