//! Word lists and the compact [`Word`] handle.

use std::{collections::HashMap, fmt::Display, fs, path::Path};

use log::{debug, warn};

use crate::{Result, WordError, WordleError};

/// The longest word this crate can grade.
///
/// A [`Pattern`](crate::Pattern) stores one base-3 digit per letter in a
/// `u32`, and 3^20 is the largest power of three that leaves room for the
/// cache's "not computed" marker.
pub const MAX_WORD_LEN: usize = 20;

/// The number of letters in the alphabet.
pub const ALPHABET_SIZE: usize = 26;

/// A word from a [`Dictionary`].
///
/// This is a handle into the dictionary it was created from, so it is cheap
/// to copy, hash, and compare. Two words from the same dictionary are equal
/// exactly when their letters are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word {
    pub(crate) index: u32,
}

impl Word {
    pub(crate) fn from_index(index: usize) -> Self {
        Word {
            index: index as u32,
        }
    }

    /// The position of this word in its dictionary.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// The answer and guess dictionaries for one solver.
///
/// Answers occupy the leading indices, followed by any allowed guesses that
/// can never be the answer. Every word has the same length and is stored in
/// uppercase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<String>,
    lookup: HashMap<String, Word>,
    num_answers: usize,
    word_len: usize,
}

impl Dictionary {
    /// Builds a dictionary in which the answers are also the only guesses.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use wordle_solver::Dictionary;
    /// let dict = Dictionary::new(["crane", "SLATE", "Trace"])?;
    /// assert_eq!(dict.num_answers(), 3);
    /// assert_eq!(dict.text(dict.word("slate")?), "SLATE");
    /// # Ok::<_, wordle_solver::WordleError>(())
    /// ```
    pub fn new<I, S>(answers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_guesses(answers, std::iter::empty::<&str>())
    }

    /// Builds a dictionary from answers plus a (possibly overlapping) list of
    /// extra allowed guesses.
    pub fn with_guesses<A, G, S, T>(answers: A, guesses: G) -> Result<Self>
    where
        A: IntoIterator<Item = S>,
        G: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut dict = Dictionary {
            words: Vec::new(),
            lookup: HashMap::new(),
            num_answers: 0,
            word_len: 0,
        };

        for (i, line) in answers.into_iter().enumerate() {
            dict.push(i + 1, line.as_ref())?;
        }
        dict.num_answers = dict.words.len();
        if dict.num_answers == 0 {
            return Err(WordError::EmptyDictionary.into());
        }

        for (i, line) in guesses.into_iter().enumerate() {
            dict.push(i + 1, line.as_ref())?;
        }

        debug!(
            "dictionary has {} answers and {} guesses of length {}",
            dict.num_answers,
            dict.words.len(),
            dict.word_len
        );
        Ok(dict)
    }

    /// Reads a dictionary from an answer file and an optional guess file.
    ///
    /// Each file holds one word per line. Blank lines are skipped and every
    /// word is upper-cased. A missing answer file is an error.
    pub fn load(answers: impl AsRef<Path>, guesses: Option<&Path>) -> Result<Self> {
        let answers = read_list(answers.as_ref())?;
        match guesses {
            Some(path) => {
                let guesses = read_list(path)?;
                Self::with_guesses(answers.lines(), guesses.lines())
            }
            None => Self::new(answers.lines()),
        }
    }

    fn push(&mut self, line: usize, raw: &str) -> Result<()> {
        let word = raw.trim();
        if word.is_empty() {
            return Ok(());
        }
        if !word.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(WordError::NotAlphabetic {
                line,
                word: word.to_string(),
            }
            .into());
        }

        let len = word.len();
        if self.word_len == 0 {
            if len > MAX_WORD_LEN {
                return Err(WordError::UnsupportedLength {
                    line,
                    found: len,
                    max: MAX_WORD_LEN,
                }
                .into());
            }
            self.word_len = len;
        } else if len != self.word_len {
            return Err(WordError::WrongLength {
                line,
                word: word.to_string(),
                expected: self.word_len,
                found: len,
            }
            .into());
        }

        let word = word.to_ascii_uppercase();
        if let Some(&existing) = self.lookup.get(&word) {
            // answers repeated in the guess list are expected
            if self.num_answers == 0 || !self.is_answer(existing) {
                warn!("line {}: skipping duplicate word {}", line, word);
            }
            return Ok(());
        }

        let handle = Word::from_index(self.words.len());
        self.lookup.insert(word.clone(), handle);
        self.words.push(word);
        Ok(())
    }

    /// Looks up a word in any case.
    pub fn word(&self, text: &str) -> Result<Word> {
        let upper = text.trim().to_ascii_uppercase();
        self.lookup
            .get(&upper)
            .copied()
            .ok_or_else(|| WordError::NotInWordlist(upper).into())
    }

    /// Looks up a word and checks that it could be the hidden answer.
    pub fn answer(&self, text: &str) -> Result<Word> {
        let word = self.word(text)?;
        if self.is_answer(word) {
            Ok(word)
        } else {
            Err(WordError::NotAnAnswer(self.text(word).to_string()).into())
        }
    }

    /// The uppercase letters of a word.
    pub fn text(&self, word: Word) -> &str {
        &self.words[word.index()]
    }

    pub(crate) fn letters(&self, word: Word) -> &[u8] {
        self.words[word.index()].as_bytes()
    }

    pub fn is_answer(&self, word: Word) -> bool {
        word.index() < self.num_answers
    }

    /// The length every word in this dictionary shares.
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn num_answers(&self) -> usize {
        self.num_answers
    }

    /// The number of allowed guesses, answers included.
    pub fn num_guesses(&self) -> usize {
        self.words.len()
    }

    /// Every possible answer, in dictionary order.
    pub fn answers(&self) -> impl ExactSizeIterator<Item = Word> + Clone {
        (0..self.num_answers).map(Word::from_index)
    }

    /// Every allowed guess, in dictionary order.
    pub fn guesses(&self) -> impl ExactSizeIterator<Item = Word> + Clone {
        (0..self.words.len()).map(Word::from_index)
    }

    /// Wraps a word so that it prints as its letters.
    pub fn display(&self, word: Word) -> Spelled<'_> {
        Spelled { dict: self, word }
    }
}

/// A [`Word`] paired with its dictionary for printing.
#[derive(Clone, Copy, Debug)]
pub struct Spelled<'a> {
    dict: &'a Dictionary,
    word: Word,
}

impl Display for Spelled<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dict.text(self.word))
    }
}

fn read_list(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| WordleError::WordList {
        path: path.to_path_buf(),
        source,
    })
}
