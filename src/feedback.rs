//! Grading guesses against answers.

use std::fmt::Display;

use crate::words::{ALPHABET_SIZE, MAX_WORD_LEN};

/// A Wordle "grade" that indicates the correctness of a letter in a guess.
///
/// `Correct` means that the letter is in the correct position.
/// `Present` means that the letter is in the word, but not in that position.
/// `Absent` means that the word does not contain (any more of) that letter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Grade {
    /// A grade that indicates the letter guessed is not in the word.
    Absent,

    /// A grade that indicates the letter guessed is in the word, but not there.
    Present,

    /// A grade that indicates the letter guessed is in the correct position.
    Correct,
}

impl Grade {
    fn digit(self) -> u32 {
        match self {
            Grade::Absent => 0,
            Grade::Present => 1,
            Grade::Correct => 2,
        }
    }

    fn from_digit(digit: u32) -> Self {
        match digit {
            0 => Grade::Absent,
            1 => Grade::Present,
            _ => Grade::Correct,
        }
    }

    /// Reads `b`/`x`/`0` as absent, `y`/`1` as present, and `g`/`2` as correct.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' | 'x' | '0' => Some(Grade::Absent),
            'y' | '1' => Some(Grade::Present),
            'g' | '2' => Some(Grade::Correct),
            _ => None,
        }
    }

    pub fn emoji(self) -> char {
        match self {
            Grade::Absent => '⬛',
            Grade::Present => '🟨',
            Grade::Correct => '🟩',
        }
    }
}

/// How repeated letters are graded.
///
/// The same mode must be used to grade the hidden answer and to evaluate
/// guesses, otherwise pruning can discard the answer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Scoring {
    /// Real Wordle rules. A guess never receives more [`Grade::Correct`] and
    /// [`Grade::Present`] marks for a letter than the answer has copies of it.
    Standard,

    /// The easy variant. Every guessed letter that appears anywhere in the
    /// answer is marked, no matter how many times it was guessed.
    Lenient,
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring::Standard
    }
}

impl Display for Scoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scoring::Standard => write!(f, "standard"),
            Scoring::Lenient => write!(f, "lenient"),
        }
    }
}

/// The feedback for one guess: a [`Grade`] per letter.
///
/// Stored as a base-3 number with the first letter in the least significant
/// digit, so patterns are cheap to hash and compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern {
    code: u32,
    len: u8,
}

impl Pattern {
    /// Builds a pattern from grades in letter order.
    ///
    /// # Panics
    ///
    /// Panics if there are more than [`MAX_WORD_LEN`] grades.
    pub fn from_grades(grades: &[Grade]) -> Self {
        assert!(grades.len() <= MAX_WORD_LEN);
        let code = grades
            .iter()
            .rev()
            .fold(0_u32, |acc, grade| acc * 3 + grade.digit());
        Pattern {
            code,
            len: grades.len() as u8,
        }
    }

    /// The pattern where every letter is correct.
    pub fn solved(len: usize) -> Self {
        Self::from_grades(&[Grade::Correct; MAX_WORD_LEN][..len])
    }

    /// Parses strings such as `"bygbb"` or `"01200"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use wordle_solver::{Grade::*, Pattern};
    /// let pattern = Pattern::parse("gybbb").unwrap();
    /// assert_eq!(pattern, Pattern::from_grades(&[Correct, Present, Absent, Absent, Absent]));
    /// assert!(Pattern::parse("gyzbb").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let grades = s
            .trim()
            .chars()
            .map(Grade::from_char)
            .collect::<Option<Vec<_>>>()?;
        if grades.is_empty() || grades.len() > MAX_WORD_LEN {
            return None;
        }
        Some(Self::from_grades(&grades))
    }

    pub(crate) fn from_code(code: u32, len: usize) -> Self {
        Pattern {
            code,
            len: len as u8,
        }
    }

    pub(crate) fn code(self) -> u32 {
        self.code
    }

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The grades in letter order.
    pub fn grades(self) -> impl Iterator<Item = Grade> {
        let mut code = self.code;
        (0..self.len).map(move |_| {
            let grade = Grade::from_digit(code % 3);
            code /= 3;
            grade
        })
    }

    /// Returns true if every letter is [`Grade::Correct`].
    pub fn is_solved(self) -> bool {
        self.grades().all(|g| g == Grade::Correct)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for grade in self.grades() {
            write!(f, "{}", grade.emoji())?;
        }
        Ok(())
    }
}

fn letter(c: u8) -> usize {
    (c.to_ascii_uppercase() - b'A') as usize
}

/// Grades `guess` against `answer`.
///
/// Exact matches are marked first and use up a copy of their letter. The
/// remaining letters are then marked present while the answer still has an
/// unused copy of them. With [`Scoring::Lenient`] copies are never used up.
///
/// Both words must be ASCII letters of the same length.
///
/// # Examples
///
/// ```rust
/// # use wordle_solver::{feedback::grade, Pattern, Scoring};
/// let pattern = grade(b"SPOOL", b"SOBER", Scoring::Standard);
/// assert_eq!(pattern, Pattern::parse("gbybb").unwrap());
///
/// let pattern = grade(b"SPOOL", b"SOBER", Scoring::Lenient);
/// assert_eq!(pattern, Pattern::parse("gbyyb").unwrap());
/// ```
pub fn grade(guess: &[u8], answer: &[u8], scoring: Scoring) -> Pattern {
    debug_assert_eq!(guess.len(), answer.len());
    debug_assert!(
        guess.iter().chain(answer).all(u8::is_ascii_alphabetic),
        "only ASCII letters can be graded"
    );
    let len = guess.len();

    let mut grades = [Grade::Absent; MAX_WORD_LEN];
    let mut budget = [0_u8; ALPHABET_SIZE];
    for &c in answer {
        budget[letter(c)] += 1;
    }
    let consume = scoring == Scoring::Standard;

    for (i, (&g, &a)) in guess.iter().zip(answer).enumerate() {
        if g.eq_ignore_ascii_case(&a) {
            grades[i] = Grade::Correct;
            if consume {
                budget[letter(g)] -= 1;
            }
        }
    }

    for (i, &g) in guess.iter().enumerate() {
        if grades[i] == Grade::Correct {
            continue;
        }
        let remaining = &mut budget[letter(g)];
        if *remaining > 0 {
            grades[i] = Grade::Present;
            if consume {
                *remaining -= 1;
            }
        }
    }

    Pattern::from_grades(&grades[..len])
}
