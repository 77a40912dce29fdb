//! This crate is meant to be used as the foundation for a crossword-filling app.
//! It provides no UI itself, but see `crosstui` for an example of how you can use it
//! to produce a crossword app.
//!
//! The interesting part is the grid navigation and word state machine: cursor
//! movement, direction toggling, word boundaries, skipping filled or locked cells,
//! clue-to-clue jumps, completion tracking and clue cross-references. A [Session]
//! owns one loaded [Puzzle] plus the user's [Settings], and every mutation goes
//! through its operation set. Each operation returns a [Change] and the caller reads
//! derived state (active word, references, completion) back out to render it.
//!
//! Puzzles are loaded from `.puz` files, a de facto standard format for crossword
//! puzzles, via [parse_puz], or from any other source that can produce a
//! [PuzzleSource].

use Direction::{Across, Down};
use std::ops::Not;

mod checksum;
mod clues;
mod completion;
mod cursor;
mod grid;
mod puz;
mod session;
mod settings;
mod source;
mod word;
mod xref;

#[cfg(test)]
mod test_util;

pub use clues::{Clue, ClueIndex};
pub use completion::{ClueStatus, Completion};
pub use cursor::Cursor;
pub use grid::{Cell, Grid, MASK_LETTER, REDACTION_THRESHOLD};
pub use puz::{ChecksumMismatch, parse as parse_puz};
pub use session::{Change, Puzzle, Session};
pub use settings::{EndOfWord, RevealMode, Settings};
pub use source::{ClueLists, ClueSpec, PuzzleSource};
pub use word::WordSpan;
pub use xref::Reference;

/// The two crossword directions: `Across` and `Down`
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, PartialOrd, Ord)]
pub enum Direction {
  Across,
  Down,
}

impl Direction {
  /// The (row, column) step that moves one cell forward in this direction.
  pub fn delta(self) -> (isize, isize) {
    match self {
      Across => (0, 1),
      Down => (1, 0),
    }
  }
}

impl Not for Direction {
  type Output = Self;
  fn not(self) -> Self {
    match self {
      Across => Down,
      Down => Across,
    }
  }
}

impl std::fmt::Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Across => write!(f, "Across"),
      Down => write!(f, "Down"),
    }
  }
}

/// The errors that may be produced by functions in this crate.
///
/// None of the navigation operations produce errors: a move onto a block, an
/// edit of a locked cell, or a wrap search over an all-block grid simply leaves
/// the state unchanged. Errors only come from loading a puzzle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Unexpectedly reached the end of the file at the given byte index.
  #[error("unexpected end of file at byte {0:#x}")]
  EofError(usize),
  /// Something went wrong while parsing a .puz file.
  #[error("parse error: {0}")]
  ParseError(String),
  /// Got an error while decoding a string, possibly because it was incorrectly
  /// encoded or because this library attempted to use the wrong encoding.
  #[error("encoding error: {0}")]
  EncodingError(String),
  /// The given puz file was marked as "scrambled" which this crate doesn't support.
  #[error("scrambled puzzles are not supported")]
  ScrambledError,
  /// The puzzle source was readable but describes an inconsistent puzzle.
  #[error("invalid puzzle: {0}")]
  InvalidPuzzle(String),
  /// An [I/O error](std::io::Error) occurred.
  #[error(transparent)]
  IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn direction_flips() {
    assert_eq!(!Across, Down);
    assert_eq!(!!Across, Across);
    assert_eq!(Across.delta(), (0, 1));
    assert_eq!(Down.delta(), (1, 0));
  }

  #[test]
  fn errors_display() {
    assert_eq!(
      Error::EofError(0x34).to_string(),
      "unexpected end of file at byte 0x34"
    );
    assert_eq!(
      Error::InvalidPuzzle("bad".into()).to_string(),
      "invalid puzzle: bad"
    );
  }
}
