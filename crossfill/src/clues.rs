use crate::Direction;
use crate::Direction::{Across, Down};
use std::collections::HashMap;

/// A numbered clue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
  pub number: u16,
  pub direction: Direction,
  /// Grid index of the first cell of the clue's word.
  pub start: usize,
  pub text: String,
}

/// The Across and Down clue lists of a loaded puzzle, each in ascending number
/// order, with lookups by start cell and by number. Built once per puzzle.
#[derive(Debug, Clone, Default)]
pub struct ClueIndex {
  across: Vec<Clue>,
  down: Vec<Clue>,
  /// Mapping from (direction, start index) to the clue's position in its list.
  by_start: HashMap<(Direction, usize), usize>,
}

impl ClueIndex {
  /// Both lists must already be sorted by number.
  pub(crate) fn new(across: Vec<Clue>, down: Vec<Clue>) -> Self {
    let by_start = across
      .iter()
      .enumerate()
      .chain(down.iter().enumerate())
      .map(|(i, clue)| ((clue.direction, clue.start), i))
      .collect();

    Self {
      across,
      down,
      by_start,
    }
  }

  /// The clues for `direction`, in number order.
  pub fn list(&self, direction: Direction) -> &[Clue] {
    match direction {
      Across => &self.across,
      Down => &self.down,
    }
  }

  /// Position within [ClueIndex::list] of the clue whose word starts at `start`.
  pub fn position(&self, direction: Direction, start: usize) -> Option<usize> {
    self.by_start.get(&(direction, start)).copied()
  }

  /// The clue whose word starts at `start`, if any.
  pub fn at_start(&self, direction: Direction, start: usize) -> Option<&Clue> {
    self
      .position(direction, start)
      .map(|i| &self.list(direction)[i])
  }

  /// Looks up a clue like `12 Down` by its number.
  pub fn by_number(&self, direction: Direction, number: u16) -> Option<&Clue> {
    let list = self.list(direction);
    list
      .binary_search_by_key(&number, |c| c.number)
      .ok()
      .map(|i| &list[i])
  }

  /// Total number of clues in both directions.
  pub fn len(&self) -> usize {
    self.across.len() + self.down.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// All clues, Across first.
  pub fn iter(&self) -> impl Iterator<Item = &Clue> {
    self.across.iter().chain(self.down.iter())
  }
}
