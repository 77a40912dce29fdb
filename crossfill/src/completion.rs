use crate::Direction;
use crate::Direction::{Across, Down};
use crate::clues::ClueIndex;
use crate::grid::Grid;
use crate::settings::Settings;

/// How far along one clue is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClueStatus {
  /// Every cell holds a letter, right or wrong.
  pub filled: bool,
  /// Every cell is right and error checking is on. See [WordSpan::is_locked](crate::WordSpan::is_locked).
  pub locked: bool,
}

/// Per-clue status for a whole puzzle, parallel to the [ClueIndex] lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
  across: Vec<ClueStatus>,
  down: Vec<ClueStatus>,
}

impl Completion {
  pub fn compute(grid: &Grid, clues: &ClueIndex, settings: &Settings) -> Self {
    let statuses = |direction: Direction| -> Vec<ClueStatus> {
      clues
        .list(direction)
        .iter()
        .map(|clue| {
          let word = grid.word_bounds(clue.start, direction);
          ClueStatus {
            filled: word.is_filled(grid),
            locked: word.is_locked(grid, settings),
          }
        })
        .collect()
    };

    Self {
      across: statuses(Across),
      down: statuses(Down),
    }
  }

  /// Statuses in the same order as [ClueIndex::list].
  pub fn list(&self, direction: Direction) -> &[ClueStatus] {
    match direction {
      Across => &self.across,
      Down => &self.down,
    }
  }

  /// Status of the clue at `position` in its direction's list.
  pub fn get(&self, direction: Direction, position: usize) -> Option<ClueStatus> {
    self.list(direction).get(position).copied()
  }

  /// Number of filled clues across both directions.
  pub fn filled_count(&self) -> usize {
    self
      .across
      .iter()
      .chain(self.down.iter())
      .filter(|s| s.filled)
      .count()
  }
}
