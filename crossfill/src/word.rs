use crate::Direction;
use crate::Direction::{Across, Down};
use crate::grid::Grid;
use crate::settings::Settings;

/// The contiguous run of non-block cells through some cell in one direction.
/// `start` and `end` are inclusive grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordSpan {
  pub direction: Direction,
  pub start: usize,
  pub end: usize,
  /// Index distance between consecutive cells: 1 across, the grid width down.
  step: usize,
}

impl WordSpan {
  /// The grid indices of the word, first to last.
  pub fn cells(&self) -> impl Iterator<Item = usize> + use<> {
    (self.start..=self.end).step_by(self.step)
  }

  pub fn contains(&self, index: usize) -> bool {
    (self.start..=self.end).contains(&index) && (index - self.start) % self.step == 0
  }

  /// Number of cells in the word.
  pub fn len(&self) -> usize {
    (self.end - self.start) / self.step + 1
  }

  /// Every cell has an entry, right or wrong.
  pub fn is_filled(&self, grid: &Grid) -> bool {
    self.cells().all(|i| grid.is_filled(i))
  }

  /// Every cell holds its solution letter.
  pub fn is_correct(&self, grid: &Grid) -> bool {
    self.cells().all(|i| grid.is_correct(i))
  }

  /// A locked word is fully correct while error checking is on for an unredacted
  /// puzzle. Locked words can't be edited and may be skipped over by navigation.
  pub fn is_locked(&self, grid: &Grid, settings: &Settings) -> bool {
    settings.error_check && !grid.is_redacted() && self.is_correct(grid)
  }
}

impl Grid {
  /// The word through `index` in `direction`: scans back while the previous cell
  /// is open, then forward likewise.
  pub fn word_bounds(&self, index: usize, direction: Direction) -> WordSpan {
    let (drow, dcol) = direction.delta();

    let mut start = index;
    while let Some(prev) = self.open_neighbor(start, -drow, -dcol) {
      start = prev;
    }

    let mut end = index;
    while let Some(next) = self.open_neighbor(end, drow, dcol) {
      end = next;
    }

    let step = match direction {
      Across => 1,
      Down => self.width(),
    };

    WordSpan {
      direction,
      start,
      end,
      step,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grid::Cell;
  use crate::test_util::{arb_grid, grid};
  use proptest::prelude::*;

  #[test]
  fn bounds() {
    // AB.C
    // DE.F
    // G.HI
    // JKLM
    let grid = grid(&["AB.C", "DE.F", "G.HI", "JKLM"]);

    let word = grid.word_bounds(1, Across);
    assert_eq!((word.start, word.end, word.len()), (0, 1, 2));

    let word = grid.word_bounds(14, Across);
    assert_eq!((word.start, word.end, word.len()), (12, 15, 4));
    assert_eq!(word.cells().collect::<Vec<_>>(), [12, 13, 14, 15]);

    let word = grid.word_bounds(4, Down);
    assert_eq!((word.start, word.end), (0, 12));
    assert_eq!(word.cells().collect::<Vec<_>>(), [0, 4, 8, 12]);
    assert!(word.contains(8));
    assert!(!word.contains(5));

    // A lone cell is its own one-letter run.
    let word = grid.word_bounds(3, Across);
    assert_eq!((word.start, word.end, word.len()), (3, 3, 1));
  }

  #[test]
  fn filled_and_locked() {
    let mut grid = grid(&["AB", "C."]);
    let word = grid.word_bounds(0, Across);
    let checking = Settings {
      error_check: true,
      ..Settings::default()
    };

    assert!(!word.is_filled(&grid));
    grid.set_entry(0, Cell::Letter('A'));
    grid.set_entry(1, Cell::Letter('Z'));
    assert!(word.is_filled(&grid));
    assert!(!word.is_locked(&grid, &checking));

    grid.set_entry(1, Cell::Letter('B'));
    assert!(word.is_correct(&grid));
    assert!(word.is_locked(&grid, &checking));
    assert!(!word.is_locked(&grid, &Settings::default()));
  }

  #[test]
  fn redacted_words_never_lock() {
    let mut grid = grid(&["XX", "XX"]);
    let word = grid.word_bounds(0, Across);
    grid.set_entry(0, Cell::Letter('X'));
    grid.set_entry(1, Cell::Letter('X'));

    let checking = Settings {
      error_check: true,
      ..Settings::default()
    };
    assert!(word.is_correct(&grid));
    assert!(!word.is_locked(&grid, &checking));
  }

  proptest! {
    #[test]
    fn bounds_contain_the_cell_and_only_open_cells(grid in arb_grid()) {
      for index in 0..grid.len() {
        if grid.is_block(index) {
          continue;
        }
        for direction in [Across, Down] {
          let word = grid.word_bounds(index, direction);
          prop_assert!(word.contains(index));

          let cells: Vec<_> = word.cells().collect();
          prop_assert_eq!(cells.len(), word.len());
          let (drow, dcol) = direction.delta();
          for pair in cells.windows(2) {
            prop_assert_eq!(grid.offset(pair[0], drow, dcol), Some(pair[1]));
          }
          for &cell in &cells {
            prop_assert!(!grid.is_block(cell));
          }
          prop_assert_eq!(grid.open_neighbor(word.start, -drow, -dcol), None);
          prop_assert_eq!(grid.open_neighbor(word.end, drow, dcol), None);
        }
      }
    }
  }
}
