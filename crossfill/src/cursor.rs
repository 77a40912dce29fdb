use crate::Direction;
use crate::Direction::Across;
use crate::clues::{Clue, ClueIndex};
use crate::grid::Grid;
use crate::settings::{EndOfWord, Settings};
use log::trace;
use std::collections::HashSet;

/// Represents the position of the user's currently-highlighted cell, and the
/// [Direction] of the word they are currently entering.
///
/// Once a puzzle is loaded the cursor never rests on a block cell. Every movement
/// method leaves the cursor untouched when the move is impossible, and reports
/// whether anything changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
  pub col: usize,
  pub row: usize,
  pub direction: Direction,
}

impl Cursor {
  /// The first open cell in reading order, facing Across.
  pub fn from_grid(grid: &Grid) -> Option<Self> {
    let (col, row) = grid.col_row(grid.first_open()?);
    Some(Self {
      col,
      row,
      direction: Across,
    })
  }

  /// The grid index under the cursor.
  pub fn index(&self, grid: &Grid) -> usize {
    grid.index(self.col, self.row)
  }

  fn set_index(&mut self, grid: &Grid, index: usize) {
    (self.col, self.row) = grid.col_row(index);
    trace!("cursor -> ({}, {}) {}", self.col, self.row, self.direction);
  }

  /// Steps to the neighbouring cell, if it is inside the grid and open.
  pub fn move_directional(&mut self, grid: &Grid, drow: isize, dcol: isize) -> bool {
    match grid.open_neighbor(self.index(grid), drow, dcol) {
      Some(index) => {
        self.set_index(grid, index);
        true
      }
      None => false,
    }
  }

  /// Steps repeatedly, wrapping around the edges (see [Grid::wrapping_offset]),
  /// until landing on an open cell. Does nothing if the walk comes back around to
  /// the starting cell.
  pub fn move_wrapping(&mut self, grid: &Grid, drow: isize, dcol: isize) -> bool {
    let start = self.index(grid);
    let mut index = start;
    for _ in 0..grid.len() {
      index = grid.wrapping_offset(index, drow, dcol);
      if index == start {
        return false;
      }
      if !grid.is_block(index) {
        self.set_index(grid, index);
        return true;
      }
    }
    false
  }

  /// Moves to the next open cell along the vector without wrapping, jumping over
  /// any blocks in the way. If the rest of the line is blocked, wraps instead.
  pub fn move_vector_jump(&mut self, grid: &Grid, drow: isize, dcol: isize) -> bool {
    if (drow, dcol) == (0, 0) {
      return false;
    }

    let mut index = self.index(grid);
    while let Some(next) = grid.offset(index, drow, dcol) {
      if !grid.is_block(next) {
        self.set_index(grid, next);
        return true;
      }
      index = next;
    }
    self.move_wrapping(grid, drow, dcol)
  }

  pub fn toggle_direction(&mut self) {
    self.direction = !self.direction;
  }

  /// Moves one cell back in the current direction, if that cell is open.
  pub fn retreat(&mut self, grid: &Grid) -> bool {
    let (drow, dcol) = self.direction.delta();
    self.move_directional(grid, -drow, -dcol)
  }

  /// Moves on after a letter has been entered: to the next open cell in the word,
  /// past filled cells when `skip_filled` is set. At the end of the word, either
  /// stays or jumps to the next clue depending on [Settings::end_of_word].
  pub fn advance_after_entry(&mut self, grid: &Grid, clues: &ClueIndex, settings: &Settings) {
    let (drow, dcol) = self.direction.delta();
    let mut index = self.index(grid);

    while let Some(next) = grid.open_neighbor(index, drow, dcol) {
      if settings.skip_filled && grid.is_filled(next) {
        index = next;
        continue;
      }
      self.set_index(grid, next);
      return;
    }

    if settings.end_of_word == EndOfWord::JumpNext {
      self.jump_to_adjacent_word(grid, clues, settings, true, false);
    }
  }

  /// Moves to the start of the next (or previous) clue in the current direction's
  /// list. Running off either end of the list continues into the other direction's
  /// list, so repeated jumps cycle through every clue.
  ///
  /// With `skip_locked_words`, locked words are passed over. Every word skipped is
  /// remembered, and landing on one a second time means every word is locked; the
  /// cursor then stays where it landed. With [Settings::skip_filled], the cursor
  /// finally slides to the first empty cell of the word it landed on.
  pub fn jump_to_adjacent_word(
    &mut self,
    grid: &Grid,
    clues: &ClueIndex,
    settings: &Settings,
    forward: bool,
    skip_locked_words: bool,
  ) -> bool {
    let mut visited = HashSet::new();

    let word = loop {
      let Some(clue) = self.adjacent_clue(grid, clues, forward) else {
        return false;
      };
      let (start, direction) = (clue.start, clue.direction);
      self.set_index(grid, start);
      self.direction = direction;

      let word = grid.word_bounds(start, direction);
      if !skip_locked_words || !word.is_locked(grid, settings) {
        break word;
      }
      if !visited.insert((direction, start)) {
        trace!("every word is locked");
        break word;
      }
    };

    if settings.skip_filled {
      if let Some(index) = word.cells().find(|&i| !grid.is_filled(i)) {
        self.set_index(grid, index);
      }
    }
    true
  }

  /// The clue one step forward or back from the word under the cursor.
  fn adjacent_clue<'a>(&self, grid: &Grid, clues: &'a ClueIndex, forward: bool) -> Option<&'a Clue> {
    let start = grid.word_bounds(self.index(grid), self.direction).start;
    let list = clues.list(self.direction);

    // A run that isn't a clue (a lone cell) is placed by reading order.
    let position = match clues.position(self.direction, start) {
      Some(i) if forward => Some(i + 1).filter(|&j| j < list.len()),
      Some(i) => i.checked_sub(1),
      None if forward => list.iter().position(|c| c.start > start),
      None => list.iter().rposition(|c| c.start < start),
    };
    if let Some(i) = position {
      return Some(&list[i]);
    }

    let other = clues.list(!self.direction);
    let wrapped = if forward { other.first() } else { other.last() };
    wrapped.or_else(|| if forward { list.first() } else { list.last() })
  }

  /// Handles a click on (`col`, `row`). Clicking the cell under the cursor flips
  /// the direction; clicking any other open cell moves there.
  pub fn click(&mut self, grid: &Grid, col: usize, row: usize) -> bool {
    if !grid.contains(col, row) || grid.is_block(grid.index(col, row)) {
      return false;
    }

    if (col, row) == (self.col, self.row) {
      self.toggle_direction();
    } else {
      (self.col, self.row) = (col, row);
    }
    true
  }
}
