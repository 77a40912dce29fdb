use std::fmt::{Debug, Display};

/// The letter a publisher uses to mask a solution it does not want to give away.
pub const MASK_LETTER: char = 'X';

/// A puzzle is redacted when more than this fraction of its letter cells are
/// [MASK_LETTER].
pub const REDACTION_THRESHOLD: f64 = 0.8;

/// A cell in a crossword grid.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cell {
  /// A block cell where nothing can be entered.
  Block,
  /// A cell where a letter could be entered, but that is currently empty.
  Empty,
  /// A cell with a letter written in it. Always uppercase.
  Letter(char),
}

impl Cell {
  /// Whether this is [Cell::Block].
  pub fn is_block(&self) -> bool {
    *self == Self::Block
  }

  /// Whether this is [Cell::Empty].
  pub fn is_empty(&self) -> bool {
    *self == Self::Empty
  }

  /// Whether this holds a letter.
  pub fn is_letter(&self) -> bool {
    matches!(self, Self::Letter(_))
  }

  /// The letter in this cell, if any.
  pub fn letter(&self) -> Option<char> {
    match self {
      Self::Letter(c) => Some(*c),
      _ => None,
    }
  }
}

impl Debug for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Block => write!(f, "■"),
      Self::Empty => write!(f, " "),
      Self::Letter(c) => write!(f, "{}", c),
    }
  }
}

impl Display for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl From<char> for Cell {
  fn from(value: char) -> Self {
    match value {
      '.' => Self::Block,
      '-' | ' ' => Self::Empty,
      c => Self::Letter(c.to_ascii_uppercase()),
    }
  }
}

/// The immutable solution layout of a puzzle together with the mutable entries the
/// user has typed. Cells are addressed by their linear index `row * width + col`.
///
/// `entries[i]` is a block if and only if `solution[i]` is a block.
#[derive(Clone, Eq, PartialEq)]
pub struct Grid {
  width: usize,
  height: usize,
  solution: Vec<Cell>,
  entries: Vec<Cell>,
  redacted: bool,
}

impl Grid {
  /// Builds a grid from already-validated cells. `entries` must agree with
  /// `solution` on block positions.
  pub(crate) fn new(width: usize, height: usize, solution: Vec<Cell>, entries: Vec<Cell>) -> Self {
    debug_assert_eq!(solution.len(), width * height);
    debug_assert_eq!(entries.len(), solution.len());

    let redacted = is_redacted(&solution);
    Self {
      width,
      height,
      solution,
      entries,
      redacted,
    }
  }

  /// The width of this grid.
  pub fn width(&self) -> usize {
    self.width
  }

  /// The height of this grid.
  pub fn height(&self) -> usize {
    self.height
  }

  /// Total number of cells, blocks included.
  pub fn len(&self) -> usize {
    self.solution.len()
  }

  pub fn is_empty(&self) -> bool {
    self.solution.is_empty()
  }

  pub fn index(&self, col: usize, row: usize) -> usize {
    row * self.width + col
  }

  /// The (column, row) of a linear index.
  pub fn col_row(&self, index: usize) -> (usize, usize) {
    (index % self.width, index / self.width)
  }

  pub fn contains(&self, col: usize, row: usize) -> bool {
    col < self.width && row < self.height
  }

  pub fn is_block(&self, index: usize) -> bool {
    self.solution[index].is_block()
  }

  /// What the user has entered at `index`.
  pub fn entry(&self, index: usize) -> Cell {
    self.entries[index]
  }

  /// The answer at `index`.
  pub fn solution(&self, index: usize) -> Cell {
    self.solution[index]
  }

  pub fn entries(&self) -> &[Cell] {
    &self.entries
  }

  /// Whether the cell at `index` holds any letter, right or wrong.
  pub fn is_filled(&self, index: usize) -> bool {
    self.entries[index].is_letter()
  }

  /// Whether the cell at `index` holds its solution letter.
  pub fn is_correct(&self, index: usize) -> bool {
    self.entries[index].is_letter() && self.entries[index] == self.solution[index]
  }

  /// Whether the solution is mostly masked. See [REDACTION_THRESHOLD].
  pub fn is_redacted(&self) -> bool {
    self.redacted
  }

  /// Whether every letter cell holds its solution letter.
  pub fn is_solved(&self) -> bool {
    (0..self.len()).all(|i| self.is_block(i) || self.is_correct(i))
  }

  /// The first non-block cell in reading order.
  pub fn first_open(&self) -> Option<usize> {
    (0..self.len()).find(|&i| !self.is_block(i))
  }

  /// The index one step of (`drow`, `dcol`) away from `index`, if that is still
  /// inside the grid.
  pub fn offset(&self, index: usize, drow: isize, dcol: isize) -> Option<usize> {
    let (col, row) = self.col_row(index);
    let col = col.checked_add_signed(dcol)?;
    let row = row.checked_add_signed(drow)?;
    self.contains(col, row).then(|| self.index(col, row))
  }

  /// Like [Grid::offset], but also `None` when the neighbour is a block.
  pub fn open_neighbor(&self, index: usize, drow: isize, dcol: isize) -> Option<usize> {
    self.offset(index, drow, dcol).filter(|&i| !self.is_block(i))
  }

  /// One step of (`drow`, `dcol`) from `index` on a grid whose edges wrap around.
  ///
  /// Columns carry into rows: stepping right off the end of a row lands at the
  /// start of the next one, and stepping right off the last cell lands on the
  /// first. Rows don't carry: stepping down off the bottom of a column lands at
  /// the top of the same column. Either way, repeating a step always comes back
  /// to `index`.
  pub fn wrapping_offset(&self, index: usize, drow: isize, dcol: isize) -> usize {
    let len = self.len() as isize;
    let mut index = (index as isize + dcol).rem_euclid(len) as usize;

    if drow != 0 {
      let (col, row) = self.col_row(index);
      let row = (row as isize + drow).rem_euclid(self.height as isize) as usize;
      index = self.index(col, row);
    }
    index
  }

  /// Writes `cell` at `index`. Writes to block positions, and writes of blocks,
  /// are ignored so that entries never diverge from the solution's layout.
  pub(crate) fn set_entry(&mut self, index: usize, cell: Cell) -> bool {
    if self.is_block(index) || cell.is_block() || self.entries[index] == cell {
      return false;
    }
    self.entries[index] = cell;
    true
  }
}

fn is_redacted(solution: &[Cell]) -> bool {
  let letters = solution.iter().filter(|c| c.is_letter()).count();
  if letters == 0 {
    return false;
  }
  let masked = solution
    .iter()
    .filter(|c| c.letter() == Some(MASK_LETTER))
    .count();
  masked as f64 / letters as f64 > REDACTION_THRESHOLD
}

impl Debug for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for row in self.entries.chunks(self.width) {
      for cell in row {
        write!(f, "{}", cell)?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

impl Display for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "\n{:?}", self)
  }
}
