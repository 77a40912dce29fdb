//! The value a puzzle loader hands to the core.

use crate::Direction::{Across, Down};
use crate::clues::{Clue, ClueIndex};
use crate::grid::{Cell, Grid};
use crate::{Direction, Error};

/// One clue as delivered by a puzzle source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueSpec {
  pub number: u16,
  pub text: String,
  /// Grid index of the clue's first cell.
  pub start: usize,
}

/// Clues already split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClueLists {
  pub across: Vec<ClueSpec>,
  pub down: Vec<ClueSpec>,
}

/// A puzzle as read from a file (or built by hand), before it is validated and
/// turned into a [Puzzle](crate::Puzzle).
///
/// `solution` holds `width * height` characters in reading order, `.` marking a
/// block. `fill`, when present, is the saved progress in the same layout with `-`
/// for an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleSource {
  pub width: usize,
  pub height: usize,
  pub solution: String,
  pub fill: Option<String>,
  pub clues: ClueLists,
  pub title: String,
  pub author: String,
  pub copyright: String,
  pub notes: String,
}

impl PuzzleSource {
  /// Builds a source from a solution and the clue texts in the conventional order:
  /// cells in reading order, and for each numbered cell its Across clue before its
  /// Down clue. Numbers are assigned the usual way, starting at 1.
  pub fn numbered(
    width: usize,
    height: usize,
    solution: impl Into<String>,
    texts: Vec<String>,
  ) -> Result<Self, Error> {
    let solution = solution.into();
    let cells = parse_solution(&solution, width, height)?;
    let starts = clue_starts(&cells, width, height);

    if starts.len() != texts.len() {
      return Err(Error::InvalidPuzzle(format!(
        "grid has {} clue slots but {} clues were given",
        starts.len(),
        texts.len()
      )));
    }

    let mut clues = ClueLists::default();
    for ((number, direction, start), text) in starts.into_iter().zip(texts) {
      let spec = ClueSpec {
        number,
        text,
        start,
      };
      match direction {
        Across => clues.across.push(spec),
        Down => clues.down.push(spec),
      }
    }

    Ok(Self {
      width,
      height,
      solution,
      clues,
      ..Self::default()
    })
  }

  /// Validates the source and splits it into the grid and clue index.
  pub(crate) fn build(&self) -> Result<(Grid, ClueIndex), Error> {
    let solution = parse_solution(&self.solution, self.width, self.height)?;

    let entries = match &self.fill {
      None => solution
        .iter()
        .map(|c| if c.is_block() { Cell::Block } else { Cell::Empty })
        .collect(),
      Some(fill) => parse_fill(fill, &solution)?,
    };

    if solution.iter().all(Cell::is_block) {
      return Err(Error::InvalidPuzzle("grid has no letter cells".into()));
    }

    let grid = Grid::new(self.width, self.height, solution, entries);
    let across = build_clues(&grid, Across, &self.clues.across)?;
    let down = build_clues(&grid, Down, &self.clues.down)?;
    Ok((grid, ClueIndex::new(across, down)))
  }
}

fn parse_solution(solution: &str, width: usize, height: usize) -> Result<Vec<Cell>, Error> {
  if width == 0 || height == 0 {
    return Err(Error::InvalidPuzzle(format!(
      "dimensions must be positive, got {width}x{height}"
    )));
  }

  let cells: Vec<Cell> = solution
    .chars()
    .map(|c| match c {
      '.' => Cell::Block,
      c => Cell::Letter(c.to_ascii_uppercase()),
    })
    .collect();

  if cells.len() != width * height {
    return Err(Error::InvalidPuzzle(format!(
      "solution has {} cells, expected {}x{}",
      cells.len(),
      width,
      height
    )));
  }
  Ok(cells)
}

fn parse_fill(fill: &str, solution: &[Cell]) -> Result<Vec<Cell>, Error> {
  let entries: Vec<Cell> = fill.chars().map(Cell::from).collect();
  if entries.len() != solution.len() {
    return Err(Error::InvalidPuzzle(format!(
      "fill has {} cells, expected {}",
      entries.len(),
      solution.len()
    )));
  }

  if let Some(index) = (0..entries.len()).find(|&i| entries[i].is_block() != solution[i].is_block())
  {
    return Err(Error::InvalidPuzzle(format!(
      "fill disagrees with the solution about the block at cell {index}"
    )));
  }
  Ok(entries)
}

fn build_clues(grid: &Grid, direction: Direction, specs: &[ClueSpec]) -> Result<Vec<Clue>, Error> {
  let mut clues = Vec::with_capacity(specs.len());
  for spec in specs {
    if spec.start >= grid.len() || grid.is_block(spec.start) {
      return Err(Error::InvalidPuzzle(format!(
        "{}-{} starts at cell {}, which is not a letter cell",
        spec.number, direction, spec.start
      )));
    }
    let (drow, dcol) = direction.delta();
    if grid.open_neighbor(spec.start, -drow, -dcol).is_some() {
      return Err(Error::InvalidPuzzle(format!(
        "{}-{} starts at cell {}, which is in the middle of a word",
        spec.number, direction, spec.start
      )));
    }
    clues.push(Clue {
      number: spec.number,
      direction,
      start: spec.start,
      text: spec.text.clone(),
    });
  }

  clues.sort_by_key(|c| c.number);
  if let Some(pair) = clues.windows(2).find(|w| w[0].number == w[1].number) {
    return Err(Error::InvalidPuzzle(format!(
      "duplicate clue {}-{}",
      pair[0].number, direction
    )));
  }
  Ok(clues)
}

fn is_open(cells: &[Cell], width: usize, height: usize, col: usize, row: usize) -> bool {
  col < width && row < height && !cells[row * width + col].is_block()
}

/// Whether the cell at (`col`, `row`) starts a word of at least two cells in
/// `direction`.
fn starts(cells: &[Cell], width: usize, height: usize, col: usize, row: usize, direction: Direction) -> bool {
  if !is_open(cells, width, height, col, row) {
    return false;
  }

  match direction {
    Across => {
      (col == 0 || !is_open(cells, width, height, col - 1, row))
        && is_open(cells, width, height, col + 1, row)
    }
    Down => {
      (row == 0 || !is_open(cells, width, height, col, row - 1))
        && is_open(cells, width, height, col, row + 1)
    }
  }
}

/// Every clue slot in the grid as `(number, direction, start)`, in the order
/// clue texts are conventionally listed.
pub(crate) fn clue_starts(cells: &[Cell], width: usize, height: usize) -> Vec<(u16, Direction, usize)> {
  let mut number: u16 = 1;
  let mut slots = vec![];

  for index in 0..cells.len() {
    let (col, row) = (index % width, index / width);
    let across = starts(cells, width, height, col, row, Across);
    let down = starts(cells, width, height, col, row, Down);

    if across {
      slots.push((number, Across, index));
    }
    if down {
      slots.push((number, Down, index));
    }
    if across || down {
      number += 1;
    }
  }

  slots
}

#[cfg(test)]
mod tests {
  use super::*;

  fn texts(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("text {i}")).collect()
  }

  #[test]
  fn numbering() {
    // --.-
    // --.-
    // -.--
    // ----
    let source = PuzzleSource::numbered(4, 4, "AB.CDE.FG.HIJKLM", texts(8)).unwrap();

    let across: Vec<_> = source.clues.across.iter().map(|c| (c.number, c.start)).collect();
    let down: Vec<_> = source.clues.down.iter().map(|c| (c.number, c.start)).collect();

    assert_eq!(across, [(1, 0), (4, 4), (5, 10), (6, 12)]);
    assert_eq!(down, [(1, 0), (2, 1), (3, 3), (5, 10)]);
    assert_eq!(source.clues.across[0].text, "text 1");
    assert_eq!(source.clues.down[0].text, "text 2");
  }

  #[test]
  fn numbering_rejects_wrong_clue_count() {
    assert!(matches!(
      PuzzleSource::numbered(2, 2, "ABCD", texts(3)),
      Err(Error::InvalidPuzzle(_))
    ));
  }

  #[test]
  fn build_validates() {
    let mut source = PuzzleSource::numbered(2, 2, "AB.C", texts(2)).unwrap();
    assert!(source.build().is_ok());

    source.fill = Some("A-C-".into());
    assert!(matches!(source.build(), Err(Error::InvalidPuzzle(_))));

    source.fill = Some("a-.-".into());
    let (grid, _) = source.build().unwrap();
    assert_eq!(grid.entry(0), Cell::Letter('A'));
    assert!(grid.entry(1).is_empty());

    source.fill = None;
    source.clues.down[0].start = 2;
    assert!(matches!(source.build(), Err(Error::InvalidPuzzle(_))));

    source.clues.down[0].start = 1;
    source.clues.down.push(source.clues.down[0].clone());
    assert!(matches!(source.build(), Err(Error::InvalidPuzzle(_))));
  }

  #[test]
  fn build_rejects_clues_starting_mid_word() {
    // AB
    // .C
    let mut source = PuzzleSource::numbered(2, 2, "AB.C", texts(2)).unwrap();
    source.clues.across[0].start = 1;
    assert!(matches!(source.build(), Err(Error::InvalidPuzzle(_))));

    let mut source = PuzzleSource::numbered(2, 2, "AB.C", texts(2)).unwrap();
    source.clues.down[0].start = 3;
    assert!(matches!(source.build(), Err(Error::InvalidPuzzle(_))));

    // A clue on a lone cell is allowed; it just has a one-cell word.
    let mut source = PuzzleSource::numbered(2, 2, "AB.C", texts(2)).unwrap();
    source.clues.across[0].start = 3;
    assert!(source.build().is_ok());
  }

  #[test]
  fn build_rejects_bad_dimensions() {
    let source = PuzzleSource {
      width: 3,
      height: 2,
      solution: "ABCD".into(),
      ..PuzzleSource::default()
    };
    assert!(matches!(source.build(), Err(Error::InvalidPuzzle(_))));

    let source = PuzzleSource {
      width: 2,
      height: 1,
      solution: "..".into(),
      ..PuzzleSource::default()
    };
    assert!(matches!(source.build(), Err(Error::InvalidPuzzle(_))));
  }
}
