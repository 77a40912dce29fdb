//! Builders for tests: puzzles from ASCII rows of solution letters, `.` for blocks.

use crate::Direction;
use crate::grid::{Cell, Grid};
use crate::session::{Puzzle, Session};
use crate::settings::Settings;
use crate::source::{PuzzleSource, clue_starts};
use proptest::prelude::*;

fn solution(rows: &[&str]) -> (usize, usize, String) {
  let width = rows[0].len();
  assert!(rows.iter().all(|r| r.len() == width), "ragged rows");
  (width, rows.len(), rows.concat())
}

/// A grid with no entries.
pub(crate) fn grid(rows: &[&str]) -> Grid {
  let (width, height, solution) = solution(rows);
  let cells: Vec<Cell> = solution
    .chars()
    .map(|c| if c == '.' { Cell::Block } else { Cell::Letter(c) })
    .collect();
  let entries = cells
    .iter()
    .map(|c| if c.is_block() { Cell::Block } else { Cell::Empty })
    .collect();
  Grid::new(width, height, cells, entries)
}

/// A numbered source whose clue texts are overridden by `texts`, given as
/// `(number, direction, text)`. Other clues get a placeholder text.
pub(crate) fn source_with(rows: &[&str], texts: &[(u16, Direction, &str)]) -> PuzzleSource {
  let (width, height, solution) = solution(rows);
  let cells: Vec<Cell> = solution.chars().map(Cell::from).collect();

  let texts = clue_starts(&cells, width, height)
    .into_iter()
    .map(|(number, direction, _)| {
      texts
        .iter()
        .find(|(n, d, _)| (*n, *d) == (number, direction))
        .map_or_else(|| format!("Clue #{number}"), |(_, _, text)| text.to_string())
    })
    .collect();

  PuzzleSource::numbered(width, height, solution, texts).unwrap()
}

pub(crate) fn source(rows: &[&str]) -> PuzzleSource {
  source_with(rows, &[])
}

pub(crate) fn puzzle(rows: &[&str]) -> Puzzle {
  Puzzle::new(source(rows)).unwrap()
}

pub(crate) fn session(rows: &[&str], settings: Settings) -> Session {
  let mut session = Session::new(settings);
  session.load(source(rows)).unwrap();
  session
}

/// Random grids up to 7x7 with random blocks. May be all blocks.
pub(crate) fn arb_grid() -> impl Strategy<Value = Grid> {
  (1usize..=7, 1usize..=7)
    .prop_flat_map(|(width, height)| {
      (
        Just(width),
        Just(height),
        prop::collection::vec(prop::bool::weighted(0.3), width * height),
      )
    })
    .prop_map(|(width, height, blocks)| {
      let solution = blocks
        .iter()
        .map(|&b| if b { Cell::Block } else { Cell::Letter('A') })
        .collect();
      let entries = blocks
        .iter()
        .map(|&b| if b { Cell::Block } else { Cell::Empty })
        .collect();
      Grid::new(width, height, solution, entries)
    })
}
