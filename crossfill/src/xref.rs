//! Finding the other clues a clue refers to, like "See 7-Down" or
//! "With 17- and 23-Across, ...".

use crate::Direction;
use crate::Direction::{Across, Down};
use crate::clues::ClueIndex;
use crate::grid::Grid;
use crate::word::WordSpan;
use regex::Regex;
use std::sync::LazyLock;

static EXPLICIT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\b(\d+)-(across|down)\b").unwrap());
static BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d+)-").unwrap());
static ACROSS_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bacross\b").unwrap());
static DOWN_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bdown\b").unwrap());

/// A clue referred to from another clue's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
  pub number: u16,
  pub direction: Direction,
  /// The referenced clue's cells, for highlighting.
  pub word: WordSpan,
}

/// Resolves the references in `text` against the puzzle's clues.
///
/// `12-Across` and `12-Down` resolve directly. A bare `12-` goes to whichever
/// direction has a clue 12; when both do, the words "across" or "down" anywhere in
/// the text decide, and Across wins otherwise. The hint words count wherever they
/// appear, including inside an explicit reference, so in "With 1- and 5-Down" the
/// `1-` is read as 1-Down. Numbers with no clue are ignored.
pub fn resolve(text: &str, clues: &ClueIndex, grid: &Grid) -> Vec<Reference> {
  let mut found: Vec<(u16, Direction)> = vec![];
  let mut explicit_starts = vec![];

  for caps in EXPLICIT.captures_iter(text) {
    explicit_starts.push(caps.get(0).map_or(0, |m| m.start()));
    let Ok(number) = caps[1].parse::<u16>() else {
      continue;
    };
    let direction = if caps[2].eq_ignore_ascii_case("across") {
      Across
    } else {
      Down
    };
    if clues.by_number(direction, number).is_some() {
      found.push((number, direction));
    }
  }

  let hint_across = ACROSS_WORD.is_match(text);
  let hint_down = DOWN_WORD.is_match(text);

  for caps in BARE.captures_iter(text) {
    if caps
      .get(0)
      .is_some_and(|m| explicit_starts.contains(&m.start()))
    {
      continue;
    }
    let Ok(number) = caps[1].parse::<u16>() else {
      continue;
    };

    let in_across = clues.by_number(Across, number).is_some();
    let in_down = clues.by_number(Down, number).is_some();
    let direction = match (in_across, in_down) {
      (false, false) => continue,
      (true, false) => Across,
      (false, true) => Down,
      (true, true) if hint_down && !hint_across => Down,
      (true, true) => Across,
    };
    found.push((number, direction));
  }

  let mut references: Vec<Reference> = vec![];
  for (number, direction) in found {
    if references
      .iter()
      .any(|r| (r.number, r.direction) == (number, direction))
    {
      continue;
    }
    if let Some(clue) = clues.by_number(direction, number) {
      references.push(Reference {
        number,
        direction,
        word: grid.word_bounds(clue.start, direction),
      });
    }
  }
  references
}
