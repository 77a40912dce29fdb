use crate::clues::{Clue, ClueIndex};
use crate::completion::Completion;
use crate::cursor::Cursor;
use crate::grid::{Cell, Grid};
use crate::settings::{RevealMode, Settings};
use crate::source::PuzzleSource;
use crate::word::WordSpan;
use crate::xref::{self, Reference};
use crate::{Direction, Error};
use log::{debug, info};

/// What an operation did: where the cursor ended up and which cells had their
/// entries changed. Highlighting and completion are read back from the [Session]
/// or [Puzzle] afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
  pub cursor: Cursor,
  /// Grid indices whose entries changed, in the order they were written.
  pub touched: Vec<usize>,
}

/// Represents a crossword puzzle and a [Cursor]. Settings are passed into each
/// operation; use a [Session] to have them applied for you.
#[derive(Debug, Clone)]
pub struct Puzzle {
  grid: Grid,
  clues: ClueIndex,
  cursor: Cursor,
  title: String,
  author: String,
  copyright: String,
  notes: String,
}

impl Puzzle {
  /// Validates `source` and starts with the cursor on the first open cell, facing
  /// Across.
  pub fn new(source: PuzzleSource) -> Result<Self, Error> {
    let (grid, clues) = source.build()?;
    let cursor = Cursor::from_grid(&grid)
      .ok_or_else(|| Error::InvalidPuzzle("grid has no letter cells".into()))?;

    Ok(Self {
      grid,
      clues,
      cursor,
      title: source.title,
      author: source.author,
      copyright: source.copyright,
      notes: source.notes,
    })
  }

  /// Returns a reference to the grid, including the user's entries.
  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  #[cfg(test)]
  pub(crate) fn grid_mut(&mut self) -> &mut Grid {
    &mut self.grid
  }

  pub fn clues(&self) -> &ClueIndex {
    &self.clues
  }

  pub fn cursor(&self) -> Cursor {
    self.cursor
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn author(&self) -> &str {
    &self.author
  }

  pub fn copyright(&self) -> &str {
    &self.copyright
  }

  pub fn notes(&self) -> &str {
    &self.notes
  }

  /// Whether the puzzle is fully filled in, and matches the solution.
  pub fn is_solved(&self) -> bool {
    self.grid.is_solved()
  }

  /// The word under the cursor in the cursor's direction.
  pub fn active_word(&self) -> WordSpan {
    self
      .grid
      .word_bounds(self.cursor.index(&self.grid), self.cursor.direction)
  }

  /// The clue for [Puzzle::active_word]. `None` when the cursor sits on a lone
  /// cell that has no word in its direction.
  pub fn current_clue(&self) -> Option<&Clue> {
    self
      .clues
      .at_start(self.cursor.direction, self.active_word().start)
  }

  /// Clues referred to by the current clue's text.
  pub fn references(&self) -> Vec<Reference> {
    self
      .current_clue()
      .map(|clue| xref::resolve(&clue.text, &self.clues, &self.grid))
      .unwrap_or_default()
  }

  /// Cells holding a wrong letter. Empty unless error checking applies.
  pub fn wrong_cells(&self, settings: &Settings) -> Vec<usize> {
    if !settings.error_check || self.grid.is_redacted() {
      return vec![];
    }
    (0..self.grid.len())
      .filter(|&i| self.grid.is_filled(i) && !self.grid.is_correct(i))
      .collect()
  }

  /// Whether `word` is locked. Runs that are not clues never lock.
  fn is_word_locked(&self, settings: &Settings, word: &WordSpan) -> bool {
    self.clues.at_start(word.direction, word.start).is_some()
      && word.is_locked(&self.grid, settings)
  }

  /// A cell is locked when a locked word passes through it in either direction.
  pub fn is_cell_locked(&self, settings: &Settings, index: usize) -> bool {
    [Direction::Across, Direction::Down]
      .into_iter()
      .any(|direction| self.is_word_locked(settings, &self.grid.word_bounds(index, direction)))
  }

  fn change(&self, touched: Vec<usize>) -> Change {
    Change {
      cursor: self.cursor,
      touched,
    }
  }

  pub fn move_directional(&mut self, drow: isize, dcol: isize) -> Change {
    self.cursor.move_directional(&self.grid, drow, dcol);
    self.change(vec![])
  }

  pub fn move_wrapping(&mut self, drow: isize, dcol: isize) -> Change {
    self.cursor.move_wrapping(&self.grid, drow, dcol);
    self.change(vec![])
  }

  pub fn move_vector_jump(&mut self, drow: isize, dcol: isize) -> Change {
    self.cursor.move_vector_jump(&self.grid, drow, dcol);
    self.change(vec![])
  }

  pub fn toggle_direction(&mut self) -> Change {
    self.cursor.toggle_direction();
    self.change(vec![])
  }

  pub fn click(&mut self, col: usize, row: usize) -> Change {
    self.cursor.click(&self.grid, col, row);
    self.change(vec![])
  }

  pub fn advance_after_entry(&mut self, settings: &Settings) -> Change {
    self
      .cursor
      .advance_after_entry(&self.grid, &self.clues, settings);
    self.change(vec![])
  }

  pub fn jump_to_adjacent_word(
    &mut self,
    settings: &Settings,
    forward: bool,
    skip_locked_words: bool,
  ) -> Change {
    self.cursor.jump_to_adjacent_word(
      &self.grid,
      &self.clues,
      settings,
      forward,
      skip_locked_words,
    );
    self.change(vec![])
  }

  /// Writes `letter` under the cursor and advances. Letters go in uppercase.
  /// Ignored on a locked cell, or for anything other than a letter or digit.
  pub fn set_letter(&mut self, settings: &Settings, letter: char) -> Change {
    let index = self.cursor.index(&self.grid);
    if !letter.is_ascii_alphanumeric() {
      debug!("ignoring {letter:?}: not a letter");
      return self.change(vec![]);
    }
    if self.is_cell_locked(settings, index) {
      debug!("edit rejected: cell {index} is locked");
      return self.change(vec![]);
    }

    let mut touched = vec![];
    if self
      .grid
      .set_entry(index, Cell::Letter(letter.to_ascii_uppercase()))
    {
      touched.push(index);
    }
    self
      .cursor
      .advance_after_entry(&self.grid, &self.clues, settings);
    self.change(touched)
  }

  /// Backspace. Clears the cell under the cursor and steps back one cell. A locked
  /// word can't be cleared, so from one the cursor jumps back to the previous
  /// unlocked word instead.
  pub fn clear_and_retreat(&mut self, settings: &Settings) -> Change {
    if self.is_word_locked(settings, &self.active_word()) {
      debug!("active word is locked, jumping back");
      return self.jump_to_adjacent_word(settings, false, true);
    }

    let index = self.cursor.index(&self.grid);
    let mut touched = vec![];
    if self.is_cell_locked(settings, index) {
      debug!("edit rejected: cell {index} is locked");
    } else if self.grid.set_entry(index, Cell::Empty) {
      touched.push(index);
    }
    self.cursor.retreat(&self.grid);
    self.change(touched)
  }

  /// Fills in the answer under the cursor: one letter (then advances) or the
  /// whole active word, depending on [Settings::reveal_mode]. Does nothing when
  /// reveals are off or the puzzle is redacted.
  pub fn reveal(&mut self, settings: &Settings) -> Change {
    if !settings.reveal_enabled || self.grid.is_redacted() {
      debug!("reveal is disabled");
      return self.change(vec![]);
    }

    match settings.reveal_mode {
      RevealMode::Letter => {
        let index = self.cursor.index(&self.grid);
        let touched = self.reveal_cells([index]);
        self
          .cursor
          .advance_after_entry(&self.grid, &self.clues, settings);
        self.change(touched)
      }
      RevealMode::Word => {
        let word = self.active_word();
        let touched = self.reveal_cells(word.cells());
        self.change(touched)
      }
    }
  }

  fn reveal_cells(&mut self, cells: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut touched = vec![];
    for index in cells {
      let answer = self.grid.solution(index);
      if self.grid.set_entry(index, answer) {
        touched.push(index);
      }
    }
    touched
  }
}

/// The puzzle currently being solved, if any, plus the user's settings, which
/// outlive any one puzzle. This is the whole mutation surface for a front end:
/// every operation returns `None` when no puzzle is loaded.
#[derive(Debug, Default)]
pub struct Session {
  settings: Settings,
  puzzle: Option<Puzzle>,
  completion: Completion,
}

impl Session {
  pub fn new(settings: Settings) -> Self {
    Self {
      settings,
      ..Self::default()
    }
  }

  /// Replaces the current puzzle. On error the previous puzzle stays loaded.
  pub fn load(&mut self, source: PuzzleSource) -> Result<&Puzzle, Error> {
    let puzzle = Puzzle::new(source)?;
    info!(
      "loaded '{}' ({}x{}, {} clues{})",
      puzzle.title(),
      puzzle.grid().width(),
      puzzle.grid().height(),
      puzzle.clues().len(),
      if puzzle.grid().is_redacted() {
        ", redacted"
      } else {
        ""
      }
    );

    self.completion = Completion::compute(
      puzzle.grid(),
      puzzle.clues(),
      &self.settings.effective(puzzle.grid().is_redacted()),
    );
    Ok(&*self.puzzle.insert(puzzle))
  }

  pub fn puzzle(&self) -> Option<&Puzzle> {
    self.puzzle.as_ref()
  }

  /// The settings as the user chose them.
  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  /// The settings as they apply to the loaded puzzle. See [Settings::effective].
  pub fn effective_settings(&self) -> Settings {
    let redacted = self
      .puzzle
      .as_ref()
      .is_some_and(|p| p.grid().is_redacted());
    self.settings.effective(redacted)
  }

  pub fn set_settings(&mut self, settings: Settings) {
    debug!("settings changed: {settings:?}");
    self.settings = settings;
    self.recompute();
  }

  /// Per-clue status, kept up to date after every change.
  pub fn completion(&self) -> &Completion {
    &self.completion
  }

  /// Cells holding a wrong letter, if error checking applies.
  pub fn wrong_cells(&self) -> Vec<usize> {
    self
      .puzzle
      .as_ref()
      .map(|p| p.wrong_cells(&self.effective_settings()))
      .unwrap_or_default()
  }

  fn recompute(&mut self) {
    let settings = self.effective_settings();
    if let Some(puzzle) = &self.puzzle {
      self.completion = Completion::compute(puzzle.grid(), puzzle.clues(), &settings);
    }
  }

  fn apply(&mut self, op: impl FnOnce(&mut Puzzle, &Settings) -> Change) -> Option<Change> {
    let settings = self.effective_settings();
    let puzzle = self.puzzle.as_mut()?;
    let change = op(puzzle, &settings);
    if !change.touched.is_empty() {
      self.completion = Completion::compute(puzzle.grid(), puzzle.clues(), &settings);
    }
    Some(change)
  }

  pub fn move_directional(&mut self, drow: isize, dcol: isize) -> Option<Change> {
    self.apply(|p, _| p.move_directional(drow, dcol))
  }

  pub fn move_wrapping(&mut self, drow: isize, dcol: isize) -> Option<Change> {
    self.apply(|p, _| p.move_wrapping(drow, dcol))
  }

  pub fn move_vector_jump(&mut self, drow: isize, dcol: isize) -> Option<Change> {
    self.apply(|p, _| p.move_vector_jump(drow, dcol))
  }

  pub fn toggle_direction(&mut self) -> Option<Change> {
    self.apply(|p, _| p.toggle_direction())
  }

  pub fn set_letter(&mut self, letter: char) -> Option<Change> {
    self.apply(|p, s| p.set_letter(s, letter))
  }

  pub fn advance_after_entry(&mut self) -> Option<Change> {
    self.apply(|p, s| p.advance_after_entry(s))
  }

  pub fn clear_and_retreat(&mut self) -> Option<Change> {
    self.apply(|p, s| p.clear_and_retreat(s))
  }

  pub fn jump_to_adjacent_word(&mut self, forward: bool, skip_locked_words: bool) -> Option<Change> {
    self.apply(|p, s| p.jump_to_adjacent_word(s, forward, skip_locked_words))
  }

  pub fn click(&mut self, col: usize, row: usize) -> Option<Change> {
    self.apply(|p, _| p.click(col, row))
  }

  pub fn reveal(&mut self) -> Option<Change> {
    self.apply(|p, s| p.reveal(s))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Direction::{Across, Down};
  use crate::settings::EndOfWord;
  use crate::test_util::{session, source, source_with};

  fn checking() -> Settings {
    Settings {
      error_check: true,
      ..Settings::default()
    }
  }

  fn type_word(session: &mut Session, word: &str) {
    for c in word.chars() {
      session.set_letter(c);
    }
  }

  fn cursor_index(session: &Session) -> usize {
    let puzzle = session.puzzle().unwrap();
    puzzle.cursor().index(puzzle.grid())
  }

  #[test]
  fn operations_without_a_puzzle_do_nothing() {
    let mut session = Session::default();
    assert_eq!(session.set_letter('A'), None);
    assert_eq!(session.move_wrapping(0, 1), None);
    assert_eq!(session.reveal(), None);
    assert!(session.wrong_cells().is_empty());
  }

  #[test]
  fn typing_a_word_then_jumping_to_the_first_down_clue() {
    // CAT
    // .O.
    // .WE
    let mut session = session(&["CAT", ".O.", ".WE"], Settings::default());
    type_word(&mut session, "cat");

    let puzzle = session.puzzle().unwrap();
    assert_eq!(puzzle.grid().entry(0), Cell::Letter('C'));
    assert_eq!(puzzle.grid().entry(2), Cell::Letter('T'));
    // 1-Across is followed by 3-Across (WE), then the first Down clue.
    assert_eq!(puzzle.cursor().index(puzzle.grid()), 7);
    assert_eq!(puzzle.cursor().direction, Across);

    type_word(&mut session, "WE");
    let puzzle = session.puzzle().unwrap();
    let first_down = &puzzle.clues().list(Down)[0];
    assert_eq!(puzzle.cursor().index(puzzle.grid()), first_down.start);
    assert_eq!(puzzle.cursor().direction, Down);
  }

  #[test]
  fn typing_with_stay_keeps_the_cursor_on_the_last_cell() {
    let settings = Settings {
      end_of_word: EndOfWord::Stay,
      ..Settings::default()
    };
    let mut session = session(&["CAT", ".O.", ".WE"], settings);
    type_word(&mut session, "CATS");

    let puzzle = session.puzzle().unwrap();
    assert_eq!(puzzle.cursor().index(puzzle.grid()), 2);
    assert_eq!(puzzle.grid().entry(2), Cell::Letter('S'));
  }

  #[test]
  fn locked_words_reject_edits() {
    let mut session = session(&["CAT", ".O.", ".WE"], checking());
    type_word(&mut session, "CAT");
    assert!(session.completion().list(Across)[0].locked);

    session.click(1, 0);
    let change = session.set_letter('Z').unwrap();
    assert!(change.touched.is_empty());
    assert_eq!(session.puzzle().unwrap().grid().entry(1), Cell::Letter('A'));

    // Backspace from a locked word jumps back instead of clearing. Going back from
    // 1-Across runs off the front of the list into the last Down clue.
    let change = session.clear_and_retreat().unwrap();
    assert!(change.touched.is_empty());
    assert_eq!(session.puzzle().unwrap().grid().entry(1), Cell::Letter('A'));
    assert_eq!(change.cursor.direction, Down);
    assert_eq!(cursor_index(&session), 1);
  }

  #[test]
  fn crossing_cells_of_locked_words_are_locked() {
    let mut session = session(&["CAT", ".O.", ".WE"], checking());
    type_word(&mut session, "CAT");

    // 2-Down (AOW) shares the A with the locked 1-Across.
    session.click(1, 0);
    session.toggle_direction();
    let change = session.clear_and_retreat().unwrap();
    assert!(change.touched.is_empty());
    assert_eq!(session.puzzle().unwrap().grid().entry(1), Cell::Letter('A'));
  }

  #[test]
  fn wrong_words_do_not_lock() {
    let mut session = session(&["CAT", ".O.", ".WE"], checking());
    type_word(&mut session, "COT");
    assert!(!session.completion().list(Across)[0].locked);
    assert!(session.completion().list(Across)[0].filled);
    assert_eq!(session.wrong_cells(), [1]);

    session.click(1, 0);
    session.set_letter('A');
    assert!(session.completion().list(Across)[0].locked);
    assert!(session.wrong_cells().is_empty());
  }

  #[test]
  fn backspace_clears_and_steps_back() {
    let settings = Settings {
      end_of_word: EndOfWord::Stay,
      ..Settings::default()
    };
    let mut session = session(&["CAT", ".O.", ".WE"], settings);
    type_word(&mut session, "CAT");

    let change = session.clear_and_retreat().unwrap();
    assert_eq!(change.touched, [2]);
    assert_eq!(cursor_index(&session), 1);

    session.clear_and_retreat();
    session.clear_and_retreat();
    assert_eq!(cursor_index(&session), 0);
    // At the start of the word there is nowhere to go, but the cell is cleared.
    assert!(session.puzzle().unwrap().grid().entry(0).is_empty());
    assert!(session.clear_and_retreat().unwrap().touched.is_empty());
  }

  #[test]
  fn reveal_letter_and_word() {
    let mut session = session(&["CAT", ".O.", ".WE"], Settings::default());

    let change = session.reveal().unwrap();
    assert_eq!(change.touched, [0]);
    assert_eq!(cursor_index(&session), 1);

    session.set_settings(Settings {
      reveal_mode: RevealMode::Word,
      ..Settings::default()
    });
    let change = session.reveal().unwrap();
    assert_eq!(change.touched, [1, 2]);
    assert_eq!(cursor_index(&session), 1);
    assert!(session.completion().list(Across)[0].filled);

    session.set_settings(Settings {
      reveal_enabled: false,
      ..Settings::default()
    });
    session.click(1, 2);
    assert!(session.reveal().unwrap().touched.is_empty());
  }

  #[test]
  fn redacted_puzzles_disable_checking_and_reveals() {
    let mut session = session(&["XXXX", "XX.X", "XXXA"], checking());
    let puzzle = session.puzzle().unwrap();
    assert!(puzzle.grid().is_redacted());
    assert!(!session.effective_settings().error_check);
    assert!(session.settings().error_check);

    assert!(session.reveal().unwrap().touched.is_empty());

    type_word(&mut session, "XXXX");
    assert!(!session.completion().list(Across)[0].locked);
    assert!(session.wrong_cells().is_empty());
    session.click(0, 0);
    assert_eq!(session.set_letter('Q').unwrap().touched, [0]);
  }

  #[test]
  fn references_follow_the_cursor() {
    let mut session = Session::default();
    let source = source_with(&["CAT", ".O.", ".WE"], &[(1, Across, "See 2-Down")]);
    session.load(source).unwrap();

    let references = session.puzzle().unwrap().references();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].word.cells().collect::<Vec<_>>(), [1, 4, 7]);

    session.toggle_direction();
    assert!(session.puzzle().unwrap().references().is_empty());
  }

  #[test]
  fn failed_load_keeps_the_old_puzzle() {
    let mut session = session(&["CAT", ".O.", ".WE"], Settings::default());
    session.set_letter('C');

    let mut bad = source(&["AB", "CD"]);
    bad.solution.push('E');
    assert!(session.load(bad).is_err());

    let puzzle = session.puzzle().unwrap();
    assert_eq!(puzzle.grid().width(), 3);
    assert_eq!(puzzle.grid().entry(0), Cell::Letter('C'));
  }

  #[test]
  fn load_resets_the_cursor_and_keeps_settings() {
    let mut session = session(&["CAT", ".O.", ".WE"], checking());
    session.click(2, 0);

    session.load(source(&[".AB", "CDE"])).unwrap();
    let puzzle = session.puzzle().unwrap();
    assert_eq!(puzzle.cursor().index(puzzle.grid()), 1);
    assert_eq!(puzzle.cursor().direction, Across);
    assert!(session.settings().error_check);
  }

  #[test]
  fn clicks_toggle_or_move() {
    let mut session = session(&["CAT", ".O.", ".WE"], Settings::default());

    assert_eq!(session.click(0, 0).unwrap().cursor.direction, Down);
    assert_eq!(session.click(0, 1).unwrap().cursor.direction, Down);
    assert_eq!(cursor_index(&session), 0);
    assert_eq!(session.click(2, 2).unwrap().cursor.direction, Down);
    assert_eq!(cursor_index(&session), 8);
  }
}
