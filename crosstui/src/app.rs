use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use crossfill::Direction::{Across, Down};
use crossfill::{Cell, Direction, Grid, Puzzle, RevealMode, Session, Settings};
use crossterm::event::{
  self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
  KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use log::{debug, warn};
use ratatui::{
  DefaultTerminal, Frame,
  buffer::Buffer,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::Line,
  widgets::{Block, List, ListItem, ListState, Padding, Paragraph, StatefulWidget, Widget, Wrap},
};
use ratatui_macros::{line, span};

use crate::config::{self, Config};

const SQUARE_WIDTH: u16 = 4;
const SQUARE_HEIGHT: u16 = 2;
const GAP: u16 = 1;
const CLUE_PANEL_WIDTH: u16 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SquareStyle {
  // Default styling
  Standard,
  // The cursor is positioned on this square.
  Cursor,
  // This cursor is not on this square, but the word indicated by the cursor includes this square.
  Word,
  // Part of a word the current clue refers to.
  Reference,
  Block,
}

impl From<SquareStyle> for Style {
  fn from(value: SquareStyle) -> Self {
    let base_style = match value {
      SquareStyle::Standard => Style::new().bg(Color::White),
      SquareStyle::Cursor => Style::new().bg(Color::LightRed),
      SquareStyle::Word => Style::new().bg(Color::LightYellow),
      SquareStyle::Reference => Style::new().bg(Color::LightCyan),
      SquareStyle::Block => return Style::new().bg(Color::Black),
    };
    base_style.fg(Color::Black).add_modifier(Modifier::BOLD)
  }
}

/// Screen regions, shared by rendering and mouse hit-testing.
struct Areas {
  title: Rect,
  grid: Rect,
  clues: Rect,
  status: Rect,
}

fn areas(area: Rect, grid: &Grid) -> Areas {
  let [title, main, status] = Layout::vertical([
    Constraint::Length(2),
    Constraint::Fill(1),
    Constraint::Length(1),
  ])
  .areas(area);
  let [puzzle_area, clues] =
    Layout::horizontal([Constraint::Fill(1), Constraint::Length(CLUE_PANEL_WIDTH)]).areas(main);

  let grid = center(
    puzzle_area,
    Constraint::Length(span_len(grid.width(), SQUARE_WIDTH)),
    Constraint::Length(span_len(grid.height(), SQUARE_HEIGHT)),
  );
  Areas {
    title,
    grid,
    clues,
    status,
  }
}

/// Screen length of `count` squares of `size` with gaps between them.
fn span_len(count: usize, size: u16) -> u16 {
  let count = u16::try_from(count).unwrap_or(u16::MAX);
  count
    .saturating_mul(size + GAP)
    .saturating_sub(GAP)
}

/// Maps a screen position to the square under it, if any. Gaps between squares
/// belong to no square.
fn square_at(grid_area: Rect, grid: &Grid, x: u16, y: u16) -> Option<(usize, usize)> {
  let dx = x.checked_sub(grid_area.x)?;
  let dy = y.checked_sub(grid_area.y)?;
  if dx % (SQUARE_WIDTH + GAP) >= SQUARE_WIDTH || dy % (SQUARE_HEIGHT + GAP) >= SQUARE_HEIGHT {
    return None;
  }
  let col = usize::from(dx / (SQUARE_WIDTH + GAP));
  let row = usize::from(dy / (SQUARE_HEIGHT + GAP));
  grid.contains(col, row).then_some((col, row))
}

#[derive(Debug)]
pub struct App {
  session: Session,
  /// Where toggled settings get saved. `None` with `--no-save`.
  config_path: Option<PathBuf>,
  running: bool,
  /// Frame size at the last draw, for mapping mouse clicks.
  area: Rect,
}

impl App {
  pub fn new(session: Session, config_path: Option<PathBuf>) -> Self {
    Self {
      session,
      config_path,
      running: true,
      area: Rect::default(),
    }
  }

  pub fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
    execute!(io::stdout(), EnableMouseCapture)?;
    self.running = true;
    let result = (|| -> io::Result<()> {
      while self.running {
        terminal.draw(|frame| self.draw(frame))?;
        self.handle_crossterm_events()?;
      }
      Ok(())
    })();
    execute!(io::stdout(), DisableMouseCapture)?;
    result
  }

  fn draw(&mut self, frame: &mut Frame) {
    self.area = frame.area();
    frame.render_widget(&*self, frame.area());
  }

  /// Reads the crossterm events and updates the state of [`App`].
  fn handle_crossterm_events(&mut self) -> io::Result<()> {
    match event::read()? {
      // it's important to check KeyEventKind::Press to avoid handling key release events
      Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
      Event::Mouse(mouse) => self.on_mouse_event(mouse),
      _ => {}
    }
    Ok(())
  }

  /// Handles the key events and updates the state of [`App`].
  fn on_key_event(&mut self, key: KeyEvent) {
    let change = match (key.modifiers, key.code) {
      (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
        self.quit();
        return;
      }

      (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
        return self.update_settings(|s| s.error_check = !s.error_check);
      }
      (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
        return self.update_settings(|s| s.skip_filled = !s.skip_filled);
      }
      (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
        return self.update_settings(|s| s.end_of_word = s.end_of_word.toggled());
      }
      (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
        return self.update_settings(|s| s.reveal_mode = s.reveal_mode.toggled());
      }
      (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.session.reveal(),

      (modifiers, code @ (KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right)) => {
        let (drow, dcol) = match code {
          KeyCode::Up => (-1, 0),
          KeyCode::Down => (1, 0),
          KeyCode::Left => (0, -1),
          _ => (0, 1),
        };
        if modifiers.contains(KeyModifiers::CONTROL) {
          self.session.move_wrapping(drow, dcol)
        } else if modifiers.contains(KeyModifiers::ALT) {
          self.session.move_directional(drow, dcol)
        } else {
          self.session.move_vector_jump(drow, dcol)
        }
      }

      (_, KeyCode::Tab) => self.session.jump_to_adjacent_word(true, true),
      (_, KeyCode::BackTab) => self.session.jump_to_adjacent_word(false, true),
      (_, KeyCode::Backspace) => self.session.clear_and_retreat(),
      (_, KeyCode::Char(' ')) => self.session.toggle_direction(),
      (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.session.set_letter(c),
      _ => None,
    };
    if let Some(change) = change {
      debug!("{:?} -> {:?}", key.code, change);
    }
  }

  fn on_mouse_event(&mut self, mouse: MouseEvent) {
    let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
      return;
    };
    let Some(puzzle) = self.session.puzzle() else {
      return;
    };
    let grid_area = areas(self.area, puzzle.grid()).grid;
    if let Some((col, row)) = square_at(grid_area, puzzle.grid(), mouse.column, mouse.row) {
      self.session.click(col, row);
    }
  }

  /// Applies a settings toggle and saves it, unless saving is off.
  fn update_settings(&mut self, toggle: impl FnOnce(&mut Settings)) {
    let mut settings = *self.session.settings();
    toggle(&mut settings);
    self.session.set_settings(settings);

    if let Some(path) = &self.config_path {
      let config = Config { settings };
      if let Err(err) = config::save_config(path, &config) {
        warn!("Failed to save settings: {}", err);
      }
    }
  }

  /// Set running to false to quit the application.
  fn quit(&mut self) {
    self.running = false;
  }

  // Determines how a particular square should be styled.
  fn square_style(&self, puzzle: &Puzzle, references: &HashSet<usize>, index: usize) -> SquareStyle {
    if puzzle.grid().is_block(index) {
      SquareStyle::Block
    } else if index == puzzle.cursor().index(puzzle.grid()) {
      SquareStyle::Cursor
    } else if puzzle.active_word().contains(index) {
      SquareStyle::Word
    } else if references.contains(&index) {
      SquareStyle::Reference
    } else {
      SquareStyle::Standard
    }
  }

  fn render_grid(&self, puzzle: &Puzzle, grid_area: Rect, buf: &mut Buffer) {
    let grid = puzzle.grid();
    let references: HashSet<usize> = puzzle
      .references()
      .iter()
      .flat_map(|r| r.word.cells())
      .collect();
    let wrong: HashSet<usize> = self.session.wrong_cells().into_iter().collect();

    for row in 0..grid.height() {
      for col in 0..grid.width() {
        let index = grid.index(col, row);
        let square_area = Rect {
          x: grid_area.x + col as u16 * (SQUARE_WIDTH + GAP),
          y: grid_area.y + row as u16 * (SQUARE_HEIGHT + GAP),
          width: SQUARE_WIDTH,
          height: SQUARE_HEIGHT,
        }
        .intersection(buf.area);
        let style = self.square_style(puzzle, &references, index);
        Block::new().style(style).render(square_area, buf);
        if style == SquareStyle::Block {
          continue;
        }

        let number = puzzle
          .clues()
          .at_start(Across, index)
          .or_else(|| puzzle.clues().at_start(Down, index))
          .map(|clue| clue.number.to_string())
          .unwrap_or_default();
        let letter = match grid.entry(index) {
          Cell::Letter(c) => c.to_string(),
          _ => String::new(),
        };
        let letter_style = if wrong.contains(&index) {
          Style::new().fg(Color::Red)
        } else if puzzle.is_cell_locked(&self.session.effective_settings(), index) {
          Style::new().fg(Color::Blue)
        } else {
          Style::new()
        };

        let [number_area, letter_area] =
          Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(square_area);
        Line::from(number)
          .style(Style::new().add_modifier(Modifier::DIM))
          .render(number_area, buf);
        Line::from(letter)
          .style(letter_style)
          .centered()
          .render(letter_area, buf);
      }
    }
  }

  fn render_clues(&self, puzzle: &Puzzle, area: Rect, buf: &mut Buffer) {
    let [current_area, across_area, down_area] = Layout::vertical([
      Constraint::Length(6),
      Constraint::Fill(1),
      Constraint::Fill(1),
    ])
    .areas(area);

    let current = puzzle
      .current_clue()
      .map(|clue| format!("{}-{}: {}", clue.number, clue.direction, clue.text))
      .unwrap_or_default();
    Paragraph::new(current)
      .wrap(Wrap { trim: true })
      .block(
        Block::bordered()
          .title(Line::from("Current clue").centered())
          .padding(Padding::horizontal(1)),
      )
      .render(current_area, buf);

    let referenced: HashSet<(Direction, u16)> = puzzle
      .references()
      .iter()
      .map(|r| (r.direction, r.number))
      .collect();
    let active_start = puzzle.active_word().start;

    for (direction, list_area) in [(Across, across_area), (Down, down_area)] {
      let statuses = self.session.completion().list(direction);
      let items: Vec<ListItem> = puzzle
        .clues()
        .list(direction)
        .iter()
        .zip(statuses)
        .map(|(clue, status)| {
          let mut style = Style::new();
          if status.filled {
            style = style.add_modifier(Modifier::DIM);
          }
          if status.locked {
            style = style.add_modifier(Modifier::CROSSED_OUT);
          }
          if referenced.contains(&(direction, clue.number)) {
            style = style.fg(Color::Cyan);
          }
          ListItem::new(format!("{:>3} {}", clue.number, clue.text)).style(style)
        })
        .collect();

      let selected = (puzzle.cursor().direction == direction)
        .then(|| puzzle.clues().position(direction, active_start))
        .flatten();
      let mut state = ListState::default().with_selected(selected);
      let list = List::new(items)
        .block(Block::bordered().title(Line::from(direction.to_string()).centered()))
        .highlight_style(Style::new().bg(Color::LightYellow).fg(Color::Black));
      StatefulWidget::render(list, list_area, buf, &mut state);
    }
  }

  fn render_status(&self, puzzle: &Puzzle, area: Rect, buf: &mut Buffer) {
    let settings = self.session.effective_settings();
    let on_off = |on: bool| if on { "on" } else { "off" };
    let total = puzzle.clues().len();

    let progress = if puzzle.is_solved() {
      span!(Style::new().green().bold(); "Solved!")
    } else {
      span!("{}/{} clues filled", self.session.completion().filled_count(), total)
    };
    let status = line![
      progress,
      span!(Style::new().dim(); "  ^E check: {}", on_off(settings.error_check)),
      span!(Style::new().dim(); "  ^S skip filled: {}", on_off(settings.skip_filled)),
      span!(Style::new().dim(); "  ^N end of word: {:?}", settings.end_of_word),
      span!(
        Style::new().dim();
        "  ^W reveal: {}",
        match (settings.reveal_enabled, settings.reveal_mode) {
          (false, _) => "off",
          (true, RevealMode::Letter) => "letter",
          (true, RevealMode::Word) => "word",
        }
      ),
      if puzzle.grid().is_redacted() {
        span!(Style::new().yellow(); "  (redacted)")
      } else {
        span!("")
      },
    ];
    status.centered().render(area, buf);
  }
}

impl Widget for &App {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let Some(puzzle) = self.session.puzzle() else {
      return;
    };
    let areas = areas(area, puzzle.grid());

    let mut title = vec!["Ratatui Crossword".bold().blue(), ": ".bold(), puzzle.title().bold()];
    if !puzzle.author().is_empty() {
      title.push(format!(" by {}", puzzle.author()).into());
    }
    Line::from(title).centered().render(areas.title, buf);

    self.render_grid(puzzle, areas.grid, buf);
    self.render_clues(puzzle, areas.clues, buf);
    self.render_status(puzzle, areas.status, buf);
  }
}

/// https://ratatui.rs/recipes/layout/center-a-widget/
fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
  let [area] = Layout::horizontal([horizontal])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
  area
}
