use serde::{Deserialize, Serialize};

/// What happens after typing into the last cell of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfWord {
  /// Leave the cursor on the cell just typed.
  Stay,
  /// Jump to the start of the next clue.
  #[default]
  #[serde(rename = "next", alias = "jumpnext")]
  JumpNext,
}

/// How much a reveal uncovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
  #[default]
  Letter,
  Word,
}

/// User-adjustable behaviour. Read-only input to navigation; changed only by
/// explicit toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Compare entries against the solution. Fully correct words become locked.
  pub error_check: bool,
  /// Skip over cells that already hold a letter when advancing.
  pub skip_filled: bool,
  pub end_of_word: EndOfWord,
  pub reveal_mode: RevealMode,
  /// Whether reveals are allowed at all.
  pub reveal_enabled: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      error_check: false,
      skip_filled: false,
      end_of_word: EndOfWord::JumpNext,
      reveal_mode: RevealMode::Letter,
      reveal_enabled: true,
    }
  }
}

impl Settings {
  /// The settings that actually apply to a puzzle. A redacted puzzle has no answer
  /// key worth showing, so error checking and reveals are forced off.
  pub fn effective(self, redacted: bool) -> Self {
    if redacted {
      Self {
        error_check: false,
        reveal_enabled: false,
        ..self
      }
    } else {
      self
    }
  }
}

impl EndOfWord {
  pub fn toggled(self) -> Self {
    match self {
      Self::Stay => Self::JumpNext,
      Self::JumpNext => Self::Stay,
    }
  }
}

impl RevealMode {
  pub fn toggled(self) -> Self {
    match self {
      Self::Letter => Self::Word,
      Self::Word => Self::Letter,
    }
  }
}
