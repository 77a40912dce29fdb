mod app;
mod config;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use crossfill::{EndOfWord, PuzzleSource, RevealMode, Session, Settings};
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::app::App;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "crosstui", version, about = "Solve crossword puzzles in your terminal")]
struct Args {
  /// The .puz file to play
  path: PathBuf,

  /// Mark wrong letters and lock correct words
  #[arg(long)]
  error_check: bool,

  /// Skip over filled cells while typing
  #[arg(long)]
  skip_filled: bool,

  /// What to do after typing the last letter of a word
  #[arg(long, value_enum)]
  end_of_word: Option<EndOfWordArg>,

  /// How much Ctrl+R reveals
  #[arg(long, value_enum)]
  reveal_mode: Option<RevealModeArg>,

  /// Disable Ctrl+R
  #[arg(long)]
  no_reveal: bool,

  /// Don't write settings changes back to the config file
  #[arg(long)]
  no_save: bool,

  /// Config file to use instead of the default location
  #[arg(long)]
  config: Option<PathBuf>,

  /// Log level for the log file
  #[arg(long, default_value = "info")]
  log_level: LevelFilter,

  /// Play the puzzle even if its checksums don't match
  #[arg(long)]
  ignore_checksums: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EndOfWordArg {
  Stay,
  Next,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RevealModeArg {
  Letter,
  Word,
}

impl Args {
  /// Layers the command-line flags over `settings`.
  fn apply(&self, mut settings: Settings) -> Settings {
    settings.error_check |= self.error_check;
    settings.skip_filled |= self.skip_filled;
    if self.no_reveal {
      settings.reveal_enabled = false;
    }
    if let Some(end_of_word) = self.end_of_word {
      settings.end_of_word = match end_of_word {
        EndOfWordArg::Stay => EndOfWord::Stay,
        EndOfWordArg::Next => EndOfWord::JumpNext,
      };
    }
    if let Some(reveal_mode) = self.reveal_mode {
      settings.reveal_mode = match reveal_mode {
        RevealModeArg::Letter => RevealMode::Letter,
        RevealModeArg::Word => RevealMode::Word,
      };
    }
    settings
  }
}

fn main() -> io::Result<()> {
  let args = Args::parse();
  init_logging(args.log_level);

  let config_path = args.config.clone().or_else(config::config_path);
  let config = match &config_path {
    Some(path) => config::load_config(path).unwrap_or_else(|err| {
      warn!("Ignoring config file {}: {}", path.display(), err);
      eprintln!("Ignoring config file {}: {}", path.display(), err);
      Config::default()
    }),
    None => Config::default(),
  };
  let settings = args.apply(config.settings);

  let source = parse_puz(&args.path, args.ignore_checksums);
  let mut session = Session::new(settings);
  if let Err(err) = session.load(source) {
    error!("Invalid puzzle {}: {}", args.path.display(), err);
    println!("Invalid puzzle: {}", err);
    process::exit(2);
  }

  let save_path = if args.no_save { None } else { config_path };
  let app = App::new(session, save_path);

  let terminal = ratatui::init();
  let result = app.run(terminal);
  ratatui::restore();
  result
}

/// Logs go to `<cache dir>/crosstui/crosstui.log` since the terminal belongs to the
/// UI. Without a cache dir, nothing is logged.
fn init_logging(level: LevelFilter) {
  let Some(dir) = dirs::cache_dir().map(|d| d.join("crosstui")) else {
    return;
  };
  let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
  if fs::create_dir_all(&dir).is_ok()
    && let Ok(log_file) = File::create(dir.join("crosstui.log"))
  {
    let _ = WriteLogger::init(level, log_config, log_file);
  }
}

fn parse_puz(path: &Path, ignore_checksums: bool) -> PuzzleSource {
  let data: Vec<u8> = fs::read(path).unwrap_or_else(|err| {
    error!("Failed to read {}: {}", path.display(), err);
    println!("Failed to read {}: {}", path.display(), err);
    process::exit(1);
  });
  let (source, checksum_mismatches) = crossfill::parse_puz(&data).unwrap_or_else(|e| {
    error!("Failed to parse {}: {}", path.display(), e);
    println!("Failed to parse .puz file: {}", e);
    process::exit(2);
  });

  if !checksum_mismatches.is_empty() {
    if ignore_checksums {
      warn!("Ignoring checksum mismatches: {:?}", checksum_mismatches);
    } else {
      println!(
        ".puz file parsing encountered checksum mismatches: {:?}",
        checksum_mismatches
      );
      println!("Pass --ignore-checksums to play it anyway.");
      process::exit(3);
    }
  }
  info!("Read {} ({} bytes)", path.display(), data.len());
  source
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(extra: &[&str]) -> Args {
    Args::parse_from(["crosstui", "puzzle.puz"].iter().chain(extra))
  }

  #[test]
  fn flags_override_config() {
    let from_file = Settings {
      end_of_word: EndOfWord::Stay,
      reveal_mode: RevealMode::Word,
      ..Settings::default()
    };

    let settings = args(&[]).apply(from_file);
    assert_eq!(settings, from_file);

    let settings = args(&[
      "--error-check",
      "--end-of-word",
      "next",
      "--reveal-mode",
      "letter",
      "--no-reveal",
    ])
    .apply(from_file);
    assert!(settings.error_check);
    assert!(!settings.skip_filled);
    assert!(!settings.reveal_enabled);
    assert_eq!(settings.end_of_word, EndOfWord::JumpNext);
    assert_eq!(settings.reveal_mode, RevealMode::Letter);
  }

  #[test]
  fn log_level_parses() {
    assert_eq!(args(&[]).log_level, LevelFilter::Info);
    assert_eq!(args(&["--log-level", "debug"]).log_level, LevelFilter::Debug);
  }
}
