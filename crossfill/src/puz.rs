//! Reading `.puz` files. There is no official spec for the format, but I'm following
//! <https://gist.github.com/sliminality/dab21fa834eae0a70193c7cd69c356d5>
//! here and it seems to work well.

use crate::Error;
use crate::checksum::Cksum;
use crate::source::PuzzleSource;
use std::fmt::{Debug, Display};

use encoding::DecoderTrap::Strict;
use encoding::Encoding;
use encoding::all::ISO_8859_1;
use log::warn;

const MAGIC: &[u8] = b"ACROSS&DOWN\0";

/// Creates a [PuzzleSource] from the bytes of a `.puz` file.
///
/// Checksum mismatches don't stop parsing; they are returned alongside the puzzle
/// so the caller can decide whether a possibly-corrupt file is acceptable.
pub fn parse(data: &[u8]) -> Result<(PuzzleSource, Vec<ChecksumMismatch>), Error> {
  let mut checksum_mismatches = vec![];

  let cib_checksum_expected = Cksum::default().region(
    data
      .get(0x2C..0x34)
      .ok_or(Error::EofError(data.len()))?,
  );

  let mut scanner = Scanner::new(data);

  let overall_checksum = scanner.parse_short()?;
  scanner.take_exact(MAGIC)?;

  let cib_checksum = scanner.parse_short()?;
  if cib_checksum != cib_checksum_expected.0 {
    checksum_mismatches.push(ChecksumMismatch {
      checksum: Checksum::Cib,
      expected: cib_checksum_expected.0,
      actual: cib_checksum,
    });
  }

  let masked_checksums = scanner.take_n_bytes(8)?;

  // Version string
  let _ = scanner.take_n_bytes(4)?;
  // Reserved 1C
  let _ = scanner.take_n_bytes(2)?;
  // Scrambled checksum
  let _ = scanner.take_n_bytes(2)?;
  // 0x20 through 0x2B are unused.
  let _ = scanner.take_n_bytes(12)?;

  let width = scanner.pop()? as usize;
  let height = scanner.pop()? as usize;
  let num_clues = scanner.parse_short()?;

  // Unknown bitmask
  let _ = scanner.parse_short()?;

  let scrambled_tag = scanner.parse_short()?;
  if scrambled_tag != 0 {
    return Err(Error::ScrambledError);
  }

  let solution = scanner.take_n_bytes(width * height)?;
  let fill = scanner.take_n_bytes(width * height)?;

  let title = scanner.parse_nul_terminated_string()?;
  let author = scanner.parse_nul_terminated_string()?;
  let copyright = scanner.parse_nul_terminated_string()?;

  let clues = (0..num_clues)
    .map(|_| scanner.parse_nul_terminated_string())
    .collect::<Result<Vec<_>, _>>()?;

  let notes = scanner.parse_nul_terminated_string()?;

  let partial_board_checksum = |start: Cksum| {
    let mut c = start
      .metadata(title)
      .metadata(author)
      .metadata(copyright);
    for clue in &clues {
      c = c.clue(clue);
    }
    c.metadata(notes)
  };

  let overall_checksum_expected =
    partial_board_checksum(Cksum(cib_checksum).region(solution).region(fill));
  if overall_checksum != overall_checksum_expected.0 {
    checksum_mismatches.push(ChecksumMismatch {
      checksum: Checksum::Overall,
      expected: overall_checksum_expected.0,
      actual: overall_checksum,
    })
  }

  let cib = Cksum(cib_checksum);
  let solution_checksum = Cksum::default().region(solution);
  let grid_checksum = Cksum::default().region(fill);
  let partial = partial_board_checksum(Cksum::default());

  let expected_masked_checksums = [
    b'I' ^ cib.low(),
    b'C' ^ solution_checksum.low(),
    b'H' ^ grid_checksum.low(),
    b'E' ^ partial.low(),
    b'A' ^ cib.high(),
    b'T' ^ solution_checksum.high(),
    b'E' ^ grid_checksum.high(),
    b'D' ^ partial.high(),
  ];

  for (i, (&expected, &actual)) in expected_masked_checksums
    .iter()
    .zip(masked_checksums.iter())
    .enumerate()
  {
    if expected != actual {
      checksum_mismatches.push(ChecksumMismatch {
        checksum: Checksum::Masked(i),
        expected: expected as u16,
        actual: actual as u16,
      })
    }
  }

  if !checksum_mismatches.is_empty() {
    warn!("checksum mismatches: {checksum_mismatches:?}");
  }

  let texts = clues
    .iter()
    .map(|clue| decode_str(clue))
    .collect::<Result<Vec<String>, _>>()?;

  let mut source = PuzzleSource::numbered(width, height, latin1(solution), texts)?;
  source.fill = Some(latin1(fill));
  source.title = decode_str(title)?;
  source.author = decode_str(author)?;
  source.copyright = decode_str(copyright)?;
  source.notes = decode_str(notes)?;

  Ok((source, checksum_mismatches))
}

/// Grid bytes map one-to-one onto characters.
fn latin1(bytes: &[u8]) -> String {
  bytes.iter().map(|&b| b as char).collect()
}

/// Turn a NUL-terminated ISO-8859-1-encoded string into a standard String.
fn decode_str(bytes: &[u8]) -> Result<String, Error> {
  // TODO: It looks like at least some puz files use UTF-8, so try using that
  // instead, perhaps based on the version field.
  let bytes = bytes
    .strip_suffix(b"\0")
    .ok_or_else(|| Error::ParseError(format!("string {:?} is not NUL-terminated", bytes)))?;

  ISO_8859_1.decode(bytes, Strict).map_err(|e| {
    Error::EncodingError(format!("Failed parsing '{:?}' as ISO-8859-1: {}", bytes, e))
  })
}

// Loosely based on
// https://depth-first.com/articles/2021/12/16/a-beginners-guide-to-parsing-in-rust/
struct Scanner<'a> {
  cursor: usize,
  data: &'a [u8],
}

impl Debug for Scanner<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Scanner")
      .field("cursor", &self.cursor)
      .finish()
  }
}

impl<'a> Scanner<'a> {
  fn new(data: &'a [u8]) -> Self {
    Self { cursor: 0, data }
  }

  /// Consume and return the next byte.
  fn pop(&mut self) -> Result<u8, Error> {
    let byte = *self
      .data
      .get(self.cursor)
      .ok_or(Error::EofError(self.cursor))?;
    self.cursor += 1;
    Ok(byte)
  }

  /// Consume the next two bytes and return them as a `u16`, interpreted as little-endian.
  fn parse_short(&mut self) -> Result<u16, Error> {
    let bytes = self.take_n_bytes(2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
  }

  /// Take the next `expected.len()` bytes, if they match `expected`.
  fn take_exact(&mut self, expected: &[u8]) -> Result<(), Error> {
    let start = self.cursor;
    let actual = self.take_n_bytes(expected.len())?;
    if let Some(i) = (0..expected.len()).find(|&i| actual[i] != expected[i]) {
      return Err(Error::ParseError(format!(
        "Expected byte 0x{:X} at position 0x{:X} but got 0x{:X}",
        expected[i],
        start + i,
        actual[i]
      )));
    }
    Ok(())
  }

  /// Take the next `n` bytes.
  fn take_n_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
    let data = self
      .data
      .get(self.cursor..self.cursor + n)
      .ok_or(Error::EofError(self.data.len().min(self.cursor + n)))?;
    self.cursor += n;
    Ok(data)
  }

  /// Parses a C-style NUL-terminated string, including the NUL byte. In
  /// this function, we return just the raw bytes as they appear in the
  /// file. Converting them to a string (using the ISO-8859-1 encoding)
  /// is done later.
  fn parse_nul_terminated_string(&mut self) -> Result<&'a [u8], Error> {
    let rest = &self.data[self.cursor.min(self.data.len())..];
    let len = rest
      .iter()
      .position(|&b| b == 0)
      .ok_or(Error::EofError(self.data.len()))?;
    self.take_n_bytes(len + 1)
  }
}

/// Returned when parsing a .puz file succeeded, but one or more of the checksums
/// in the file didn't match the expected value. May indicate a corrupted .puz file,
/// or a bug in this crate.
#[derive(Eq, PartialEq)]
pub struct ChecksumMismatch {
  checksum: Checksum,
  expected: u16,
  actual: u16,
}

impl Debug for ChecksumMismatch {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "Mismatch on checksum {}: Expected {:#x} but got {:#x}",
      self.checksum, self.expected, self.actual
    )
  }
}

impl Display for ChecksumMismatch {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

#[derive(Debug, Eq, PartialEq)]
enum Checksum {
  Cib,
  Overall,
  Masked(usize),
}

impl Display for Checksum {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}
