//! Checksum logic. See
//! <https://gist.github.com/sliminality/dab21fa834eae0a70193c7cd69c356d5#checksums>

/// A running `.puz` checksum. Each byte rotates the sum right by one bit and then
/// adds the byte, wrapping on overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cksum(pub u16);

impl Cksum {
  #[must_use]
  pub fn region(self, bytes: &[u8]) -> Self {
    Self(
      bytes
        .iter()
        .fold(self.0, |sum, &byte| sum.rotate_right(1).wrapping_add(byte as u16)),
    )
  }

  /// For metadata (title, author, copyright, or notes), we do nothing if the string is
  /// empty, but if it's not empty we include the \0 byte in the calculation.
  #[must_use]
  pub fn metadata(self, s: &[u8]) -> Self {
    if s == b"\0" { self } else { self.region(s) }
  }

  /// For clues, we do not include the trailing \0 byte.
  #[must_use]
  pub fn clue(self, s: &[u8]) -> Self {
    self.region(s.strip_suffix(b"\0").unwrap_or(s))
  }

  pub fn low(self) -> u8 {
    (self.0 & 0xFF) as u8
  }

  pub fn high(self) -> u8 {
    (self.0 >> 8) as u8
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rotates_then_adds() {
    assert_eq!(Cksum(0).region(b"\x01").0, 1);
    // 1 rotates into the top bit, then 2 is added.
    assert_eq!(Cksum(0).region(b"\x01\x02").0, 0x8002);
    assert_eq!(Cksum(0xFFFF).region(b"\x02").0, 0x0001);
  }

  #[test]
  fn metadata_and_clues() {
    assert_eq!(Cksum(7).metadata(b"\0"), Cksum(7));
    assert_eq!(Cksum(0).metadata(b"A\0"), Cksum(0).region(b"A\0"));
    assert_eq!(Cksum(0).clue(b"A\0"), Cksum(0).region(b"A"));
    assert_eq!(Cksum(0x1234).low(), 0x34);
    assert_eq!(Cksum(0x1234).high(), 0x12);
  }
}
