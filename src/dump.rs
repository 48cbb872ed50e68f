//! Serialized symbol table format, little-endian, stable across versions:
//!
//! ```text
//! offset 0..8    counts_by_length: u8 per symbol length 1..=8
//! offset 8       format version (1)
//! offset 9       endianness tag (0 = little-endian)
//! offset 10      escape-used flag (informational)
//! offset 11..16  reserved, zero
//! offset 16..    symbol bytes, grouped by length 8 down to 1, each symbol
//!                contributing exactly `length` bytes
//! ```
//!
//! ---
//!
//! 符号表序列化格式，小端序，跨版本稳定：前 8 字节为各长度的符号数量，随后
//! 是版本、字节序标记、转义标志与保留字节，符号字节按长度从 8 到 1 分组存放。

use crate::{
  MAX_SYMBOL_LEN, MAX_SYMBOLS,
  error::{Error, Result},
  symbol::Symbol,
  table::SymbolTable,
};

pub const HEADER_SIZE: usize = 16;

const VERSION: u8 = 1;
const LITTLE_ENDIAN: u8 = 0;

pub(crate) fn export(st: &SymbolTable) -> Vec<u8> {
  let mut counts = [0u8; MAX_SYMBOL_LEN];
  let mut body = 0usize;
  for s in st.symbols() {
    counts[(s.len - 1) as usize] += 1;
    body += s.len as usize;
  }

  let mut blob = Vec::with_capacity(HEADER_SIZE + body);
  blob.extend_from_slice(&counts);
  blob.push(VERSION);
  blob.push(LITTLE_ENDIAN);
  blob.push(st.escape_used() as u8);
  blob.extend_from_slice(&[0u8; 5]);
  for len in (1..=MAX_SYMBOL_LEN).rev() {
    for s in st.symbols() {
      if s.len as usize == len {
        blob.extend_from_slice(&s.word.to_le_bytes()[..len]);
      }
    }
  }
  blob
}

pub(crate) fn import(blob: &[u8]) -> Result<SymbolTable> {
  if blob.len() < HEADER_SIZE {
    return Err(Error::MalformedTable("truncated header"));
  }
  let counts = &blob[..MAX_SYMBOL_LEN];
  if blob[8] != VERSION {
    return Err(Error::MalformedTable("unsupported version"));
  }
  if blob[9] != LITTLE_ENDIAN {
    return Err(Error::MalformedTable("not little-endian"));
  }

  let n: usize = counts.iter().map(|&c| c as usize).sum();
  if n > MAX_SYMBOLS as usize {
    return Err(Error::MalformedTable("symbol count exceeds 255"));
  }
  let body: usize = counts
    .iter()
    .enumerate()
    .map(|(i, &c)| (i + 1) * c as usize)
    .sum();
  if blob.len() != HEADER_SIZE + body {
    return Err(Error::MalformedTable("length mismatch"));
  }

  let mut pos = HEADER_SIZE;
  let mut st = SymbolTable::new();
  for len in (1..=MAX_SYMBOL_LEN).rev() {
    for _ in 0..counts[len - 1] {
      // add cannot fail: n was checked against the symbol limit
      st.add(Symbol::load(&blob[pos..pos + len]));
      pos += len;
    }
  }
  st.build_index();
  Ok(st)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_export() {
    let blob = export(&SymbolTable::new());
    assert_eq!(blob.len(), HEADER_SIZE);
    assert_eq!(&blob[..8], &[0u8; 8]);
    assert_eq!(blob[8], VERSION);
    assert_eq!(blob[9], LITTLE_ENDIAN);
    assert_eq!(blob[10], 1); // everything escapes
    let st = import(&blob).unwrap();
    assert_eq!(st.symbol_count(), 0);
  }

  #[test]
  fn test_roundtrip_is_identity() {
    let st =
      SymbolTable::from_symbols([b"abcd" as &[u8], b"ab", b"xy\x00z", b"q", b"longest8"].map(Symbol::load))
        .unwrap();
    let blob = export(&st);
    let st2 = import(&blob).unwrap();
    assert_eq!(st.symbols(), st2.symbols());
    assert_eq!(export(&st2), blob);
  }

  #[test]
  fn test_malformed() {
    assert!(matches!(
      import(&[0u8; 4]),
      Err(Error::MalformedTable("truncated header"))
    ));

    let mut blob = export(&SymbolTable::new());
    blob[8] = 9;
    assert!(matches!(
      import(&blob),
      Err(Error::MalformedTable("unsupported version"))
    ));

    let mut blob = export(&SymbolTable::new());
    blob[0] = 3; // claims three 1-byte symbols but carries no bytes
    assert!(matches!(
      import(&blob),
      Err(Error::MalformedTable("length mismatch"))
    ));

    let mut blob = export(&SymbolTable::new());
    blob[0] = 255;
    blob[1] = 255;
    assert!(matches!(
      import(&blob),
      Err(Error::MalformedTable("symbol count exceeds 255"))
    ));
  }
}
