#![cfg_attr(docsrs, feature(doc_cfg))]

//! FSST: Fast Static Symbol Table string compression.
//!
//! Replaces frequent byte sequences of 1-8 bytes with one-byte codes, so
//! every string stays individually decompressible. Train once on a batch of
//! strings, then encode/decode any number of strings with the frozen table.
//!
//! ---
//!
//! FSST：快速静态符号表字符串压缩。
//!
//! 将 1-8 字节的高频字节序列替换为单字节编码，每个字符串都可独立解压。
//! 在一批字符串上训练一次，之后用冻结的符号表编码/解码任意数量的字符串。

mod counter;
mod decode;
mod dump;
mod encode;
mod error;
mod sample;
mod symbol;
mod table;
mod train;

use std::ptr;

pub use decode::Decoder;
pub use dump::HEADER_SIZE;
pub use encode::Encoder;
pub use error::{Error, Result};
pub use symbol::Symbol;
pub use table::SymbolTable;
pub use train::{TrainOpts, train, train_with};

// when the code is ESC, the next byte should be interpreted as is
const ESC: u8 = 255;
// codes 256..512 are escape pseudo symbols, one per literal byte value
const CODE_BASE: u16 = 256;
// total code space during training: 255 real codes + escape marker + 256 pseudo codes
const CODE_MAX: u16 = 512;
// a symbol covers 1..=8 bytes so it fits one 64 bit word
const MAX_SYMBOL_LEN: usize = 8;
// code 255 is the escape marker, so a table holds at most 255 real symbols
const MAX_SYMBOLS: u16 = 255;
// symbol tables are trained on a sample of about 16KB (1<<14)
const SAMPLE_TARGET: usize = 1 << 14;
// fixed shuffle seed so training is reproducible across runs
const SAMPLE_SEED: u64 = 123;
// the decoder stores 8 bytes per code and advances by length, so decode
// buffers carry 7 bytes of slack past the true decoded length
const DECODE_SLACK: usize = 7;

/// Load 8 bytes as a little-endian packed word.
/// 按小端序加载 8 字节为一个字。
///
/// # Safety
/// `p` must point at 8 readable bytes.
#[inline]
pub(crate) unsafe fn unaligned_load(p: *const u8) -> u64 {
  u64::from_le(unsafe { ptr::read_unaligned(p as *const u64) })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_table() {
    let st = table::SymbolTable::new();
    assert_eq!(st.symbol_count(), 0);
    for b in 0..=255u8 {
      let code = st.find_longest_at_tail(b as u64, 1);
      assert_eq!(code, CODE_BASE + b as u16);
    }
  }

  #[test]
  fn test_unaligned_load() {
    let buf = [1u8, 2, 3, 4, 5, 6, 7, 8, 9];
    let w = unsafe { unaligned_load(buf.as_ptr()) };
    assert_eq!(w, 0x0807060504030201);
    let w = unsafe { unaligned_load(buf.as_ptr().add(1)) };
    assert_eq!(w, 0x0908070605040302);
  }
}
