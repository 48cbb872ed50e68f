use crate::{
  CODE_BASE, DECODE_SLACK, ESC,
  error::{Error, Result},
  symbol::Symbol,
  table::SymbolTable,
  unaligned_load,
};

/// Frozen encoder: an immutable symbol table plus the compress entry points.
/// Cheap to share across threads; compression never mutates it.
/// 冻结的编码器：不可变符号表加压缩入口。可跨线程共享，压缩过程不修改它。
pub struct Encoder {
  table: SymbolTable,
}

impl Encoder {
  pub(crate) fn new(table: SymbolTable) -> Self {
    Self { table }
  }

  #[inline]
  pub fn table(&self) -> &SymbolTable {
    &self.table
  }

  /// Serialize the symbol table to its stable binary form.
  /// 将符号表序列化为稳定的二进制格式。
  pub fn export(&self) -> Vec<u8> {
    crate::dump::export(&self.table)
  }

  /// Compress one string, appending to `out`. Returns bytes written, at
  /// most `2 * input.len()`.
  /// 压缩单个字符串并追加到 `out`，返回写入的字节数，至多 `2 * input.len()`。
  pub fn compress(&self, input: &[u8], out: &mut Vec<u8>) -> usize {
    if input.is_empty() {
      return 0;
    }
    let start = out.len();
    let bound = 2 * input.len();
    out.reserve(bound);
    // SAFETY: `bound` bytes were reserved past `start`, and compress_raw
    // writes at most `bound` bytes
    // 安全性：已在 `start` 之后预留 `bound` 字节，compress_raw 至多写入 `bound` 字节
    let written = unsafe { self.compress_raw(input, out.as_mut_ptr().add(start)) };
    debug_assert!(written <= bound);
    unsafe { out.set_len(start + written) };
    written
  }

  /// Compress a batch of strings delimited by `in_offsets` (`n + 1` entries,
  /// ascending) into a caller-owned buffer. The buffer must hold the worst
  /// case `2 * total + 7` bytes; otherwise nothing is written and
  /// [`Error::OutputTooSmall`] is returned. On success the returned offsets
  /// delimit the compressed strings in input order.
  ///
  /// 将以 `in_offsets` 分隔的一批字符串压缩进调用方缓冲区。缓冲区必须容纳
  /// 最坏情况的 `2 * total + 7` 字节，否则不写入任何字节并返回
  /// [`Error::OutputTooSmall`]。成功时返回的偏移按输入顺序分隔压缩结果。
  pub fn compress_batch(
    &self,
    in_buf: &[u8],
    in_offsets: &[usize],
    out_buf: &mut [u8],
  ) -> Result<Vec<usize>> {
    if in_offsets.len() < 2 {
      return Ok(Vec::new());
    }
    debug_assert!(in_offsets.windows(2).all(|w| w[0] <= w[1]));
    debug_assert!(in_offsets[in_offsets.len() - 1] <= in_buf.len());

    let total = in_offsets[in_offsets.len() - 1] - in_offsets[0];
    let need = 2 * total + DECODE_SLACK;
    if out_buf.len() < need {
      return Err(Error::OutputTooSmall {
        need,
        have: out_buf.len(),
      });
    }

    let mut out_offsets = Vec::with_capacity(in_offsets.len());
    out_offsets.push(0);
    let mut out_curr = 0usize;
    for w in in_offsets.windows(2) {
      let s = &in_buf[w[0]..w[1]];
      // SAFETY: the up-front `need` check leaves at least 2 * s.len() bytes
      // past out_curr for every string in the batch
      // 安全性：前置的 `need` 检查保证 out_curr 之后至少还有 2 * s.len() 字节
      out_curr += unsafe { self.compress_raw(s, out_buf.as_mut_ptr().add(out_curr)) };
      out_offsets.push(out_curr);
    }
    Ok(out_offsets)
  }

  /// Hot loop. While a full 8-byte load is possible the lookup needs no
  /// bounds handling and the escape literal is written speculatively: the
  /// byte at `out[o+1]` is either the literal of an escape or dead space
  /// the next code overwrites.
  ///
  /// # Safety
  /// `out` must have room for `2 * input.len()` bytes.
  unsafe fn compress_raw(&self, input: &[u8], out: *mut u8) -> usize {
    let st = &self.table;
    let in_ptr = input.as_ptr();
    let in_end = input.len();
    let mut in_curr = 0usize;
    let mut out_curr = 0usize;

    while in_curr + 8 <= in_end {
      // SAFETY: at least 8 input bytes remain
      let word = unsafe { unaligned_load(in_ptr.add(in_curr)) };
      let code = st.find_longest(word);
      // SAFETY: out_curr + 1 < 2 * in_end while input remains
      unsafe {
        *out.add(out_curr + 1) = word as u8;
        *out.add(out_curr) = if code < CODE_BASE { code as u8 } else { ESC };
      }
      out_curr += 1 + (code >= CODE_BASE) as usize;
      in_curr += st.length(code) as usize;
    }

    // tail: bounds-safe load, candidates longer than the remainder excluded
    // 尾部：边界安全加载，排除长于剩余字节数的候选符号
    while in_curr < in_end {
      let remaining = in_end - in_curr;
      let word = Symbol::load(&input[in_curr..]).word;
      let code = st.find_longest_at_tail(word, remaining);
      // SAFETY: as above, at most 2 bytes per remaining input byte
      unsafe {
        if code < CODE_BASE {
          *out.add(out_curr) = code as u8;
          out_curr += 1;
        } else {
          *out.add(out_curr) = ESC;
          *out.add(out_curr + 1) = word as u8;
          out_curr += 2;
        }
      }
      in_curr += st.length(code) as usize;
    }
    out_curr
  }
}
