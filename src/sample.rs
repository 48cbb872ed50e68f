use crate::{SAMPLE_SEED, SAMPLE_TARGET};

/// Training sample: concatenated string bytes plus delimiting offsets.
/// 训练样本：拼接的字符串字节与分隔偏移。
pub(crate) struct Sample {
  buf: Vec<u8>,
  offsets: Vec<usize>,
}

impl Sample {
  /// Total sampled bytes.
  #[inline]
  pub fn total(&self) -> usize {
    self.buf.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
    self.offsets.windows(2).map(|w| &self.buf[w[0]..w[1]])
  }
}

/// Pick strings until the sample exceeds 16KB. Small corpora are taken in
/// order; larger ones are shuffled first with a fixed seed so training is
/// reproducible. Strings shorter than 2 bytes carry no pair statistics and
/// are skipped.
/// 选取字符串直到样本超过 16KB。小语料按顺序选取，大语料先用固定种子洗牌，
/// 保证训练可复现。短于 2 字节的字符串不含字节对统计信息，直接跳过。
pub(crate) fn make_sample<T: AsRef<[u8]>>(li: &[T], zero_terminated: bool) -> Sample {
  let mut idx: Vec<usize> = (0..li.len()).filter(|&i| li[i].as_ref().len() >= 2).collect();
  let total: usize = idx.iter().map(|&i| li[i].as_ref().len()).sum();
  if total > SAMPLE_TARGET {
    fastrand::Rng::with_seed(SAMPLE_SEED).shuffle(&mut idx);
  }

  let mut buf = Vec::with_capacity(total.min(SAMPLE_TARGET + 512));
  let mut offsets = vec![0];
  for &i in &idx {
    buf.extend_from_slice(li[i].as_ref());
    if zero_terminated {
      // copy-on-ingest terminator; the caller's buffer is never touched
      // 写入样本副本的终止符，不会修改调用方缓冲区
      buf.push(0);
    }
    offsets.push(buf.len());
    if buf.len() > SAMPLE_TARGET {
      break;
    }
  }
  Sample { buf, offsets }
}
