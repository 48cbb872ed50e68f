use std::collections::{BinaryHeap, HashMap};

use crate::{
  CODE_BASE, CODE_MAX, MAX_SYMBOL_LEN,
  counter::Counters,
  encode::Encoder,
  sample::{Sample, make_sample},
  symbol::{GainSymbol, Symbol},
  table::SymbolTable,
  unaligned_load,
};

// table sizes tried per round; the last table is evaluated once more so a
// regressing final round is never adopted
// 每轮尝试的表大小；最后一张表会额外评估一次，避免采纳退化的末轮结果
const TARGETS: [u16; 5] = [8, 38, 68, 128, 255];
// candidates kept per symbol length while selecting
// 选择阶段每个符号长度保留的候选数
const PER_LEN_CAP: usize = 2048;

/// Training options.
#[derive(Default, Copy, Clone, Debug)]
pub struct TrainOpts {
  /// Treat 0x00 as a guaranteed terminator: an implicit zero byte is
  /// appended to every sampled string (the caller's data is not modified).
  /// 将 0x00 视为保证存在的终止符：每个采样字符串都会追加一个隐式零字节
  /// （不修改调用方数据）。
  pub zero_terminated: bool,
}

/// Train an encoder on a batch of strings.
/// 在一批字符串上训练编码器。
pub fn train<T: AsRef<[u8]>>(li: &[T]) -> Encoder {
  train_with(li, TrainOpts::default())
}

pub fn train_with<T: AsRef<[u8]>>(li: &[T], opts: TrainOpts) -> Encoder {
  let sample = make_sample(li, opts.zero_terminated);
  Encoder::new(build_table(&sample))
}

/// Five rounds of simulate-count-select, keeping the table that actually
/// compressed the sample best rather than the last one built.
/// 五轮“模拟-计数-选择”，保留实际压缩样本效果最好的表，而非最后一轮的表。
pub(crate) fn build_table(sample: &Sample) -> SymbolTable {
  let mut best = SymbolTable::new();
  if sample.is_empty() {
    return best;
  }
  // worst case: every byte escapes
  let mut best_size = 2 * sample.total();
  let pair_threshold = (sample.total() / (4 * 4096)) as u16;

  let mut st = SymbolTable::new();
  for target in TARGETS {
    let mut counters = Counters::new();
    let size = simulate(&st, sample, &mut counters);
    log::debug!(
      "fsst train round: target={target} symbols={} size={size} best={best_size}",
      st.symbol_count()
    );
    if size < best_size {
      best_size = size;
      best = st.clone();
    }
    let gains = build_candidates(&st, &counters, pair_threshold);
    st = select(gains, target);
  }

  let mut counters = Counters::new();
  let size = simulate(&st, sample, &mut counters);
  log::debug!(
    "fsst train final: symbols={} size={size} best={best_size}",
    st.symbol_count()
  );
  if size < best_size {
    best = st;
  }
  best
}

/// Greedy-encode the sample with the current table, filling code and
/// adjacent-pair counts. Returns the simulated compressed size: escapes
/// cost 2 bytes, real codes 1.
fn simulate(st: &SymbolTable, sample: &Sample, counters: &mut Counters) -> usize {
  let mut size = 0usize;
  for s in sample.iter() {
    let mut prev = u16::MAX;
    let mut curr = 0usize;
    while curr < s.len() {
      let remaining = s.len() - curr;
      let code = if remaining >= 8 {
        // SAFETY: at least 8 bytes remain at curr
        // 安全性：curr 处至少还有 8 字节
        let word = unsafe { unaligned_load(s.as_ptr().add(curr)) };
        st.find_longest(word)
      } else {
        st.find_longest_at_tail(Symbol::load(&s[curr..]).word, remaining)
      };
      counters.count1_inc(code);
      if prev != u16::MAX {
        counters.count2_inc(prev, code);
      }
      size += 1 + (code >= CODE_BASE) as usize;
      curr += st.length(code) as usize;
      prev = code;
    }
  }
  size
}

/// Candidate gains, deduplicated by symbol. Each observed code contributes
/// itself; each pair above the noise threshold contributes the
/// concatenation, capped at 8 bytes.
fn build_candidates(
  st: &SymbolTable,
  counters: &Counters,
  pair_threshold: u16,
) -> HashMap<Symbol, u32> {
  let codes = (0..st.symbol_count()).chain(CODE_BASE..CODE_MAX);
  let mut gains: HashMap<Symbol, u32> = HashMap::new();
  for c1 in codes.clone() {
    let cnt1 = counters.count1_get(c1);
    if cnt1 == 0 {
      continue;
    }
    let s1 = st.symbol(c1);
    let e = gains.entry(s1).or_default();
    *e = e.saturating_add(cnt1 as u32 * s1.len as u32);

    if s1.len as usize == MAX_SYMBOL_LEN {
      // concatenation cannot grow past 8 bytes
      continue;
    }
    for c2 in codes.clone() {
      let cnt2 = counters.count2_get(c1, c2);
      if cnt2 <= pair_threshold {
        continue;
      }
      let s = Symbol::concat(s1, st.symbol(c2));
      let e = gains.entry(s).or_default();
      *e = e.saturating_add(cnt2 as u32 * s.len as u32);
    }
  }
  gains
}

/// Keep the best `target` candidates by gain. Per-length heaps bound the
/// candidate set before the final selection heap.
fn select(gains: HashMap<Symbol, u32>, target: u16) -> SymbolTable {
  let mut per_len: [BinaryHeap<std::cmp::Reverse<GainSymbol>>; MAX_SYMBOL_LEN] =
    std::array::from_fn(|_| BinaryHeap::new());
  for (symbol, gain) in gains {
    let heap = &mut per_len[(symbol.len - 1) as usize];
    heap.push(std::cmp::Reverse(GainSymbol { symbol, gain }));
    if heap.len() > PER_LEN_CAP {
      heap.pop();
    }
  }

  let mut heap = BinaryHeap::with_capacity(per_len.iter().map(|h| h.len()).sum());
  for h in per_len {
    heap.extend(h.into_iter().map(|r| r.0));
  }

  let mut st = SymbolTable::new();
  while st.symbol_count() < target {
    let Some(c) = heap.pop() else { break };
    if !st.add(c.symbol) {
      break;
    }
  }
  st.build_index();
  st
}
