use fsst_codec::{Decoder, train};
use proptest::prelude::*;

proptest! {
  #![proptest_config(ProptestConfig::with_cases(24))]

  /// Any batch of byte strings roundtrips through its own trained table.
  /// 任意字节串批次都能通过其训练出的符号表往返还原。
  #[test]
  fn prop_roundtrip(
    strings in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..80), 0..24)
  ) {
    let enc = train(&strings);
    let dec = Decoder::from(&enc);
    for s in &strings {
      let mut comp = Vec::new();
      let n = enc.compress(s, &mut comp);
      prop_assert_eq!(n, comp.len());
      prop_assert!(comp.len() <= 2 * s.len() + 7);
      let mut out = Vec::new();
      dec.decompress(&comp, &mut out);
      prop_assert_eq!(&out, s);
    }
  }

  /// An imported decoder behaves exactly like the trained one.
  /// 导入的解码器与训练得到的解码器行为完全一致。
  #[test]
  fn prop_import_matches(
    strings in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..60), 1..16)
  ) {
    let enc = train(&strings);
    let imported = Decoder::import(&enc.export()).unwrap();
    let direct = Decoder::from(&enc);
    for s in &strings {
      let mut comp = Vec::new();
      enc.compress(s, &mut comp);
      let mut a = Vec::new();
      let mut b = Vec::new();
      direct.decompress(&comp, &mut a);
      imported.decompress(&comp, &mut b);
      prop_assert_eq!(&a, &b);
      prop_assert_eq!(&a, s);
    }
  }

  /// decompress_into with an exact buffer matches the Vec path.
  /// 精确大小缓冲区的 decompress_into 与 Vec 路径结果一致。
  #[test]
  fn prop_decompress_into(
    strings in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..60), 1..12)
  ) {
    let enc = train(&strings);
    let dec = Decoder::from(&enc);
    for s in &strings {
      let mut comp = Vec::new();
      enc.compress(s, &mut comp);
      let mut buf = vec![0u8; s.len()];
      prop_assert_eq!(dec.decompress_into(&comp, &mut buf).unwrap(), s.len());
      prop_assert_eq!(&buf, s);
    }
  }
}
