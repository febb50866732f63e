use aok::{OK, Void};
use iit::{Builder, Geom, Iit, NRANK};
use log::info;
use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

type Iv = (u32, u32);

fn build(items: &[Iv]) -> Iit<u32, Iv> {
  items.iter().copied().collect::<Builder<_, _>>().build()
}

/// Reference answer: the multiset of items with end > qbeg and beg < qend
/// 参考答案：满足 end > qbeg 且 beg < qend 的项多重集
fn brute(items: &[Iv], qbeg: u32, qend: u32) -> Vec<Iv> {
  let mut hits: Vec<Iv> = items
    .iter()
    .copied()
    .filter(|iv| iv.1 > qbeg && iv.0 < qend)
    .collect();
  hits.sort_unstable();
  hits
}

fn query(db: &Iit<u32, Iv>, qbeg: u32, qend: u32) -> Vec<Iv> {
  let mut hits = db.overlap(qbeg, qend);
  hits.sort_unstable();
  hits
}

fn random_items(rng: &mut StdRng, n: usize, span: u32, max_len: u32) -> Vec<Iv> {
  (0..n)
    .map(|_| {
      let beg = rng.random_range(0..span);
      (beg, beg + rng.random_range(0..=max_len))
    })
    .collect()
}

#[test]
fn test_small_queries() -> Void {
  let items = [(12, 34), (0, 23), (34, 56)];
  let db = build(&items);

  // (34,56) is excluded: beg = 34 >= qend = 25
  // (34,56) 被排除：beg = 34 >= qend = 25
  assert_eq!(query(&db, 22, 25), vec![(0, 23), (12, 34)]);

  // half-open: end = 34 does not reach into [34, 35)
  // 半开区间：end = 34 不进入 [34, 35)
  assert_eq!(query(&db, 34, 35), vec![(34, 56)]);

  // empty query window
  // 空查询窗口
  assert_eq!(query(&db, 0, 0), Vec::<Iv>::new());

  info!("small_queries passed");
  OK
}

#[test]
fn test_duplicates() -> Void {
  let items = [(0, 10), (0, 10), (0, 10)];
  let db = build(&items);

  assert_eq!(query(&db, 5, 6), vec![(0, 10); 3]);

  info!("duplicates passed");
  OK
}

#[test]
fn test_dense_unit_intervals() -> Void {
  let items: Vec<Iv> = (0..999).map(|i| (i, i + 1)).collect();
  let db = build(&items);

  assert_eq!(
    query(&db, 500, 503),
    vec![(500, 501), (501, 502), (502, 503)]
  );

  info!("dense_unit_intervals passed");
  OK
}

#[test]
fn test_empty_index() -> Void {
  let db = build(&[]);

  assert!(db.is_empty());
  assert_eq!(db.overlap(0, 100), Vec::<Iv>::new());

  let mut out = vec![(1, 2)];
  // zero ranks visited, stale buffer content cleared
  // 访问零个秩，缓冲区旧内容被清空
  assert_eq!(db.overlap_into(0, 100, &mut out), 0);
  assert!(out.is_empty());

  info!("empty_index passed");
  OK
}

#[test]
fn test_empty_interval_never_matches() -> Void {
  let db = build(&[(5, 5), (3, 8)]);

  assert_eq!(query(&db, 0, 100), vec![(3, 8)]);
  assert_eq!(query(&db, 5, 6), vec![(3, 8)]);

  info!("empty_interval_never_matches passed");
  OK
}

#[test]
fn test_reversed_query_is_empty() -> Void {
  let mut rng = StdRng::seed_from_u64(7);
  let items = random_items(&mut rng, 500, 10_000, 100);
  let db = build(&items);

  assert_eq!(query(&db, 600, 500), Vec::<Iv>::new());
  assert_eq!(query(&db, 42, 42), Vec::<Iv>::new());

  info!("reversed_query_is_empty passed");
  OK
}

#[test]
fn test_insertion_order_irrelevant() -> Void {
  let mut rng = StdRng::seed_from_u64(11);
  let mut items = random_items(&mut rng, 300, 5_000, 50);
  let sorted = build(&items);

  for _ in 0..5 {
    for i in (1..items.len()).rev() {
      items.swap(i, rng.random_range(0..=i));
    }
    let shuffled = build(&items);
    for _ in 0..50 {
      let qbeg = rng.random_range(0..5_000);
      let qend = qbeg + rng.random_range(0..100);
      assert_eq!(query(&sorted, qbeg, qend), query(&shuffled, qbeg, qend));
    }
  }

  info!("insertion_order_irrelevant passed");
  OK
}

#[test]
fn test_matches_brute_force() -> Void {
  let mut rng = StdRng::seed_from_u64(42);

  for &n in &[1usize, 2, 3, 4, 5, 7, 8, 15, 16, 100, 1000] {
    let items = random_items(&mut rng, n, 10_000, 100);
    let db = build(&items);

    for _ in 0..200 {
      let (qbeg, qend) = if rng.random_bool(0.5) {
        let &(b, e) = &items[rng.random_range(0..items.len())];
        (b, e)
      } else {
        let qbeg = rng.random_range(0..10_000);
        (qbeg, qbeg + 10)
      };
      assert_eq!(
        query(&db, qbeg, qend),
        brute(&items, qbeg, qend),
        "n={n}, q=[{qbeg},{qend})"
      );
    }
  }

  info!("matches_brute_force passed");
  OK
}

/// inside_max_end covers the end of every real descendant
/// inside_max_end 覆盖每个真实后代的 end
#[test]
fn test_inside_max_end_covers_subtrees() -> Void {
  let mut rng = StdRng::seed_from_u64(99);

  for &n in &[1usize, 2, 3, 6, 7, 8, 13, 64, 100, 777] {
    let items = random_items(&mut rng, n, 100_000, 1000);
    let db = build(&items);
    let geom = db.tree.geom;
    let nodes = &db.tree.nodes;

    for r in 0..n {
      let lo = geom.leftmost(r);
      let hi = geom.rightmost(r).min(n - 1);
      for d in lo..=hi {
        assert!(
          nodes[r].inside_max_end >= nodes[d].item.1,
          "n={n}, rank {r} misses descendant {d}"
        );
      }
    }
  }

  info!("inside_max_end_covers_subtrees passed");
  OK
}

#[test]
fn test_geometry() -> Void {
  for &n in &[1usize, 2, 3, 4, 5, 6, 7, 8, 9, 15, 16, 17, 100, 1023, 1024] {
    let geom = Geom::new(n);

    assert!(geom.full_size >= n);
    assert_eq!(geom.full_size, (1 << (geom.root_level + 1)) - 1);
    assert_eq!(geom.root, (1 << geom.root_level) - 1);
    assert_eq!(geom.parent(geom.root), NRANK);

    for r in 0..geom.full_size {
      // level is the count of trailing one-bits
      // 层级为尾部 1 比特数
      let mut chk = 0;
      let mut x = r;
      while x & 1 == 1 {
        chk += 1;
        x >>= 1;
      }
      assert_eq!(geom.level(r), chk);

      if geom.level(r) > 0 {
        assert_eq!(geom.parent(geom.left(r)), r);
        assert_eq!(geom.parent(geom.right(r)), r);
      } else {
        assert_eq!(geom.left(r), NRANK);
        assert_eq!(geom.right(r), NRANK);
        assert_eq!(r % 2, 0);
      }
    }
  }

  info!("geometry passed");
  OK
}

#[test]
fn test_range_items() -> Void {
  let mut b = Builder::new();
  b.add(0u64..23);
  b.add(12..34);
  b.add(34..56);
  let db = b.build();

  let mut hits: Vec<(u64, u64)> = db.overlap(22, 25).iter().map(|r| (r.start, r.end)).collect();
  hits.sort_unstable();
  assert_eq!(hits, vec![(0, 23), (12, 34)]);

  info!("range_items passed");
  OK
}

#[test]
fn test_float_positions() -> Void {
  let items: Vec<(f64, f64)> = vec![(0.5, 2.5), (1.25, 1.75), (2.5, 9.0)];
  let db: Iit<f64, (f64, f64)> = items.iter().copied().collect::<Builder<_, _>>().build();

  let mut hits = db.overlap(1.5, 2.5);
  hits.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
  assert_eq!(hits, vec![(0.5, 2.5), (1.25, 1.75)]);
  assert_eq!(db.overlap(2.5, 2.5), Vec::<(f64, f64)>::new());

  info!("float_positions passed");
  OK
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(128))]

  /// Every query returns exactly the brute-force multiset
  /// 每次查询恰好返回暴力求解的多重集
  #[test]
  fn prop_overlap_matches_brute_force(
    raw in prop::collection::vec((0u32..3000, 0u32..80), 0..250),
    queries in prop::collection::vec((0u32..3000, 0u32..120), 1..40),
  ) {
    let items: Vec<Iv> = raw.into_iter().map(|(beg, len)| (beg, beg + len)).collect();
    let db = build(&items);

    for (qbeg, len) in queries {
      let qend = qbeg + len;
      prop_assert_eq!(query(&db, qbeg, qend), brute(&items, qbeg, qend));
    }
  }
}
