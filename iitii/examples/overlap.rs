//! Minimal overlap-query walkthrough
//! 最小的重叠查询示例

fn main() {
  let mut b = iitii::Builder::new();
  b.add((12u32, 34u32));
  b.add((0, 23));
  b.add((34, 56));
  let db = b.build(10);

  let mut out = Vec::new();
  let visited = db.overlap_into(22, 25, &mut out);
  println!("[22, 25) overlaps {out:?}, visited {visited} ranks");

  let visited = db.overlap_into(34, 35, &mut out);
  println!("[34, 35) overlaps {out:?}, visited {visited} ranks");

  println!(
    "queries {}, avg climb {:.2}",
    db.queries(),
    db.avg_climb_cost()
  );
}
