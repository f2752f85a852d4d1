use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trendsieve::prelude::*;

// Small deterministic LCG so runs are reproducible without an RNG crate.
struct Lcg(u64);

impl Lcg {
  fn next_f64(&mut self) -> f64 {
    self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (self.0 >> 11) as f64 / (1u64 << 53) as f64
  }
}

fn synthetic_series(seed: u64, len: usize) -> Vec<DailyBar> {
  let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
  let mut rng = Lcg(seed);
  let mut close = 100.0;
  (0..len)
    .map(|t| {
      close *= 1.0 + (rng.next_f64() - 0.49) * 0.03;
      let spread = close * 0.01 * rng.next_f64();
      DailyBar {
        date: start + Days::new(t as u64),
        open: close - spread * 0.5,
        high: close + spread,
        low: close - spread,
        close,
        volume: 5.0e5 + rng.next_f64() * 2.0e6,
      }
    })
    .collect()
}

fn bench_screens(c: &mut Criterion) {
  let series: Vec<Vec<DailyBar>> = (0..64).map(|s| synthetic_series(s + 1, 250)).collect();
  let symbols: Vec<String> = (0..64).map(|s| format!("{:04}.T", s + 1)).collect();
  let universe: Vec<(&str, &[DailyBar])> = symbols
    .iter()
    .zip(&series)
    .map(|(sym, bars)| (sym.as_str(), &bars[..]))
    .collect();

  let golden = GoldenCrossScreen::new(GoldenCrossConfig {
    search_period: 10,
    min_turnover: 1.0,
  });
  let cup = CupHandleScreen::default();

  c.bench_function("golden_cross_single_stock", |b| {
    b.iter(|| golden.evaluate(black_box("0001.T"), black_box(&series[0])))
  });

  c.bench_function("cup_handle_single_stock", |b| {
    b.iter(|| cup.evaluate(black_box("0001.T"), black_box(&series[0])))
  });

  c.bench_function("golden_cross_universe_sequential", |b| {
    b.iter(|| run_screen(&golden, black_box(universe.clone())))
  });

  c.bench_function("golden_cross_universe_parallel", |b| {
    b.iter(|| run_screen_parallel(&golden, black_box(universe.clone())))
  });

  c.bench_function("cup_handle_universe_parallel", |b| {
    b.iter(|| run_screen_parallel(&cup, black_box(universe.clone())))
  });
}

criterion_group!(benches, bench_screens);
criterion_main!(benches);
