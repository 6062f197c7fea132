//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tabkit::{Column, RowBatch, Scalar};

/// Small deterministic generator so property checks are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Value in [-1, 1] on a 0.05 grid, so ties are common.
    pub fn correlation(&mut self) -> f64 {
        (self.next_u64() % 41) as f64 * 0.05 - 1.0
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// `Year` / `Correlation` table with `rows` pseudo-random correlations.
pub fn correlation_batch(seed: u64, rows: usize) -> RowBatch {
    let mut rng = Lcg::new(seed);
    let years: Vec<Scalar> = (0..rows).map(|i| Scalar::I64(1970 + i as i64)).collect();
    let corr: Vec<Scalar> = (0..rows).map(|_| Scalar::F64(rng.correlation())).collect();
    RowBatch::new(vec![
        Column::new("Year", years),
        Column::new("Correlation", corr),
    ])
    .expect("fixture batch")
}

/// Location column mixing state rows and county rows.
pub fn location_batch(seed: u64, rows: usize) -> RowBatch {
    let states = ["Texas", "Oregon", "Ohio", "Maine"];
    let mut rng = Lcg::new(seed);
    let locations: Vec<Scalar> = (0..rows)
        .map(|i| {
            if rng.below(3) == 0 {
                Scalar::from(states[rng.below(states.len() as u64) as usize])
            } else {
                Scalar::Str(format!("County{} County, XX", i))
            }
        })
        .collect();
    let ids: Vec<Scalar> = (0..rows).map(|i| Scalar::I64(i as i64)).collect();
    RowBatch::new(vec![
        Column::new("county_or_state_name", locations),
        Column::new("row_id", ids),
    ])
    .expect("fixture batch")
}

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Fresh scratch directory under the system temp dir.
pub fn create_temp_dir() -> PathBuf {
    let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("tabkit-test-{}-{}", std::process::id(), n));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}
