//! Write a synthetic long-format EPD survey (`Depth,Station,EPD`) to CSV.
//!
//! ```bash
//! cargo run --bin generate_sample -- sample_data.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Reading {
    #[serde(rename = "Depth")]
    depth: f64,
    #[serde(rename = "Station")]
    station: u32,
    #[serde(rename = "EPD")]
    epd: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Smooth EPD profile: decays from `surface` towards `base` with depth,
/// plus a bump where the station crosses a conductive layer.
fn epd_at(depth: f64, surface: f64, base: f64, layer: f64) -> f64 {
    let decay = (-depth / 120.0).exp();
    let bump = 0.15 * (-(depth - layer).powi(2) / (2.0 * 20.0_f64.powi(2))).exp();
    base + (surface - base) * decay + bump
}

fn main() -> Result<()> {
    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data.csv"));

    let mut rng = SimpleRng::new(42);
    let mut writer =
        csv::Writer::from_path(&out).with_context(|| format!("creating {}", out.display()))?;

    let mut n_rows = 0usize;
    for station in 1..=6u32 {
        let surface = 0.2 + rng.next_f64() * 0.6;
        let base = rng.next_f64() * 0.2;
        let layer = 60.0 + rng.next_f64() * 180.0;

        // Stations are surveyed to different depths, which leaves gaps in the pivot.
        let max_depth = 200.0 + f64::from(station % 3) * 50.0;
        let mut depth = 0.0;
        while depth <= max_depth {
            let epd = epd_at(depth, surface, base, layer) + rng.gauss(0.0, 0.01);
            writer
                .serialize(Reading {
                    depth,
                    station,
                    epd: (epd * 1000.0).round() / 1000.0,
                })
                .context("writing row")?;
            n_rows += 1;
            depth += 10.0;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {n_rows} readings to {}", out.display());
    Ok(())
}
