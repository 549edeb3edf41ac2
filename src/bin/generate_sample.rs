use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Write a synthetic monthly precipitation table (year + 12 months per row)")]
struct Args {
    /// Number of years (rows) to generate
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// First year label
    #[arg(long, default_value_t = 1991)]
    start: i32,

    /// Output CSV path
    #[arg(long, default_value = "sample_precipitation.csv")]
    out: PathBuf,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Monthly rainfall in mm: annual cycle peaking in January, a weaker
/// semi-annual term and a slow multi-year drift, plus noise.
fn monthly_precipitation(year_idx: u32, month: u32, rng: &mut SimpleRng) -> f64 {
    let t = (year_idx * 12 + month) as f64;
    let annual = 90.0 * (2.0 * PI * t / 12.0).cos();
    let semi_annual = 25.0 * (2.0 * PI * t / 6.0 + 0.8).cos();
    let drift = 15.0 * (2.0 * PI * t / 96.0).sin();
    let value = 120.0 + annual + semi_annual + drift + rng.gauss(0.0, 18.0);
    (value.max(0.0) * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    for year_idx in 0..args.years {
        let mut record = vec![(args.start + year_idx as i32).to_string()];
        record.extend((0..12).map(|m| monthly_precipitation(year_idx, m, &mut rng).to_string()));
        writer.write_record(&record).context("writing row")?;
    }
    writer.flush().context("flushing output")?;

    println!(
        "Wrote {} years ({} monthly values) to {}",
        args.years,
        args.years * 12,
        args.out.display()
    );
    Ok(())
}
