use std::fmt::Write as _;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use super::{Tool, Verbosity};
use crate::data::writer::{write_table, WriteOptions};
use crate::data::Table;
use crate::grid::dx::format_dx;
use crate::grid::DxGrid;

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// AR(1) noise `x[t] = phi x[t-1] + e[t]` around `mean`; the closer `phi`
/// is to 1 the longer the correlation time.
pub fn ar1_series(n: usize, mean: f64, phi: f64, sigma: f64, rng: &mut SimpleRng) -> Vec<f64> {
    let mut x = 0.0;
    (0..n)
        .map(|_| {
            x = phi * x + rng.gauss(0.0, sigma);
            mean + x
        })
        .collect()
}

/// Write demo inputs for every tool into a directory.
#[derive(Parser, Debug)]
#[command(name = "generate-sample", version)]
pub struct SampleArgs {
    /// Directory to write into (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = "sample_data")]
    pub outdir: PathBuf,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Length of the time series
    #[arg(short, long, default_value_t = 2000)]
    pub points: usize,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for SampleArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.outdir)
            .with_context(|| format!("creating {}", self.outdir.display()))?;
        let mut rng = SimpleRng::new(self.seed);
        let dir = self.outdir.as_path();

        let series = time_series(self.points, &mut rng)?;
        write_table(&dir.join("timeseries.dat"), &series, &WriteOptions::default())?;
        write_parquet(&dir.join("timeseries.parquet"), &series, &["time", "slow", "fast"])?;

        write_text(&dir.join("bars.dat"), &bar_records(&mut rng))?;
        write_text(&dir.join("scatter.dat"), &scatter_rows(&mut rng))?;
        for (name, center) in [("angles_a.dat", 60.0), ("angles_b.dat", 200.0)] {
            write_table(&dir.join(name), &angles(self.points, center, &mut rng)?, &WriteOptions::default())?;
        }
        write_text(&dir.join("potential.dx"), &format_dx(&potential_grid(&mut rng)?))?;

        println!("Wrote sample inputs to {}", dir.display());
        Ok(())
    }
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Time in ns plus a slowly and a quickly decorrelating observable.
fn time_series(n: usize, rng: &mut SimpleRng) -> anyhow::Result<Table> {
    let time = (0..n).map(|i| 0.02 * i as f64).collect();
    let slow = ar1_series(n, 5.0, 0.98, 0.1, rng);
    let fast = ar1_series(n, -2.0, 0.2, 0.3, rng);
    Ok(Table::from_columns(vec![time, slow, fast])?)
}

/// Two runs of three adjacent bars with labels and errors.
fn bar_records(rng: &mut SimpleRng) -> String {
    let mut out = String::new();
    for (x, label) in [(1, "wt"), (2, "A12G"), (3, "K45E"), (5, "wt"), (6, "A12G"), (7, "K45E")] {
        let y = 2.0 + rng.gauss(0.0, 1.0);
        let err = 0.1 + 0.3 * rng.next_f64();
        let _ = writeln!(out, "{x};{y:.3};{label};{err:.3}");
    }
    out
}

/// Heading plus `label x _ v1 e1 v2 e2` rows.
fn scatter_rows(rng: &mut SimpleRng) -> String {
    let mut out = String::from("name x id calc err_calc expt err_expt\n");
    for i in 0..8 {
        let x = 1.0 + 0.5 * i as f64;
        let calc = x + rng.gauss(0.0, 0.6);
        let expt = x + rng.gauss(0.0, 0.3);
        let _ = writeln!(
            out,
            "mol{i} {x:.2} {i} {calc:.3} {:.3} {expt:.3} {:.3}",
            0.1 + 0.2 * rng.next_f64(),
            0.05 + 0.1 * rng.next_f64()
        );
    }
    out
}

/// Time/angle table with angles in degrees scattered around `center`.
fn angles(n: usize, center: f64, rng: &mut SimpleRng) -> anyhow::Result<Table> {
    let time = (0..n).map(|i| 0.02 * i as f64).collect();
    let deg = (0..n).map(|_| rng.gauss(center, 25.0).rem_euclid(360.0)).collect();
    Ok(Table::from_columns(vec![time, deg])?)
}

/// Noisy Gaussian well on a 24^3 grid, in kT/e.
fn potential_grid(rng: &mut SimpleRng) -> anyhow::Result<DxGrid> {
    let n = 24;
    let mid = (n as f64 - 1.0) / 2.0;
    let mut values = Vec::with_capacity(n * n * n);
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let r2 = [i, j, k].iter().map(|&c| (c as f64 - mid).powi(2)).sum::<f64>();
                values.push(-3.0 * (-r2 / 40.0).exp() + rng.gauss(0.0, 0.02));
            }
        }
    }
    Ok(DxGrid::new([n; 3], [-12.0; 3], [1.0; 3], values)?)
}

/// Numeric table as flat Float64 parquet columns.
fn write_parquet(path: &Path, table: &Table, names: &[&str]) -> anyhow::Result<()> {
    let schema = Arc::new(Schema::new(
        names
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|c| Arc::new(Float64Array::from(c.clone())) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    log::info!("Wrote {} rows to {}", table.n_rows(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{load_table, LoadOptions};
    use crate::transform::{DecorrelationEstimator, StatisticalInefficiency};

    #[test]
    fn rng_is_deterministic() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        let xs: Vec<f64> = (0..5).map(|_| a.next_f64()).collect();
        let ys: Vec<f64> = (0..5).map(|_| b.next_f64()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn slow_series_is_more_correlated() {
        let mut rng = SimpleRng::new(1);
        let slow = ar1_series(4000, 0.0, 0.95, 1.0, &mut rng);
        let fast = ar1_series(4000, 0.0, 0.0, 1.0, &mut rng);
        let est = StatisticalInefficiency::default();
        let g_slow = est.statistical_inefficiency(&slow).unwrap();
        let g_fast = est.statistical_inefficiency(&fast).unwrap();
        assert!(g_slow > 5.0 * g_fast, "{g_slow} vs {g_fast}");
    }

    #[test]
    fn parquet_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.parquet");
        let mut rng = SimpleRng::new(3);
        let table = time_series(50, &mut rng).unwrap();
        write_parquet(&path, &table, &["time", "slow", "fast"]).unwrap();
        let back = load_table(&path, &LoadOptions::default()).unwrap();
        assert_eq!(back, table);
    }
}
