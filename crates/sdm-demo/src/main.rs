//! Sparse distributed memory demonstration.
//!
//! This binary walks through:
//! - plotting random data and the ring pattern
//! - a single write followed by exact and noisy reads
//! - learning from several noisy rings
//! - a probe-noise sweep with bit-level confusion counts
//! - a capacity sweep over SHA-256 seeded patterns

mod config;
mod plot;
mod report;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sdm_core::{noisy_copy, ring, BitVector, SparseDistributedMemory, RING_BITS, RING_COLUMNS};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::DemoConfig;
use crate::plot::render_grid;
use crate::report::{CapacityPoint, RecallReport, SweepReport};

/// Random patterns stored next to the ring during the noise sweep.
const SWEEP_DISTRACTORS: usize = 10;
/// Probes per noise level.
const SWEEP_TRIALS: usize = 10;
/// Highest probe noise in the sweep.
const SWEEP_MAX_NOISE: f64 = 0.5;
/// Probe noise used by the capacity sweep.
const CAPACITY_PROBE_NOISE: f64 = 0.1;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sdm_demo=info,sdm_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DemoConfig::from_env().context("failed to load demo configuration")?;
    info!(?config, "Starting sparse distributed memory demo");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut report = SweepReport {
        locations: config.locations,
        dimension: RING_BITS,
        ..SweepReport::default()
    };

    show_patterns(&mut rng);
    enter_and_lookup(&config, &mut rng)?;
    learn_and_test(&config, &mut rng)?;

    if config.sweep_steps > 0 {
        report.noise = noise_sweep(&config, &mut rng)?;
    }
    if config.capacity_patterns > 0 {
        report.capacity = capacity_sweep(&config, &mut rng)?;
    }

    if !report.noise.is_empty() || !report.capacity.is_empty() {
        section("Part 6: Sweeps");
        print!("{}", report.render());
        if config.report_json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to encode report")?
            );
        }
    }

    info!("Demo finished");
    Ok(())
}

fn section(title: &str) {
    println!("\n{title} {}", "-".repeat(72usize.saturating_sub(title.len())));
}

fn plot(label: &str, v: &BitVector) {
    println!("\n{label}:");
    print!("{}", render_grid(v, RING_COLUMNS));
}

/// A memory over the ring's dimension, seeded from the demo RNG.
fn fresh_memory(config: &DemoConfig, rng: &mut StdRng) -> SparseDistributedMemory {
    SparseDistributedMemory::seeded(config.locations, RING_BITS, rng.gen())
}

fn show_patterns(rng: &mut StdRng) {
    section("Part 1: Plotting randomized data");
    plot("Random", &BitVector::random(RING_BITS, rng));

    section("Part 2: Generating a ring");
    plot("Ring", &ring());
}

fn enter_and_lookup(config: &DemoConfig, rng: &mut StdRng) -> Result<()> {
    section("Part 3: Testing enter and lookup");
    let key = ring();
    plot("Key", &key);

    let mut sdm = fresh_memory(config, rng);
    let activated = sdm.enter(&key)?;
    let retrieved = sdm.lookup(&key)?;
    plot("Retrieved", &retrieved);
    info!(
        activated,
        error = retrieved.distance(&key),
        "Single write recalled"
    );

    section(&format!(
        "Part 4: Recover pattern after {:.0}% noise added",
        config.probe_noise * 100.0
    ));
    let probe = noisy_copy(&key, config.probe_noise, rng)?;
    plot("Key", &probe);
    let retrieved = sdm.lookup(&probe)?;
    plot("Retrieved", &retrieved);
    info!(
        probe_error = probe.distance(&key),
        recall_error = retrieved.distance(&key),
        "Noisy probe recalled"
    );
    Ok(())
}

fn learn_and_test(config: &DemoConfig, rng: &mut StdRng) -> Result<()> {
    section(&format!(
        "Part 5: Learn with {} noisy examples",
        config.learn_iterations
    ));
    let mut sdm = fresh_memory(config, rng);
    sdm.learn_ring(config.learn_iterations, config.learn_noise)?;

    let probe = noisy_copy(&ring(), config.learn_noise, rng)?;
    plot("Test with the following probe", &probe);
    let result = sdm.test(&probe)?;
    plot("Result", &result);
    info!(
        probe_error = probe.distance(&ring()),
        recall_error = result.distance(&ring()),
        "Learned ring tested"
    );
    Ok(())
}

/// Evenly spaced noise levels from 0 to `SWEEP_MAX_NOISE`.
fn noise_levels(steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..steps)
            .map(|i| SWEEP_MAX_NOISE * i as f64 / (steps - 1) as f64)
            .collect(),
    }
}

fn noise_sweep(config: &DemoConfig, rng: &mut StdRng) -> Result<Vec<RecallReport>> {
    let key = ring();
    let mut sdm = fresh_memory(config, rng);
    sdm.enter(&key)?;
    for i in 0..SWEEP_DISTRACTORS {
        sdm.enter(&BitVector::from_seed(&format!("distractor-{i}"), RING_BITS))?;
    }

    let mut reports = Vec::new();
    for q in noise_levels(config.sweep_steps) {
        let mut r = RecallReport::new(q);
        for _ in 0..SWEEP_TRIALS {
            let probe = noisy_copy(&key, q, rng)?;
            let recalled = sdm.lookup(&probe)?;
            r.record(&key, &probe, &recalled);
        }
        info!(
            noise = q,
            mean_recall_distance = r.mean_recall_distance(),
            "Noise level measured"
        );
        reports.push(r);
    }
    Ok(reports)
}

fn capacity_sweep(config: &DemoConfig, rng: &mut StdRng) -> Result<Vec<CapacityPoint>> {
    let patterns: Vec<BitVector> = (0..config.capacity_patterns)
        .map(|i| BitVector::from_seed(&format!("pattern-{i}"), RING_BITS))
        .collect();

    let mut points = Vec::new();
    for k in 1..=patterns.len() {
        let mut sdm = fresh_memory(config, rng);
        for p in &patterns[..k] {
            sdm.enter(p)?;
        }

        let mut total = 0;
        let mut exact = 0;
        for p in &patterns[..k] {
            let probe = noisy_copy(p, CAPACITY_PROBE_NOISE, rng)?;
            let d = sdm.lookup(&probe)?.distance(p);
            total += d;
            if d == 0 {
                exact += 1;
            }
        }

        let point = CapacityPoint {
            patterns: k,
            mean_recall_distance: total as f64 / k as f64,
            exact_recalls: exact,
        };
        info!(patterns = k, mean_recall_distance = point.mean_recall_distance, "Capacity measured");
        points.push(point);
    }
    Ok(points)
}
