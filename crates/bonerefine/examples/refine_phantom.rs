use bonerefine::{threshold_seed, Dims, IntensityVolume, RefineConfig, Refiner};
use std::error::Error;
use std::path::Path;

/// Build a synthetic bone cylinder whose cortex fades into soft tissue, seed
/// it by thresholding, and refine the seed.
///
/// Usage: `refine_phantom [config.json]`
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RefineConfig::from_json_file(Path::new(&path))?,
        None => RefineConfig::with_threshold(50),
    };

    let dims = Dims::new(96, 96, 24);
    let (cx, cy) = (48.0f64, 48.0f64);
    let intensity = IntensityVolume::from_fn(dims, |c| {
        let dx = c[0] as f64 - cx;
        let dy = c[1] as f64 - cy;
        let r = (dx * dx + dy * dy).sqrt();
        // Dense core, partial-volume ramp, soft tissue.
        let v = if r <= 20.0 {
            1200.0
        } else if r <= 26.0 {
            1200.0 - (r - 20.0) * 190.0
        } else {
            40.0
        };
        let ripple = ((c[0] * 31 + c[1] * 17 + c[2] * 7) % 23) as f64 - 11.0;
        (v + 4.0 * ripple) as i16
    })?;

    let seed = threshold_seed(&intensity, 70);
    println!("Seed: {} bone voxels in {}", seed.count_bone(), dims);

    let refiner = Refiner::with_config(config);
    let result = refiner.refine_with_progress(&intensity, seed, |s| {
        println!(
            "  pass {:>3}: boundary={:>6} reclassified={:>6} degenerate={:>4}",
            s.iteration, s.n_boundary, s.n_reclassified, s.n_degenerate
        );
    })?;

    println!(
        "{} after {} passes: {} bone voxels ({} reclassified)",
        if result.is_converged() {
            "Converged"
        } else {
            "Stopped at iteration cap"
        },
        result.n_passes(),
        result.label().count_bone(),
        result.total_reclassified()
    );
    Ok(())
}
