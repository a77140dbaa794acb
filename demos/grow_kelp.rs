//! Grow kelp with both chaos falloffs and compare the stalks
//!
//! Pass `--obj` to write the default stalk as Wavefront OBJ on stdout.

use reef_growth::*;
use std::io::{self, BufWriter};

fn stalk_height(segments: &[Segment]) -> f32 {
    segments
        .iter()
        .filter(|s| s.role == SegmentRole::Stem)
        .map(|s| s.transform.transform_point(Vec3::Y).y)
        .fold(0.0, f32::max)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let export = std::env::args().any(|a| a == "--obj");

    for chaos in [ChaosFalloff::RemainingDepth, ChaosFalloff::GrowthProgress] {
        let config = KelpConfigBuilder::new()
            .seed(7)
            .iterations(8)?
            .leaf_count(4)?
            .chaos(chaos)
            .build()?;

        let mut kelp = Organism::kelp(config);
        let mesh = kelp.build()?;

        if export {
            let mut out = BufWriter::new(io::stdout().lock());
            if let Err(err) = mesh.write_obj(&mut out) {
                tracing::error!("failed to write OBJ: {}", err);
            }
            return Ok(());
        }

        println!("=== Kelp ({:?}) ===", chaos);
        println!("  Stems: {}", config.iterations);
        println!("  Leaves per stem: {}", config.leaf_count);
        println!("  Vertices: {}", mesh.vertex_count());
        println!("  Triangles: {}", mesh.triangle_count());
        println!("  Height: {:.2}", stalk_height(kelp.segments()));
        println!();
    }

    Ok(())
}
