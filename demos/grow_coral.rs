//! Grow a coral and report what was generated
//!
//! Pass `--obj` to write the mesh as Wavefront OBJ on stdout instead.
//! Set `RUST_LOG=reef_growth=debug` to see build and weld logs.

use reef_growth::*;
use std::io::{self, BufWriter};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let export = std::env::args().any(|a| a == "--obj");

    let config = CoralConfigBuilder::new()
        .seed(2024)
        .iterations(5)?
        .branches(3)?
        .shape(PrimitiveShape::TaperedCube { taper: 0.7 })
        .build()?;

    let mut coral = Organism::coral(config);
    let mesh = coral.build()?.clone();

    if export {
        let mut out = BufWriter::new(io::stdout().lock());
        if let Err(err) = mesh.write_obj(&mut out) {
            tracing::error!("failed to write OBJ: {}", err);
        }
        return Ok(());
    }

    println!("=== Coral ===");
    println!("  Seed: {}", config.seed);
    println!("  Iterations: {}", config.iterations);
    println!("  Fan-out: {}", config.fan_out());
    println!("  Segments: {} (expected {})", coral.segments().len(), config.expected_segments());
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());

    let welded = remove_duplicates(
        &mesh,
        WeldOptions {
            smooth: true,
            debug: true,
        },
    )?;
    println!("  Welded vertices: {}", welded.vertex_count());

    // A second build continues the same random stream
    let variation = coral.build()?;
    println!("  Rebuilt with {} vertices", variation.vertex_count());

    Ok(())
}
