//! Print a top-down map of the biome field
//!
//! Each character is one sample; biomes are labelled `a` through `m`.

use reef_growth::*;

const WIDTH: usize = 72;
const HEIGHT: usize = 32;
const STEP: f32 = 4.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let field = BiomeField::new(1337).with_scale(60.0)?;
    let mut counts = [0usize; BiomeId::COUNT as usize];

    println!("Biome map (seed 1337, scale {})", field.scale);
    for row in 0..HEIGHT {
        let line: String = (0..WIDTH)
            .map(|col| {
                let position = Vec3::new(col as f32 * STEP, 0.0, row as f32 * STEP * 2.0);
                let biome = field.sample(position);
                counts[biome.index() as usize] += 1;
                (b'a' + biome.index()) as char
            })
            .collect();
        println!("{}", line);
    }

    println!("\nDistribution:");
    let total = (WIDTH * HEIGHT) as f32;
    for biome in BiomeId::all() {
        let count = counts[biome.index() as usize];
        if count > 0 {
            let [r, g, b, _] = biome.vertex_color();
            println!(
                "  {} (hue {:.3}, rgb {:.2} {:.2} {:.2}): {:.1}%",
                (b'a' + biome.index()) as char,
                biome.hue(),
                r,
                g,
                b,
                count as f32 / total * 100.0
            );
        }
    }

    Ok(())
}
