//! Light a row of floor points under a few occluders with both estimators.
//!
//! Usage: `compare_estimators [ENV_MAP] [BEAM_CONFIG_JSON]`
//!
//! Without an environment map a procedural sky is used. The product map of
//! the middle point is written to `product.png`.

use anyhow::{Context, Result};
use ibl_core::{Color, EnvironmentMap, ProductMap};
use ibl_math::Vec3;
use ibl_sampler::{
    sample_ibl_beam, sample_ibl_beam_batch, sample_ibl_naive_batch, BeamSamplerConfig,
    NaiveSamplerConfig, ShadingPoint,
};
use ibl_trace::{BvhNode, Hittable, Sphere, Triangle};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let env = match args.next() {
        Some(path) => EnvironmentMap::load(&path)
            .with_context(|| format!("loading environment map {path}"))?,
        None => procedural_sky(),
    };
    let beam_config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {path}"))?;
            BeamSamplerConfig::from_json_str(&json)?
        }
        None => BeamSamplerConfig::default(),
    };
    let naive_config = NaiveSamplerConfig::new(32, 32);
    log::info!(
        "Environment {}x{} from {}",
        env.width(),
        env.height(),
        env.path()
    );

    let scene = build_scene();
    let points: Vec<ShadingPoint> = (-6..=6)
        .map(|i| ShadingPoint::new(Vec3::new(i as f32 * 0.5, 0.0, 0.0), Vec3::Y))
        .collect();

    let start = Instant::now();
    let beam = sample_ibl_beam_batch(&scene, &env, &points, &beam_config)?;
    let beam_time = start.elapsed();

    let start = Instant::now();
    let naive = sample_ibl_naive_batch(&scene, &env, &points, &naive_config, 42)?;
    let naive_time = start.elapsed();

    println!("{:>8} {:>10} {:>10} {:>10}", "x", "beam", "naive", "diff");
    for ((point, b), n) in points.iter().zip(&beam).zip(&naive) {
        println!(
            "{:>8.2} {:>10.4} {:>10.4} {:>10.4}",
            point.position.x,
            luminance(*b),
            luminance(*n),
            luminance(*b - *n)
        );
    }
    println!(
        "beam: {beam_time:.2?}, naive ({} rays/point): {naive_time:.2?}",
        naive_config.sample_count()
    );

    let middle = points[points.len() / 2];
    let mut product = ProductMap::for_environment(&env);
    sample_ibl_beam(&scene, &env, &mut product, middle.position, middle.normal, &beam_config)?;
    product.save_debug_image("product.png")?;
    println!("Saved product map of x = {} to product.png", middle.position.x);

    Ok(())
}

fn build_scene() -> BvhNode {
    let mut objects: Vec<Box<dyn Hittable>> = vec![
        Box::new(Sphere::new(Vec3::new(0.0, 1.5, 0.0), 0.75)),
        Box::new(Sphere::new(Vec3::new(-2.0, 0.5, 1.0), 0.5)),
    ];

    // Awning over the positive side
    for tri in Triangle::quad(
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0),
    ) {
        objects.push(Box::new(tri));
    }

    BvhNode::new(objects)
}

/// Blue sky over a warm ground.
fn procedural_sky() -> EnvironmentMap {
    EnvironmentMap::from_fn(256, 128, |theta, phi| {
        let up = theta.cos();
        if up > 0.0 {
            let sun = (phi.cos() * theta.sin()).max(0.0).powi(32) * 20.0;
            Color::new(0.4, 0.6, 1.0) * (0.5 + up) + Color::splat(sun)
        } else {
            Color::new(0.3, 0.25, 0.2)
        }
    })
}

fn luminance(c: Color) -> f32 {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}
