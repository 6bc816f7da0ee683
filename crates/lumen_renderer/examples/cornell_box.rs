//! Render a Cornell box with a rotated block and a smoke-filled block.
//!
//! Usage: cargo run --release --example cornell_box [output.ppm] [samples]

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use lumen_renderer::{
    cuboid, render_parallel, write_ppm, Background, Camera, Color, ConstantMedium, DiffuseLight,
    Hittable, HittableList, Lambertian, Material, Planar, RenderConfig, Rotate, Translate, Vec3,
};

fn build_scene() -> HittableList {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let mut world = HittableList::new();

    let walls = [
        (
            Vec3::new(555.0, 0.0, 0.0),
            Vec3::new(0.0, 555.0, 0.0),
            Vec3::new(0.0, 0.0, 555.0),
            &green,
        ),
        (
            Vec3::ZERO,
            Vec3::new(0.0, 555.0, 0.0),
            Vec3::new(0.0, 0.0, 555.0),
            &red,
        ),
        (
            Vec3::new(343.0, 554.0, 332.0),
            Vec3::new(-130.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -105.0),
            &light,
        ),
        (
            Vec3::ZERO,
            Vec3::new(555.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 555.0),
            &white,
        ),
        (
            Vec3::splat(555.0),
            Vec3::new(-555.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -555.0),
            &white,
        ),
        (
            Vec3::new(0.0, 0.0, 555.0),
            Vec3::new(555.0, 0.0, 0.0),
            Vec3::new(0.0, 555.0, 0.0),
            &white,
        ),
    ];
    for (q, u, v, material) in walls {
        world.add(Arc::new(Planar::quad(q, u, v, material.clone())));
    }

    let tall: Arc<dyn Hittable> = Arc::new(cuboid(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall: Arc<dyn Hittable> = Arc::new(Rotate::y(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));
    world.add(tall);

    let short: Arc<dyn Hittable> = Arc::new(cuboid(Vec3::ZERO, Vec3::splat(165.0), white));
    let short: Arc<dyn Hittable> = Arc::new(Rotate::y(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));
    world.add(Arc::new(ConstantMedium::new(short, 0.01, Color::ONE)));

    world
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "cornell_box.ppm".to_string());
    let samples: u32 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("Invalid sample count: {}", s))?,
        None => 64,
    };

    let world = build_scene().into_bvh();

    let mut camera = Camera::new()
        .with_aspect_ratio(400, 1.0)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);
    camera.initialize();

    let config = RenderConfig::default()
        .with_quality(samples, 50)
        .with_background(Background::Solid(Color::ZERO));

    let start = Instant::now();
    let image = render_parallel(&camera, &world, &config);
    log::info!("Render finished in {:.2?}", start.elapsed());

    let file = File::create(&output).with_context(|| format!("Failed to create {}", output))?;
    write_ppm(&mut BufWriter::new(file), &image)
        .with_context(|| format!("Failed to write {}", output))?;
    log::info!("Wrote {}", output);

    Ok(())
}
