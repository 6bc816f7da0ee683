//! End-to-end checks of the camera, geometry, materials and integrator working together.

use std::sync::Arc;

use lumen_renderer::{
    cuboid, gen_range_f64, ray_color, render_parallel, write_ppm, Background, Bvh, Camera,
    CheckerTexture, Color, Dielectric, Hittable, Interval, Lambertian, Material, Metal, Planar,
    Ray, RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn forward() -> Interval {
    Interval::new(0.001, f64::INFINITY)
}

#[test]
fn test_center_pixel_hits_sphere() {
    let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Lambertian::new(Color::splat(0.5))),
    ));
    let world = Bvh::new(vec![sphere]);

    let mut camera = Camera::new()
        .with_aspect_ratio(2, 1.0)
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(90.0, 0.0, 1.0);
    camera.initialize();

    let ray = camera.pixel_ray(1.0, 1.0, 0.0);
    let mut rng = StdRng::seed_from_u64(0);
    let rec = world.hit(&ray, forward(), &mut rng).unwrap();

    assert!((rec.t - 0.5).abs() < 1e-9);
    assert!(rec.front_face);
    assert!((rec.normal - Vec3::Z).length() < 1e-9);
}

#[test]
fn test_shared_cuboid_edge_hit_exactly_once() {
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
    let cube = cuboid(Vec3::ZERO, Vec3::ONE, material);
    let faces = cube.objects();

    // Aim at the edge shared by the front (z = 1) and right (x = 1) faces
    let ray = Ray::new(Vec3::new(2.0, 0.5, 2.0), Vec3::new(-1.0, 0.0, -1.0), 0.0);
    let mut rng = StdRng::seed_from_u64(0);

    let front = faces[0].hit(&ray, forward(), &mut rng);
    let right = faces[1].hit(&ray, forward(), &mut rng);
    assert!(front.is_some() != right.is_some());

    // The cuboid as a whole still reports the edge
    let rec = cube.hit(&ray, forward(), &mut rng).unwrap();
    assert!((rec.t - 1.0).abs() < 1e-12);
}

#[test]
fn test_cuboid_edges_watertight_for_arbitrary_boxes() {
    let mut rng = StdRng::seed_from_u64(2024);
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));

    for _ in 0..500 {
        let a = Vec3::new(
            gen_range_f64(&mut rng, -3.0, 3.0),
            gen_range_f64(&mut rng, -3.0, 3.0),
            gen_range_f64(&mut rng, -3.0, 3.0),
        );
        let size = Vec3::new(
            gen_range_f64(&mut rng, 0.1, 3.0),
            gen_range_f64(&mut rng, 0.1, 3.0),
            gen_range_f64(&mut rng, 0.1, 3.0),
        );
        let b = a + size;
        let cube = cuboid(a, b, material.clone());
        let center = (a + b) * 0.5;

        // Aim along the outward bisector at the midpoint of all twelve edges
        for axis in 0..3 {
            let (i, j) = ((axis + 1) % 3, (axis + 2) % 3);
            for (si, sj) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
                let mut midpoint = center;
                midpoint[i] = if si > 0.0 { b[i] } else { a[i] };
                midpoint[j] = if sj > 0.0 { b[j] } else { a[j] };

                let mut outward = Vec3::ZERO;
                outward[i] = si;
                outward[j] = sj;
                let outward = outward.normalize();

                let ray = Ray::new(midpoint + 2.0 * outward, -outward, 0.0);
                let hits = cube
                    .objects()
                    .iter()
                    .filter(|face| {
                        face.hit(&ray, forward(), &mut rng)
                            .is_some_and(|rec| (rec.t - 2.0).abs() < 1e-6)
                    })
                    .count();
                assert_eq!(hits, 1, "edge at {:?} hit by {} faces", midpoint, hits);
            }
        }
    }
}

#[test]
fn test_material_energy_bounds() {
    let mut rng = StdRng::seed_from_u64(77);
    let checker: Arc<CheckerTexture> = Arc::new(CheckerTexture::from_colors(
        0.5,
        Color::new(0.9, 0.2, 1.0),
        Color::new(0.1, 1.0, 0.3),
    ));
    let diffuse: Arc<dyn Material> = Arc::new(Lambertian::from_texture(checker));
    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(1.0, 0.8, 0.6), 0.3));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let materials = [(diffuse, false), (metal, false), (glass, true)];

    for (material, lossless) in materials {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, material);
        for _ in 0..500 {
            let target = Vec3::new(
                gen_range_f64(&mut rng, -0.6, 0.6),
                gen_range_f64(&mut rng, -0.6, 0.6),
                0.0,
            );
            let origin = Vec3::new(0.0, 0.0, 5.0);
            let ray = Ray::new(origin, target - origin, 0.0);
            let rec = sphere.hit(&ray, forward(), &mut rng).unwrap();

            if let Some(result) = rec.material.scatter(&ray, &rec, &mut rng) {
                let a = result.attenuation;
                if lossless {
                    assert_eq!(a, Color::ONE);
                } else {
                    assert!(a.max_element() <= 1.0 && a.min_element() >= 0.0);
                }
            }
        }
    }
}

#[test]
fn test_zero_depth_is_black_for_any_scene() {
    let mut rng = StdRng::seed_from_u64(5);
    let light: Arc<dyn Hittable> = Arc::new(Planar::quad(
        Vec3::new(-1.0, -1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Arc::new(lumen_renderer::DiffuseLight::new(Color::splat(15.0))),
    ));
    let world = Bvh::new(vec![light]);

    for direction in [-Vec3::Z, Vec3::Z, Vec3::X] {
        let ray = Ray::new(Vec3::ZERO, direction, 0.0);
        let color = ray_color(&ray, &world, 0, &Background::SkyGradient, &mut rng);
        assert_eq!(color, Color::ZERO);
    }
}

#[test]
fn test_render_small_image_to_ppm() {
    let ground: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(0.0, -100.5, -1.0),
        100.0,
        Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
    ));
    let ball: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(0.0, 0.0, -1.2),
        0.5,
        Arc::new(Dielectric::new(1.5)),
    ));
    let world = Bvh::new(vec![ground, ball]);

    let mut camera = Camera::new().with_resolution(8, 6);
    camera.initialize();

    let config = RenderConfig::default()
        .with_quality(4, 8)
        .with_background(Background::SkyGradient)
        .with_bucket_size(3);
    let image = render_parallel(&camera, &world, &config);

    let mut out = Vec::new();
    write_ppm(&mut out, &image).unwrap();
    let text = String::from_utf8(out).unwrap();

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("8 6"));
    assert_eq!(lines.next(), Some("255"));
    assert_eq!(lines.count(), 48);
}
