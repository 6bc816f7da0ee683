//! The BVH must agree with a brute-force scan over the same primitives.

use std::sync::Arc;

use lumen_renderer::{
    cuboid, gen_range_f64, Bvh, Color, Hittable, HittableList, Interval, Lambertian, Material,
    Planar, Ray, Rotate, Sphere, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_point(rng: &mut StdRng, extent: f64) -> Vec3 {
    Vec3::new(
        gen_range_f64(rng, -extent, extent),
        gen_range_f64(rng, -extent, extent),
        gen_range_f64(rng, -extent, extent),
    )
}

fn random_scene(rng: &mut StdRng, count: usize) -> Vec<Arc<dyn Hittable>> {
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::with_capacity(count);

    for i in 0..count {
        let center = random_point(rng, 20.0);
        let object: Arc<dyn Hittable> = match i % 7 {
            0 => Arc::new(Sphere::new(center, gen_range_f64(rng, 0.2, 2.0), material.clone())),
            1 => Arc::new(Sphere::moving(
                center,
                center + random_point(rng, 3.0),
                gen_range_f64(rng, 0.2, 2.0),
                material.clone(),
            )),
            2 => Arc::new(Planar::quad(
                center,
                random_point(rng, 2.0),
                random_point(rng, 2.0),
                material.clone(),
            )),
            3 => Arc::new(Planar::triangle(
                center,
                random_point(rng, 3.0),
                random_point(rng, 3.0),
                material.clone(),
            )),
            4 => Arc::new(Planar::disk(
                center,
                random_point(rng, 2.0),
                random_point(rng, 2.0),
                gen_range_f64(rng, 0.5, 2.0),
                material.clone(),
            )),
            5 => Arc::new(Planar::ring(
                center,
                random_point(rng, 2.0),
                random_point(rng, 2.0),
                gen_range_f64(rng, 1.0, 2.0),
                gen_range_f64(rng, 0.2, 0.8),
                material.clone(),
            )),
            _ => {
                let cube: Arc<dyn Hittable> =
                    Arc::new(cuboid(Vec3::ZERO, Vec3::splat(1.5), material.clone()));
                let degrees = gen_range_f64(rng, 0.0, 360.0);
                let rotated: Arc<dyn Hittable> = match (i / 7) % 3 {
                    0 => Arc::new(Rotate::x(cube, degrees)),
                    1 => Arc::new(Rotate::y(cube, degrees)),
                    _ => Arc::new(Rotate::z(cube, degrees)),
                };
                Arc::new(Translate::new(rotated, center))
            }
        };
        objects.push(object);
    }

    objects
}

#[test]
fn test_bvh_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(2024);
    let objects = random_scene(&mut rng, 120);

    let mut list = HittableList::new();
    for object in &objects {
        list.add(object.clone());
    }
    let bvh = Bvh::new(objects);

    let mut hits = 0;
    let mut misses = 0;

    for _ in 0..5000 {
        let origin = random_point(&mut rng, 30.0);
        let direction = random_point(&mut rng, 1.0);
        if direction.length_squared() < 1e-6 {
            continue;
        }
        let time = gen_range_f64(&mut rng, 0.0, 1.0);
        let ray = Ray::new(origin, direction, time);
        let ray_t = Interval::new(0.001, f64::INFINITY);

        let expected = list.hit(&ray, ray_t, &mut rng);
        let actual = bvh.hit(&ray, ray_t, &mut rng);

        match (expected, actual) {
            (None, None) => misses += 1,
            (Some(e), Some(a)) => {
                hits += 1;
                assert!((e.t - a.t).abs() < 1e-9, "t mismatch: {} vs {}", e.t, a.t);
                assert!((e.p - a.p).length() < 1e-6);
                assert!((e.normal - a.normal).length() < 1e-6);
                assert_eq!(e.front_face, a.front_face);
            }
            (e, a) => panic!(
                "BVH disagrees with brute force for {:?}: list {:?}, bvh {:?}",
                ray,
                e.map(|r| r.t),
                a.map(|r| r.t)
            ),
        }
    }

    // Both outcomes must be exercised
    assert!(hits > 100, "only {} hits", hits);
    assert!(misses > 100, "only {} misses", misses);
}

#[test]
fn test_bvh_bbox_encloses_every_primitive() {
    let mut rng = StdRng::seed_from_u64(7);
    let objects = random_scene(&mut rng, 64);
    let boxes: Vec<_> = objects.iter().map(|o| o.bounding_box()).collect();
    let bvh = Bvh::new(objects);
    let root = bvh.bounding_box();

    for bbox in boxes {
        for corner in bbox.corners() {
            assert!(root.contains_point(corner));
        }
    }
    assert_eq!(bvh.node_count(), 2 * 64 - 1);
}
