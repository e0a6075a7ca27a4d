use lightpath::{geometry::normalize_angle, *};

use core::{f64::consts::PI, iter};
pub use rand;

/// Half the side of the square random objects are generated in, by default.
pub const DEFAULT_EXTENT: Float = 7.0;

pub trait Random: Sized {
    /// Generate a random object whose coordinates lie in `[-extent, extent]`,
    /// using the provided `rng`
    ///
    /// This method must not fail. If creating an object is faillible, keep trying until success
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), extent: Float) -> Self;

    #[inline]
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::random_in(rng, DEFAULT_EXTENT)
    }
}

impl Random for Segment {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), extent: Float) -> Self {
        loop {
            let segment = Segment {
                start: rand_point(rng, extent),
                end: rand_point(rng, extent),
            };

            if segment.length() > Float::EPSILON * 8.0 {
                break segment;
            }
        }
    }
}

impl Random for Ray {
    /// The ray's length is between 1 and 20 times `extent`, so it
    /// usually has enough to cross the whole scene a few times.
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), extent: Float) -> Self {
        let origin = rand_point(rng, extent);
        let direction = normalize_angle(rng.gen_range(-PI..PI));
        let length = extent.abs().max(1.0) * rng.gen_range(1.0..20.0);

        Self {
            origin,
            direction,
            length,
        }
    }
}

/// Generates `num_mirrors` mirrors, and `num_rays` rays, all in `[-extent, extent]²`.
pub fn random_scene(
    rng: &mut (impl rand::Rng + ?Sized),
    num_mirrors: usize,
    num_rays: usize,
    extent: Float,
) -> (Vec<Segment>, Vec<Ray>) {
    (
        iter::repeat_with(|| Segment::random_in(rng, extent))
            .take(num_mirrors)
            .collect(),
        iter::repeat_with(|| Ray::random_in(rng, extent))
            .take(num_rays)
            .collect(),
    )
}

pub fn rand_point(rng: &mut (impl rand::Rng + ?Sized), max_coord_mag: Float) -> Point {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly

    Point::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn objects_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        let (mirrors, rays) = random_scene(&mut rng, 64, 64, 3.0);

        assert_eq!(mirrors.len(), 64);
        assert_eq!(rays.len(), 64);

        for mirror in &mirrors {
            assert!(mirror.coords().iter().all(|c| c.abs() <= 3.0));
            assert!(mirror.length() > 0.0);
        }

        for ray in &rays {
            assert!(ray.origin.iter().all(|c| c.abs() <= 3.0));
            assert!(ray.direction > -PI && ray.direction <= PI);
            assert!((3.0..60.0).contains(&ray.length));
            assert_eq!(ray.validate(), Ok(()));
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let a = random_scene(&mut StdRng::seed_from_u64(42), 8, 3, DEFAULT_EXTENT);
        let b = random_scene(&mut StdRng::seed_from_u64(42), 8, 3, DEFAULT_EXTENT);

        assert_eq!(a, b);
    }

    #[test]
    fn random_traces_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..32 {
            let (mut mirrors, rays) = random_scene(&mut rng, 12, 4, DEFAULT_EXTENT);
            mirrors.extend(bounding_box([-8.0, -8.0], [8.0, 8.0]));

            let tracer = Tracer::new(&mirrors, DEFAULT_MAX_REFLECTIONS).unwrap();

            for ray in rays {
                let trace = tracer.trace(ray).unwrap();

                assert!(trace.reflections.len() <= DEFAULT_MAX_REFLECTIONS);
                assert_eq!(trace.path.len(), trace.reflections.len() + 1);

                for pair in trace.path.windows(2) {
                    assert!((pair[0].end - pair[1].start).norm() <= 1e-9);
                }

                let mut previous = ray.length;
                for (r, pair) in trace.reflections.iter().zip(trace.reflections.windows(2)) {
                    assert!(r.remaining >= 0.0 && r.remaining <= previous);
                    assert_ne!(pair[0].mirror, pair[1].mirror);
                    previous = r.remaining;
                }

                // the ray never travels farther than its length
                assert!(trace.path.total_length() <= ray.length * (1.0 + 1e-9));
            }
        }
    }
}
