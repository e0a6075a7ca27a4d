//! Stateless 2D primitives used by the tracer.

use nalgebra::Matrix2;

use super::*;

/// Relative tolerance under which two segments are considered parallel.
const PARALLEL_EPS: Float = Float::EPSILON * 64.0;

/// Returns the point where the segments `a` and `b` cross, if any.
///
/// Writing `a.at(s) == b.at(t)` as a linear system in `(s, t)`, this solves it
/// using Cramer's rule. The result is only kept if both `s` and `t` lie in
/// `[0, 1]`, endpoints included, i. e. the point belongs to both finite segments.
///
/// Returns `None` if the segments are parallel, collinear, or either has zero
/// length.
#[inline]
pub fn line_intersection(a: &Segment, b: &Segment) -> Option<Point> {
    let da = a.direction();
    let db = b.start - b.end;
    let rhs = b.start - a.start;

    let det = Matrix2::from_columns(&[da, db]).determinant();

    // scale the tolerance with the segments, `det` is the area of the
    // parallelogram they span
    if !(det.abs() > PARALLEL_EPS * da.norm() * db.norm()) {
        return None;
    }

    let s = Matrix2::from_columns(&[rhs, db]).determinant() / det;
    let t = Matrix2::from_columns(&[da, rhs]).determinant() / det;

    const UNIT: core::ops::RangeInclusive<Float> = 0.0..=1.0;

    (UNIT.contains(&s) && UNIT.contains(&t)).then(|| a.at(s))
}

/// The angle, in radians, of the direction going from `segment.start` to `segment.end`,
/// in `(-π, π]`.
#[inline]
pub fn line_angle(segment: &Segment) -> Float {
    let d = segment.direction();
    d.y.atan2(d.x)
}

#[inline]
pub fn distance(a: &Point, b: &Point) -> Float {
    (b - a).norm()
}

/// The unit vector pointing in the direction `angle`.
#[inline]
pub fn unit(angle: Float) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(cos, sin)
}

/// Maps `angle` to its equivalent in `(-π, π]`.
#[inline]
pub fn normalize_angle(angle: Float) -> Float {
    use core::f64::consts::{PI, TAU};

    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn seg(coords: [Float; 4]) -> Segment {
        Segment::from_coords(coords)
    }

    #[test]
    fn crossing_segments() {
        let p = line_intersection(&seg([0.0, 0.0, 2.0, 2.0]), &seg([0.0, 2.0, 2.0, 0.0]))
            .expect("segments cross");

        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn no_intersection_beyond_bounds() {
        // the supporting lines cross at (2, 0), outside of `a`
        let a = seg([0.0, 0.0, 1.0, 0.0]);
        let b = seg([2.0, -1.0, 2.0, 1.0]);
        assert_eq!(line_intersection(&a, &b), None);
        assert_eq!(line_intersection(&b, &a), None);

        // and here, outside of `b`
        let b = seg([0.5, 1.0, 0.5, 3.0]);
        assert_eq!(line_intersection(&a, &b), None);
    }

    #[test]
    fn boundary_hits_are_kept() {
        let a = seg([0.0, 0.0, 1.0, 0.0]);

        // s == 1, t == 0.5
        let p = line_intersection(&a, &seg([1.0, -1.0, 1.0, 1.0]));
        assert_eq!(p, Some(Point::new(1.0, 0.0)));

        // s == 0, t == 0: a zero parameter is a hit, not a miss
        let p = line_intersection(&a, &seg([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(p, Some(Point::new(0.0, 0.0)));

        // s == 0.5, t == 1
        let p = line_intersection(&a, &seg([0.5, 2.0, 0.5, 0.0]));
        assert_eq!(p, Some(Point::new(0.5, 0.0)));
    }

    #[test]
    fn parallel_and_degenerate_segments() {
        let a = seg([0.0, 0.0, 1.0, 0.0]);

        assert_eq!(line_intersection(&a, &seg([0.0, 1.0, 1.0, 1.0])), None);
        // collinear and overlapping
        assert_eq!(line_intersection(&a, &seg([0.5, 0.0, 2.0, 0.0])), None);
        // zero length
        assert_eq!(line_intersection(&a, &seg([0.5, 0.0, 0.5, 0.0])), None);
        assert_eq!(line_intersection(&seg([0.5, -1.0, 0.5, -1.0]), &a), None);
    }

    #[test]
    fn non_finite_input_never_intersects() {
        let a = seg([0.0, 0.0, Float::NAN, 1.0]);
        assert_eq!(line_intersection(&a, &seg([0.0, 1.0, 1.0, 0.0])), None);
    }

    #[test]
    fn angles() {
        assert_abs_diff_eq!(line_angle(&seg([0.0, 0.0, 1.0, 1.0])), FRAC_PI_4);
        assert_abs_diff_eq!(line_angle(&seg([0.0, 0.0, 0.0, -3.0])), -FRAC_PI_2);
        assert_abs_diff_eq!(line_angle(&seg([1.0, 0.0, 0.0, 0.0])), PI);
    }

    #[test]
    fn distances() {
        assert_eq!(distance(&Point::new(0.0, 0.0), &Point::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(&Point::new(-1.0, 2.0), &Point::new(-1.0, 2.0)), 0.0);
    }

    #[test]
    fn angle_normalization() {
        assert_abs_diff_eq!(normalize_angle(7.0 * FRAC_PI_4), -FRAC_PI_4, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(5.0 * FRAC_PI_2), FRAC_PI_2, epsilon = 1e-12);
    }
}
