use core::{fmt, ops::Deref};

use super::*;

/// The legs of a traced ray, in the order they were travelled.
///
/// Each segment ends where the next one starts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    #[inline]
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The start of the first segment, followed by the end of every segment.
    #[inline]
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments
            .first()
            .map(|s| s.start)
            .into_iter()
            .chain(self.segments.iter().map(|s| s.end))
    }

    /// The sum of the lengths of all segments.
    #[inline]
    pub fn total_length(&self) -> Float {
        self.segments.iter().map(Segment::length).sum()
    }
}

impl Deref for Path {
    type Target = [Segment];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.segments
    }
}

impl fmt::Display for Segment {
    /// `(x1, y1) -> (x2, y2) at θ°`, two decimals each.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) -> ({:.2}, {:.2}) at {:.2}°",
            self.start.x,
            self.start.y,
            self.end.x,
            self.end.y,
            geometry::line_angle(self).to_degrees(),
        )
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            writeln!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.limit_reached() {
            writeln!(f, "reflection limit reached")?;
        }
        writeln!(f, "ray segments:")?;
        write!(f, "{}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn escaping_trace_listing() {
        let mirrors = [Segment::from_coords([25.0, 0.0, 25.0, 10.0])];
        let trace = Tracer::new(&mirrors, DEFAULT_MAX_REFLECTIONS)
            .unwrap()
            .trace(Ray::new([20.0, 20.0], FRAC_PI_4, 500.0))
            .unwrap();

        assert_eq!(
            trace.to_string(),
            "ray segments:\n(20.00, 20.00) -> (373.55, 373.55) at 45.00°\n"
        );
    }

    #[test]
    fn limited_trace_listing() {
        let mirrors = [
            Segment::from_coords([0.0, 0.0, 10.0, 0.0]),
            Segment::from_coords([0.0, 2.0, 10.0, 2.0]),
        ];
        let trace = Tracer::new(&mirrors, 1)
            .unwrap()
            .trace(Ray::new([1.0, 1.0], FRAC_PI_2, 2.5))
            .unwrap();

        assert_eq!(
            trace.to_string(),
            "reflection limit reached\n\
             ray segments:\n\
             (1.00, 1.00) -> (1.00, 2.00) at 90.00°\n\
             (1.00, 2.00) -> (1.00, 0.50) at -90.00°\n"
        );
    }

    #[test]
    fn points_and_length() {
        let mirrors = [Segment::from_coords([5.0, -1.0, 5.0, 1.0])];
        let trace = Tracer::new(&mirrors, DEFAULT_MAX_REFLECTIONS)
            .unwrap()
            .trace(Ray::new([0.0, 0.0], 0.0, 8.0))
            .unwrap();

        let points: Vec<_> = trace.path.points().collect();
        assert_eq!(points.len(), trace.path.len() + 1);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_relative_eq!(points[1].x, 5.0);
        assert_relative_eq!(points[2].x, 2.0, epsilon = 1e-9);

        // the full length is used up
        assert_relative_eq!(trace.path.total_length(), 8.0, epsilon = 1e-9);
        assert_eq!(Path::default().points().count(), 0);
    }
}
