use core::f64::consts::PI;

use super::{geometry::*, *};

/// A light ray: where it starts, where it's headed, and how far it may still travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point,
    /// In radians.
    pub direction: Float,
    pub length: Float,
}

impl Ray {
    #[inline]
    pub fn new(origin: impl Into<Point>, direction: Float, length: Float) -> Self {
        Self {
            origin: origin.into(),
            direction,
            length,
        }
    }

    /// The segment covered by this ray if nothing stops it.
    #[inline]
    pub fn segment(&self) -> Segment {
        Segment {
            start: self.origin,
            end: self.origin + unit(self.direction) * self.length,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // the projected end may overflow even when every field is finite
        let finite = self.origin.iter().all(|c| c.is_finite())
            && self.direction.is_finite()
            && self.length.is_finite()
            && self.segment().is_finite();

        if !finite {
            return Err(ConfigError::NonFiniteRay);
        }

        if self.length <= 0.0 {
            return Err(ConfigError::NonPositiveLength(self.length));
        }

        Ok(())
    }
}

/// Reflects the direction `segment_angle` about the line directed by `mirror_angle`.
///
/// The mirror's angle is first brought into `[0, π)`, so a mirror reflects the
/// same way regardless of the order its endpoints were declared in.
///
/// The returned angle is in `(-π, π]`.
#[inline]
pub fn reflect_angle(segment_angle: Float, mirror_angle: Float) -> Float {
    let mirror_angle = mirror_angle.rem_euclid(PI);
    normalize_angle(2.0 * (mirror_angle - segment_angle) + segment_angle)
}

/// A ray bouncing off a mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reflection {
    /// Where the ray hit the mirror.
    pub point: Point,
    /// The index of the mirror that was hit.
    pub mirror: usize,
    /// The ray's direction after bouncing.
    pub direction: Float,
    /// The length the ray has left after bouncing.
    pub remaining: Float,
}

/// An iterator over the successive reflections of a ray, off a set of mirrors.
///
/// Ends when the ray doesn't hit any mirror anymore. It isn't bounded otherwise,
/// see [`Tracer`] for a bounded version.
#[derive(Clone, Debug)]
pub struct RayPath<'a> {
    ray: Ray,
    mirrors: &'a [Segment],
    last_hit: Option<usize>,
    reflection_distance: Float,
}

impl<'a> RayPath<'a> {
    #[inline]
    pub fn new(mirrors: &'a [Segment], ray: Ray) -> Self {
        Self {
            ray,
            mirrors,
            last_hit: None,
            reflection_distance: 0.0,
        }
    }

    /// Makes the ray bounce `reflection_distance` before reaching each mirror,
    /// instead of on the mirror itself. The distance is clamped to the length
    /// of each leg.
    #[inline]
    pub fn with_reflection_distance(mut self, reflection_distance: Float) -> Self {
        self.reflection_distance = reflection_distance;
        self
    }

    /// The current state of the ray.
    #[inline]
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    /// Returns the mirror `segment` hits first, the point it hits it at,
    /// and the distance from `segment.start` to that point.
    ///
    /// The mirror the ray just bounced off is skipped, since the segment
    /// starts on it. On ties, the mirror listed first wins.
    fn closest_hit(&self, segment: &Segment) -> Option<(usize, Point, Float)> {
        self.mirrors
            .iter()
            .enumerate()
            .filter(|&(i, _)| Some(i) != self.last_hit)
            .filter_map(|(i, mirror)| {
                let point = line_intersection(segment, mirror)?;
                trace!("candidate hit on mirror {i} at ({}, {})", point.x, point.y);
                Some((i, point, distance(&segment.start, &point)))
            })
            .min_by(|(_, _, d1), (_, _, d2)| d1.total_cmp(d2))
    }
}

impl Iterator for RayPath<'_> {
    type Item = Reflection;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.ray.segment();
        let (mirror, mut point, mut dist) = self.closest_hit(&segment)?;

        let segment_angle = line_angle(&segment);

        if self.reflection_distance > 0.0 {
            dist = (dist - self.reflection_distance).max(0.0);
            point = segment.start + unit(segment_angle) * dist;
        }

        let direction = reflect_angle(segment_angle, line_angle(&self.mirrors[mirror]));

        self.ray = Ray {
            origin: point,
            direction,
            // roundoff may put the hit slightly past the segment's end
            length: (self.ray.length - dist).max(0.0),
        };
        self.last_hit = Some(mirror);

        Some(Reflection {
            point,
            mirror,
            direction,
            remaining: self.ray.length,
        })
    }
}

/// Why a trace stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The ray's last segment doesn't hit any mirror.
    Escaped,
    /// The reflection budget ran out. The path is still valid, just incomplete.
    ReflectionLimit,
}

/// The result of tracing a ray.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub path: Path,
    /// One entry per segment of `path`, except the last one.
    pub reflections: Vec<Reflection>,
    pub outcome: Outcome,
}

impl Trace {
    #[inline]
    pub fn limit_reached(&self) -> bool {
        self.outcome == Outcome::ReflectionLimit
    }

    /// Checks whether the ray ended up trapped in a periodic orbit, i. e. its last two
    /// reflection points (approximately) repeat an earlier pair of consecutive ones.
    ///
    /// Returns the index, in `self.reflections`, of the start of that earlier pair.
    pub fn loop_index(&self, eps: Float) -> Option<usize> {
        let points: Vec<_> = self.reflections.iter().map(|r| r.point).collect();
        loop_index(&points, eps)
    }
}

/// Checks if the last two points of `path` (approximately) repeat an earlier pair of
/// consecutive points, returning the index of the first point of that pair.
/// `eps` is used for comparisons.
pub fn loop_index(path: &[Point], eps: Float) -> Option<usize> {
    let (last_pt, points) = path.split_last()?;
    let (prev_pt, points) = points.split_last()?;

    points.windows(2).position(|window| {
        // `slice::array_windows` is unstable
        let [this_pt, next_pt] = window else {
            unreachable!()
        };
        distance(prev_pt, this_pt) <= eps && distance(last_pt, next_pt) <= eps
    })
}

/// Traces rays against a fixed set of mirrors.
///
/// The mirrors are borrowed immutably, so a single tracer can be shared by
/// several threads, each tracing its own rays.
#[derive(Clone, Copy, Debug)]
pub struct Tracer<'a> {
    mirrors: &'a [Segment],
    max_reflections: usize,
    reflection_distance: Float,
}

impl<'a> Tracer<'a> {
    /// Fails if `max_reflections` is zero, or if `mirrors` is empty or
    /// contains a non-finite or zero-length segment.
    pub fn new(mirrors: &'a [Segment], max_reflections: usize) -> Result<Self, ConfigError> {
        if max_reflections == 0 {
            return Err(ConfigError::ZeroReflectionLimit);
        }

        if mirrors.is_empty() {
            return Err(ConfigError::NoMirrors);
        }

        for (index, mirror) in mirrors.iter().enumerate() {
            if !mirror.is_finite() {
                return Err(ConfigError::NonFiniteMirror { index });
            }
            if mirror.start == mirror.end {
                return Err(ConfigError::DegenerateMirror { index });
            }
        }

        Ok(Self {
            mirrors,
            max_reflections,
            reflection_distance: 0.0,
        })
    }

    /// See [`RayPath::with_reflection_distance`]. Fails if `reflection_distance`
    /// is negative or not finite.
    pub fn with_reflection_distance(
        mut self,
        reflection_distance: Float,
    ) -> Result<Self, ConfigError> {
        if !(reflection_distance.is_finite() && reflection_distance >= 0.0) {
            return Err(ConfigError::InvalidReflectionDistance(reflection_distance));
        }

        self.reflection_distance = reflection_distance;
        Ok(self)
    }

    #[inline]
    pub fn mirrors(&self) -> &'a [Segment] {
        self.mirrors
    }

    #[inline]
    pub fn max_reflections(&self) -> usize {
        self.max_reflections
    }

    #[inline]
    pub fn reflection_distance(&self) -> Float {
        self.reflection_distance
    }

    /// Follows `ray` until it escapes, or bounces `self.max_reflections()` times.
    pub fn trace(&self, ray: Ray) -> Result<Trace, ConfigError> {
        ray.validate()?;

        let mut ray_path =
            RayPath::new(self.mirrors, ray).with_reflection_distance(self.reflection_distance);
        let mut segments = Vec::new();
        let mut reflections = Vec::new();

        let outcome = loop {
            if reflections.len() == self.max_reflections {
                warn!("reflection limit ({}) reached", self.max_reflections);
                break Outcome::ReflectionLimit;
            }

            let start = ray_path.ray().origin;

            let Some(reflection) = ray_path.next() else {
                info!("ray escaped after {} reflection(s)", reflections.len());
                break Outcome::Escaped;
            };

            debug!(
                "reflection {}: mirror {} at ({}, {}), new direction {}, {} left",
                reflections.len(),
                reflection.mirror,
                reflection.point.x,
                reflection.point.y,
                reflection.direction,
                reflection.remaining,
            );

            segments.push(Segment {
                start,
                end: reflection.point,
            });
            reflections.push(reflection);
        };

        segments.push(ray_path.ray().segment());

        Ok(Trace {
            path: Path::new(segments),
            reflections,
            outcome,
        })
    }
}
