use lightpath::*;
use std::error::Error;

pub use serde_json;

/// This is essentially `try_into` then `try_map` but the latter is nightly-only
pub fn json_array_to_float_array<const N: usize>(
    json_array: &[serde_json::Value],
) -> Option<[Float; N]> {
    let array: &[serde_json::Value; N] = json_array.try_into().ok()?;

    let mut float_array = [0.; N];
    for (coord, value) in float_array.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }
    Some(float_array)
}

pub fn json_array_to_point(json_array: &[serde_json::Value]) -> Option<Point> {
    json_array_to_float_array(json_array).map(Point::from)
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, Box<dyn Error>>,
) -> Result<C, Box<dyn Error>> {
    json.as_array()
        .ok_or("json value must be an array")?
        .iter()
        .map(map)
        .collect()
}

fn get_point(json: &serde_json::Value, field: &str) -> Result<Point, Box<dyn Error>> {
    let array = json
        .get(field)
        .ok_or_else(|| format!("Missing {field}"))?
        .as_array()
        .ok_or_else(|| format!("{field} must be an array"))?;

    json_array_to_point(array).ok_or_else(|| format!("Invalid {field}: expected 2 numbers").into())
}

fn get_float(json: &serde_json::Value, field: &str) -> Result<Float, Box<dyn Error>> {
    json.get(field)
        .ok_or_else(|| format!("Missing {field}"))?
        .as_f64()
        .ok_or_else(|| format!("{field} must be a number").into())
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}

impl JsonSer for Segment {
    /// Serialize a segment into a JSON array.
    ///
    /// The format of the returned array is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.coords())
    }
}

impl JsonSer for Ray {
    /// Serialize a ray into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin.as_slice(),
            "direction": self.direction,
            "length": self.length,
        })
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

impl JsonDes for Segment {
    /// Deserialize a segment from a JSON array of the form `[x1, y1, x2, y2]`.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        json.as_array()
            .and_then(|array| json_array_to_float_array(array))
            .map(Segment::from_coords)
            .ok_or_else(|| "a segment must be an array of 4 numbers: [x1, y1, x2, y2]".into())
    }
}

impl JsonDes for Ray {
    /// Deserialize a new ray from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "origin": [20.0, 20.0],
    ///     "direction": 0.785398, // (radians)
    ///     "length": 500.0,
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            origin: get_point(json, "origin")?,
            direction: get_float(json, "direction")?,
            length: get_float(json, "length")?,
        })
    }
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        map_json_array(json, T::from_json)
    }
}

/// Everything needed to run a simulation: a set of mirrors, the rays
/// to trace against them, and a reflection budget for every ray.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub mirrors: Vec<Segment>,
    pub rays: Vec<Ray>,
    pub max_reflections: usize,
    /// How far before a mirror rays bounce, `0.0` to bounce on the mirror itself.
    pub reflection_distance: Float,
}

impl Scene {
    /// A scene with the default reflection budget.
    pub fn new(mirrors: Vec<Segment>, rays: Vec<Ray>) -> Self {
        Self {
            mirrors,
            rays,
            max_reflections: DEFAULT_MAX_REFLECTIONS,
            reflection_distance: 0.0,
        }
    }

    pub fn tracer(&self) -> Result<Tracer<'_>, ConfigError> {
        Tracer::new(&self.mirrors, self.max_reflections)?
            .with_reflection_distance(self.reflection_distance)
    }
}

impl JsonSer for Scene {
    /// Serialize a scene into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`],
    /// bounding walls, if any, are listed along with the other mirrors.
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "mirrors": self.mirrors.to_json(),
            "rays": self.rays.to_json(),
            "max_reflections": self.max_reflections,
            "reflection_distance": self.reflection_distance,
        })
    }
}

impl JsonDes for Scene {
    /// Deserialize a scene from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "mirrors": [[25.0, 0.0, 25.0, 10.0], ...], // (see `Segment::from_json`)
    ///     "bounds": { "min": [0.0, 0.0], "max": [300.0, 200.0] }, // (optional)
    ///     "rays": [{ "origin": [20.0, 20.0], "direction": 0.78, "length": 500.0 }, ...],
    ///     "max_reflections": 100, // (optional)
    ///     "reflection_distance": 0.0, // (optional)
    /// }
    /// ```
    ///
    /// If present, the four walls of `bounds` are appended to the mirrors.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let mut mirrors: Vec<Segment> =
            Vec::from_json(json.get("mirrors").ok_or("mirrors field expected")?)?;

        if let Some(bounds) = json.get("bounds") {
            let min = get_point(bounds, "min")?;
            let max = get_point(bounds, "max")?;
            mirrors.extend(bounding_box(min, max));
        }

        let rays: Vec<Ray> = Vec::from_json(json.get("rays").ok_or("rays field expected")?)?;

        if rays.is_empty() {
            return Err("at least one ray is required".into());
        }

        let max_reflections = match json.get("max_reflections") {
            Some(value) => value
                .as_u64()
                .ok_or("max_reflections must be a non-negative integer")?
                .try_into()?,
            None => DEFAULT_MAX_REFLECTIONS,
        };

        let reflection_distance = match json.get("reflection_distance") {
            Some(value) => value.as_f64().ok_or("reflection_distance must be a number")?,
            None => 0.0,
        };

        Ok(Self {
            mirrors,
            rays,
            max_reflections,
            reflection_distance,
        })
    }
}
