//! Scroll view configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Primary axis a scroll view lays its sequence along.
///
/// Serialized as the numeric axis index: `0` is horizontal, `1` is vertical.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Horizontal,
    #[default]
    Vertical,
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Direction::Horizontal),
            1 => Ok(Direction::Vertical),
            other => Err(Error::InvalidDirection(other)),
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Horizontal => 0,
            Direction::Vertical => 1,
        }
    }
}

/// Options for one scroll view.
///
/// Only the keys below are interpreted. Everything else lands in `extra` and
/// reaches the scroller factory untouched.
///
/// # Example
///
/// ```
/// use scrollseq::{Direction, ScrollOptions};
///
/// let options = ScrollOptions::from_json(r#"{"direction": 0, "paginated": true, "friction": 0.01}"#)
///     .unwrap();
/// assert_eq!(options.direction, Direction::Horizontal);
/// assert!(options.paginated);
/// assert!(options.extra.contains_key("friction"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollOptions {
    pub direction: Direction,
    /// Viewport extent along the primary axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_size: Option<f64>,
    pub paginated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_limit: Option<f64>,
    /// Unrecognized keys, passed through to the scroller.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScrollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse options from an already-decoded JSON value.
    ///
    /// `null` yields the defaults.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_clip_size(mut self, clip_size: f64) -> Self {
        self.clip_size = Some(clip_size);
        self
    }

    pub fn paginated(mut self, paginated: bool) -> Self {
        self.paginated = paginated;
        self
    }

    pub fn with_speed_limit(mut self, speed_limit: f64) -> Self {
        self.speed_limit = Some(speed_limit);
        self
    }

    /// Add a pass-through key.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recognized_keys() {
        let options = ScrollOptions::from_value(json!({
            "clipSize": 568,
            "paginated": true,
            "speedLimit": 5,
            "direction": 1
        }))
        .unwrap();

        assert_eq!(options.direction, Direction::Vertical);
        assert_eq!(options.clip_size, Some(568.0));
        assert!(options.paginated);
        assert_eq!(options.speed_limit, Some(5.0));
        assert!(options.extra.is_empty());
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let options = ScrollOptions::from_json(r#"{"direction": 0, "edgeGrip": 0.5}"#).unwrap();
        assert_eq!(options.direction, Direction::Horizontal);
        assert_eq!(options.extra.get("edgeGrip"), Some(&json!(0.5)));
    }

    #[test]
    fn test_null_yields_defaults() {
        let options = ScrollOptions::from_value(Value::Null).unwrap();
        assert_eq!(options, ScrollOptions::default());
    }

    #[test]
    fn test_invalid_direction_is_rejected() {
        let err = ScrollOptions::from_json(r#"{"direction": 4}"#).unwrap_err();
        assert!(matches!(err, Error::Options(_)));
    }

    #[test]
    fn test_builder() {
        let options = ScrollOptions::new()
            .with_direction(Direction::Horizontal)
            .with_clip_size(320.0)
            .paginated(true)
            .with_speed_limit(2.5)
            .with_extra("margin", 10);

        assert_eq!(options.direction, Direction::Horizontal);
        assert_eq!(options.clip_size, Some(320.0));
        assert_eq!(options.speed_limit, Some(2.5));
        assert_eq!(options.extra.get("margin"), Some(&json!(10)));
    }
}
