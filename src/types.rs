//! Newtype wrappers for validated sensor input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Distances reported by the `[left, front, right]` sensors.
///
/// Each value counts the open cells before a wall in that relative
/// direction. Construction from raw driver input rejects negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorTriple {
    left: u32,
    front: u32,
    right: u32,
}

impl SensorTriple {
    /// Validate a raw driver reading ordered `[left, front, right]`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSensor`] if the reading does not hold
    /// exactly three values or any value is negative.
    pub fn new(readings: &[i64]) -> Result<Self, crate::Error> {
        let invalid = |reason: String| crate::Error::InvalidSensor {
            readings: readings.to_vec(),
            reason,
        };

        let [left, front, right] = readings else {
            return Err(invalid(format!(
                "expected 3 values [left, front, right], got {}",
                readings.len()
            )));
        };

        // Readings beyond u32::MAX are as good as unbounded.
        let convert = |value: i64, name: &str| {
            if value < 0 {
                return Err(invalid(format!(
                    "{name} distance {value} must be non-negative"
                )));
            }
            Ok(u32::try_from(value).unwrap_or(u32::MAX))
        };

        Ok(Self {
            left: convert(*left, "left")?,
            front: convert(*front, "front")?,
            right: convert(*right, "right")?,
        })
    }

    /// Build a reading from distances that are already known to be valid.
    pub const fn from_distances(left: u32, front: u32, right: u32) -> Self {
        Self { left, front, right }
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn front(&self) -> u32 {
        self.front
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    /// Distances ordered `[left, front, right]`.
    pub fn as_array(&self) -> [u32; 3] {
        [self.left, self.front, self.right]
    }
}

impl TryFrom<&[i64]> for SensorTriple {
    type Error = crate::Error;

    fn try_from(readings: &[i64]) -> Result<Self, Self::Error> {
        Self::new(readings)
    }
}

impl fmt::Display for SensorTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.left, self.front, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_reading() {
        let sensors = SensorTriple::new(&[0, 3, 1]).unwrap();
        assert_eq!(sensors.as_array(), [0, 3, 1]);
        assert_eq!(sensors.to_string(), "[0, 3, 1]");
    }

    #[test]
    fn test_negative_reading_rejected() {
        let err = SensorTriple::new(&[1, -1, 0]).unwrap_err();
        match err {
            crate::Error::InvalidSensor { readings, reason } => {
                assert_eq!(readings, vec![1, -1, 0]);
                assert!(reason.contains("front"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_huge_reading_saturates() {
        let sensors = SensorTriple::new(&[5_000_000_000, 0, 1]).unwrap();
        assert_eq!(sensors.as_array(), [u32::MAX, 0, 1]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(SensorTriple::new(&[1, 2]).is_err());
        assert!(SensorTriple::try_from(&[1, 2, 3, 4][..]).is_err());
    }
}
