// Wheel heading: an absolute steering angle kept in canonical form.
//
// Headings are stored in degrees within [0, 360). Subtracting two headings
// gives the signed shortest-path rotation between them, in (-180, 180].

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

const FULL_TURN_DEG: f64 = 360.0;
const HALF_TURN_DEG: f64 = 180.0;

/// Absolute wheel heading in degrees, normalized to [0, 360)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Heading(f64);

impl Heading {
    /// Build a heading from any real angle in degrees (wraps into [0, 360))
    pub fn from_degrees(degrees: f64) -> Self {
        Self(wrap_degrees(degrees))
    }

    pub fn from_radians(radians: f64) -> Self {
        Self::from_degrees(radians.to_degrees())
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    pub fn radians(&self) -> f64 {
        self.0.to_radians()
    }

    /// Rotate by a signed amount of degrees
    pub fn rotate_by(&self, degrees: f64) -> Self {
        Self::from_degrees(self.0 + degrees)
    }

    /// The heading pointing the opposite way
    pub fn opposite(&self) -> Self {
        self.rotate_by(HALF_TURN_DEG)
    }

    /// Signed shortest rotation (degrees) that takes `from` onto `self`, in (-180, 180]
    pub fn delta_from(&self, from: Heading) -> f64 {
        let delta = wrap_degrees(self.0 - from.0);
        if delta > HALF_TURN_DEG {
            delta - FULL_TURN_DEG
        } else {
            delta
        }
    }
}

/// Wrap an angle into [0, 360)
fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN_DEG);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0 and keeps -0.0
    if wrapped >= FULL_TURN_DEG || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

impl Sub for Heading {
    type Output = f64;

    fn sub(self, rhs: Heading) -> f64 {
        self.delta_from(rhs)
    }
}

impl From<f64> for Heading {
    fn from(degrees: f64) -> Self {
        Self::from_degrees(degrees)
    }
}

impl From<Heading> for f64 {
    fn from(heading: Heading) -> Self {
        heading.0
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_normalization() {
        assert!((Heading::from_degrees(370.0).degrees() - 10.0).abs() < EPS);
        assert!((Heading::from_degrees(-90.0).degrees() - 270.0).abs() < EPS);
        assert!((Heading::from_degrees(-720.0).degrees()).abs() < EPS);
        assert_eq!(Heading::from_degrees(360.0).degrees(), 0.0);
    }

    #[test]
    fn test_tiny_negative_wraps_below_full_turn() {
        let heading = Heading::from_degrees(-1e-20);
        assert!(heading.degrees() < 360.0);
        assert!(heading.degrees() >= 0.0);
    }

    #[test]
    fn test_subtraction_takes_shortest_path() {
        let current = Heading::from_degrees(10.0);
        assert!((Heading::from_degrees(200.0) - current - (-170.0)).abs() < EPS);
        assert!((Heading::from_degrees(350.0) - current - (-20.0)).abs() < EPS);
        assert!((Heading::from_degrees(100.0) - current - 90.0).abs() < EPS);
    }

    #[test]
    fn test_half_turn_delta_is_positive() {
        let delta = Heading::from_degrees(180.0) - Heading::from_degrees(0.0);
        assert!((delta - 180.0).abs() < EPS);
        let delta = Heading::from_degrees(0.0) - Heading::from_degrees(180.0);
        assert!((delta - 180.0).abs() < EPS);
    }

    #[test]
    fn test_delta_range_sweep() {
        for a in 0..360 {
            for b in (0..360).step_by(7) {
                let delta = Heading::from_degrees(a as f64) - Heading::from_degrees(b as f64);
                assert!(delta > -180.0 && delta <= 180.0, "delta {} out of range", delta);
            }
        }
    }

    #[test]
    fn test_opposite_and_radians() {
        let heading = Heading::from_degrees(270.0);
        assert!((heading.opposite().degrees() - 90.0).abs() < EPS);
        assert!((Heading::from_radians(std::f64::consts::PI).degrees() - 180.0).abs() < EPS);
        assert!((Heading::from_degrees(90.0).radians() - std::f64::consts::FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let heading: Heading = serde_json::from_str("-45.0").unwrap();
        assert!((heading.degrees() - 315.0).abs() < EPS);
        assert_eq!(serde_json::to_string(&Heading::from_degrees(90.0)).unwrap(), "90.0");
    }
}
