// ── Map scales ──
//
// Resolution to representative-fraction conversion using the OGC
// standardized rendering pixel size of 0.28 mm.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

const INCHES_PER_METER: f64 = 39.37;
const DOTS_PER_INCH: f64 = 25.4 / 0.28;
const EARTH_RADIUS: f64 = 6_370_997.0;

/// Unit of the map projection's coordinates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum ProjectionUnit {
    #[default]
    #[strum(serialize = "m")]
    #[serde(rename = "m")]
    Meters,
    #[strum(serialize = "ft")]
    #[serde(rename = "ft")]
    Feet,
    #[strum(serialize = "us-ft")]
    #[serde(rename = "us-ft")]
    UsFeet,
    #[strum(serialize = "degrees")]
    #[serde(rename = "degrees")]
    Degrees,
    #[strum(serialize = "radians")]
    #[serde(rename = "radians")]
    Radians,
}

impl ProjectionUnit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Feet => 0.3048,
            Self::UsFeet => 1200.0 / 3937.0,
            Self::Degrees => 2.0 * PI * EARTH_RADIUS / 360.0,
            Self::Radians => EARTH_RADIUS / (2.0 * PI),
        }
    }
}

/// Unrounded scale denominator for a resolution.
pub fn scale_for_resolution(resolution: f64, unit: ProjectionUnit) -> f64 {
    resolution * unit.meters_per_unit() * INCHES_PER_METER * DOTS_PER_INCH
}

/// Round a scale to the step cartographers expect for its magnitude.
pub fn round_scale(scale: f64) -> f64 {
    let step = if scale < 100.0 {
        1.0
    } else if scale < 10_000.0 {
        10.0
    } else if scale < 1_000_000.0 {
        100.0
    } else {
        1000.0
    };
    (scale / step).round() * step
}

/// Convert map resolutions into display scales, most zoomed-in first
/// becoming last.
///
/// Returns `None` for an empty list; callers treat that as "no scales".
pub fn compute_scales(resolutions: &[f64], unit: ProjectionUnit) -> Option<Vec<f64>> {
    if resolutions.is_empty() {
        return None;
    }

    Some(
        resolutions
            .iter()
            .rev()
            .map(|&res| round_scale(scale_for_resolution(res, unit)))
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn three_resolutions_reverse_into_scales() {
        let scales = compute_scales(&[100.0, 50.0, 25.0], ProjectionUnit::Meters).unwrap();
        assert_eq!(scales, vec![89_300.0, 178_600.0, 357_100.0]);
    }

    #[test]
    fn empty_input_yields_none() {
        assert!(compute_scales(&[], ProjectionUnit::Meters).is_none());
    }

    #[test]
    fn rounding_steps_follow_magnitude() {
        assert!((round_scale(35.71) - 36.0).abs() < f64::EPSILON);
        assert!((round_scale(3571.42) - 3570.0).abs() < f64::EPSILON);
        assert!((round_scale(357_142.1) - 357_100.0).abs() < f64::EPSILON);
        assert!((round_scale(3_571_421.4) - 3_571_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn output_preserves_length_and_ordering() {
        let resolutions = [
            156_543.03, 78_271.52, 39_135.76, 19_567.88, 9783.94, 4891.97, 2445.98, 1222.99,
            611.5, 305.75, 152.87, 76.44, 38.22, 19.11, 9.55, 4.78, 2.39, 1.19, 0.6, 0.3,
        ];
        let scales = compute_scales(&resolutions, ProjectionUnit::Meters).unwrap();
        assert_eq!(scales.len(), resolutions.len());

        let restored: Vec<f64> = scales.iter().rev().copied().collect();
        for pair in restored.windows(2) {
            assert!(pair[0] > pair[1], "scales must shrink with resolution: {pair:?}");
        }
    }

    #[test]
    fn unit_parsing() {
        assert_eq!("m".parse::<ProjectionUnit>().unwrap(), ProjectionUnit::Meters);
        assert_eq!("us-ft".parse::<ProjectionUnit>().unwrap(), ProjectionUnit::UsFeet);
        assert!("parsecs".parse::<ProjectionUnit>().is_err());
    }

    #[test]
    fn degrees_scale_up_by_meters_per_degree() {
        let m = scale_for_resolution(1.0, ProjectionUnit::Meters);
        let deg = scale_for_resolution(1.0, ProjectionUnit::Degrees);
        assert!((deg / m - ProjectionUnit::Degrees.meters_per_unit()).abs() < 1e-6);
    }
}
