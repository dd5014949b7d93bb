//! Curve math for the alignment and member directrices.
//!
//! All evaluation happens on the horizontal plane (global Z up). Angles are
//! radians internally; inputs authored in degrees are converted on entry via
//! [`AngleUnit`].

use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::error::SpandrelError;

/// Absolute slack allowed when a distance-along query sits at the far end of
/// a segment or chain, in model length units.
pub const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Unit in which the source model expresses angles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleUnit {
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Converts an authored angle value into radians.
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Radians => value,
            AngleUnit::Degrees => value.to_radians(),
        }
    }
}

/// One horizontal segment of an alignment curve.
#[derive(Clone, Debug)]
pub enum HorizontalSegment {
    Line {
        start: Vector3<f64>,
        /// Start direction in the horizontal plane, counter-clockwise from +X.
        direction: f64,
        length: f64,
    },
    Arc {
        start: Vector3<f64>,
        direction: f64,
        /// Arc length, not chord length.
        length: f64,
        radius: f64,
        ccw: bool,
    },
}

impl HorizontalSegment {
    pub fn length(&self) -> f64 {
        match self {
            HorizontalSegment::Line { length, .. } | HorizontalSegment::Arc { length, .. } => {
                *length
            }
        }
    }
}

/// One vertical segment of an alignment curve. The gradient is an angle, not
/// a slope ratio; the reference direction vector is (cos g, 0, sin g).
#[derive(Clone, Debug)]
pub struct VerticalSegment {
    pub start_dist_along: f64,
    pub start_height: f64,
    pub horizontal_length: f64,
    pub start_gradient: f64,
}

/// A local placement frame, optionally nested under a parent frame.
#[derive(Clone, Debug)]
pub struct Placement {
    pub origin: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub parent: Option<Box<Placement>>,
}

impl Placement {
    pub fn new(origin: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Placement {
        Placement {
            origin,
            rotation,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: Placement) -> Placement {
        self.parent = Some(Box::new(parent));
        self
    }
}

/// Rotates a vector about the global vertical axis.
fn rotate_about_z(v: Vector3<f64>, angle: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle) * v
}

/// Unit direction vector for a horizontal heading angle.
fn heading(direction: f64) -> Vector3<f64> {
    Vector3::new(direction.cos(), direction.sin(), 0.0)
}

/// Evaluates a point and its lateral direction at `distance` along a single
/// horizontal segment.
///
/// The lateral direction points to the left of travel (vertical axis crossed
/// with the travel direction).
///
/// # Arguments
/// * `segment` - The segment to evaluate
/// * `distance` - Arc-length distance from the segment start
/// * `angle_unit` - Unit of the authored direction angles
///
/// # Returns
/// The evaluated point and the unit lateral vector, in that order
pub fn point_and_tangent(
    segment: &HorizontalSegment,
    distance: f64,
    angle_unit: AngleUnit,
) -> Result<(Vector3<f64>, Vector3<f64>), SpandrelError> {
    if distance > segment.length() + DISTANCE_TOLERANCE {
        return Err(SpandrelError::Range(format!(
            "distance {} exceeds segment length {}",
            distance,
            segment.length()
        )));
    }

    match segment {
        HorizontalSegment::Line {
            start, direction, ..
        } => {
            let dir = heading(angle_unit.to_radians(*direction));
            let point = start + distance * dir;
            let lateral = Vector3::z().cross(&dir);
            Ok((point, lateral))
        }
        HorizontalSegment::Arc {
            start,
            direction,
            radius,
            ccw,
            ..
        } => {
            let dir = heading(angle_unit.to_radians(*direction));
            let side = if *ccw {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            };
            let center = start + *radius * rotate_about_z(dir, side);
            let sweep = if *ccw {
                distance / radius
            } else {
                -distance / radius
            };
            let center_to_end = rotate_about_z(start - center, sweep);
            let point = center + center_to_end;
            let lateral = if *ccw {
                -center_to_end / *radius
            } else {
                center_to_end / *radius
            };
            Ok((point, lateral))
        }
    }
}

/// Evaluates a point and lateral direction at `distance` along a chain of
/// horizontal segments, measured from the chain start.
pub fn point_and_tangent_along_chain(
    segments: &[HorizontalSegment],
    distance: f64,
    angle_unit: AngleUnit,
) -> Result<(Vector3<f64>, Vector3<f64>), SpandrelError> {
    if segments.is_empty() {
        return Err(SpandrelError::Range(
            "cannot evaluate an empty segment chain".to_owned(),
        ));
    }

    let mut remaining = distance;
    for segment in segments {
        if remaining <= segment.length() + DISTANCE_TOLERANCE {
            return point_and_tangent(segment, remaining, angle_unit);
        }
        remaining -= segment.length();
    }

    Err(SpandrelError::Range(format!(
        "distance {} exceeds total chain length {}",
        distance,
        segments.iter().map(|s| s.length()).sum::<f64>()
    )))
}

/// Looks up the elevation at `distance` along a chain of vertical segments.
///
/// The first segment's own start distance is subtracted from the query before
/// matching, so vertical chains that begin mid-alignment evaluate in their
/// own frame.
pub fn elevation_along(
    segments: &[VerticalSegment],
    distance: f64,
    angle_unit: AngleUnit,
) -> Result<f64, SpandrelError> {
    let first = segments.first().ok_or_else(|| {
        SpandrelError::Range("cannot evaluate an empty vertical chain".to_owned())
    })?;

    let local = distance - first.start_dist_along;
    for segment in segments {
        let segment_start = segment.start_dist_along - first.start_dist_along;
        if local <= segment_start + segment.horizontal_length + DISTANCE_TOLERANCE {
            let gradient = angle_unit.to_radians(segment.start_gradient);
            return Ok(segment.start_height + (local - segment_start) * gradient.sin());
        }
    }

    Err(SpandrelError::Range(format!(
        "distance {} is past the end of the vertical chain",
        distance
    )))
}

/// Resolves a placement into a single transform by composing it with every
/// ancestor frame, outermost first.
pub fn resolve_placement(placement: &Placement) -> Isometry3<f64> {
    let local = Isometry3::from_parts(Translation3::from(placement.origin), placement.rotation);
    match &placement.parent {
        Some(parent) => resolve_placement(parent) * local,
        None => local,
    }
}

/// Applies a resolved placement to a point.
pub fn transform_point(transform: &Isometry3<f64>, point: Vector3<f64>) -> Vector3<f64> {
    transform.transform_point(&Point3::from(point)).coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn line(length: f64) -> HorizontalSegment {
        HorizontalSegment::Line {
            start: Vector3::zeros(),
            direction: 0.0,
            length,
        }
    }

    #[test]
    fn line_midpoint_and_lateral() {
        let segment = line(100.0);
        let (point, lateral) =
            point_and_tangent(&segment, 50.0, AngleUnit::Radians).expect("within length");
        assert_relative_eq!(point, Vector3::new(50.0, 0.0, 0.0));
        assert_relative_eq!(lateral, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn line_rejects_distance_past_end() {
        let segment = line(100.0);
        let result = point_and_tangent(&segment, 100.1, AngleUnit::Radians);
        assert!(matches!(result, Err(SpandrelError::Range(_))));
    }

    #[test]
    fn line_accepts_distance_within_tolerance() {
        let segment = line(100.0);
        assert!(point_and_tangent(&segment, 100.0 + 0.5e-9, AngleUnit::Radians).is_ok());
    }

    #[test]
    fn ccw_arc_quarter_turn() {
        let segment = HorizontalSegment::Arc {
            start: Vector3::zeros(),
            direction: 0.0,
            length: PI,
            radius: 1.0,
            ccw: true,
        };
        let (point, lateral) =
            point_and_tangent(&segment, FRAC_PI_2, AngleUnit::Radians).expect("within length");
        assert_relative_eq!(point, Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(lateral, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn cw_arc_quarter_turn() {
        let segment = HorizontalSegment::Arc {
            start: Vector3::zeros(),
            direction: 0.0,
            length: PI,
            radius: 1.0,
            ccw: false,
        };
        let (point, lateral) =
            point_and_tangent(&segment, FRAC_PI_2, AngleUnit::Radians).expect("within length");
        assert_relative_eq!(point, Vector3::new(1.0, -1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(lateral, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn degree_headings_are_converted() {
        let segment = HorizontalSegment::Line {
            start: Vector3::zeros(),
            direction: 90.0,
            length: 10.0,
        };
        let (point, _) =
            point_and_tangent(&segment, 10.0, AngleUnit::Degrees).expect("within length");
        assert_relative_eq!(point, Vector3::new(0.0, 10.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn chain_evaluation_matches_local_segment() {
        let second = HorizontalSegment::Line {
            start: Vector3::new(30.0, 0.0, 0.0),
            direction: 0.0,
            length: 20.0,
        };
        let chain = vec![line(30.0), second.clone()];

        let (chained, _) =
            point_and_tangent_along_chain(&chain, 35.0, AngleUnit::Radians).expect("within chain");
        let (local, _) = point_and_tangent(&second, 5.0, AngleUnit::Radians).expect("within length");
        assert_relative_eq!(chained, local);
    }

    #[test]
    fn chain_rejects_empty_and_exhausted() {
        assert!(matches!(
            point_and_tangent_along_chain(&[], 0.0, AngleUnit::Radians),
            Err(SpandrelError::Range(_))
        ));
        assert!(matches!(
            point_and_tangent_along_chain(&[line(10.0)], 20.0, AngleUnit::Radians),
            Err(SpandrelError::Range(_))
        ));
    }

    #[test]
    fn elevation_subtracts_leading_start_distance() {
        let segments = vec![VerticalSegment {
            start_dist_along: 100.0,
            start_height: 5.0,
            horizontal_length: 50.0,
            start_gradient: 0.0,
        }];
        let height = elevation_along(&segments, 120.0, AngleUnit::Radians).expect("within chain");
        assert_relative_eq!(height, 5.0);
    }

    #[test]
    fn elevation_treats_gradient_as_angle() {
        let segments = vec![VerticalSegment {
            start_dist_along: 0.0,
            start_height: 0.0,
            horizontal_length: 100.0,
            start_gradient: FRAC_PI_2,
        }];
        let height = elevation_along(&segments, 10.0, AngleUnit::Radians).expect("within chain");
        assert_relative_eq!(height, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn elevation_walks_later_segments() {
        let segments = vec![
            VerticalSegment {
                start_dist_along: 0.0,
                start_height: 0.0,
                horizontal_length: 50.0,
                start_gradient: 0.0,
            },
            VerticalSegment {
                start_dist_along: 50.0,
                start_height: 2.0,
                horizontal_length: 50.0,
                start_gradient: 0.0,
            },
        ];
        let height = elevation_along(&segments, 75.0, AngleUnit::Radians).expect("within chain");
        assert_relative_eq!(height, 2.0);
    }

    #[test]
    fn placement_composition_applies_parent_first() {
        let parent = Placement::new(
            Vector3::new(10.0, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
        );
        let child = Placement::new(Vector3::new(1.0, 0.0, 0.0), UnitQuaternion::identity())
            .with_parent(parent);

        let transform = resolve_placement(&child);
        let moved = transform_point(&transform, Vector3::new(1.0, 0.0, 0.0));
        // parent rotates +90 degrees, so the child's +X offsets become +Y.
        assert_relative_eq!(moved, Vector3::new(10.0, 2.0, 0.0), epsilon = 1e-12);
    }
}
