//! Source-side geometric bridge model.
//!
//! This is the read-only graph the translator consumes: the alignment curve,
//! the offset-curve arena the members run along, and the typed assembly tree
//! the authoring tool exports. Assembly roles are tagged enum variants so the
//! traversal dispatches on structure instead of runtime type checks.

use crate::datatypes::{MaterialKind, PlateKind, RibDirection, RibKind};
use crate::error::SpandrelError;
use crate::geometry::{HorizontalSegment, Placement, VerticalSegment};

/// Stable index of an offset curve in the model's directrix arena. Assigned
/// at model-load time and used as the position-table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirectrixId(pub usize);

/// The design alignment: ordered horizontal segments plus ordered vertical
/// segments.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub horizontal: Vec<HorizontalSegment>,
    pub vertical: Vec<VerticalSegment>,
}

impl Alignment {
    pub fn horizontal_length(&self) -> f64 {
        self.horizontal.iter().map(|s| s.length()).sum()
    }
}

/// One offset sample: a distance-along paired with lateral/vertical offsets
/// from the basis alignment.
#[derive(Clone, Copy, Debug)]
pub struct OffsetSample {
    pub distance_along: f64,
    pub lateral: f64,
    pub vertical: f64,
}

/// A member path at constant offset from the alignment. Exactly two samples;
/// the offset is assumed constant between them.
#[derive(Clone, Debug)]
pub struct OffsetCurve {
    pub name: String,
    pub samples: [OffsetSample; 2],
}

impl OffsetCurve {
    /// Alignment distance the curve's local distances are measured from.
    pub fn base_distance(&self) -> f64 {
        self.samples[0].distance_along
    }

    pub fn lateral_offset(&self) -> f64 {
        self.samples[0].lateral
    }

    pub fn vertical_offset(&self) -> f64 {
        self.samples[0].vertical
    }

    pub fn length(&self) -> f64 {
        self.samples[1].distance_along - self.samples[0].distance_along
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlangeSide {
    Top,
    Bottom,
}

impl FlangeSide {
    pub fn plate_kind(self) -> PlateKind {
        match self {
            FlangeSide::Top => PlateKind::TopFlange,
            FlangeSide::Bottom => PlateKind::BottomFlange,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WebSide {
    Left,
    Right,
}

impl WebSide {
    pub fn plate_kind(self) -> PlateKind {
        match self {
            WebSide::Left => PlateKind::LeftWeb,
            WebSide::Right => PlateKind::RightWeb,
        }
    }
}

/// One thickness-valid-interval of a plate, ordered by `end`.
#[derive(Clone, Copy, Debug)]
pub struct ThicknessInterval {
    /// Local distance-along up to which `thickness` is valid.
    pub end: f64,
    pub thickness: f64,
}

/// A swept plate member: a sectioned solid along a directrix.
#[derive(Clone, Debug)]
pub struct Plate {
    pub kind: PlateKind,
    pub directrix: DirectrixId,
    /// Local distance-along of the first cross-section position.
    pub start: f64,
    /// Local distance-along of the second cross-section position.
    pub end: f64,
    pub thickness_steps: Vec<ThicknessInterval>,
}

/// One breakpoint of a rib's dimension step table. The last breakpoint at or
/// before a query distance wins.
#[derive(Clone, Debug)]
pub struct DimensionStep {
    pub breakpoint: f64,
    pub values: Vec<f64>,
}

/// One physical rib solid: where it sits on its plate and over which span it
/// is valid.
#[derive(Clone, Copy, Debug)]
pub struct RibSolid {
    /// Lateral offset from the plate center (flanges).
    pub lateral: f64,
    /// Vertical offset from the plate top (webs), negative downward.
    pub vertical: f64,
    pub start: f64,
    pub end: f64,
}

/// A stiffening-rib member: one shape repeated as several solids.
#[derive(Clone, Debug)]
pub struct Rib {
    pub kind: RibKind,
    pub name: Option<String>,
    pub direction: RibDirection,
    pub steps: Vec<DimensionStep>,
    pub solids: Vec<RibSolid>,
}

/// A cross-bracing placement, lumped into a nodal load at its attachment
/// distance.
#[derive(Clone, Debug)]
pub struct Bracing {
    pub directrix: DirectrixId,
    pub distance_along: f64,
    /// Member volume used for the lumped self-weight approximation.
    pub volume: f64,
}

/// Movement-accommodation flags of one bearing ("POT") point entity.
#[derive(Clone, Copy, Debug)]
pub struct MovementFlags {
    pub lateral: bool,
    pub longitudinal: bool,
    pub vertical: bool,
}

/// A bearing point entity. `movement` is `None` when the source entity lacks
/// the expected property set; the constraint mapper rejects such bearings.
#[derive(Clone, Debug)]
pub struct Bearing {
    pub directrix: DirectrixId,
    pub distance_along: f64,
    pub movement: Option<MovementFlags>,
}

/// Length-invariant planform dimensions of the girder.
#[derive(Clone, Debug)]
pub struct GirderProfile {
    pub depth: f64,
    pub top_flange_width: f64,
    pub bottom_flange_width: f64,
    /// Clear spacing between the two webs; also the flange center-zone width.
    pub web_spacing: f64,
    /// Constant height added to every synthesized node elevation.
    pub section_height: f64,
}

/// Typed assembly tree node. The translator visits this depth-first,
/// dispatching on the variant instead of inspecting runtime roles.
#[derive(Clone, Debug)]
pub enum Assembly {
    Girder {
        name: String,
        directrix: DirectrixId,
        profile: GirderProfile,
        children: Vec<Assembly>,
    },
    Flange {
        side: FlangeSide,
        children: Vec<Assembly>,
    },
    Web {
        side: WebSide,
        children: Vec<Assembly>,
    },
    StiffenerGroup {
        plate: PlateKind,
        ribs: Vec<Rib>,
    },
    Plate(Plate),
    Bracing(Bracing),
    Bearing(Bearing),
}

/// Flat view over one girder subtree, grouped by member role.
#[derive(Debug)]
pub struct GirderParts<'a> {
    pub name: &'a str,
    pub directrix: DirectrixId,
    pub profile: &'a GirderProfile,
    pub plates: Vec<&'a Plate>,
    pub ribs: Vec<(PlateKind, &'a Rib)>,
    pub bracings: Vec<&'a Bracing>,
    pub bearings: Vec<&'a Bearing>,
}

impl Assembly {
    /// Collects the girder's members into role groups. Fails when the root
    /// of the superstructure is not a girder assembly.
    pub fn girder_parts(&self) -> Result<GirderParts<'_>, SpandrelError> {
        let Assembly::Girder {
            name,
            directrix,
            profile,
            children,
        } = self
        else {
            return Err(SpandrelError::DataShape(
                "superstructure root is not a girder assembly".to_owned(),
            ));
        };

        let mut parts = GirderParts {
            name,
            directrix: *directrix,
            profile,
            plates: Vec::new(),
            ribs: Vec::new(),
            bracings: Vec::new(),
            bearings: Vec::new(),
        };
        for child in children {
            collect_parts(child, &mut parts);
        }
        Ok(parts)
    }
}

fn collect_parts<'a>(assembly: &'a Assembly, parts: &mut GirderParts<'a>) {
    match assembly {
        Assembly::Girder { children, .. }
        | Assembly::Flange { children, .. }
        | Assembly::Web { children, .. } => {
            for child in children {
                collect_parts(child, parts);
            }
        }
        Assembly::StiffenerGroup { plate, ribs } => {
            for rib in ribs {
                parts.ribs.push((*plate, rib));
            }
        }
        Assembly::Plate(plate) => parts.plates.push(plate),
        Assembly::Bracing(bracing) => parts.bracings.push(bracing),
        Assembly::Bearing(bearing) => parts.bearings.push(bearing),
    }
}

/// A material entity with its named numeric properties.
#[derive(Clone, Debug)]
pub struct MaterialProperties {
    pub name: String,
    pub kind: MaterialKind,
    pub elastic_modulus: f64,
    pub poisson_ratio: f64,
    pub thermal_coefficient: f64,
    pub mass_density: f64,
}

/// The complete source model for one translation run.
#[derive(Clone, Debug)]
pub struct BridgeModel {
    pub alignment: Alignment,
    /// Directrix arena; [`DirectrixId`] values index into this.
    pub directrices: Vec<OffsetCurve>,
    pub superstructure: Assembly,
    pub material: MaterialProperties,
    /// Optional global placement of the whole model.
    pub placement: Option<Placement>,
}

impl BridgeModel {
    pub fn directrix(&self, id: DirectrixId) -> Result<&OffsetCurve, SpandrelError> {
        self.directrices.get(id.0).ok_or_else(|| {
            SpandrelError::DataShape(format!("unknown directrix index {}", id.0))
        })
    }
}
