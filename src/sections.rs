//! Cross-section synthesis.
//!
//! For each break interval the translator samples the interval midpoint,
//! interpolates the plate thicknesses valid there, reconstructs the per-zone
//! stiffener layouts from the rib solids, and combines everything with the
//! girder's length-invariant planform dimensions into one Section entity.

use crate::datatypes::{
    PlateKind, RibPlacement, Section, StiffenerLayout, StiffenerType, StiffenerZone,
};
use crate::error::SpandrelError;
use crate::model::{GirderProfile, Plate, Rib};
use crate::resolver::MERGE_TOLERANCE;

/// Shape tag emitted for the stiffened box sections this translator builds.
pub const BOX_SHAPE: &str = "SOD-B";

/// Thickness of a plate at a local distance-along.
///
/// Scans the plate's ordered thickness-valid-intervals and returns the first
/// whose end covers the query. When no interval covers it the last known
/// thickness is used, since partially-authored plates are common near girder
/// ends.
pub fn thickness_at(plate: &Plate, distance: f64) -> Result<f64, SpandrelError> {
    for step in &plate.thickness_steps {
        if step.end >= distance {
            return Ok(step.thickness);
        }
    }
    match plate.thickness_steps.last() {
        Some(step) => {
            println!(
                "warning [sections]: no thickness interval of the {} plate covers distance {}; keeping {}",
                plate.kind.label(),
                distance,
                step.thickness
            );
            Ok(step.thickness)
        }
        None => Err(SpandrelError::DataShape(format!(
            "{} plate carries no thickness intervals",
            plate.kind.label()
        ))),
    }
}

/// Dimensions of a rib at a local distance-along: the last step-table
/// breakpoint at or before the query wins.
pub fn rib_dimensions(rib: &Rib, distance: f64) -> Result<Vec<f64>, SpandrelError> {
    let mut current = None;
    for step in &rib.steps {
        if step.breakpoint <= distance + MERGE_TOLERANCE {
            current = Some(step);
        } else {
            break;
        }
    }
    let step = current.ok_or_else(|| {
        SpandrelError::DataShape(format!(
            "{} rib has no dimension step at or before distance {}",
            rib.kind.label(),
            distance
        ))
    })?;

    if step.values.len() != rib.kind.dimension_count() {
        return Err(SpandrelError::DataShape(format!(
            "{} rib dimension step at {} has {} values, expected {}",
            rib.kind.label(),
            step.breakpoint,
            step.values.len(),
            rib.kind.dimension_count()
        )));
    }
    Ok(step.values.clone())
}

/// Picks the plate of `kind` whose span covers `distance`, falling back to
/// the furthest-reaching plate of that kind.
fn plate_for<'a>(
    plates: &[&'a Plate],
    kind: PlateKind,
    distance: f64,
) -> Result<&'a Plate, SpandrelError> {
    if let Some(plate) = plates.iter().copied().find(|p| {
        p.kind == kind && p.start - MERGE_TOLERANCE <= distance && distance <= p.end + MERGE_TOLERANCE
    }) {
        return Ok(plate);
    }

    let fallback = plates
        .iter()
        .copied()
        .filter(|p| p.kind == kind)
        .max_by(|a, b| a.end.total_cmp(&b.end));
    match fallback {
        Some(plate) => {
            println!(
                "warning [sections]: no {} plate covers distance {}; using the plate ending at {}",
                kind.label(),
                distance,
                plate.end
            );
            Ok(plate)
        }
        None => Err(SpandrelError::DataShape(format!(
            "girder has no {} plate",
            kind.label()
        ))),
    }
}

/// The zones of a plate, with their bucketing bounds and the reference point
/// the first gap is measured from.
fn zones_of(kind: PlateKind, profile: &GirderProfile) -> Vec<(StiffenerZone, f64)> {
    if kind.is_flange() {
        let width = match kind {
            PlateKind::TopFlange => profile.top_flange_width,
            _ => profile.bottom_flange_width,
        };
        let half_spacing = profile.web_spacing / 2.0;
        vec![
            (StiffenerZone::Left, -half_spacing),
            (StiffenerZone::Center, half_spacing),
            (StiffenerZone::Right, width / 2.0),
        ]
    } else {
        vec![(StiffenerZone::Web, 0.0)]
    }
}

/// Whether a rib position belongs to a zone of a flange plate. Zone splits
/// sit at plus/minus half the inner web spacing from the plate center.
fn in_flange_zone(zone: StiffenerZone, half_spacing: f64, position: f64) -> bool {
    match zone {
        StiffenerZone::Left => position < -half_spacing,
        StiffenerZone::Center => (-half_spacing..=half_spacing).contains(&position),
        StiffenerZone::Right => position > half_spacing,
        StiffenerZone::Web => false,
    }
}

/// Finds or registers the stiffener type matching a rib's kind and resolved
/// dimensions, returning its name.
fn intern_stiffener_type(
    types: &mut Vec<StiffenerType>,
    rib: &Rib,
    dimensions: Vec<f64>,
) -> String {
    if let Some(existing) = types
        .iter()
        .find(|t| t.kind == rib.kind && t.dimensions == dimensions)
    {
        return existing.name.clone();
    }

    let ordinal = types.iter().filter(|t| t.kind == rib.kind).count() + 1;
    let name = format!("{}{}", rib.kind.label().to_uppercase(), ordinal);
    types.push(StiffenerType {
        name: name.clone(),
        kind: rib.kind,
        dimensions,
    });
    name
}

/// Reconstructs the per-zone rib lists valid at `distance`.
///
/// Within a zone ribs are ordered by descending position and located by the
/// gap from the previous reference point, starting at the zone's upper
/// boundary. Zones with no rib solids produce no layout entity.
pub fn build_layouts(
    profile: &GirderProfile,
    ribs: &[(PlateKind, &Rib)],
    distance: f64,
) -> Result<(Vec<StiffenerType>, Vec<StiffenerLayout>), SpandrelError> {
    let mut types: Vec<StiffenerType> = Vec::new();
    let mut layouts: Vec<StiffenerLayout> = Vec::new();

    let plate_order = [
        PlateKind::TopFlange,
        PlateKind::BottomFlange,
        PlateKind::LeftWeb,
        PlateKind::RightWeb,
    ];
    let half_spacing = profile.web_spacing / 2.0;

    for plate in plate_order {
        for (zone, reference) in zones_of(plate, profile) {
            let mut bucket: Vec<(f64, &Rib)> = Vec::new();
            for &(rib_plate, rib) in ribs {
                if rib_plate != plate {
                    continue;
                }
                for solid in &rib.solids {
                    if solid.start - MERGE_TOLERANCE > distance
                        || distance > solid.end + MERGE_TOLERANCE
                    {
                        continue;
                    }
                    let position = if plate.is_flange() {
                        solid.lateral
                    } else {
                        solid.vertical
                    };
                    if plate.is_flange() && !in_flange_zone(zone, half_spacing, position) {
                        continue;
                    }
                    bucket.push((position, rib));
                }
            }

            if bucket.is_empty() {
                continue;
            }
            bucket.sort_by(|a, b| b.0.total_cmp(&a.0));

            let mut ref_point = reference;
            let mut placements = Vec::with_capacity(bucket.len());
            for (ordinal, &(position, rib)) in bucket.iter().enumerate() {
                let dimensions = rib_dimensions(rib, distance)?;
                let type_name = intern_stiffener_type(&mut types, rib, dimensions);
                let name = match &rib.name {
                    Some(name) => name.clone(),
                    None => format!("{}-{}{}", plate.prefix(), zone.prefix(), ordinal + 1),
                };
                placements.push(RibPlacement {
                    gap: ref_point - position,
                    type_name,
                    direction: rib.direction,
                    name,
                });
                ref_point = position;
            }

            layouts.push(StiffenerLayout {
                plate,
                zone,
                reference,
                ribs: placements,
            });
        }
    }

    Ok((types, layouts))
}

/// Synthesizes the complete Section entity valid around `distance`.
///
/// The dimension vector has 13 entries: top flange width, top overhangs
/// (left, right) around the web spacing, bottom flange width and overhangs,
/// overall depth, then the four interpolated plate thicknesses (top, bottom,
/// left web, right web) and the web inclination (zero for vertical webs).
pub fn build_section(
    id: usize,
    distance: f64,
    profile: &GirderProfile,
    plates: &[&Plate],
    ribs: &[(PlateKind, &Rib)],
) -> Result<Section, SpandrelError> {
    let t_top = thickness_at(plate_for(plates, PlateKind::TopFlange, distance)?, distance)?;
    let t_bottom = thickness_at(
        plate_for(plates, PlateKind::BottomFlange, distance)?,
        distance,
    )?;
    let t_left = thickness_at(plate_for(plates, PlateKind::LeftWeb, distance)?, distance)?;
    let t_right = thickness_at(plate_for(plates, PlateKind::RightWeb, distance)?, distance)?;

    let spacing = profile.web_spacing;
    let top_overhang = (profile.top_flange_width - spacing) / 2.0;
    let bottom_overhang = (profile.bottom_flange_width - spacing) / 2.0;
    let dimensions = vec![
        profile.top_flange_width,
        top_overhang,
        spacing,
        top_overhang,
        profile.bottom_flange_width,
        bottom_overhang,
        bottom_overhang,
        profile.depth,
        t_top,
        t_bottom,
        t_left,
        t_right,
        0.0,
    ];

    let (stiffener_types, layouts) = build_layouts(profile, ribs, distance)?;

    Ok(Section {
        id,
        name: format!("SEC{}", id),
        shape: BOX_SHAPE.to_owned(),
        dimensions,
        stiffener_types,
        layouts,
    })
}
