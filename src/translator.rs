//! Geometry-to-FE translation pass.
//!
//! Consumes the source bridge model and produces the complete FE aggregate:
//! resolves node positions per directrix, synthesizes node coordinates on the
//! alignment, builds one cross-section per break interval, strings beam
//! elements between adjacent nodes, maps bearing pairs to support fixities,
//! and lumps bracing self-weight into nodal loads.

use std::collections::BTreeMap;

use indicatif::ProgressBar;
use nalgebra::Vector3;

use crate::datatypes::{ElementKind, FeModel, Material};
use crate::error::SpandrelError;
use crate::geometry::{
    elevation_along, point_and_tangent_along_chain, resolve_placement, transform_point,
};
use crate::model::{Bearing, BridgeModel, DirectrixId, MovementFlags};
use crate::reader::Settings;
use crate::resolver::{resolve_positions, MERGE_TOLERANCE};
use crate::sections::build_section;

/// Nodes synthesized on one directrix, as (local distance, node id) pairs in
/// ascending distance order.
type DirectrixNodes = Vec<(f64, usize)>;

/// Runs the full translation and returns the populated FE model.
pub fn translate(model: &BridgeModel, settings: &Settings) -> Result<FeModel, SpandrelError> {
    let parts = model.superstructure.girder_parts()?;
    println!("info: translating girder {}", parts.name);

    let positions = resolve_positions(model);
    if positions.is_empty() {
        println!("warning [translator]: model produced no node positions");
    }

    let mut fe = FeModel::new(settings.units.clone());
    let material_id = fe.add_material(Material {
        id: 1,
        name: model.material.name.clone(),
        kind: model.material.kind,
        elastic_modulus: model.material.elastic_modulus,
        poisson_ratio: model.material.poisson_ratio,
        thermal_coefficient: model.material.thermal_coefficient,
        mass_density: model.material.mass_density,
    });

    let transform = model.placement.as_ref().map(resolve_placement);

    let mut nodes_by_directrix: BTreeMap<DirectrixId, DirectrixNodes> = BTreeMap::new();
    let mut next_section_id = 1;

    for (directrix_id, table) in positions.iter() {
        let curve = model.directrix(directrix_id)?;
        println!(
            "info: directrix {} resolves to {} node positions",
            curve.name,
            table.len()
        );

        // Node synthesis: evaluate the alignment at each resolved distance
        // and offset the point into the member's own path.
        let mut nodes: DirectrixNodes = Vec::with_capacity(table.len());
        for entry in table.entries() {
            let absolute = curve.base_distance() + entry.distance;
            let (point, lateral) = point_and_tangent_along_chain(
                &model.alignment.horizontal,
                absolute,
                settings.angle_unit,
            )?;
            let elevation = if model.alignment.vertical.is_empty() {
                0.0
            } else {
                elevation_along(&model.alignment.vertical, absolute, settings.angle_unit)?
            };

            let vertical =
                elevation + curve.vertical_offset() + parts.profile.section_height;
            let mut position =
                point + curve.lateral_offset() * lateral + vertical * Vector3::z();
            if let Some(transform) = &transform {
                position = transform_point(transform, position);
            }

            let node_id = fe.add_node(position.x, position.y, position.z);
            nodes.push((entry.distance, node_id));
        }

        // One cross-section per break interval, sampled at the interval
        // midpoint.
        let breaks = table.breaks();
        let mut section_ids = Vec::new();
        for window in breaks.windows(2) {
            let midpoint = (window[0] + window[1]) / 2.0;
            let section = build_section(
                next_section_id,
                midpoint,
                parts.profile,
                &parts.plates,
                &parts.ribs,
            )?;
            section_ids.push(fe.add_section(section));
            next_section_id += 1;
        }

        // Beam elements between adjacent nodes, each referencing the section
        // of the break interval its own midpoint falls in.
        if nodes.len() > 1 {
            let bar = ProgressBar::new((nodes.len() - 1) as u64);
            for pair in nodes.windows(2) {
                let midpoint = (pair[0].0 + pair[1].0) / 2.0;
                let section = breaks
                    .windows(2)
                    .position(|w| w[0] <= midpoint && midpoint <= w[1])
                    .and_then(|idx| section_ids.get(idx).copied())
                    .ok_or_else(|| {
                        SpandrelError::DataShape(format!(
                            "no section interval covers element midpoint {}",
                            midpoint
                        ))
                    })?;
                fe.add_element(
                    ElementKind::Beam,
                    material_id,
                    section,
                    [pair[0].1, pair[1].1],
                    0.0,
                    0,
                )?;
                bar.inc(1);
            }
            bar.finish_and_clear();
        }

        nodes_by_directrix.insert(directrix_id, nodes);
    }
    println!(
        "info: synthesized {} nodes and {} elements",
        fe.nodes.len(),
        fe.elements.len()
    );

    map_bearings(&parts.bearings, &nodes_by_directrix, &mut fe)?;

    let case = fe.ensure_load_case(
        &settings.load_case_name,
        &settings.load_case_kind,
        &settings.load_case_description,
    );
    fe.set_self_weight(case, [0.0, 0.0, -1.0]);

    for bracing in &parts.bracings {
        let node = node_at(
            &nodes_by_directrix,
            bracing.directrix,
            bracing.distance_along,
        )
        .ok_or_else(|| {
            SpandrelError::DataShape(format!(
                "no node was synthesized at the bracing attachment {}",
                bracing.distance_along
            ))
        })?;
        let force = bracing.volume * model.material.mass_density * settings.gravity;
        fe.add_nodal_load(case, node, [0.0, 0.0, -force, 0.0, 0.0, 0.0]);
    }
    if !parts.bracings.is_empty() {
        println!(
            "info: lumped {} bracing placements into nodal loads",
            parts.bracings.len()
        );
    }

    Ok(fe)
}

/// Looks up the node synthesized at a local distance on a directrix.
fn node_at(
    nodes: &BTreeMap<DirectrixId, DirectrixNodes>,
    directrix: DirectrixId,
    distance: f64,
) -> Option<usize> {
    nodes.get(&directrix)?.iter().find_map(|(d, id)| {
        if (d - distance).abs() <= MERGE_TOLERANCE {
            Some(*id)
        } else {
            None
        }
    })
}

/// Combined support fixity of two bearings sharing one cross-section.
///
/// Order is Dx,Dy,Dz,Rx,Ry,Rz. A translation releases only when both
/// bearings accommodate the movement; the torsional rotation releases when
/// either one moves laterally. Vertical translation is always restrained and
/// bending about the lateral axis is always free.
fn bearing_fixity(a: &MovementFlags, b: &MovementFlags) -> [bool; 6] {
    [
        !(a.lateral && b.lateral),
        !(a.longitudinal && b.longitudinal),
        true,
        !(a.vertical || b.vertical),
        false,
        !(a.lateral || b.lateral),
    ]
}

/// Maps bearing pairs to support groups.
///
/// Bearings arrive as transverse pairs sharing one distance-along; each pair
/// collapses to one fixity vector on the node at that cross-section.
fn map_bearings(
    bearings: &[&Bearing],
    nodes: &BTreeMap<DirectrixId, DirectrixNodes>,
    fe: &mut FeModel,
) -> Result<(), SpandrelError> {
    let mut groups: Vec<(DirectrixId, f64, Vec<&Bearing>)> = Vec::new();
    for &bearing in bearings {
        match groups.iter_mut().find(|(directrix, distance, _)| {
            *directrix == bearing.directrix
                && (*distance - bearing.distance_along).abs() <= MERGE_TOLERANCE
        }) {
            Some((_, _, members)) => members.push(bearing),
            None => groups.push((bearing.directrix, bearing.distance_along, vec![bearing])),
        }
    }

    for (directrix, distance, members) in groups {
        if members.len() != 2 {
            return Err(SpandrelError::DataShape(format!(
                "expected a transverse bearing pair at distance {}, found {} bearing(s)",
                distance,
                members.len()
            )));
        }
        let movements: Vec<&MovementFlags> = members
            .iter()
            .map(|b| {
                b.movement.as_ref().ok_or_else(|| {
                    SpandrelError::DataShape(format!(
                        "bearing at distance {} carries no movement flags",
                        distance
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        let node = node_at(nodes, directrix, distance).ok_or_else(|| {
            SpandrelError::DataShape(format!(
                "no node was synthesized at the bearing distance {}",
                distance
            ))
        })?;
        fe.merge_support(node, bearing_fixity(movements[0], movements[1]));
    }

    if !fe.supports.is_empty() {
        println!("info: mapped bearings into {} support group(s)", fe.supports.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{MaterialKind, PlateKind};
    use crate::geometry::{HorizontalSegment, VerticalSegment};
    use crate::model::{
        Alignment, Assembly, Bracing, FlangeSide, GirderProfile, MaterialProperties, OffsetCurve,
        OffsetSample, Plate, ThicknessInterval, WebSide,
    };
    use approx::assert_relative_eq;

    fn flags(lateral: bool, longitudinal: bool, vertical: bool) -> MovementFlags {
        MovementFlags {
            lateral,
            longitudinal,
            vertical,
        }
    }

    #[test]
    fn fixed_pair_restrains_everything_but_bending() {
        let fixed = flags(false, false, false);
        assert_eq!(
            bearing_fixity(&fixed, &fixed),
            [true, true, true, true, false, true]
        );
    }

    #[test]
    fn movable_pair_releases_translations_and_torsion() {
        let movable = flags(true, true, false);
        assert_eq!(
            bearing_fixity(&movable, &movable),
            [false, false, true, true, false, false]
        );
    }

    #[test]
    fn mixed_pair_releases_torsion_but_not_translation() {
        let fixed = flags(false, false, false);
        let movable = flags(true, true, false);
        assert_eq!(
            bearing_fixity(&fixed, &movable),
            [true, true, true, true, false, false]
        );
    }

    #[test]
    fn vertical_movement_releases_torsional_restraint_axis() {
        let uplifting = flags(false, false, true);
        let fixed = flags(false, false, false);
        assert_eq!(
            bearing_fixity(&uplifting, &fixed),
            [true, true, true, false, false, true]
        );
    }

    fn plate(kind: PlateKind, steps: Vec<ThicknessInterval>) -> Assembly {
        Assembly::Plate(Plate {
            kind,
            directrix: DirectrixId(0),
            start: 0.0,
            end: 50_000.0,
            thickness_steps: steps,
        })
    }

    fn uniform(thickness: f64) -> Vec<ThicknessInterval> {
        vec![ThicknessInterval {
            end: 50_000.0,
            thickness,
        }]
    }

    fn bearing(distance: f64) -> Assembly {
        Assembly::Bearing(Bearing {
            directrix: DirectrixId(0),
            distance_along: distance,
            movement: Some(flags(true, true, false)),
        })
    }

    fn test_model() -> BridgeModel {
        let children = vec![
            Assembly::Flange {
                side: FlangeSide::Top,
                children: vec![plate(
                    PlateKind::TopFlange,
                    vec![
                        ThicknessInterval {
                            end: 25_000.0,
                            thickness: 14.0,
                        },
                        ThicknessInterval {
                            end: 50_000.0,
                            thickness: 20.0,
                        },
                    ],
                )],
            },
            Assembly::Flange {
                side: FlangeSide::Bottom,
                children: vec![plate(PlateKind::BottomFlange, uniform(16.0))],
            },
            Assembly::Web {
                side: WebSide::Left,
                children: vec![plate(PlateKind::LeftWeb, uniform(12.0))],
            },
            Assembly::Web {
                side: WebSide::Right,
                children: vec![plate(PlateKind::RightWeb, uniform(12.0))],
            },
            Assembly::Bracing(Bracing {
                directrix: DirectrixId(0),
                distance_along: 25_000.0,
                volume: 5.0e7,
            }),
            bearing(0.0),
            bearing(0.0),
        ];

        BridgeModel {
            alignment: Alignment {
                horizontal: vec![HorizontalSegment::Line {
                    start: Vector3::zeros(),
                    direction: 0.0,
                    length: 50_000.0,
                }],
                vertical: vec![VerticalSegment {
                    start_dist_along: 0.0,
                    start_height: 0.0,
                    horizontal_length: 50_000.0,
                    start_gradient: 0.0,
                }],
            },
            directrices: vec![OffsetCurve {
                name: "girder-axis".to_owned(),
                samples: [
                    OffsetSample {
                        distance_along: 0.0,
                        lateral: 0.0,
                        vertical: 0.0,
                    },
                    OffsetSample {
                        distance_along: 50_000.0,
                        lateral: 0.0,
                        vertical: 0.0,
                    },
                ],
            }],
            superstructure: Assembly::Girder {
                name: "G1".to_owned(),
                directrix: DirectrixId(0),
                profile: GirderProfile {
                    depth: 2000.0,
                    top_flange_width: 2400.0,
                    bottom_flange_width: 2000.0,
                    web_spacing: 1200.0,
                    section_height: 2000.0,
                },
                children,
            },
            material: MaterialProperties {
                name: "SM490".to_owned(),
                kind: MaterialKind::Steel,
                elastic_modulus: 2.05e5,
                poisson_ratio: 0.3,
                thermal_coefficient: 1.2e-5,
                mass_density: 7.85e-9,
            },
            placement: None,
        }
    }

    #[test]
    fn straight_girder_translates_end_to_end() {
        let model = test_model();
        let settings = Settings::default();
        let fe = translate(&model, &settings).expect("translation succeeds");

        // Breaks at 0, 25000 and 50000; bearings and bracing merge into them.
        assert_eq!(fe.nodes.len(), 3);
        assert_eq!(fe.elements.len(), 2);
        assert_eq!(fe.sections.len(), 2);

        assert_relative_eq!(fe.nodes[0].x, 0.0);
        assert_relative_eq!(fe.nodes[1].x, 25_000.0);
        assert_relative_eq!(fe.nodes[2].x, 50_000.0);
        // Elevation zero plus the 2000 section height.
        assert_relative_eq!(fe.nodes[0].z, 2000.0);

        // The two sections carry the thickness valid in their interval.
        assert_relative_eq!(fe.sections[0].dimensions[8], 14.0);
        assert_relative_eq!(fe.sections[1].dimensions[8], 20.0);
        assert_eq!(fe.elements[0].section, 1);
        assert_eq!(fe.elements[1].section, 2);

        // One movable bearing pair at distance 0.
        assert_eq!(fe.supports.len(), 1);
        assert_eq!(fe.supports[0].nodes, vec![1]);
        assert_eq!(fe.supports[0].signature(), "001100");

        // Self weight plus one lumped bracing load on the midspan node.
        let case = &fe.load_cases[0];
        assert_eq!(case.self_weight, Some([0.0, 0.0, -1.0]));
        assert_eq!(case.nodal_loads.len(), 1);
        assert_eq!(case.nodal_loads[0].nodes, vec![2]);
        let expected = 5.0e7 * 7.85e-9 * crate::reader::STANDARD_GRAVITY;
        assert_relative_eq!(case.nodal_loads[0].components[2], -expected, epsilon = 1e-9);
    }

    #[test]
    fn unpaired_bearing_is_rejected() {
        let mut model = test_model();
        if let Assembly::Girder { children, .. } = &mut model.superstructure {
            children.pop();
        }
        let result = translate(&model, &Settings::default());
        assert!(matches!(result, Err(SpandrelError::DataShape(_))));
    }

    #[test]
    fn bearing_without_movement_flags_is_rejected() {
        let mut model = test_model();
        if let Assembly::Girder { children, .. } = &mut model.superstructure {
            if let Some(Assembly::Bearing(bearing)) = children.last_mut() {
                bearing.movement = None;
            }
        }
        let result = translate(&model, &Settings::default());
        assert!(matches!(result, Err(SpandrelError::DataShape(_))));
    }
}
