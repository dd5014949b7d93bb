//! Output serialization.
//!
//! Renders the FE aggregate into the line-oriented, comma-separated text the
//! downstream analysis tool consumes positionally. Section order, field
//! order, and separators are a strict compatibility requirement; the whole
//! document is rendered in memory and written in one call so a failing run
//! never leaves a partial file behind.

use std::path::Path;

use crate::datatypes::{FeModel, Material, Section};
use crate::error::SpandrelError;

/// Group tag emitted on every support record.
const SUPPORT_GROUP: &str = "BEARINGS";

/// Renders the complete output document.
pub fn render(model: &FeModel) -> String {
    let mut out = String::new();

    out.push_str("*UNIT\n");
    out.push_str(&format!(
        "{},{},{},{}\n",
        model.units.force, model.units.length, model.units.energy, model.units.temperature
    ));

    out.push_str("*NODE\n");
    for node in &model.nodes {
        out.push_str(&format!("{},{},{},{}\n", node.id, node.x, node.y, node.z));
    }

    out.push_str("*ELEMENT\n");
    for element in &model.elements {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            element.id,
            element.kind.label(),
            element.material,
            element.section,
            element.nodes[0],
            element.nodes[1],
            element.angle,
            element.subtype
        ));
    }

    out.push_str("*MATERIAL\n");
    for material in &model.materials {
        render_material(&mut out, material);
    }

    out.push_str("*SECTION\n");
    for section in &model.sections {
        render_section(&mut out, section);
    }

    out.push_str("*SUPPORT\n");
    for support in &model.supports {
        out.push_str(&format!(
            "{},{},{}\n",
            join_ids(&support.nodes),
            support.signature(),
            SUPPORT_GROUP
        ));
    }

    for case in &model.load_cases {
        out.push_str("*LOADCASE\n");
        out.push_str(&format!("{},{},{}\n", case.name, case.kind, case.description));
        if let Some([x, y, z]) = case.self_weight {
            out.push_str("*SELFWEIGHT\n");
            out.push_str(&format!("{},{},{}\n", x, y, z));
        }
        if !case.nodal_loads.is_empty() {
            out.push_str("*CONLOAD\n");
            for load in &case.nodal_loads {
                let [fx, fy, fz, mx, my, mz] = load.components;
                out.push_str(&format!(
                    "{},{},{},{},{},{},{}\n",
                    join_ids(&load.nodes),
                    fx,
                    fy,
                    fz,
                    mx,
                    my,
                    mz
                ));
            }
        }
    }

    out.push_str("*ENDDATA\n");
    out
}

/// `id,kind,name,specificHeat,heatCoeff,,tempUnit,useMass,damping,<payload>`
/// where the payload is the isotropic-elastic parameter block.
fn render_material(out: &mut String, material: &Material) {
    out.push_str(&format!(
        "{},{},{},0,0,,C,YES,{},1,{},{},{},{},0\n",
        material.id,
        material.kind.label(),
        material.name,
        material.kind.damping_ratio(),
        material.elastic_modulus,
        material.poisson_ratio,
        material.thermal_coefficient,
        material.mass_density
    ));
}

/// Header line plus the indented multi-line payload: symmetry flag with the
/// 13 dimension fields, then the rib-type table, then the rib-layout table.
fn render_section(out: &mut String, section: &Section) {
    out.push_str(&format!(
        "{},SOD,{},CC,0,0,{}\n",
        section.id, section.name, section.shape
    ));

    out.push_str(&format!("  YES,{}\n", join_values(&section.dimensions)));

    out.push_str(&format!("  {}\n", section.stiffener_types.len()));
    for kind in &section.stiffener_types {
        out.push_str(&format!(
            "  {},{},{}\n",
            kind.name,
            kind.kind.label(),
            join_values(&kind.dimensions)
        ));
    }

    out.push_str(&format!("  {}\n", section.layouts.len()));
    for layout in &section.layouts {
        let mut fields = format!(
            "  {},{},{},{}",
            layout.plate.label(),
            layout.zone.label(),
            layout.reference,
            layout.ribs.len()
        );
        for rib in &layout.ribs {
            fields.push_str(&format!(
                ",{},{},{},{}",
                rib.gap,
                rib.type_name,
                rib.direction.label(),
                rib.name
            ));
        }
        fields.push('\n');
        out.push_str(&fields);
    }
}

fn join_ids(ids: &[usize]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<String>>()
        .join(",")
}

/// Writes the rendered document to `output_path` in a single call.
///
/// # Arguments
/// * `model` - The populated FE aggregate
/// * `output_path` - Destination file; its parent directory must exist
pub fn write_fe_model(model: &FeModel, output_path: &str) -> Result<(), SpandrelError> {
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(SpandrelError::Output(format!(
                "output directory {} does not exist",
                parent.display()
            )));
        }
    }

    let contents = render(model);
    std::fs::write(path, contents).map_err(|err| {
        SpandrelError::Output(format!("unable to write output file {}: {}", output_path, err))
    })?;

    println!(
        "info: wrote {} nodes, {} elements and {} sections to {}",
        model.nodes.len(),
        model.elements.len(),
        model.sections.len(),
        output_path
    );
    Ok(())
}
