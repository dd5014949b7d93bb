//! Target-side finite element entities and the aggregate they live in.
//!
//! Every collection on [`FeModel`] is add-if-absent by id or merged by
//! signature; entities are never mutated after insertion.

use crate::error::SpandrelError;

/// A resolved FE node. Ids are global, 1-based, assigned at insertion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Beam,
    Truss,
}

impl ElementKind {
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Beam => "BEAM",
            ElementKind::Truss => "TRUSS",
        }
    }
}

/// A two-node element referencing already-inserted entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: usize,
    pub kind: ElementKind,
    pub material: usize,
    pub section: usize,
    pub nodes: [usize; 2],
    pub angle: f64,
    pub subtype: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Steel,
    Concrete,
}

impl MaterialKind {
    pub fn label(self) -> &'static str {
        match self {
            MaterialKind::Steel => "STEEL",
            MaterialKind::Concrete => "CONC",
        }
    }

    /// Structural damping ratio conventionally assumed for the material.
    pub fn damping_ratio(self) -> f64 {
        match self {
            MaterialKind::Steel => 0.02,
            MaterialKind::Concrete => 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub id: usize,
    pub name: String,
    pub kind: MaterialKind,
    pub elastic_modulus: f64,
    pub poisson_ratio: f64,
    pub thermal_coefficient: f64,
    pub mass_density: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RibKind {
    Flat,
    Tee,
    U,
}

impl RibKind {
    pub fn label(self) -> &'static str {
        match self {
            RibKind::Flat => "flat",
            RibKind::Tee => "T",
            RibKind::U => "U",
        }
    }

    /// Number of entries expected in the dimension list for this kind.
    pub fn dimension_count(self) -> usize {
        match self {
            RibKind::Flat => 2,
            RibKind::Tee => 4,
            RibKind::U => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RibDirection {
    Up,
    Down,
    Left,
    Right,
}

impl RibDirection {
    pub fn label(self) -> &'static str {
        match self {
            RibDirection::Up => "UP",
            RibDirection::Down => "DOWN",
            RibDirection::Left => "LEFT",
            RibDirection::Right => "RIGHT",
        }
    }
}

/// Plate of a box girder a stiffener layout is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlateKind {
    TopFlange,
    BottomFlange,
    LeftWeb,
    RightWeb,
}

impl PlateKind {
    pub fn label(self) -> &'static str {
        match self {
            PlateKind::TopFlange => "top",
            PlateKind::BottomFlange => "bottom",
            PlateKind::LeftWeb => "leftWeb",
            PlateKind::RightWeb => "rightWeb",
        }
    }

    /// Short prefix used when auto-naming rib instances.
    pub fn prefix(self) -> &'static str {
        match self {
            PlateKind::TopFlange => "TF",
            PlateKind::BottomFlange => "BF",
            PlateKind::LeftWeb => "LW",
            PlateKind::RightWeb => "RW",
        }
    }

    pub fn is_flange(self) -> bool {
        matches!(self, PlateKind::TopFlange | PlateKind::BottomFlange)
    }
}

/// Lateral zone of a plate a stiffener layout covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StiffenerZone {
    Left,
    Center,
    Right,
    Web,
}

impl StiffenerZone {
    pub fn label(self) -> &'static str {
        match self {
            StiffenerZone::Left => "left",
            StiffenerZone::Center => "center",
            StiffenerZone::Right => "right",
            StiffenerZone::Web => "web",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            StiffenerZone::Left => "L",
            StiffenerZone::Center => "C",
            StiffenerZone::Right => "R",
            StiffenerZone::Web => "W",
        }
    }
}

/// A named rib cross-section shape shared by rib instances.
#[derive(Clone, Debug, PartialEq)]
pub struct StiffenerType {
    pub name: String,
    pub kind: RibKind,
    pub dimensions: Vec<f64>,
}

/// One rib instance inside a layout, located by its gap from the previous
/// reference point.
#[derive(Clone, Debug, PartialEq)]
pub struct RibPlacement {
    pub gap: f64,
    pub type_name: String,
    pub direction: RibDirection,
    pub name: String,
}

/// Ordered rib list for one plate/zone pair. Empty layouts are never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct StiffenerLayout {
    pub plate: PlateKind,
    pub zone: StiffenerZone,
    /// Coordinate of the zone boundary the first gap is measured from.
    pub reference: f64,
    pub ribs: Vec<RibPlacement>,
}

/// A complete cross-section: planform dimensions plus stiffening.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub id: usize,
    pub name: String,
    pub shape: String,
    pub dimensions: Vec<f64>,
    pub stiffener_types: Vec<StiffenerType>,
    pub layouts: Vec<StiffenerLayout>,
}

/// A support group: nodes sharing one six-flag fixity signature.
#[derive(Clone, Debug, PartialEq)]
pub struct Support {
    pub nodes: Vec<usize>,
    /// Restrained degrees of freedom, in Dx,Dy,Dz,Rx,Ry,Rz order.
    pub fixity: [bool; 6],
}

impl Support {
    /// Renders the fixity vector as the six-digit 0/1 output signature.
    pub fn signature(&self) -> String {
        self.fixity
            .iter()
            .map(|f| if *f { '1' } else { '0' })
            .collect()
    }
}

/// Nodal loads sharing one force/moment signature.
#[derive(Clone, Debug, PartialEq)]
pub struct NodalLoad {
    pub nodes: Vec<usize>,
    /// Fx,Fy,Fz,Mx,My,Mz.
    pub components: [f64; 6],
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadCase {
    pub name: String,
    pub kind: String,
    pub description: String,
    pub self_weight: Option<[f64; 3]>,
    pub nodal_loads: Vec<NodalLoad>,
}

/// Output unit-system header values.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSystem {
    pub force: String,
    pub length: String,
    pub energy: String,
    pub temperature: String,
}

impl Default for UnitSystem {
    fn default() -> UnitSystem {
        UnitSystem {
            force: "N".to_owned(),
            length: "MM".to_owned(),
            energy: "KJ".to_owned(),
            temperature: "C".to_owned(),
        }
    }
}

/// The in-memory FE aggregate owned by one translation run.
#[derive(Clone, Debug, Default)]
pub struct FeModel {
    pub units: UnitSystem,
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
    pub materials: Vec<Material>,
    pub sections: Vec<Section>,
    pub supports: Vec<Support>,
    pub load_cases: Vec<LoadCase>,
}

impl FeModel {
    pub fn new(units: UnitSystem) -> FeModel {
        FeModel {
            units,
            ..FeModel::default()
        }
    }

    /// Inserts a node and returns its fresh global id.
    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> usize {
        let id = self.nodes.len() + 1;
        self.nodes.push(Node { id, x, y, z });
        id
    }

    /// Inserts an element after checking that every referenced entity has
    /// already been inserted.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        material: usize,
        section: usize,
        nodes: [usize; 2],
        angle: f64,
        subtype: usize,
    ) -> Result<usize, SpandrelError> {
        for node in nodes {
            if node == 0 || node > self.nodes.len() {
                return Err(SpandrelError::DataShape(format!(
                    "element references unknown node {}",
                    node
                )));
            }
        }
        if !self.materials.iter().any(|m| m.id == material) {
            return Err(SpandrelError::DataShape(format!(
                "element references unknown material {}",
                material
            )));
        }
        if !self.sections.iter().any(|s| s.id == section) {
            return Err(SpandrelError::DataShape(format!(
                "element references unknown section {}",
                section
            )));
        }

        let id = self.elements.len() + 1;
        self.elements.push(Element {
            id,
            kind,
            material,
            section,
            nodes,
            angle,
            subtype,
        });
        Ok(id)
    }

    /// Inserts a material unless its id is already present.
    pub fn add_material(&mut self, material: Material) -> usize {
        let id = material.id;
        if !self.materials.iter().any(|m| m.id == id) {
            self.materials.push(material);
        }
        id
    }

    /// Inserts a section unless its id is already present.
    pub fn add_section(&mut self, section: Section) -> usize {
        let id = section.id;
        if !self.sections.iter().any(|s| s.id == id) {
            self.sections.push(section);
        }
        id
    }

    /// Adds a node to the support group with a matching fixity signature,
    /// creating the group if none exists yet.
    pub fn merge_support(&mut self, node: usize, fixity: [bool; 6]) {
        if let Some(group) = self.supports.iter_mut().find(|s| s.fixity == fixity) {
            if !group.nodes.contains(&node) {
                group.nodes.push(node);
                group.nodes.sort_unstable();
            }
            return;
        }
        self.supports.push(Support {
            nodes: vec![node],
            fixity,
        });
    }

    /// Returns the index of the named load case, creating it if absent.
    pub fn ensure_load_case(&mut self, name: &str, kind: &str, description: &str) -> usize {
        if let Some(idx) = self.load_cases.iter().position(|c| c.name == name) {
            return idx;
        }
        self.load_cases.push(LoadCase {
            name: name.to_owned(),
            kind: kind.to_owned(),
            description: description.to_owned(),
            self_weight: None,
            nodal_loads: Vec::new(),
        });
        self.load_cases.len() - 1
    }

    /// Sets the self-weight vector on a load case. The first writer wins;
    /// self-weight is added once per run.
    pub fn set_self_weight(&mut self, case: usize, vector: [f64; 3]) {
        if let Some(load_case) = self.load_cases.get_mut(case) {
            if load_case.self_weight.is_none() {
                load_case.self_weight = Some(vector);
            }
        }
    }

    /// Adds a nodal load, merging into the row with an identical
    /// force/moment signature when one exists.
    pub fn add_nodal_load(&mut self, case: usize, node: usize, components: [f64; 6]) {
        if let Some(load_case) = self.load_cases.get_mut(case) {
            if let Some(row) = load_case
                .nodal_loads
                .iter_mut()
                .find(|l| l.components == components)
            {
                if !row.nodes.contains(&node) {
                    row.nodes.push(node);
                    row.nodes.sort_unstable();
                }
                return;
            }
            load_case.nodal_loads.push(NodalLoad {
                nodes: vec![node],
                components,
            });
        }
    }
}
