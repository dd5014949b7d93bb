//! Position resolution over the assembly tree.
//!
//! Walks the superstructure depth-first and records, per directrix, every
//! distance-along at which the discretized model needs a node. Plate ends and
//! thickness steps force section breaks; bearing and bracing attachments only
//! force a node.

use std::collections::BTreeMap;

use crate::model::{Assembly, BridgeModel, DirectrixId};

/// Distances closer than this merge into one position.
pub const MERGE_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionEntry {
    pub distance: f64,
    pub is_section_break: bool,
}

/// Ascending, deduplicated position list for one directrix.
///
/// Duplicate inserts OR their break flags: a position once marked as a
/// section break stays a break regardless of later non-break visits.
#[derive(Clone, Debug, Default)]
pub struct PositionTable {
    entries: Vec<PositionEntry>,
}

impl PositionTable {
    pub fn insert(&mut self, distance: f64, is_section_break: bool) {
        let idx = self
            .entries
            .binary_search_by(|e| e.distance.total_cmp(&distance));
        match idx {
            Ok(i) => self.entries[i].is_section_break |= is_section_break,
            Err(i) => {
                if i > 0 && (distance - self.entries[i - 1].distance).abs() <= MERGE_TOLERANCE {
                    self.entries[i - 1].is_section_break |= is_section_break;
                } else if i < self.entries.len()
                    && (self.entries[i].distance - distance).abs() <= MERGE_TOLERANCE
                {
                    self.entries[i].is_section_break |= is_section_break;
                } else {
                    self.entries.insert(
                        i,
                        PositionEntry {
                            distance,
                            is_section_break,
                        },
                    );
                }
            }
        }
    }

    pub fn entries(&self) -> &[PositionEntry] {
        &self.entries
    }

    /// Distances marked as section breaks, ascending.
    pub fn breaks(&self) -> Vec<f64> {
        self.entries
            .iter()
            .filter(|e| e.is_section_break)
            .map(|e| e.distance)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Position tables keyed by directrix, in stable arena order.
#[derive(Clone, Debug, Default)]
pub struct PositionMap {
    tables: BTreeMap<DirectrixId, PositionTable>,
}

impl PositionMap {
    pub fn table_mut(&mut self, id: DirectrixId) -> &mut PositionTable {
        self.tables.entry(id).or_default()
    }

    pub fn get(&self, id: DirectrixId) -> Option<&PositionTable> {
        self.tables.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DirectrixId, &PositionTable)> {
        self.tables.iter().map(|(id, table)| (*id, table))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Resolves every node position the superstructure implies.
pub fn resolve_positions(model: &BridgeModel) -> PositionMap {
    let mut map = PositionMap::default();
    visit(&model.superstructure, &mut map);
    map
}

fn visit(assembly: &Assembly, map: &mut PositionMap) {
    match assembly {
        Assembly::Girder { children, .. }
        | Assembly::Flange { children, .. }
        | Assembly::Web { children, .. } => {
            for child in children {
                visit(child, map);
            }
        }
        // Ribs run continuously; they never subdivide elements.
        Assembly::StiffenerGroup { .. } => {}
        Assembly::Plate(plate) => {
            let table = map.table_mut(plate.directrix);
            table.insert(plate.start, true);
            table.insert(plate.end, true);
            // A thickness change forces a new cross-section as well.
            for step in &plate.thickness_steps {
                table.insert(step.end, true);
            }
        }
        Assembly::Bracing(bracing) => {
            map.table_mut(bracing.directrix)
                .insert(bracing.distance_along, false);
        }
        Assembly::Bearing(bearing) => {
            map.table_mut(bearing.directrix)
                .insert(bearing.distance_along, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_merge_with_or_semantics() {
        let mut table = PositionTable::default();
        table.insert(100.0, true);
        table.insert(50.0, false);
        table.insert(100.0, false);
        table.insert(75.0, false);

        let distances: Vec<f64> = table.entries().iter().map(|e| e.distance).collect();
        assert_eq!(distances, vec![50.0, 75.0, 100.0]);

        let flags: Vec<bool> = table.entries().iter().map(|e| e.is_section_break).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn break_flag_survives_insertion_order() {
        let mut table = PositionTable::default();
        table.insert(25.0, false);
        table.insert(25.0, true);
        assert!(table.entries()[0].is_section_break);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn near_coincident_distances_merge() {
        let mut table = PositionTable::default();
        table.insert(10.0, false);
        table.insert(10.0 + MERGE_TOLERANCE / 2.0, true);
        assert_eq!(table.len(), 1);
        assert!(table.entries()[0].is_section_break);
    }

    #[test]
    fn breaks_filter_non_break_entries() {
        let mut table = PositionTable::default();
        table.insert(0.0, true);
        table.insert(12.5, false);
        table.insert(50.0, true);
        assert_eq!(table.breaks(), vec![0.0, 50.0]);
    }
}
