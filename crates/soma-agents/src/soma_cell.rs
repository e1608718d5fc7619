//! SomaCell — a cell record together with the behaviors it runs.

use crate::behavior::Behavior;
use serde::{Deserialize, Serialize};
use soma_core::field::FieldAccessor;
use soma_core::types::*;

/// A cell that secretes and moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SomaCell {
    cell: Cell,
    behaviors: Vec<Behavior>,
}

impl SomaCell {
    /// A cell with no behaviors attached.
    pub fn new(position: Position, cell_type: CellType, diameter: f64) -> Self {
        Self {
            cell: Cell::new(position, cell_type, diameter),
            behaviors: Vec::new(),
        }
    }

    /// A cell running secretion then chemotaxis with reference parameters.
    pub fn with_reference_behaviors(
        position: Position,
        cell_type: CellType,
        diameter: f64,
    ) -> Self {
        Self::new(position, cell_type, diameter).with_behaviors(Behavior::reference_set())
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn with_behaviors(mut self, behaviors: impl IntoIterator<Item = Behavior>) -> Self {
        self.behaviors.extend(behaviors);
        self
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut Cell {
        &mut self.cell
    }

    pub fn position(&self) -> Position {
        self.cell.position
    }

    pub fn cell_type(&self) -> CellType {
        self.cell.cell_type
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Run every behavior once, in attachment order.
    pub fn tick(&mut self, fields: &dyn FieldAccessor) {
        for behavior in &self.behaviors {
            behavior.run(&mut self.cell, fields);
        }
    }

    /// Substance names this cell's behaviors rely on.
    pub fn required_substances(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .behaviors
            .iter()
            .flat_map(|b| b.substances(self.cell.cell_type))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// A new cell of the same type and diameter at `position`, inheriting
    /// every behavior marked as copied.
    pub fn daughter(&self, position: Position) -> SomaCell {
        SomaCell {
            cell: Cell::new(position, self.cell.cell_type, self.cell.diameter),
            behaviors: self.behaviors.iter().copied().filter(Behavior::is_copied).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Chemotaxis, Secretion};
    use soma_core::field::{SUBSTANCE_0, SUBSTANCE_1};

    #[test]
    fn reference_cell_has_two_behaviors() {
        let c = SomaCell::with_reference_behaviors(Position::default(), CellType::POSITIVE, 10.0);
        assert_eq!(c.behaviors().len(), 2);
        assert_eq!(c.cell().diameter, 10.0);
    }

    #[test]
    fn required_substances_are_deduplicated() {
        let c = SomaCell::with_reference_behaviors(Position::default(), CellType::NEGATIVE, 10.0);
        assert_eq!(c.required_substances(), vec![SUBSTANCE_0, SUBSTANCE_1]);

        let only_secretes = SomaCell::new(Position::default(), CellType::POSITIVE, 10.0)
            .with_behavior(Behavior::Secretion(Secretion::default()));
        assert_eq!(only_secretes.required_substances(), vec![SUBSTANCE_1]);
    }

    #[test]
    fn daughter_inherits_behaviors_unchanged() {
        let parent = SomaCell::new(Position::new(1.0, 1.0, 1.0), CellType::NEGATIVE, 8.0)
            .with_behavior(Behavior::Secretion(Secretion::with_amount(2.5).unwrap()))
            .with_behavior(Behavior::Chemotaxis(Chemotaxis::with_weight(3.0).unwrap()));

        let child = parent.daughter(Position::new(2.0, 2.0, 2.0));
        assert_eq!(child.behaviors(), parent.behaviors());
        assert_eq!(child.cell_type(), CellType::NEGATIVE);
        assert_eq!(child.cell().diameter, 8.0);
        assert_eq!(child.position(), Position::new(2.0, 2.0, 2.0));
    }
}
