//! Behaviors — the per-step rules a cell runs.
//!
//! A cell senses substances through the field accessor and changes the
//! world in two ways only: it secretes into the substance selected by its
//! type, and it moves along a substance gradient. The set of rules is
//! closed, so it is an enum and every dispatch is an exhaustive `match`.
//!
//! Rules carry no per-cell state. A daughter cell receives an identical
//! copy of each rule whose `is_copied` returns true.

use serde::{Deserialize, Serialize};
use soma_core::error::{Result, SomaError};
use soma_core::field::{FieldAccessor, SUBSTANCE_0, SUBSTANCE_1};
use soma_core::types::{Cell, CellType};

/// The attractant-sensitive marker type.
pub const ATTRACTANT_SENSITIVE: CellType = CellType::POSITIVE;

/// Amount deposited per secretion step.
pub const DEFAULT_SECRETION_AMOUNT: f64 = 1.0;

/// Scale applied to the followed gradient.
pub const DEFAULT_CHEMOTAXIS_WEIGHT: f64 = 5.0;

/// The substance a cell of this type secretes into.
///
/// Binary test: the marker type secretes `Substance_1`, every other label
/// secretes `Substance_0`.
pub fn secreted_substance(cell_type: CellType) -> &'static str {
    if cell_type == ATTRACTANT_SENSITIVE {
        SUBSTANCE_1
    } else {
        SUBSTANCE_0
    }
}

/// The substance whose gradient a cell of this type climbs.
///
/// Cross-type pairing: the marker type follows `Substance_0`, which every
/// other type secretes, and every other type follows `Substance_1`, which
/// the marker type secretes.
pub fn followed_substance(cell_type: CellType) -> &'static str {
    if cell_type == ATTRACTANT_SENSITIVE {
        SUBSTANCE_0
    } else {
        SUBSTANCE_1
    }
}

/// Deposit a fixed amount of the cell's substance at its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SecretionParams")]
pub struct Secretion {
    amount: f64,
}

/// Unchecked wire form of [`Secretion`].
#[derive(Deserialize)]
struct SecretionParams {
    #[serde(default = "default_amount")]
    amount: f64,
}

fn default_amount() -> f64 {
    DEFAULT_SECRETION_AMOUNT
}

impl TryFrom<SecretionParams> for Secretion {
    type Error = SomaError;

    fn try_from(params: SecretionParams) -> Result<Self> {
        Secretion::with_amount(params.amount)
    }
}

impl Secretion {
    /// Secretion with a custom amount. Negative or non-finite amounts are rejected.
    pub fn with_amount(amount: f64) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(SomaError::invalid_config(
                "secretion.amount",
                amount.to_string(),
                "must be a finite, non-negative number",
            ));
        }
        Ok(Self { amount })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn run(&self, cell: &Cell, fields: &dyn FieldAccessor) {
        let substance = secreted_substance(cell.cell_type);
        fields.deposit_at(substance, &cell.position, self.amount);
    }
}

impl Default for Secretion {
    fn default() -> Self {
        Self {
            amount: DEFAULT_SECRETION_AMOUNT,
        }
    }
}

/// Move along a substance gradient.
///
/// Both gradients are sensed; the marker type follows `Substance_0`, every
/// other type follows `Substance_1` (see [`followed_substance`]). The chosen
/// gradient is scaled by `weight`, added to the mass location and committed
/// as the new position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChemotaxisParams")]
pub struct Chemotaxis {
    weight: f64,
}

/// Unchecked wire form of [`Chemotaxis`].
#[derive(Deserialize)]
struct ChemotaxisParams {
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_CHEMOTAXIS_WEIGHT
}

impl TryFrom<ChemotaxisParams> for Chemotaxis {
    type Error = SomaError;

    fn try_from(params: ChemotaxisParams) -> Result<Self> {
        Chemotaxis::with_weight(params.weight)
    }
}

impl Chemotaxis {
    pub fn with_weight(weight: f64) -> Result<Self> {
        if !weight.is_finite() {
            return Err(SomaError::invalid_config(
                "chemotaxis.weight",
                weight.to_string(),
                "must be finite",
            ));
        }
        Ok(Self { weight })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn run(&self, cell: &mut Cell, fields: &dyn FieldAccessor) {
        let gradient_0 = fields.gradient_at(SUBSTANCE_0, &cell.position);
        let gradient_1 = fields.gradient_at(SUBSTANCE_1, &cell.position);

        let followed = if cell.cell_type == ATTRACTANT_SENSITIVE {
            gradient_0
        } else {
            gradient_1
        };

        cell.update_position(followed * self.weight);
        cell.commit_mass_location();
    }
}

impl Default for Chemotaxis {
    fn default() -> Self {
        Self {
            weight: DEFAULT_CHEMOTAXIS_WEIGHT,
        }
    }
}

/// A rule attached to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Behavior {
    Secretion(Secretion),
    Chemotaxis(Chemotaxis),
}

impl Behavior {
    /// Secretion followed by chemotaxis, both with reference parameters.
    pub fn reference_set() -> Vec<Behavior> {
        vec![
            Behavior::Secretion(Secretion::default()),
            Behavior::Chemotaxis(Chemotaxis::default()),
        ]
    }

    /// Run this rule once for `cell`.
    pub fn run(&self, cell: &mut Cell, fields: &dyn FieldAccessor) {
        match self {
            Behavior::Secretion(s) => s.run(cell, fields),
            Behavior::Chemotaxis(c) => c.run(cell, fields),
        }
    }

    /// Substances this rule may touch for a cell of the given type.
    pub fn substances(&self, cell_type: CellType) -> Vec<&'static str> {
        match self {
            Behavior::Secretion(_) => vec![secreted_substance(cell_type)],
            Behavior::Chemotaxis(_) => vec![SUBSTANCE_0, SUBSTANCE_1],
        }
    }

    /// Whether a daughter cell inherits this rule.
    pub fn is_copied(&self) -> bool {
        match self {
            Behavior::Secretion(_) | Behavior::Chemotaxis(_) => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Behavior::Secretion(_) => "secretion",
            Behavior::Chemotaxis(_) => "chemotaxis",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soma_core::types::{Position, Vector3};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Accessor with a fixed gradient per substance and a summed deposit log.
    struct FixedFields {
        gradients: HashMap<&'static str, Vector3>,
        deposits: Mutex<HashMap<String, f64>>,
    }

    impl FixedFields {
        fn new() -> Self {
            let mut gradients = HashMap::new();
            gradients.insert(SUBSTANCE_0, Vector3::new(1.0, 0.0, 0.0));
            gradients.insert(SUBSTANCE_1, Vector3::new(0.0, 0.0, 2.0));
            Self {
                gradients,
                deposits: Mutex::new(HashMap::new()),
            }
        }

        fn deposited(&self, name: &str) -> f64 {
            self.deposits.lock().unwrap().get(name).copied().unwrap_or(0.0)
        }
    }

    impl FieldAccessor for FixedFields {
        fn gradient_at(&self, name: &str, _position: &Position) -> Vector3 {
            self.gradients[name]
        }

        fn deposit_at(&self, name: &str, _position: &Position, amount: f64) {
            *self.deposits.lock().unwrap().entry(name.to_string()).or_default() += amount;
        }

        fn concentration_at(&self, name: &str, _position: &Position) -> f64 {
            self.deposited(name)
        }

        fn has_field(&self, name: &str) -> bool {
            self.gradients.contains_key(name)
        }
    }

    #[test]
    fn marker_type_secretes_substance_1() {
        let fields = FixedFields::new();
        let cell = Cell::new(Position::default(), CellType::POSITIVE, 10.0);
        Secretion::default().run(&cell, &fields);
        assert_eq!(fields.deposited(SUBSTANCE_1), 1.0);
        assert_eq!(fields.deposited(SUBSTANCE_0), 0.0);
    }

    #[test]
    fn other_types_secrete_substance_0() {
        let fields = FixedFields::new();
        for label in [-1, 0, 2, 7] {
            let cell = Cell::new(Position::default(), CellType(label), 10.0);
            Secretion::default().run(&cell, &fields);
        }
        assert_eq!(fields.deposited(SUBSTANCE_0), 4.0);
        assert_eq!(fields.deposited(SUBSTANCE_1), 0.0);
    }

    #[test]
    fn marker_type_follows_substance_0_gradient() {
        let fields = FixedFields::new();
        let mut cell = Cell::new(Position::new(10.0, 10.0, 10.0), CellType::POSITIVE, 10.0);
        Chemotaxis::default().run(&mut cell, &fields);
        // (1, 0, 0) * 5
        assert_eq!(cell.position, Position::new(15.0, 10.0, 10.0));
        assert_eq!(cell.mass_location, cell.position);
    }

    #[test]
    fn other_types_follow_substance_1_gradient() {
        let fields = FixedFields::new();
        for label in [-1, 0, 2] {
            let mut cell = Cell::new(Position::new(10.0, 10.0, 10.0), CellType(label), 10.0);
            Chemotaxis::default().run(&mut cell, &fields);
            // (0, 0, 2) * 5
            assert_eq!(cell.position, Position::new(10.0, 10.0, 20.0));
        }
    }

    #[test]
    fn each_type_follows_the_substance_it_does_not_secrete() {
        for label in [-1, 0, 1, 2] {
            let cell_type = CellType(label);
            assert_ne!(followed_substance(cell_type), secreted_substance(cell_type));
        }
    }

    #[test]
    fn reference_set_secretes_before_moving() {
        let fields = FixedFields::new();
        let mut cell = Cell::new(Position::new(0.0, 0.0, 0.0), CellType::NEGATIVE, 10.0);
        let behaviors = Behavior::reference_set();
        assert_eq!(behaviors[0].name(), "secretion");
        assert_eq!(behaviors[1].name(), "chemotaxis");

        for b in &behaviors {
            b.run(&mut cell, &fields);
        }
        assert_eq!(fields.deposited(SUBSTANCE_0), 1.0);
        assert_eq!(cell.position, Position::new(0.0, 0.0, 10.0));

        let mut marker = Cell::new(Position::new(0.0, 0.0, 0.0), CellType::POSITIVE, 10.0);
        for b in &behaviors {
            b.run(&mut marker, &fields);
        }
        assert_eq!(fields.deposited(SUBSTANCE_1), 1.0);
        assert_eq!(marker.position, Position::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn negative_secretion_is_rejected() {
        assert!(Secretion::with_amount(-0.5).is_err());
        assert!(Secretion::with_amount(f64::NAN).is_err());
        assert_eq!(Secretion::with_amount(0.0).unwrap().amount(), 0.0);
        assert!(Chemotaxis::with_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let negative = serde_json::from_str::<Behavior>(r#"{"kind":"secretion","amount":-3.0}"#);
        assert!(negative.is_err());

        let ok: Behavior =
            serde_json::from_str(r#"{"kind":"secretion","amount":2.5}"#).unwrap();
        assert_eq!(ok, Behavior::Secretion(Secretion::with_amount(2.5).unwrap()));

        let defaulted: Behavior = serde_json::from_str(r#"{"kind":"chemotaxis"}"#).unwrap();
        assert_eq!(defaulted, Behavior::Chemotaxis(Chemotaxis::default()));
    }
}
