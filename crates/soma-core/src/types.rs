//! Shared types used across all Soma crates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A position in the simulation space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean (L2) distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (*other - *self).norm()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Position {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

/// A direction or displacement in 3D (gradients, motion deltas).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Add<Vector3> for Position {
    type Output = Position;

    fn add(self, rhs: Vector3) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign<Vector3> for Position {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl Sub for Position {
    type Output = Vector3;

    fn sub(self, rhs: Position) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Discrete type label carried by every cell.
///
/// The reference scenario uses `+1` and `-1`, but any signed label is valid.
/// Two cells are "opposite" when the product of their labels is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellType(pub i32);

impl CellType {
    /// The attractant-sensitive marker type.
    pub const POSITIVE: CellType = CellType(1);
    pub const NEGATIVE: CellType = CellType(-1);

    pub fn label(self) -> i32 {
        self.0
    }

    /// Whether two labels have opposite sign (product < 0).
    pub fn is_opposite(self, other: CellType) -> bool {
        (self.0 as i64) * (other.0 as i64) < 0
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// The mutable record of one cell.
///
/// Motion is accumulated into `mass_location` and then committed to
/// `position`, so behaviors that displace a cell never observe a
/// half-applied move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pub mass_location: Position,
    pub cell_type: CellType,
    pub diameter: f64,
}

impl Cell {
    pub fn new(position: Position, cell_type: CellType, diameter: f64) -> Self {
        Self {
            position,
            mass_location: position,
            cell_type,
            diameter,
        }
    }

    /// Displace the mass location by `delta`.
    pub fn update_position(&mut self, delta: Vector3) {
        self.mass_location += delta;
    }

    /// Commit the accumulated mass location as the cell's position.
    pub fn commit_mass_location(&mut self) {
        self.position = self.mass_location;
    }

    /// Move both position and mass location.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.mass_location = position;
    }

    /// The (position, type) pair captured by a snapshot.
    pub fn record(&self) -> CellRecord {
        CellRecord {
            position: self.position,
            cell_type: self.cell_type,
        }
    }
}

/// One entry of a population snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub position: Position,
    pub cell_type: CellType,
}

impl CellRecord {
    pub fn new(position: Position, cell_type: CellType) -> Self {
        Self { position, cell_type }
    }
}

/// Axis-aligned cubic simulation bounds, identical on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn extent(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, p: &Position) -> bool {
        [p.x, p.y, p.z]
            .iter()
            .all(|&c| c >= self.min && c <= self.max)
    }

    /// Clamp a position into the bounds on every axis.
    pub fn clamp(&self, p: Position) -> Position {
        Position::new(
            p.x.clamp(self.min, self.max),
            p.y.clamp(self.min, self.max),
            p.z.clamp(self.min, self.max),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 250.0)
    }
}

/// The current step of the simulation.
pub type Tick = u64;
