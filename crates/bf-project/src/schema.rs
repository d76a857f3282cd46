//! Project schema definitions.
//!
//! Free-text fields (node labels, connection types) are kept as written by
//! the user; they are normalized when the project is compiled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub params: ParamsDef,
    #[serde(default)]
    pub fitting_tables: Vec<FittingTableDef>,
    #[serde(default)]
    pub boundaries: Vec<BoundaryDef>,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
}

impl Project {
    /// Empty project at the latest schema version with default parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            params: ParamsDef::default(),
            fitting_tables: Vec::new(),
            boundaries: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Fitting table for the project material, if one is loaded.
    pub fn active_fitting_table(&self) -> Option<&FittingTableDef> {
        self.fitting_tables
            .iter()
            .find(|t| t.material == self.params.material)
    }

    pub fn segment(&self, id: &str) -> Option<&SegmentDef> {
        self.segments.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParamsDef {
    pub notation: NotationDef,
    pub material: MaterialDef,
    pub head_loss_model: HeadLossModelDef,
    pub capacity: CapacityDef,
    pub flow: FlowDef,
    pub hazen_williams: HazenWilliamsDef,
    /// Head (m of water) for sources without an explicit boundary.
    pub operating_head_m: f64,
    pub pressure_conflict: PressureConflictDef,
}

impl Default for ParamsDef {
    fn default() -> Self {
        Self {
            notation: NotationDef::default(),
            material: MaterialDef::default(),
            head_loss_model: HeadLossModelDef::default(),
            capacity: CapacityDef::default(),
            flow: FlowDef::default(),
            hazen_williams: HazenWilliamsDef::default(),
            operating_head_m: 10.0,
            pressure_conflict: PressureConflictDef::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NotationDef {
    #[default]
    Letters,
    Digits,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MaterialDef {
    #[default]
    Pvc,
    CastIron,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HeadLossModelDef {
    #[default]
    HazenWilliams,
    FairWhippleHsiao,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PressureConflictDef {
    #[default]
    Fail,
    Warn,
}

/// Maximum outgoing segments per connection type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CapacityDef {
    pub entry: u32,
    pub tee: u32,
    pub cross: u32,
}

impl Default for CapacityDef {
    fn default() -> Self {
        Self {
            entry: 1,
            tee: 2,
            cross: 3,
        }
    }
}

/// `Q = k · weight^exponent`, Q in L/s.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowDef {
    pub k: f64,
    pub exponent: f64,
}

impl Default for FlowDef {
    fn default() -> Self {
        Self {
            k: 0.3,
            exponent: 0.5,
        }
    }
}

/// Hazen-Williams roughness coefficient per material.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HazenWilliamsDef {
    pub pvc: f64,
    pub cast_iron: f64,
}

impl Default for HazenWilliamsDef {
    fn default() -> Self {
        Self {
            pvc: 150.0,
            cast_iron: 130.0,
        }
    }
}

/// Equivalent lengths of fittings, one row per tabulated diameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittingTableDef {
    pub material: MaterialDef,
    #[serde(default)]
    pub rows: Vec<FittingRowDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittingRowDef {
    pub diameter_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_inches: Option<String>,
    /// Fitting name to equivalent length in metres.
    #[serde(default)]
    pub lengths_m: BTreeMap<String, f64>,
}

/// Fixed pressure at a source node, given either in kPa or as metres of
/// water column. Exactly one of the two must be set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_kpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_m: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TerminalDef {
    #[default]
    NoUse,
    UsePoint,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    /// Empty ids are generated on registration.
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_order")]
    pub order: u32,
    pub start_node: String,
    pub end_node: String,
    /// Connection type of the start node as free text ("Entrada", "Tê", "cross").
    pub start_connection: String,
    pub nominal_diameter_mm: f64,
    #[serde(default)]
    pub real_length_m: f64,
    #[serde(default)]
    pub elevation_drop_m: f64,
    #[serde(default)]
    pub fixture_unit_weight: f64,
    #[serde(default)]
    pub terminal: TerminalDef,
    /// Overrides the terminal default when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pressure_kpa: Option<f64>,
    /// Fitting name to quantity.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fittings: BTreeMap<String, u32>,
}

fn default_branch() -> String {
    "A".to_string()
}

fn default_order() -> u32 {
    1
}
