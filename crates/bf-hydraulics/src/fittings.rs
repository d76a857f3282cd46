//! Equivalent lengths of fittings, tabulated by reference diameter.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{HydraulicError, HydraulicResult};
use crate::model::Material;

/// One tabulated reference diameter and the equivalent length (m) of each fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct FittingRow {
    pub diameter_mm: f64,
    /// Commercial inch label of the diameter, e.g. `3/4"`.
    pub reference_inches: Option<String>,
    pub lengths_m: BTreeMap<String, f64>,
}

/// Equivalent-length table for one material.
#[derive(Debug, Clone, PartialEq)]
pub struct FittingTable {
    material: Material,
    rows: Vec<FittingRow>,
}

/// What a lookup yields for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFittings {
    pub reference_diameter_mm: f64,
    pub reference_inches: String,
    /// Every fitting the table knows, with its length for this diameter (0 if blank).
    pub lengths_m: BTreeMap<String, f64>,
}

impl FittingTable {
    /// Rows must have finite, positive diameters and finite, non-negative lengths.
    pub fn new(material: Material, rows: Vec<FittingRow>) -> HydraulicResult<Self> {
        let invalid = |reason: String| HydraulicError::InvalidTable {
            material: material.to_string(),
            reason,
        };
        for row in &rows {
            if !row.diameter_mm.is_finite() || row.diameter_mm <= 0.0 {
                return Err(invalid(format!("diameter {} mm", row.diameter_mm)));
            }
            for (name, len) in &row.lengths_m {
                if !len.is_finite() || *len < 0.0 {
                    return Err(invalid(format!(
                        "length {} m for '{}' at {} mm",
                        len, name, row.diameter_mm
                    )));
                }
            }
        }
        Ok(Self { material, rows })
    }

    /// Table with no rows; lookups fall back to the nominal diameter.
    pub fn empty(material: Material) -> Self {
        Self {
            material,
            rows: Vec::new(),
        }
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn rows(&self) -> &[FittingRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All fitting names across rows, sorted.
    pub fn fitting_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .rows
            .iter()
            .flat_map(|r| r.lengths_m.keys().map(String::as_str))
            .collect();
        names.into_iter().collect()
    }

    /// Row whose diameter is nearest to `nominal_mm` (first row on ties), no interpolation.
    ///
    /// An empty table resolves to the nominal diameter with no fittings.
    pub fn resolve(&self, nominal_mm: f64) -> ResolvedFittings {
        let target = if nominal_mm.is_finite() { nominal_mm } else { 0.0 };
        let nearest = self.rows.iter().fold(None::<&FittingRow>, |best, row| match best {
            Some(b) if (b.diameter_mm - target).abs() <= (row.diameter_mm - target).abs() => {
                Some(b)
            }
            _ => Some(row),
        });

        let Some(row) = nearest else {
            return ResolvedFittings {
                reference_diameter_mm: target,
                reference_inches: String::new(),
                lengths_m: BTreeMap::new(),
            };
        };

        let lengths_m = self
            .fitting_names()
            .into_iter()
            .map(|name| (name.to_string(), row.lengths_m.get(name).copied().unwrap_or(0.0)))
            .collect();

        ResolvedFittings {
            reference_diameter_mm: row.diameter_mm,
            reference_inches: row.reference_inches.clone().unwrap_or_default(),
            lengths_m,
        }
    }
}

impl ResolvedFittings {
    /// `Σ length_i · quantity_i` over the requested fittings.
    ///
    /// Naming a fitting the table does not know is an error.
    pub fn equivalent_length(
        &self,
        quantities: &BTreeMap<String, u32>,
        material: Material,
    ) -> HydraulicResult<f64> {
        let mut total = 0.0;
        for (name, &qty) in quantities {
            let len = self
                .lengths_m
                .get(name)
                .ok_or_else(|| HydraulicError::UnknownFitting {
                    name: name.clone(),
                    material: material.to_string(),
                })?;
            total += len * f64::from(qty);
        }
        Ok(total)
    }
}
