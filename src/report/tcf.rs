//! Terrain correction factor
//!
//! Converts a terrain-class production breakdown into the contractual
//! correction factor: a production-weighted average of the per-class
//! coefficients. Harder terrain carries a lower coefficient, so the factor
//! derates the daily target in proportion to where the crew actually shot.

use serde::{Deserialize, Serialize};

use crate::types::{Terrain, TerrainSums};

/// Per-terrain-class correction coefficients from the contract.
///
/// Operator-tunable through `crew_config.toml`; defaults match the
/// contract table this engine was built against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainCoefficients {
    pub flat: f64,
    pub rough: f64,
    pub facilities: f64,
    pub dunes: f64,
    pub sabkha: f64,
}

impl Default for TerrainCoefficients {
    fn default() -> Self {
        Self {
            flat: 0.85,
            rough: 0.50,
            facilities: 0.55,
            dunes: 0.60,
            sabkha: 0.60,
        }
    }
}

impl TerrainCoefficients {
    pub fn get(&self, terrain: Terrain) -> f64 {
        match terrain {
            Terrain::Flat => self.flat,
            Terrain::Rough => self.rough,
            Terrain::Facilities => self.facilities,
            Terrain::Dunes => self.dunes,
            Terrain::Sabkha => self.sabkha,
        }
    }
}

/// Calculate the terrain correction factor for a period's production
/// breakdown.
///
/// `None` when the summed production is below one point — there is nothing
/// to weight by. Otherwise the result is
/// `Σ class_total / total × class_coefficient` over the five classes,
/// which always lands within `[min(coeff), max(coeff)]`. A class with zero
/// production contributes zero weight, not an undefined term.
pub fn calc_tcf(terrain: &TerrainSums, coeff: &TerrainCoefficients) -> Option<f64> {
    let total = terrain.total();
    if !(total >= 1.0) {
        return None;
    }

    Some(
        Terrain::ALL
            .iter()
            .map(|t| terrain.get(*t) / total * coeff.get(*t))
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(flat: f64, rough: f64, facilities: f64, dunes: f64, sabkha: f64) -> TerrainSums {
        TerrainSums {
            flat,
            rough,
            facilities,
            dunes,
            sabkha,
        }
    }

    #[test]
    fn undefined_below_one_point() {
        let coeff = TerrainCoefficients::default();
        assert_eq!(calc_tcf(&sums(0.0, 0.0, 0.0, 0.0, 0.0), &coeff), None);
        assert_eq!(calc_tcf(&sums(0.4, 0.3, 0.0, 0.0, 0.0), &coeff), None);
    }

    #[test]
    fn all_flat_production_gives_flat_coefficient() {
        let coeff = TerrainCoefficients::default();
        let tcf = calc_tcf(&sums(1000.0, 0.0, 0.0, 0.0, 0.0), &coeff).expect("tcf");
        assert!((tcf - coeff.flat).abs() < 1e-12);
    }

    #[test]
    fn result_stays_within_coefficient_range() {
        let coeff = TerrainCoefficients::default();
        let tcf = calc_tcf(&sums(500.0, 300.0, 100.0, 50.0, 50.0), &coeff).expect("tcf");
        assert!(tcf >= coeff.rough && tcf <= coeff.flat);
    }

    #[test]
    fn invariant_under_uniform_scaling() {
        let coeff = TerrainCoefficients::default();
        let a = calc_tcf(&sums(500.0, 300.0, 100.0, 50.0, 50.0), &coeff).expect("tcf");
        let b = calc_tcf(&sums(5000.0, 3000.0, 1000.0, 500.0, 500.0), &coeff).expect("tcf");
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn zero_class_contributes_zero_not_undefined() {
        let coeff = TerrainCoefficients::default();
        let tcf = calc_tcf(&sums(800.0, 0.0, 200.0, 0.0, 0.0), &coeff).expect("tcf");
        let expected = 0.8 * coeff.flat + 0.2 * coeff.facilities;
        assert!((tcf - expected).abs() < 1e-12);
    }
}
