//! Export of atoms to the Ketcher structure editor's atom records.
//!
//! Ketcher measures coordinates in bond lengths, so canvas positions are
//! divided by the configured bond-length unit. There is no import path.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::AtomId;
use crate::molecule::Molecule;
use crate::point::Point;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KetcherContext {
    pub bond_length_unit: f64,
}

impl KetcherContext {
    /// The unit to divide by; a zero, negative or non-finite unit falls
    /// back to 1 so coordinates pass through unscaled.
    pub fn unit(&self) -> f64 {
        if self.bond_length_unit.is_finite() && self.bond_length_unit > 0.0 {
            self.bond_length_unit
        } else {
            1.0
        }
    }
}

impl From<&Settings> for KetcherContext {
    fn from(settings: &Settings) -> Self {
        Self {
            bond_length_unit: settings.bond_length_unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KetcherAtom {
    pub label: String,
    pub position: Point,
    pub charge: i32,
    pub isotope: u32,
}

pub fn ketcher_atom(mol: &Molecule, atom: AtomId, context: &KetcherContext) -> Result<KetcherAtom> {
    let a = mol.atom_ref(atom)?;
    let unit = context.unit();
    let center = a.center();
    Ok(KetcherAtom {
        label: a.element().to_string(),
        position: Point::new(center.x / unit, center.y / unit),
        charge: a.charge(),
        isotope: a.isotope(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StructuralInconsistency;

    #[test]
    fn position_is_in_bond_lengths() {
        let mut mol = Molecule::default();
        let n = mol.add_atom(Point::new(80.0, -20.0), "N");
        mol.set_charge(n, 1).unwrap();
        mol.set_isotope(n, 15).unwrap();
        let context = KetcherContext::from(mol.settings());

        let record = ketcher_atom(&mol, n, &context).unwrap();
        assert_eq!(
            record,
            KetcherAtom {
                label: "N".to_string(),
                position: Point::new(2.0, -0.5),
                charge: 1,
                isotope: 15,
            }
        );
    }

    #[test]
    fn degenerate_unit_passes_through() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::new(3.0, 4.0), "C");
        for unit in [0.0, -5.0, f64::NAN] {
            let context = KetcherContext {
                bond_length_unit: unit,
            };
            assert_eq!(
                ketcher_atom(&mol, c, &context).unwrap().position,
                Point::new(3.0, 4.0)
            );
        }
    }

    #[test]
    fn unknown_atom_fails() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::default(), "C");
        mol.remove_atom(c).unwrap();
        let context = KetcherContext::from(mol.settings());
        assert_eq!(
            ketcher_atom(&mol, c, &context).unwrap_err(),
            StructuralInconsistency::UnknownAtom(c)
        );
    }
}
