//! Plain-data records for undo history and persistence.
//!
//! Records refer to atoms and bonds by position, not by handle, so they stay
//! meaningful after the molecule they came from is gone. Missing fields
//! deserialize to the same defaults a freshly drawn atom or bond has.

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

use crate::atom::DEFAULT_ELEMENT;
use crate::bond::{BondOrder, BondStereo};
use crate::error::{Result, StructuralInconsistency};
use crate::ids::{AtomId, BondId};
use crate::molecule::Molecule;
use crate::point::Point;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtomConfig {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub element: String,
    pub charge: i32,
    pub isotope: u32,
    /// Positions of the atom's bonds, in the atom's own order.
    pub bonds: Vec<usize>,
}

impl Default for AtomConfig {
    fn default() -> Self {
        Self {
            index: 0,
            x: 0.0,
            y: 0.0,
            element: DEFAULT_ELEMENT.to_string(),
            charge: 0,
            isotope: 0,
            bonds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondConfig {
    pub index: usize,
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub order: BondOrder,
    #[serde(default)]
    pub stereo: BondStereo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculeSnapshot {
    pub atoms: Vec<AtomConfig>,
    pub bonds: Vec<BondConfig>,
}

/// Current position of every atom and bond handle.
#[derive(Debug, Clone, Default)]
pub struct IndexRemap {
    pub atoms: SecondaryMap<AtomId, usize>,
    pub bonds: SecondaryMap<BondId, usize>,
}

impl IndexRemap {
    fn atom(&self, id: AtomId) -> Result<usize> {
        self.atoms
            .get(id)
            .copied()
            .ok_or(StructuralInconsistency::UnknownAtom(id))
    }

    fn bond(&self, id: BondId) -> Result<usize> {
        self.bonds
            .get(id)
            .copied()
            .ok_or(StructuralInconsistency::UnknownBond(id))
    }
}

fn resolve<T: Copy>(ids: &[T], index: usize, kind: &'static str) -> Result<T> {
    ids.get(index)
        .copied()
        .ok_or(StructuralInconsistency::IndexOutOfRange {
            kind,
            index,
            len: ids.len(),
        })
}

impl Molecule {
    /// Map every live handle to its position in the atom or bond sequence.
    pub fn index_remap(&self) -> IndexRemap {
        let mut remap = IndexRemap::default();
        for (i, &id) in self.atom_order.iter().enumerate() {
            remap.atoms.insert(id, i);
        }
        for (i, &id) in self.bond_order.iter().enumerate() {
            remap.bonds.insert(id, i);
        }
        remap
    }

    /// A detached record of one atom. The bond list is an owned copy.
    pub fn atom_config(&self, id: AtomId) -> Result<AtomConfig> {
        self.atom_config_with(id, &self.index_remap())
    }

    pub fn bond_config(&self, id: BondId) -> Result<BondConfig> {
        self.bond_config_with(id, &self.index_remap())
    }

    fn atom_config_with(&self, id: AtomId, remap: &IndexRemap) -> Result<AtomConfig> {
        let atom = self.atom_ref(id)?;
        let center = atom.center();
        Ok(AtomConfig {
            index: remap.atom(id)?,
            x: center.x,
            y: center.y,
            element: atom.element().to_string(),
            charge: atom.charge(),
            isotope: atom.isotope(),
            bonds: atom
                .bonds()
                .iter()
                .map(|&b| remap.bond(b))
                .collect::<Result<_>>()?,
        })
    }

    fn bond_config_with(&self, id: BondId, remap: &IndexRemap) -> Result<BondConfig> {
        let bond = self.bond_ref(id)?;
        Ok(BondConfig {
            index: remap.bond(id)?,
            from: remap.atom(bond.from())?,
            to: remap.atom(bond.to())?,
            order: bond.order(),
            stereo: bond.stereo(),
        })
    }

    pub fn snapshot(&self) -> Result<MoleculeSnapshot> {
        let remap = self.index_remap();
        Ok(MoleculeSnapshot {
            atoms: self
                .atom_order
                .iter()
                .map(|&id| self.atom_config_with(id, &remap))
                .collect::<Result<_>>()?,
            bonds: self
                .bond_order
                .iter()
                .map(|&id| self.bond_config_with(id, &remap))
                .collect::<Result<_>>()?,
        })
    }

    /// Rebuild a molecule from a snapshot.
    ///
    /// Atom and bond records must be listed in index order. Each atom keeps
    /// the bond order its record lists; bonds a record forgot to list are
    /// appended after them. Everything starts invalid.
    pub fn from_snapshot(snapshot: &MoleculeSnapshot, settings: Settings) -> Result<Molecule> {
        let mut mol = Molecule::new(settings);

        let mut atom_ids = Vec::with_capacity(snapshot.atoms.len());
        for (position, config) in snapshot.atoms.iter().enumerate() {
            if config.index != position {
                return Err(StructuralInconsistency::IndexMismatch {
                    kind: "atom",
                    position,
                    found: config.index,
                });
            }
            let id = mol.add_atom(Point::new(config.x, config.y), &config.element);
            let atom = mol.atom_entry(id)?;
            atom.set_charge(config.charge);
            atom.set_isotope(config.isotope);
            atom_ids.push(id);
        }

        let mut bond_ids = Vec::with_capacity(snapshot.bonds.len());
        for (position, config) in snapshot.bonds.iter().enumerate() {
            if config.index != position {
                return Err(StructuralInconsistency::IndexMismatch {
                    kind: "bond",
                    position,
                    found: config.index,
                });
            }
            let from = resolve(&atom_ids, config.from, "atom")?;
            let to = resolve(&atom_ids, config.to, "atom")?;
            bond_ids.push(mol.add_bond(from, to, config.order, config.stereo)?);
        }

        for (config, &id) in snapshot.atoms.iter().zip(&atom_ids) {
            let mut listed = Vec::with_capacity(config.bonds.len());
            for &index in &config.bonds {
                let bond = resolve(&bond_ids, index, "bond")?;
                if !mol.bond_ref(bond)?.connects(id) {
                    return Err(StructuralInconsistency::BondNotIncident { atom: id, bond });
                }
                listed.push(bond);
            }

            let atom = mol.atom_entry(id)?;
            let wired = atom.take_bonds();
            for bond in listed
                .iter()
                .copied()
                .chain(wired.into_iter().filter(|b| !listed.contains(b)))
            {
                atom.push_bond(bond)?;
            }
        }

        Ok(mol)
    }
}
