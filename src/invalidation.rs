//! Incremental layout caching.
//!
//! Every edit reports a [`Change`] for the atoms it touched. The change
//! decides, in one place, which neighbouring entities become stale:
//!
//! - attribute edits (element, charge, isotope, display, bond list) make
//!   the atom and its own bonds stale, since a bond is trimmed by the
//!   labels at both of its ends;
//! - center moves additionally refresh the bonds' vertices, and under
//!   skeleton display also reach the bonds of every neighbour, because a
//!   hidden neighbour makes the next bonds run flush into it.
//!
//! [`Molecule::validate`] then recomputes only what is stale.

use log::trace;

use crate::error::Result;
use crate::geometry::{layout_bond, layout_label};
use crate::ids::{AtomId, BondId};
use crate::molecule::Molecule;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// Element, charge, isotope, display state or bond list.
    Attributes,
    /// The atom's center moved.
    Center,
}

/// How far an invalidation reaches from the edited atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The atom and the bonds it is an endpoint of.
    Bonds,
    /// As `Bonds`, plus every bond of every bonded neighbour.
    SecondLevel,
}

impl Change {
    pub fn scope(self, settings: &Settings) -> Scope {
        match self {
            Self::Center if settings.skeleton_display => Scope::SecondLevel,
            _ => Scope::Bonds,
        }
    }

    fn moves_center(self) -> bool {
        self == Self::Center
    }
}

/// How many entities one validation pass recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub atoms: usize,
    pub bonds: usize,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.atoms == 0 && self.bonds == 0
    }
}

impl Molecule {
    /// Mark `atom` stale and propagate according to `change`'s scope. The
    /// molecule is flagged for repaint.
    pub fn invalidate_atom(&mut self, atom: AtomId, change: Change) -> Result<()> {
        let scope = change.scope(&self.settings);
        let new_center = change.moves_center();

        let entry = self.atom_entry(atom)?;
        entry.mark_invalid();
        let first_level = entry.bonds().to_vec();

        let mut neighbors = Vec::with_capacity(first_level.len());
        for &b in &first_level {
            let bond = self.bond_entry(b)?;
            bond.invalidate_from(atom, new_center);
            neighbors.extend(bond.other_end(atom));
        }

        if scope == Scope::SecondLevel {
            for neighbor in neighbors {
                let second_level: Vec<BondId> = match self.atoms.get(neighbor) {
                    Some(n) => n.bonds().to_vec(),
                    None => continue,
                };
                for b in second_level {
                    if first_level.contains(&b) {
                        continue;
                    }
                    if let Some(bond) = self.bonds.get_mut(b) {
                        bond.invalidate_from(neighbor, new_center);
                    }
                }
            }
        }

        trace!("invalidated atom {atom:?} ({change:?}, {scope:?})");
        self.needs_repaint = true;
        Ok(())
    }

    /// Mark the bonds of `atom` stale without touching the atom itself.
    pub fn invalidate_bonds(&mut self, atom: AtomId) -> Result<()> {
        let bonds = self.atom_ref(atom)?.bonds().to_vec();
        for b in bonds {
            self.bond_entry(b)?.invalidate_from(atom, false);
        }
        self.needs_repaint = true;
        Ok(())
    }

    /// Mark every atom and bond stale, as an attribute change on every atom
    /// would.
    pub(crate) fn invalidate_all(&mut self) {
        for atom in self.atoms.values_mut() {
            atom.mark_invalid();
        }
        for bond in self.bonds.values_mut() {
            let from = bond.from();
            bond.invalidate_from(from, false);
        }
        trace!("invalidated all {} atoms", self.atoms.len());
        self.needs_repaint = true;
    }

    /// Recompute the label of `atom` if it is stale. Returns whether any
    /// work was done.
    pub fn validate_atom(&mut self, atom: AtomId) -> Result<bool> {
        self.atom_ref(atom)?;
        Ok(self.refresh_atom(atom))
    }

    /// Recompute every stale label, then every stale bond.
    ///
    /// Bonds are laid out after atoms because a bond is trimmed by the
    /// labels at its ends.
    pub fn validate(&mut self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for i in 0..self.atom_order.len() {
            let id = self.atom_order[i];
            if self.refresh_atom(id) {
                report.atoms += 1;
            }
        }
        for i in 0..self.bond_order.len() {
            let id = self.bond_order[i];
            if self.refresh_bond(id) {
                report.bonds += 1;
            }
        }
        if !report.is_empty() {
            trace!(
                "validated {} atoms and {} bonds",
                report.atoms,
                report.bonds
            );
        }
        report
    }

    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Consume the pending repaint request. However many edits happened
    /// since the last call, this returns true once.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    fn refresh_atom(&mut self, id: AtomId) -> bool {
        let Some(atom) = self.atoms.get(id) else {
            return false;
        };
        if atom.is_valid() {
            return false;
        }
        let label = layout_label(atom, self.is_visible(id), &self.settings);
        if let Some(atom) = self.atoms.get_mut(id) {
            atom.store_label(label);
        }
        true
    }

    fn refresh_bond(&mut self, id: BondId) -> bool {
        let Some(bond) = self.bonds.get(id) else {
            return false;
        };
        if bond.is_valid() {
            return false;
        }
        let (Some(from), Some(to)) = (self.atoms.get(bond.from()), self.atoms.get(bond.to())) else {
            return false;
        };
        let (from_center, to_center) = match bond.cached_geometry() {
            Some(cached) if !bond.needs_vertices() => (cached.from, cached.to),
            _ => (from.center(), to.center()),
        };
        let geometry = layout_bond(
            from_center,
            to_center,
            from.label_geometry().map_or(0.0, |l| l.clearance),
            to.label_geometry().map_or(0.0, |l| l.clearance),
        );
        if let Some(bond) = self.bonds.get_mut(id) {
            bond.store_geometry(geometry);
        }
        true
    }
}
