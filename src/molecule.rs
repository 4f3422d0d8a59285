use std::collections::HashSet;

use log::debug;
use slotmap::SlotMap;

use crate::atom::{Atom, DisplayState};
use crate::bond::{Bond, BondOrder, BondStereo};
use crate::error::{Result, StructuralInconsistency};
use crate::ids::{AtomId, BondId};
use crate::invalidation::Change;
use crate::point::Point;
use crate::settings::Settings;

/// Owner of every atom and bond of one drawing.
///
/// Atoms and bonds live in generation-tagged arenas and refer to each other
/// by handle. The order in which they were added defines their positional
/// index; removing an entity shifts the indices of the later ones but never
/// invalidates another entity's handle.
///
/// All edits go through `&mut self`, so a caller never sees the graph
/// between two steps of one edit.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub(crate) atoms: SlotMap<AtomId, Atom>,
    pub(crate) bonds: SlotMap<BondId, Bond>,
    pub(crate) atom_order: Vec<AtomId>,
    pub(crate) bond_order: Vec<BondId>,
    pub(crate) settings: Settings,
    pub(crate) needs_repaint: bool,
}

impl Molecule {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. Every atom and bond is invalidated, since
    /// visibility and label metrics may all change.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.invalidate_all();
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id)
    }

    /// Atoms in index order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.atom_order.iter().filter_map(|&id| self.atoms.get(id))
    }

    /// Bonds in index order.
    pub fn bonds(&self) -> impl Iterator<Item = &Bond> + '_ {
        self.bond_order.iter().filter_map(|&id| self.bonds.get(id))
    }

    pub fn atom_ids(&self) -> &[AtomId] {
        &self.atom_order
    }

    pub fn bond_ids(&self) -> &[BondId] {
        &self.bond_order
    }

    /// Position of the atom in the atom sequence.
    pub fn atom_index(&self, id: AtomId) -> Option<usize> {
        self.atom_order.iter().position(|&a| a == id)
    }

    pub fn bond_index(&self, id: BondId) -> Option<usize> {
        self.bond_order.iter().position(|&b| b == id)
    }

    pub fn atom_at(&self, index: usize) -> Option<AtomId> {
        self.atom_order.get(index).copied()
    }

    pub fn bond_at(&self, index: usize) -> Option<BondId> {
        self.bond_order.get(index).copied()
    }

    pub(crate) fn atom_ref(&self, id: AtomId) -> Result<&Atom> {
        self.atoms
            .get(id)
            .ok_or(StructuralInconsistency::UnknownAtom(id))
    }

    pub(crate) fn atom_entry(&mut self, id: AtomId) -> Result<&mut Atom> {
        self.atoms
            .get_mut(id)
            .ok_or(StructuralInconsistency::UnknownAtom(id))
    }

    pub(crate) fn bond_ref(&self, id: BondId) -> Result<&Bond> {
        self.bonds
            .get(id)
            .ok_or(StructuralInconsistency::UnknownBond(id))
    }

    pub(crate) fn bond_entry(&mut self, id: BondId) -> Result<&mut Bond> {
        self.bonds
            .get_mut(id)
            .ok_or(StructuralInconsistency::UnknownBond(id))
    }

    /// Add an unbonded atom. It starts invalid, so the next validation pass
    /// lays out its label.
    pub fn add_atom(&mut self, center: Point, element: &str) -> AtomId {
        let id = self
            .atoms
            .insert_with_key(|id| Atom::new(id, center, element));
        self.atom_order.push(id);
        self.needs_repaint = true;
        id
    }

    /// Add a bond and register it on both endpoints.
    ///
    /// Two atoms share at most one bond: a second bond between the same
    /// pair is rejected, as is a bond from an atom to itself. Change the
    /// order of the existing bond instead.
    pub fn add_bond(
        &mut self,
        from: AtomId,
        to: AtomId,
        order: BondOrder,
        stereo: BondStereo,
    ) -> Result<BondId> {
        if from == to {
            return Err(StructuralInconsistency::SelfBond(from));
        }
        self.atom_ref(from)?;
        self.atom_ref(to)?;
        if let Some(existing) = self.neighbor_bond(from, to) {
            return Err(StructuralInconsistency::ParallelBond { from, to, existing });
        }

        let id = self
            .bonds
            .insert_with_key(|id| Bond::new(id, from, to, order, stereo));
        self.bond_order.push(id);
        self.atom_entry(from)?.push_bond(id)?;
        self.atom_entry(to)?.push_bond(id)?;
        self.invalidate_atom(from, Change::Attributes)?;
        self.invalidate_atom(to, Change::Attributes)?;
        Ok(id)
    }

    /// Remove a bond. Both endpoints drop their reference to it before this
    /// returns.
    pub fn remove_bond(&mut self, id: BondId) -> Result<Bond> {
        let bond = self.discard_bond(id)?;
        for end in [bond.from(), bond.to()] {
            self.atom_entry(end)?
                .map_bonds(|b| (b != id).then_some(b))?;
        }
        for end in [bond.from(), bond.to()] {
            self.invalidate_atom(end, Change::Attributes)?;
        }
        debug!("removed bond {id:?}");
        Ok(bond)
    }

    /// Remove an atom together with every bond that touches it.
    pub fn remove_atom(&mut self, id: AtomId) -> Result<Atom> {
        let incident = self.atom_ref(id)?.bonds().to_vec();
        for bond in incident {
            self.remove_bond(bond)?;
        }
        let atom = self.discard_atom(id)?;
        debug!("removed atom {id:?} ({})", atom.element());
        Ok(atom)
    }

    /// Drop a bond from the arena and the bond sequence. Atom bond lists
    /// are left alone; the caller rewrites every reference to it.
    pub(crate) fn discard_bond(&mut self, id: BondId) -> Result<Bond> {
        let bond = self
            .bonds
            .remove(id)
            .ok_or(StructuralInconsistency::UnknownBond(id))?;
        self.bond_order.retain(|&b| b != id);
        Ok(bond)
    }

    /// Drop an atom from the arena and the atom sequence. Whatever is left
    /// in its bond list is forgotten, so every bond it listed must already
    /// be removed or re-pointed elsewhere.
    pub(crate) fn discard_atom(&mut self, id: AtomId) -> Result<Atom> {
        let mut atom = self
            .atoms
            .remove(id)
            .ok_or(StructuralInconsistency::UnknownAtom(id))?;
        atom.take_bonds();
        self.atom_order.retain(|&a| a != id);
        self.needs_repaint = true;
        Ok(atom)
    }

    pub fn set_element(&mut self, id: AtomId, element: &str) -> Result<()> {
        self.atom_entry(id)?.set_element(element);
        self.invalidate_atom(id, Change::Attributes)
    }

    pub fn set_charge(&mut self, id: AtomId, charge: i32) -> Result<()> {
        self.atom_entry(id)?.set_charge(charge);
        self.invalidate_atom(id, Change::Attributes)
    }

    pub fn set_isotope(&mut self, id: AtomId, isotope: u32) -> Result<()> {
        self.atom_entry(id)?.set_isotope(isotope);
        self.invalidate_atom(id, Change::Attributes)
    }

    pub fn set_display(&mut self, id: AtomId, display: DisplayState) -> Result<()> {
        self.atom_entry(id)?.set_display(display);
        self.invalidate_atom(id, Change::Attributes)
    }

    pub fn set_center(&mut self, id: AtomId, center: Point) -> Result<()> {
        self.atom_entry(id)?.center_mut().set(center);
        self.invalidate_atom(id, Change::Center)
    }

    pub fn translate_atom(&mut self, id: AtomId, dx: f64, dy: f64) -> Result<()> {
        self.atom_entry(id)?.center_mut().translate(dx, dy);
        self.invalidate_atom(id, Change::Center)
    }

    pub fn rotate_atom_around(&mut self, id: AtomId, center: Point, angle: f64) -> Result<()> {
        self.atom_entry(id)?.center_mut().rotate_around(center, angle);
        self.invalidate_atom(id, Change::Center)
    }

    pub fn set_bond_order(&mut self, id: BondId, order: BondOrder) -> Result<()> {
        let bond = self.bond_entry(id)?;
        bond.set_order(order);
        let (from, to) = (bond.from(), bond.to());
        self.invalidate_atom(from, Change::Attributes)?;
        self.invalidate_atom(to, Change::Attributes)
    }

    pub fn set_bond_stereo(&mut self, id: BondId, stereo: BondStereo) -> Result<()> {
        let bond = self.bond_entry(id)?;
        bond.set_stereo(stereo);
        let (from, to) = (bond.from(), bond.to());
        self.invalidate_atom(from, Change::Attributes)?;
        self.invalidate_atom(to, Change::Attributes)
    }

    /// Reverse a bond's direction, which flips where a wedge starts.
    pub fn swap_bond_ends(&mut self, id: BondId) -> Result<()> {
        let bond = self.bond_entry(id)?;
        bond.swap_ends();
        let (from, to) = (bond.from(), bond.to());
        self.invalidate_atom(from, Change::Attributes)?;
        self.invalidate_atom(to, Change::Attributes)
    }

    /// Replace the reference `old` by `new` in `atom`'s bond list, dropping
    /// `old` instead if `new` is already there.
    pub(crate) fn replace_atom_bond(
        &mut self,
        atom: AtomId,
        old: BondId,
        new: BondId,
    ) -> Result<bool> {
        let replaced = self.atom_entry(atom)?.replace_bond(old, new);
        self.invalidate_atom(atom, Change::Attributes)?;
        Ok(replaced)
    }

    /// The bond joining `atom` to `other`, if they are bonded.
    pub fn neighbor_bond(&self, atom: AtomId, other: AtomId) -> Option<BondId> {
        self.atoms.get(atom)?.bonds().iter().copied().find(|&b| {
            self.bonds
                .get(b)
                .and_then(|bond| bond.other_end(atom))
                == Some(other)
        })
    }

    pub fn neighbors(&self, atom: AtomId) -> Vec<AtomId> {
        let Some(a) = self.atoms.get(atom) else {
            return Vec::new();
        };
        a.bonds()
            .iter()
            .filter_map(|&b| self.bonds.get(b)?.other_end(atom))
            .collect()
    }

    /// Sum of the order ordinals of every bond on `atom`: a double bond
    /// counts twice. Unknown atoms report zero.
    pub fn total_bond_order(&self, atom: AtomId) -> u32 {
        let Some(a) = self.atoms.get(atom) else {
            return 0;
        };
        a.bonds()
            .iter()
            .filter_map(|&b| self.bonds.get(b))
            .map(|bond| bond.order().ordinal())
            .sum()
    }

    /// Direction in which `bond` leaves `atom`.
    pub fn bond_angle(&self, bond: BondId, atom: AtomId) -> Option<f64> {
        let other = self.bonds.get(bond)?.other_end(atom)?;
        let origin = self.atoms.get(atom)?.center();
        Some(origin.angle_to(self.atoms.get(other)?.center()))
    }

    /// Directions of every bond leaving `atom`, in bond-list order.
    pub fn bond_angles(&self, atom: AtomId) -> Vec<f64> {
        let Some(a) = self.atoms.get(atom) else {
            return Vec::new();
        };
        a.bonds()
            .iter()
            .filter_map(|&b| self.bond_angle(b, atom))
            .collect()
    }

    /// A hydrogen that is conventionally left undrawn: no charge or isotope
    /// label and a single plain bond to a carbon.
    pub fn is_implicit(&self, atom: AtomId) -> bool {
        let Some(a) = self.atoms.get(atom) else {
            return false;
        };
        if a.element() != "H" || a.isotope() != 0 || a.charge() != 0 || a.bonds().len() != 1 {
            return false;
        }
        let Some(bond) = self.bonds.get(a.bonds()[0]) else {
            return false;
        };
        bond.is_plain_single()
            && bond
                .other_end(atom)
                .and_then(|n| self.atoms.get(n))
                .is_some_and(|n| n.element() == "C")
    }

    /// Whether the atom's label is drawn.
    ///
    /// Under skeleton display a plain carbon is hidden, except when it has
    /// no bonds or sits between exactly two double bonds (an allene center
    /// would otherwise be indistinguishable from one long double bond).
    pub fn is_visible(&self, atom: AtomId) -> bool {
        let Some(a) = self.atoms.get(atom) else {
            return false;
        };
        if a.display() == DisplayState::Hidden {
            return false;
        }
        if !self.settings.skeleton_display
            || a.element() != "C"
            || a.charge() != 0
            || a.isotope() != 0
        {
            return true;
        }
        match a.bonds() {
            [] => true,
            [b1, b2] => [b1, b2].iter().all(|&&b| {
                self.bonds
                    .get(b)
                    .is_some_and(|bond| bond.order() == BondOrder::Double)
            }),
            _ => false,
        }
    }

    /// Check every structural invariant: sequences match the arenas, every
    /// listed bond touches its atom, lists hold no duplicates, and every
    /// bond is listed on both endpoints.
    pub fn check_invariants(&self) -> Result<()> {
        if self.atom_order.len() != self.atoms.len() {
            return Err(StructuralInconsistency::IndexOutOfRange {
                kind: "atom",
                index: self.atom_order.len(),
                len: self.atoms.len(),
            });
        }
        if self.bond_order.len() != self.bonds.len() {
            return Err(StructuralInconsistency::IndexOutOfRange {
                kind: "bond",
                index: self.bond_order.len(),
                len: self.bonds.len(),
            });
        }
        for (position, &id) in self.atom_order.iter().enumerate() {
            let atom = self.atom_ref(id)?;
            if atom.id() != id {
                return Err(StructuralInconsistency::IndexMismatch {
                    kind: "atom",
                    position,
                    found: self.atom_index(atom.id()).unwrap_or(usize::MAX),
                });
            }
            let mut seen = HashSet::new();
            for &b in atom.bonds() {
                if !seen.insert(b) {
                    return Err(StructuralInconsistency::DuplicateBondReference {
                        atom: id,
                        bond: b,
                    });
                }
                if !self.bond_ref(b)?.connects(id) {
                    return Err(StructuralInconsistency::BondNotIncident { atom: id, bond: b });
                }
            }
        }
        for &id in &self.bond_order {
            let bond = self.bond_ref(id)?;
            for end in [bond.from(), bond.to()] {
                if !self.atom_ref(end)?.bonds().contains(&id) {
                    return Err(StructuralInconsistency::BondNotIncident { atom: end, bond: id });
                }
            }
        }
        Ok(())
    }
}
