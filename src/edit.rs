//! Structural edits driven by the editor's tools.

use log::debug;

use crate::atom::DEFAULT_ELEMENT;
use crate::bond::{BondOrder, BondStereo};
use crate::error::{Result, StructuralInconsistency};
use crate::ids::{AtomId, BondId};
use crate::invalidation::Change;
use crate::molecule::Molecule;
use crate::placement::{place_one, place_two, separation};

/// Total bond order of a saturated carbon.
const CARBON_VALENCE: u32 = 4;

/// Request for a new bond to a new atom, as issued by a drawing tool.
/// Unset fields take their defaults: the configured bond length, a carbon,
/// and a plain single bond.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewBond {
    pub angle: f64,
    pub length: Option<f64>,
    pub element: Option<String>,
    pub order: Option<BondOrder>,
    pub stereo: Option<BondStereo>,
}

impl NewBond {
    pub fn at_angle(angle: f64) -> Self {
        Self {
            angle,
            ..Self::default()
        }
    }

    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn order(mut self, order: BondOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn stereo(mut self, stereo: BondStereo) -> Self {
        self.stereo = Some(stereo);
        self
    }
}

/// What [`add_new_bond`] created. A drag tool keeps this to keep rotating
/// the new bond while the pointer moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewBondHandle {
    pub atom: AtomId,
    pub bond: BondId,
    pub start_angle: f64,
    pub current_angle: f64,
}

/// Grow a new atom off `from` in the requested direction and bond the two.
///
/// The new atom sits `length` away from `from` at `request.angle`. Nothing
/// is validated here; the caller schedules the repaint.
pub fn add_new_bond(mol: &mut Molecule, from: AtomId, request: &NewBond) -> Result<NewBondHandle> {
    let origin = mol.atom_ref(from)?.center();
    let length = request.length.unwrap_or(mol.settings().bond_length);
    let element = request.element.as_deref().unwrap_or(DEFAULT_ELEMENT);

    let atom = mol.add_atom(origin.polar(request.angle, length), element);
    let bond = mol.add_bond(
        from,
        atom,
        request.order.unwrap_or_default(),
        request.stereo.unwrap_or_default(),
    )?;
    debug!("new bond {bond:?} from {from:?} to {element} at {:.3} rad", request.angle);

    Ok(NewBondHandle {
        atom,
        bond,
        start_angle: request.angle,
        current_angle: request.angle,
    })
}

/// Saturate a carbon with explicit hydrogens.
///
/// A carbon between two single bonds that form a clear bend gets both
/// hydrogens at once, fanned symmetrically into the open side. Any other
/// carbon gets hydrogens one at a time, each into the widest remaining gap,
/// until its total bond order reaches four. Non-carbon atoms are left
/// alone. Returns the added bonds.
pub fn add_implicit_hydrogens(mol: &mut Molecule, atom: AtomId) -> Result<Vec<NewBondHandle>> {
    if mol.atom_ref(atom)?.element() != "C" {
        return Ok(Vec::new());
    }

    let mut added = Vec::new();
    let angles = mol.bond_angles(atom);
    if let (&[first, second], 2) = (angles.as_slice(), mol.total_bond_order(atom)) {
        let bend = (std::f64::consts::PI - separation(first, second)).abs();
        if bend > mol.settings().straight_tolerance {
            match place_two(&angles) {
                Some(slots) => {
                    for angle in slots {
                        let request = NewBond::at_angle(angle).element("H");
                        added.push(add_new_bond(mol, atom, &request)?);
                    }
                }
                None => debug!("no symmetric hydrogen placement around {atom:?}"),
            }
            return Ok(added);
        }
    }

    while mol.total_bond_order(atom) < CARBON_VALENCE {
        let angle = place_one(&mol.bond_angles(atom));
        added.push(add_new_bond(mol, atom, &NewBond::at_angle(angle).element("H"))?);
    }
    debug!("added {} hydrogens to {atom:?}", added.len());
    Ok(added)
}

/// Merge `absorb` into `keep`.
///
/// Every bond of `absorb` is re-pointed at `keep`, then `absorb` is
/// removed. A bond joining the two atoms would become a loop and is
/// dropped, as is a bond to an atom `keep` is already bonded to; the
/// neighbour's reference then collapses onto the surviving bond.
pub fn merge_atoms(mol: &mut Molecule, keep: AtomId, absorb: AtomId) -> Result<()> {
    if keep == absorb {
        return Ok(());
    }
    mol.atom_ref(keep)?;
    let moved = mol.atom_ref(absorb)?.bonds().to_vec();

    let mut touched = Vec::new();
    for bond_id in moved {
        let other = mol
            .bond_ref(bond_id)?
            .other_end(absorb)
            .ok_or(StructuralInconsistency::BondNotIncident {
                atom: absorb,
                bond: bond_id,
            })?;

        if other == keep {
            mol.remove_bond(bond_id)?;
            continue;
        }

        if let Some(existing) = mol.neighbor_bond(keep, other) {
            mol.replace_atom_bond(other, bond_id, existing)?;
            mol.atom_entry(absorb)?
                .map_bonds(|b| (b != bond_id).then_some(b))?;
            mol.discard_bond(bond_id)?;
            touched.push(other);
            continue;
        }

        mol.bond_entry(bond_id)?.replace_atom(absorb, keep);
        mol.atom_entry(keep)?.push_bond(bond_id)?;
        touched.push(other);
    }

    mol.discard_atom(absorb)?;

    mol.invalidate_atom(keep, Change::Center)?;
    for other in touched {
        mol.invalidate_atom(other, Change::Attributes)?;
    }
    debug!("merged {absorb:?} into {keep:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn hydrogens(mol: &Molecule, atom: AtomId) -> usize {
        mol.neighbors(atom)
            .into_iter()
            .filter(|&n| mol.atom(n).is_some_and(|a| a.element() == "H"))
            .count()
    }

    #[test]
    fn new_bond_position_uses_screen_y() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::new(100.0, 100.0), "C");
        let handle = add_new_bond(&mut mol, c, &NewBond::at_angle(FRAC_PI_2)).unwrap();
        let center = mol.atom(handle.atom).unwrap().center();
        assert!((center.x - 100.0).abs() < 1e-9);
        assert!((center.y - 60.0).abs() < 1e-9);
        assert_eq!(handle.start_angle, FRAC_PI_2);
        assert_eq!(handle.current_angle, FRAC_PI_2);
        assert_eq!(mol.atom(handle.atom).unwrap().element(), "C");
        assert_eq!(mol.neighbor_bond(c, handle.atom), Some(handle.bond));
    }

    #[test]
    fn new_bond_honours_request() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::default(), "C");
        let request = NewBond::at_angle(0.0)
            .length(10.0)
            .element("O")
            .order(BondOrder::Double)
            .stereo(BondStereo::Wedge);
        let handle = add_new_bond(&mut mol, c, &request).unwrap();
        let bond = mol.bond(handle.bond).unwrap();
        assert_eq!(bond.order(), BondOrder::Double);
        assert_eq!(bond.stereo(), BondStereo::Wedge);
        assert_eq!(bond.from(), c);
        assert_eq!(mol.atom(handle.atom).unwrap().center(), Point::new(10.0, 0.0));
    }

    #[test]
    fn methane_from_bare_carbon() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::default(), "C");
        let added = add_implicit_hydrogens(&mut mol, c).unwrap();
        assert_eq!(added.len(), 4);
        assert_eq!(mol.total_bond_order(c), 4);
        assert_eq!(hydrogens(&mol, c), 4);
        mol.check_invariants().unwrap();
    }

    #[test]
    fn double_bond_leaves_room_for_two() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::default(), "C");
        let carbonyl = NewBond::at_angle(0.0).element("O").order(BondOrder::Double);
        add_new_bond(&mut mol, c, &carbonyl).unwrap();
        let added = add_implicit_hydrogens(&mut mol, c).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(mol.total_bond_order(c), 4);
    }

    #[test]
    fn saturated_carbon_is_untouched() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::default(), "C");
        for i in 0..4 {
            add_new_bond(&mut mol, c, &NewBond::at_angle(i as f64 * FRAC_PI_2)).unwrap();
        }
        assert!(add_implicit_hydrogens(&mut mol, c).unwrap().is_empty());
        assert_eq!(mol.atom_count(), 5);
    }

    #[test]
    fn nitrogen_is_skipped() {
        let mut mol = Molecule::default();
        let n = mol.add_atom(Point::default(), "N");
        assert!(add_implicit_hydrogens(&mut mol, n).unwrap().is_empty());
    }

    #[test]
    fn bent_carbon_gets_symmetric_pair() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::default(), "C");
        add_new_bond(&mut mol, c, &NewBond::at_angle(0.0)).unwrap();
        add_new_bond(&mut mol, c, &NewBond::at_angle(FRAC_PI_2)).unwrap();

        let added = add_implicit_hydrogens(&mut mol, c).unwrap();
        assert_eq!(added.len(), 2);
        assert!(separation(added[0].start_angle, PI) < 1e-9);
        assert!(separation(added[1].start_angle, 3.0 * FRAC_PI_2) < 1e-9);
        assert_eq!(mol.total_bond_order(c), 4);
    }

    // Two bonds within straight_tolerance of a line never take the paired
    // placement; hydrogens go in one at a time.
    #[test]
    fn straight_carbon_saturates_one_by_one() {
        let mut mol = Molecule::default();
        let c = mol.add_atom(Point::default(), "C");
        add_new_bond(&mut mol, c, &NewBond::at_angle(0.0)).unwrap();
        add_new_bond(&mut mol, c, &NewBond::at_angle(PI)).unwrap();

        let added = add_implicit_hydrogens(&mut mol, c).unwrap();
        assert_eq!(added.len(), 2);
        assert!(separation(added[0].start_angle, FRAC_PI_2) < 1e-9);
        assert!(separation(added[1].start_angle, 3.0 * FRAC_PI_2) < 1e-9);
    }

    #[test]
    fn merge_moves_bonds_to_survivor() {
        let mut mol = Molecule::default();
        let a = mol.add_atom(Point::new(0.0, 0.0), "C");
        let x = mol.add_atom(Point::new(-40.0, 0.0), "C");
        let b = mol.add_atom(Point::new(40.0, 0.0), "C");
        let y = mol.add_atom(Point::new(80.0, 0.0), "O");
        let z = mol.add_atom(Point::new(40.0, 40.0), "N");
        let ax = mol.add_bond(a, x, BondOrder::Single, BondStereo::None).unwrap();
        let by = mol.add_bond(b, y, BondOrder::Single, BondStereo::None).unwrap();
        let bz = mol.add_bond(b, z, BondOrder::Double, BondStereo::None).unwrap();

        merge_atoms(&mut mol, a, b).unwrap();

        assert!(mol.atom(b).is_none());
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.atom(a).unwrap().bonds(), &[ax, by, bz]);
        assert_eq!(mol.bond(by).unwrap().other_end(y), Some(a));
        assert_eq!(mol.bond(bz).unwrap().other_end(z), Some(a));
        assert!(mol.atoms().all(|atom| atom.id() != b));
        mol.check_invariants().unwrap();
    }

    #[test]
    fn merge_drops_loop_and_parallel_bonds() {
        let mut mol = Molecule::default();
        let a = mol.add_atom(Point::new(0.0, 0.0), "C");
        let b = mol.add_atom(Point::new(40.0, 0.0), "C");
        let n = mol.add_atom(Point::new(20.0, 30.0), "N");
        let ab = mol.add_bond(a, b, BondOrder::Single, BondStereo::None).unwrap();
        let an = mol.add_bond(a, n, BondOrder::Single, BondStereo::None).unwrap();
        let bn = mol.add_bond(b, n, BondOrder::Single, BondStereo::None).unwrap();

        merge_atoms(&mut mol, a, b).unwrap();

        assert_eq!(mol.bond_count(), 1);
        assert!(mol.bond(ab).is_none());
        assert!(mol.bond(bn).is_none());
        assert_eq!(mol.atom(a).unwrap().bonds(), &[an]);
        assert_eq!(mol.atom(n).unwrap().bonds(), &[an]);
        mol.check_invariants().unwrap();
    }

    #[test]
    fn merge_leaves_no_trace_of_absorbed_atom() {
        let mut mol = Molecule::default();
        let a = mol.add_atom(Point::new(0.0, 0.0), "C");
        let b = mol.add_atom(Point::new(40.0, 0.0), "C");
        let n = mol.add_atom(Point::new(20.0, 30.0), "N");
        let o = mol.add_atom(Point::new(80.0, 0.0), "O");
        let an = mol.add_bond(a, n, BondOrder::Single, BondStereo::None).unwrap();
        let bn = mol.add_bond(b, n, BondOrder::Single, BondStereo::None).unwrap();
        let bo = mol.add_bond(b, o, BondOrder::Single, BondStereo::None).unwrap();

        merge_atoms(&mut mol, a, b).unwrap();

        assert_eq!(mol.atom_ids(), &[a, n, o]);
        assert_eq!(mol.bond_ids(), &[an, bo]);
        assert_eq!(mol.bond_index(bn), None);
        assert_eq!(mol.atom_index(b), None);
        assert_eq!(mol.atom_config(o).unwrap().bonds, vec![1]);
        mol.check_invariants().unwrap();
    }

    #[test]
    fn merge_with_itself_is_noop() {
        let mut mol = Molecule::default();
        let a = mol.add_atom(Point::default(), "C");
        merge_atoms(&mut mol, a, a).unwrap();
        assert_eq!(mol.atom_count(), 1);
    }
}
