use serde::{Deserialize, Serialize};

use crate::error::{Result, StructuralInconsistency};
use crate::geometry::LabelGeometry;
use crate::ids::{AtomId, BondId};
use crate::point::Point;

/// Element used when none (or an empty one) is given.
pub const DEFAULT_ELEMENT: &str = "C";

/// Interaction state the drawing layer styles an atom with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    #[default]
    Normal,
    Hover,
    Active,
    Hidden,
}

/// Normalize an element label as typed by the user.
///
/// Deuterium is stored as hydrogen (the isotope carries the mass), and a
/// blank label falls back to carbon.
///
/// ```
/// use molsketch::atom::normalize_element;
///
/// assert_eq!(normalize_element("D"), "H");
/// assert_eq!(normalize_element(" N "), "N");
/// assert_eq!(normalize_element(""), "C");
/// ```
pub fn normalize_element(element: &str) -> String {
    match element.trim() {
        "" => DEFAULT_ELEMENT.to_string(),
        "D" => "H".to_string(),
        other => other.to_string(),
    }
}

/// An atom of a [`Molecule`](crate::Molecule).
///
/// `Atom` holds the attributes you would read off a structural drawing:
/// position, element label, charge and isotope, plus the handles of its
/// bonds. It also caches its [`LabelGeometry`]. The cache is only readable
/// after the molecule has validated the atom; every edit that can change
/// the label marks it invalid again.
///
/// Atoms are only created and edited through the owning molecule, which
/// keeps bond lists and caches consistent. Two atoms are equal when they
/// are the same atom, regardless of their attributes.
///
/// # Examples
///
/// ```
/// use molsketch::{Molecule, Point};
///
/// let mut mol = Molecule::default();
/// let n = mol.add_atom(Point::new(0.0, 0.0), "N");
/// let atom = mol.atom(n).unwrap();
/// assert_eq!(atom.element(), "N");
/// assert_eq!(atom.charge(), 0);
/// assert!(!atom.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct Atom {
    id: AtomId,
    center: Point,
    element: String,
    /// Formal charge in elementary charge units.
    charge: i32,
    /// Mass number. `0` means natural abundance.
    isotope: u32,
    bonds: Vec<BondId>,
    display: DisplayState,
    valid: bool,
    label: Option<LabelGeometry>,
}

impl Atom {
    pub(crate) fn new(id: AtomId, center: Point, element: &str) -> Self {
        Self {
            id,
            center,
            element: normalize_element(element),
            charge: 0,
            isotope: 0,
            bonds: Vec::new(),
            display: DisplayState::Normal,
            valid: false,
            label: None,
        }
    }

    pub fn id(&self) -> AtomId {
        self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn isotope(&self) -> u32 {
        self.isotope
    }

    pub fn bonds(&self) -> &[BondId] {
        &self.bonds
    }

    pub fn display(&self) -> DisplayState {
        self.display
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The cached label layout.
    ///
    /// Fails with [`StructuralInconsistency::StaleGeometry`] unless the atom
    /// was validated after its last edit.
    pub fn label_geometry(&self) -> Result<&LabelGeometry> {
        match (&self.label, self.valid) {
            (Some(label), true) => Ok(label),
            _ => Err(StructuralInconsistency::StaleGeometry(self.id)),
        }
    }

    pub(crate) fn set_element(&mut self, element: &str) {
        self.element = normalize_element(element);
    }

    pub(crate) fn set_charge(&mut self, charge: i32) {
        self.charge = charge;
    }

    pub(crate) fn set_isotope(&mut self, isotope: u32) {
        self.isotope = isotope;
    }

    pub(crate) fn set_display(&mut self, display: DisplayState) {
        self.display = display;
    }

    pub(crate) fn center_mut(&mut self) -> &mut Point {
        &mut self.center
    }

    pub(crate) fn push_bond(&mut self, bond: BondId) -> Result<()> {
        if self.bonds.contains(&bond) {
            return Err(StructuralInconsistency::DuplicateBondReference {
                atom: self.id,
                bond,
            });
        }
        self.bonds.push(bond);
        Ok(())
    }

    pub(crate) fn take_bonds(&mut self) -> Vec<BondId> {
        std::mem::take(&mut self.bonds)
    }

    /// Rewrite every bond reference through `map`; `None` drops the entry.
    ///
    /// This never invalidates the atom: it runs while references are being
    /// rewritten, when bond data is not yet consistent. On a duplicate the
    /// list is left untouched.
    pub(crate) fn map_bonds<F>(&mut self, mut map: F) -> Result<()>
    where
        F: FnMut(BondId) -> Option<BondId>,
    {
        let mut mapped = Vec::with_capacity(self.bonds.len());
        for &old in &self.bonds {
            if let Some(new) = map(old) {
                if mapped.contains(&new) {
                    return Err(StructuralInconsistency::DuplicateBondReference {
                        atom: self.id,
                        bond: new,
                    });
                }
                mapped.push(new);
            }
        }
        self.bonds = mapped;
        Ok(())
    }

    /// Relabel `old` as `new`. If `new` is already listed, the `old` entry
    /// is removed instead so the list never holds a duplicate. Returns
    /// false when `old` is not listed.
    pub(crate) fn replace_bond(&mut self, old: BondId, new: BondId) -> bool {
        let Some(pos) = self.bonds.iter().position(|&b| b == old) else {
            return false;
        };
        if old != new && self.bonds.contains(&new) {
            self.bonds.remove(pos);
        } else {
            self.bonds[pos] = new;
        }
        true
    }

    pub(crate) fn mark_invalid(&mut self) {
        self.valid = false;
    }

    pub(crate) fn store_label(&mut self, label: LabelGeometry) {
        self.label = Some(label);
        self.valid = true;
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Atom {}
