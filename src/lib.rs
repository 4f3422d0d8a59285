pub mod atom;
pub mod bond;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod ids;
pub mod invalidation;
pub mod ketcher;
pub mod molecule;
pub mod placement;
pub mod point;
pub mod settings;
pub mod snapshot;

pub use atom::{Atom, DisplayState};
pub use bond::{Bond, BondOrder, BondStereo};
pub use edit::{add_implicit_hydrogens, add_new_bond, merge_atoms, NewBond, NewBondHandle};
pub use error::{Result, StructuralInconsistency};
pub use geometry::{BondGeometry, LabelGeometry, Rect};
pub use graph::{connectivity, fragment_of, fragments, translate_fragment};
pub use ids::{AtomId, BondId};
pub use invalidation::{Change, Scope, ValidationReport};
pub use ketcher::{ketcher_atom, KetcherAtom, KetcherContext};
pub use molecule::Molecule;
pub use placement::{place_one, place_two};
pub use point::Point;
pub use settings::Settings;
pub use snapshot::{AtomConfig, BondConfig, IndexRemap, MoleculeSnapshot};

#[cfg(test)]
mod tests;
