use thiserror::Error;

use crate::ids::{AtomId, BondId};

/// A broken structural invariant.
///
/// These are the only failures the model reports. Lookups that are part of
/// normal editing (neighbour search, placement) return `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralInconsistency {
    #[error("atom {0:?} is not part of this molecule")]
    UnknownAtom(AtomId),

    #[error("bond {0:?} is not part of this molecule")]
    UnknownBond(BondId),

    #[error("label geometry of atom {0:?} read before validation")]
    StaleGeometry(AtomId),

    #[error("geometry of bond {0:?} read before validation")]
    StaleBondGeometry(BondId),

    #[error("atom {atom:?} would reference bond {bond:?} more than once")]
    DuplicateBondReference { atom: AtomId, bond: BondId },

    #[error("atom {0:?} cannot be bonded to itself")]
    SelfBond(AtomId),

    #[error("atoms {from:?} and {to:?} are already joined by bond {existing:?}")]
    ParallelBond {
        from: AtomId,
        to: AtomId,
        existing: BondId,
    },

    #[error("bond {bond:?} is listed on atom {atom:?} but does not touch it")]
    BondNotIncident { atom: AtomId, bond: BondId },

    #[error("{kind} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{kind} at position {position} claims index {found}")]
    IndexMismatch {
        kind: &'static str,
        position: usize,
        found: usize,
    },
}

pub type Result<T, E = StructuralInconsistency> = std::result::Result<T, E>;
