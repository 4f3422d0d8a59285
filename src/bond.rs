use serde::{Deserialize, Serialize};

use crate::error::{Result, StructuralInconsistency};
use crate::geometry::BondGeometry;
use crate::ids::{AtomId, BondId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    /// Contribution of one bond of this order to an atom's total bond order.
    pub fn ordinal(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

/// Wedge style drawn from the `from` end of a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondStereo {
    #[default]
    None,
    Wedge,
    Hash,
    Either,
}

/// A bond between two atoms of the same [`Molecule`](crate::Molecule).
///
/// Endpoints are handles, never references; the molecule resolves them.
/// Like atoms, a bond caches its drawn geometry and must be validated before
/// that geometry is read.
#[derive(Debug, Clone)]
pub struct Bond {
    id: BondId,
    from: AtomId,
    to: AtomId,
    order: BondOrder,
    stereo: BondStereo,
    valid: bool,
    vertices_stale: bool,
    geometry: Option<BondGeometry>,
}

impl Bond {
    pub(crate) fn new(
        id: BondId,
        from: AtomId,
        to: AtomId,
        order: BondOrder,
        stereo: BondStereo,
    ) -> Self {
        Self {
            id,
            from,
            to,
            order,
            stereo,
            valid: false,
            vertices_stale: true,
            geometry: None,
        }
    }

    pub fn id(&self) -> BondId {
        self.id
    }

    pub fn from(&self) -> AtomId {
        self.from
    }

    pub fn to(&self) -> AtomId {
        self.to
    }

    pub fn order(&self) -> BondOrder {
        self.order
    }

    pub fn stereo(&self) -> BondStereo {
        self.stereo
    }

    pub fn connects(&self, atom: AtomId) -> bool {
        self.from == atom || self.to == atom
    }

    /// The endpoint opposite `atom`, or `None` if `atom` is not an endpoint.
    pub fn other_end(&self, atom: AtomId) -> Option<AtomId> {
        if self.from == atom {
            Some(self.to)
        } else if self.to == atom {
            Some(self.from)
        } else {
            None
        }
    }

    /// Single order with no stereo marking.
    pub fn is_plain_single(&self) -> bool {
        self.order == BondOrder::Single && self.stereo == BondStereo::None
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn geometry(&self) -> Result<&BondGeometry> {
        match (&self.geometry, self.valid) {
            (Some(geometry), true) => Ok(geometry),
            _ => Err(StructuralInconsistency::StaleBondGeometry(self.id)),
        }
    }

    /// Point the `old` endpoint at `new`. Returns false if `old` is not an
    /// endpoint.
    pub(crate) fn replace_atom(&mut self, old: AtomId, new: AtomId) -> bool {
        let replaced = if self.from == old {
            self.from = new;
            true
        } else if self.to == old {
            self.to = new;
            true
        } else {
            false
        };
        if replaced {
            self.valid = false;
            self.vertices_stale = true;
        }
        replaced
    }

    pub(crate) fn swap_ends(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        self.valid = false;
        self.vertices_stale = true;
    }

    pub(crate) fn set_order(&mut self, order: BondOrder) {
        self.order = order;
        self.valid = false;
    }

    pub(crate) fn set_stereo(&mut self, stereo: BondStereo) {
        self.stereo = stereo;
        self.valid = false;
    }

    /// Mark the bond stale because `endpoint` changed. A moved center makes
    /// the cached vertices stale as well as the label clearance.
    pub(crate) fn invalidate_from(&mut self, endpoint: AtomId, new_center: bool) {
        debug_assert!(self.connects(endpoint));
        self.valid = false;
        self.vertices_stale |= new_center;
    }

    pub(crate) fn needs_vertices(&self) -> bool {
        self.vertices_stale || self.geometry.is_none()
    }

    pub(crate) fn cached_geometry(&self) -> Option<&BondGeometry> {
        self.geometry.as_ref()
    }

    pub(crate) fn store_geometry(&mut self, geometry: BondGeometry) {
        self.geometry = Some(geometry);
        self.vertices_stale = false;
        self.valid = true;
    }
}

impl PartialEq for Bond {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Bond {}
