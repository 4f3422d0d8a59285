use slotmap::new_key_type;

new_key_type! {
    /// Handle to an atom owned by a [`Molecule`](crate::Molecule).
    ///
    /// Handles are generation-tagged: once the atom is removed the handle
    /// never resolves again, even if its slot is reused.
    pub struct AtomId;

    /// Handle to a bond owned by a [`Molecule`](crate::Molecule).
    pub struct BondId;
}
