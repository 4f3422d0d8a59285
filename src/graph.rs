//! Connectivity queries over a molecule.
//!
//! Built on a petgraph view keyed by atom handles, so results stay valid
//! handles into the molecule.

use std::collections::HashSet;

use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;

use crate::error::Result;
use crate::ids::{AtomId, BondId};
use crate::molecule::Molecule;

pub fn connectivity(mol: &Molecule) -> UnGraphMap<AtomId, BondId> {
    let mut graph = UnGraphMap::with_capacity(mol.atom_count(), mol.bond_count());
    for atom in mol.atoms() {
        graph.add_node(atom.id());
    }
    for bond in mol.bonds() {
        graph.add_edge(bond.from(), bond.to(), bond.id());
    }
    graph
}

fn reachable(graph: &UnGraphMap<AtomId, BondId>, start: AtomId) -> HashSet<AtomId> {
    let mut seen = HashSet::new();
    let mut bfs = Bfs::new(graph, start);
    while let Some(atom) = bfs.next(graph) {
        seen.insert(atom);
    }
    seen
}

/// Every atom connected to `atom`, itself included, in index order. Empty
/// for an unknown atom.
pub fn fragment_of(mol: &Molecule, atom: AtomId) -> Vec<AtomId> {
    if mol.atom(atom).is_none() {
        return Vec::new();
    }
    let members = reachable(&connectivity(mol), atom);
    mol.atom_ids()
        .iter()
        .copied()
        .filter(|a| members.contains(a))
        .collect()
}

/// Connected fragments, each in index order, ordered by their first atom.
pub fn fragments(mol: &Molecule) -> Vec<Vec<AtomId>> {
    let graph = connectivity(mol);
    let mut assigned = HashSet::new();
    let mut result = Vec::new();
    for &atom in mol.atom_ids() {
        if assigned.contains(&atom) {
            continue;
        }
        let members = reachable(&graph, atom);
        let fragment: Vec<AtomId> = mol
            .atom_ids()
            .iter()
            .copied()
            .filter(|a| members.contains(a))
            .collect();
        assigned.extend(members);
        result.push(fragment);
    }
    result
}

/// Move the whole fragment containing `atom`.
pub fn translate_fragment(
    mol: &mut Molecule,
    atom: AtomId,
    dx: f64,
    dy: f64,
) -> Result<Vec<AtomId>> {
    mol.atom_ref(atom)?;
    let members = fragment_of(mol, atom);
    for &member in &members {
        mol.translate_atom(member, dx, dy)?;
    }
    Ok(members)
}
