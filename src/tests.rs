use crate::*;

fn carbon(mol: &mut Molecule, x: f64, y: f64) -> AtomId {
    mol.add_atom(Point::new(x, y), "C")
}

fn single(mol: &mut Molecule, a: AtomId, b: AtomId) -> BondId {
    mol.add_bond(a, b, BondOrder::Single, BondStereo::None).unwrap()
}

#[test]
fn bond_lists_stay_consistent_through_edits() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    let b = carbon(&mut mol, 40.0, 0.0);
    let c = carbon(&mut mol, 80.0, 0.0);
    let d = mol.add_atom(Point::new(120.0, 0.0), "O");
    single(&mut mol, a, b);
    let bc = single(&mut mol, b, c);
    single(&mut mol, c, d);
    mol.check_invariants().unwrap();

    mol.remove_bond(bc).unwrap();
    mol.check_invariants().unwrap();
    mol.remove_atom(a).unwrap();
    mol.check_invariants().unwrap();
    add_implicit_hydrogens(&mut mol, c).unwrap();
    mol.check_invariants().unwrap();
    merge_atoms(&mut mol, b, c).unwrap();
    mol.check_invariants().unwrap();

    for atom in mol.atoms() {
        for &bond in atom.bonds() {
            assert!(mol.bond(bond).unwrap().connects(atom.id()));
        }
    }
}

#[test]
fn validation_is_idempotent() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    let b = mol.add_atom(Point::new(40.0, 0.0), "N");
    single(&mut mol, a, b);

    let first = mol.validate();
    assert_eq!(first, ValidationReport { atoms: 2, bonds: 1 });
    assert!(mol.validate().is_empty());
    assert!(mol.atoms().all(Atom::is_valid));
    assert!(mol.bonds().all(Bond::is_valid));
}

#[test]
fn geometry_is_refused_until_validated() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    let b = carbon(&mut mol, 40.0, 0.0);
    let ab = single(&mut mol, a, b);

    assert_eq!(
        mol.atom(a).unwrap().label_geometry().unwrap_err(),
        StructuralInconsistency::StaleGeometry(a)
    );
    assert_eq!(
        mol.bond(ab).unwrap().geometry().unwrap_err(),
        StructuralInconsistency::StaleBondGeometry(ab)
    );

    mol.validate();
    let geometry = mol.bond(ab).unwrap().geometry().unwrap();
    assert_eq!(geometry.start, Point::new(0.0, 0.0));
    assert_eq!(geometry.end, Point::new(40.0, 0.0));
}

#[test]
fn moving_an_atom_refreshes_only_nearby_geometry() {
    let mut mol = Molecule::default();
    let ids: Vec<AtomId> = (0..5).map(|i| carbon(&mut mol, i as f64 * 40.0, 0.0)).collect();
    for pair in ids.windows(2) {
        single(&mut mol, pair[0], pair[1]);
    }
    mol.validate();

    mol.translate_atom(ids[0], 0.0, 10.0).unwrap();
    let report = mol.validate();
    assert_eq!(report, ValidationReport { atoms: 1, bonds: 2 });
}

#[test]
fn snapshot_is_a_detached_copy() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    let b = carbon(&mut mol, 40.0, 0.0);
    single(&mut mol, a, b);

    let mut config = mol.atom_config(a).unwrap();
    config.bonds.push(99);
    config.element = "Cl".to_string();
    assert_eq!(mol.atom(a).unwrap().bonds().len(), 1);
    assert_eq!(mol.atom(a).unwrap().element(), "C");
    assert_eq!(mol.atom_config(a).unwrap().bonds, vec![0]);
}

#[test]
fn snapshot_round_trip_preserves_structure() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    add_implicit_hydrogens(&mut mol, a).unwrap();
    let o = mol.add_atom(Point::new(-40.0, 0.0), "O");
    mol.set_isotope(o, 18).unwrap();
    mol.set_charge(o, -1).unwrap();

    let snapshot = mol.snapshot().unwrap();
    let restored = Molecule::from_snapshot(&snapshot, mol.settings().clone()).unwrap();
    assert_eq!(restored.atom_count(), 6);
    assert_eq!(restored.bond_count(), 4);
    assert_eq!(restored.snapshot().unwrap(), snapshot);
}

#[test]
fn hydrogen_on_carbon_is_implicit() {
    let mut mol = Molecule::default();
    let c = carbon(&mut mol, 0.0, 0.0);
    let h = add_new_bond(&mut mol, c, &NewBond::at_angle(0.0).element("H"))
        .unwrap()
        .atom;
    assert!(mol.is_implicit(h));

    mol.set_isotope(h, 2).unwrap();
    assert!(!mol.is_implicit(h));
    mol.set_isotope(h, 0).unwrap();
    mol.set_charge(h, 1).unwrap();
    assert!(!mol.is_implicit(h));
}

#[test]
fn hydrogen_off_carbon_or_multiply_bonded_is_explicit() {
    let mut mol = Molecule::default();
    let o = mol.add_atom(Point::default(), "O");
    let h = add_new_bond(&mut mol, o, &NewBond::at_angle(0.0).element("H"))
        .unwrap()
        .atom;
    assert!(!mol.is_implicit(h));

    let c = carbon(&mut mol, 100.0, 0.0);
    let h2 = add_new_bond(
        &mut mol,
        c,
        &NewBond::at_angle(0.0).element("H").order(BondOrder::Double),
    )
    .unwrap()
    .atom;
    assert!(!mol.is_implicit(h2));

    let lone = mol.add_atom(Point::new(0.0, 100.0), "H");
    assert!(!mol.is_implicit(lone));
}

#[test]
fn deuterium_is_stored_as_hydrogen() {
    let mut mol = Molecule::default();
    let d = mol.add_atom(Point::default(), "D");
    assert_eq!(mol.atom(d).unwrap().element(), "H");
    let blank = mol.add_atom(Point::default(), "");
    assert_eq!(mol.atom(blank).unwrap().element(), "C");
}

#[test]
fn skeleton_hides_backbone_carbons() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    let b = carbon(&mut mol, 40.0, 0.0);
    let c = carbon(&mut mol, 80.0, 0.0);
    single(&mut mol, a, b);
    single(&mut mol, b, c);
    let lone = carbon(&mut mol, 0.0, 100.0);

    assert!(!mol.is_visible(b));
    assert!(mol.is_visible(lone));

    mol.set_settings(Settings {
        skeleton_display: false,
        ..Settings::default()
    });
    assert!(mol.is_visible(b));
}

#[test]
fn allene_center_stays_visible() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    let b = carbon(&mut mol, 40.0, 0.0);
    let c = carbon(&mut mol, 80.0, 0.0);
    mol.add_bond(a, b, BondOrder::Double, BondStereo::None).unwrap();
    mol.add_bond(b, c, BondOrder::Double, BondStereo::None).unwrap();
    assert!(mol.is_visible(b));
}

#[test]
fn merge_scenario_keeps_positions_dense() {
    let mut mol = Molecule::default();
    let a = carbon(&mut mol, 0.0, 0.0);
    let b = carbon(&mut mol, 40.0, 0.0);
    let x = carbon(&mut mol, 40.0, 40.0);
    let y = carbon(&mut mol, 80.0, 0.0);
    single(&mut mol, b, x);
    single(&mut mol, b, y);
    mol.validate();
    mol.take_repaint();

    merge_atoms(&mut mol, a, b).unwrap();
    assert!(mol.take_repaint());
    assert_eq!(mol.atom_ids(), &[a, x, y]);
    assert_eq!(mol.atom_index(y), Some(2));
    assert_eq!(mol.neighbors(a), vec![x, y]);
    assert!(!mol.atom(a).unwrap().is_valid());
    assert_eq!(fragments(&mol), vec![vec![a, x, y]]);
}

#[test]
fn ketcher_export_follows_settings_unit() {
    let mut mol = Molecule::new(Settings {
        bond_length_unit: 20.0,
        ..Settings::default()
    });
    let s = mol.add_atom(Point::new(20.0, 60.0), "S");
    let record = ketcher_atom(&mol, s, &KetcherContext::from(mol.settings())).unwrap();
    assert_eq!(record.label, "S");
    assert_eq!(record.position, Point::new(1.0, 3.0));
}
