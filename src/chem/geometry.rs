use super::{BondOrder, Molecule};

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Angle a-b-c in degrees, with `b` at the vertex.
pub fn angle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let u = sub(a, b);
    let v = sub(c, b);
    let denom = (dot(u, u) * dot(v, v)).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (dot(u, v) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Neutral nitrogen with exactly three neighbours, all joined by plain
/// single bonds, i.e. one that can pyramidally invert.
pub fn is_invertible_nitrogen(mol: &Molecule, atom: usize) -> bool {
    let Some(a) = mol.atoms.get(atom) else {
        return false;
    };
    a.element == "N"
        && a.formal_charge == 0
        && mol.bonds_of(atom).count() == 3
        && mol.bonds_of(atom).all(|b| b.order == BondOrder::Single)
}

/// `(atom index, sum of the three bond angles)` for every invertible
/// nitrogen. A planar nitrogen sums to 360 degrees.
pub fn invertible_nitrogen_angle_sums(mol: &Molecule) -> Vec<(usize, f64)> {
    (0..mol.atoms.len())
        .filter(|&i| is_invertible_nitrogen(mol, i))
        .map(|i| {
            let nb = mol.neighbors(i);
            let p = |k: usize| mol.atoms[nb[k]].position;
            let center = mol.atoms[i].position;
            let sum = angle(p(0), center, p(1)) + angle(p(1), center, p(2)) + angle(p(2), center, p(0));
            (i, sum)
        })
        .collect()
}

/// Consecutive records that are conformers of one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformerGroup {
    pub title: String,
    /// Indices into the record list.
    pub members: Vec<usize>,
}

/// Group consecutive records sharing a title and atom graph.
pub fn group_conformers(molecules: &[Molecule]) -> Vec<ConformerGroup> {
    let mut groups: Vec<ConformerGroup> = Vec::new();
    for (i, mol) in molecules.iter().enumerate() {
        let continues = groups
            .last()
            .is_some_and(|g| g.title == mol.title && molecules[g.members[0]].same_graph(mol));
        match groups.last_mut() {
            Some(g) if continues => g.members.push(i),
            _ => groups.push(ConformerGroup {
                title: mol.title.clone(),
                members: vec![i],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::Atom;

    /// NH3-like fragment; `height` lifts N above the plane of the H atoms.
    fn amine(title: &str, height: f64) -> Molecule {
        let mut mol = Molecule::new(title);
        let n = mol.add_atom(Atom::new("N", [0.0, 0.0, height]).unwrap());
        for k in 0..3 {
            let t = (k as f64) * 120f64.to_radians();
            let h = mol.add_atom(Atom::new("H", [t.cos(), t.sin(), 0.0]).unwrap());
            mol.add_bond(n, h, BondOrder::Single).unwrap();
        }
        mol
    }

    #[test]
    fn right_angle() {
        assert!((angle([1.0, 0.0, 0.0], [0.0; 3], [0.0, 2.0, 0.0]) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn planar_and_pyramidal_nitrogen() {
        let planar = invertible_nitrogen_angle_sums(&amine("flat", 0.0));
        assert_eq!(planar.len(), 1);
        assert!((planar[0].1 - 360.0).abs() < 1e-9);

        let pyramidal = invertible_nitrogen_angle_sums(&amine("pyr", 0.4));
        assert!(pyramidal[0].1 < 350.0);
    }

    #[test]
    fn charged_or_double_bonded_nitrogen_is_excluded() {
        let mut charged = amine("c", 0.3);
        charged.atoms[0].formal_charge = 1;
        assert!(invertible_nitrogen_angle_sums(&charged).is_empty());

        let mut imine = amine("i", 0.3);
        imine.bonds[0].order = BondOrder::Double;
        assert!(!is_invertible_nitrogen(&imine, 0));
    }

    #[test]
    fn conformers_group_by_consecutive_title() {
        let mols = vec![amine("a", 0.1), amine("a", 0.2), amine("b", 0.0), amine("a", 0.3)];
        let groups = group_conformers(&mols);
        let sizes: Vec<(String, usize)> = groups.iter().map(|g| (g.title.clone(), g.members.len())).collect();
        assert_eq!(sizes, vec![("a".into(), 2), ("b".into(), 1), ("a".into(), 1)]);
    }
}
