//! MDL SD file (V2000) output for single conformers.

use super::Error;
use crate::model::conformer::Conformation;
use crate::model::molecule::Molecule;
use std::io::Write;

const CHARGES_PER_LINE: usize = 8;

/// Writes one SD record for `molecule` at the coordinates of
/// `conformation`, followed by `properties` as data items.
///
/// `conformation` must index the atoms of `molecule` one to one, so pass
/// the hydrogen-complete molecule the conformer was embedded from.
pub fn write<W: Write>(
    mut writer: W,
    molecule: &Molecule,
    conformation: &Conformation,
    title: &str,
    properties: &[(&str, String)],
) -> Result<(), Error> {
    if molecule.atom_count() != conformation.len() {
        return Err(Error::ConformationMismatch {
            atoms: molecule.atom_count(),
            positions: conformation.len(),
        });
    }

    writeln!(writer, "{}", title.lines().next().unwrap_or(""))?;
    writeln!(writer, "  conformer-forge     3D")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        molecule.atom_count(),
        molecule.bond_count()
    )?;

    for (atom, p) in molecule.atoms.iter().zip(&conformation.positions) {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            p[0],
            p[1],
            p[2],
            atom.element.symbol()
        )?;
    }

    for bond in &molecule.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            bond.order.mdl_code()
        )?;
    }

    let charged: Vec<(usize, i8)> = molecule
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.formal_charge != 0)
        .map(|(i, a)| (i + 1, a.formal_charge))
        .collect();
    for chunk in charged.chunks(CHARGES_PER_LINE) {
        write!(writer, "M  CHG{:>3}", chunk.len())?;
        for (idx, charge) in chunk {
            write!(writer, " {idx:>3} {charge:>3}")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "M  END")?;
    for (key, value) in properties {
        writeln!(writer, "> <{key}>")?;
        writeln!(writer, "{value}")?;
        writeln!(writer)?;
    }
    writeln!(writer, "$$$$")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn render(molecule: &Molecule, conformation: &Conformation) -> String {
        let mut buf = Vec::new();
        write(
            &mut buf,
            molecule,
            conformation,
            "test",
            &[("method", "ETKDGv2".to_string())],
        )
        .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_counts_atoms_and_bonds() {
        let mol = parse_smiles("C=O").unwrap().with_explicit_hydrogens();
        let conf = Conformation::new(vec![
            [0.0, 0.0, 0.0],
            [1.2, 0.0, 0.0],
            [-0.5, 0.9, 0.0],
            [-0.5, -0.9, 0.0],
        ]);
        let text = render(&mol, &conf);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "test");
        assert!(lines[3].starts_with("  4  3"));
        assert!(lines[3].ends_with("V2000"));
        assert!(lines[4].starts_with("    0.0000    0.0000    0.0000 C"));
        assert!(lines[5].starts_with("    1.2000    0.0000    0.0000 O"));
        assert_eq!(lines[8], "  1  2  2  0  0  0  0");
        assert!(lines.contains(&"M  END"));
        assert!(lines.contains(&"> <method>"));
        assert!(lines.contains(&"ETKDGv2"));
        assert_eq!(lines.last(), Some(&"$$$$"));
        assert!(!text.contains("M  CHG"));
    }

    #[test]
    fn formal_charges_go_into_a_charge_block() {
        let mol = parse_smiles("[NH4+]").unwrap().with_explicit_hydrogens();
        let conf = Conformation::new(vec![[0.0; 3]; mol.atom_count()]);
        let text = render(&mol, &conf);
        assert!(text.contains("M  CHG  1   1   1"));
    }

    #[test]
    fn rejects_mismatched_conformations() {
        let mol = parse_smiles("CC").unwrap().with_explicit_hydrogens();
        let conf = Conformation::new(vec![[0.0; 3]; 2]);
        let mut buf = Vec::new();
        let err = write(&mut buf, &mol, &conf, "x", &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::ConformationMismatch {
                atoms: 8,
                positions: 2
            }
        ));
        assert!(buf.is_empty());
    }
}
