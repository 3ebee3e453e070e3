/// Element symbols indexed by `atomic number - 1`, through xenon.
const SYMBOLS: [&str; 54] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe",
];

/// Atomic number for a symbol in any letter case (`"CL"`, `"cl"`, `"Cl"`).
pub fn atomic_number(symbol: &str) -> Option<u8> {
    let symbol = normalize(symbol);
    SYMBOLS
        .iter()
        .position(|s| *s == symbol)
        .map(|i| (i + 1) as u8)
}

/// Canonical symbol for an atomic number.
pub fn symbol(atomic_number: u8) -> Option<&'static str> {
    SYMBOLS.get((atomic_number as usize).checked_sub(1)?).copied()
}

fn normalize(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number("CL"), Some(17));
        assert_eq!(atomic_number(" br "), Some(35));
        assert_eq!(atomic_number("Xx"), None);
        assert_eq!(symbol(53), Some("I"));
        assert_eq!(symbol(0), None);
    }
}
