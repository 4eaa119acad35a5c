use phf::{Map, phf_map};

#[rustfmt::skip]
static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "D" => 1, "HE" => 2,
    "LI" => 3, "BE" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "NE" => 10,
    "NA" => 11, "MG" => 12, "AL" => 13, "SI" => 14, "P" => 15, "S" => 16, "CL" => 17, "AR" => 18,
    "K" => 19, "CA" => 20, "MN" => 25, "FE" => 26, "CO" => 27, "NI" => 28, "CU" => 29, "ZN" => 30,
    "SE" => 34, "BR" => 35, "KR" => 36, "CD" => 48, "I" => 53, "XE" => 54, "PT" => 78, "HG" => 80,
};

/// Normalizes an element symbol to the upper-case form used as table key.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

pub fn atomic_number(symbol: &str) -> Option<u8> {
    ATOMIC_NUMBERS.get(normalize_symbol(symbol).as_str()).copied()
}

pub fn is_hydrogen_symbol(symbol: &str) -> bool {
    matches!(normalize_symbol(symbol).as_str(), "H" | "D")
}
