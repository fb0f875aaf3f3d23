//! Indian states and union territories with their GST state codes.
//!
//! The names are the exact strings stored on client records; the
//! jurisdiction check compares against them, so they must not be
//! reworded. Order follows the client form's drop-down.

/// A state or union territory as used for GST place-of-supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndianState {
    /// Display name (e.g. "Tamil Nadu").
    pub name: &'static str,
    /// Two-digit GST state code, also the first two GSTIN characters.
    pub gst_code: &'static str,
    /// True for union territories.
    pub union_territory: bool,
}

impl IndianState {
    /// Place-of-supply label, e.g. "Delhi (07)".
    pub fn place_of_supply(&self) -> String {
        format!("{} ({})", self.name, self.gst_code)
    }
}

const fn state(name: &'static str, gst_code: &'static str) -> IndianState {
    IndianState {
        name,
        gst_code,
        union_territory: false,
    }
}

const fn territory(name: &'static str, gst_code: &'static str) -> IndianState {
    IndianState {
        name,
        gst_code,
        union_territory: true,
    }
}

/// All 28 states and 8 union territories.
pub static INDIAN_STATES: &[IndianState] = &[
    state("Andhra Pradesh", "37"),
    state("Arunachal Pradesh", "12"),
    state("Assam", "18"),
    state("Bihar", "10"),
    state("Chhattisgarh", "22"),
    state("Goa", "30"),
    state("Gujarat", "24"),
    state("Haryana", "06"),
    state("Himachal Pradesh", "02"),
    state("Jharkhand", "20"),
    state("Karnataka", "29"),
    state("Kerala", "32"),
    state("Madhya Pradesh", "23"),
    state("Maharashtra", "27"),
    state("Manipur", "14"),
    state("Meghalaya", "17"),
    state("Mizoram", "15"),
    state("Nagaland", "13"),
    state("Odisha", "21"),
    state("Punjab", "03"),
    state("Rajasthan", "08"),
    state("Sikkim", "11"),
    state("Tamil Nadu", "33"),
    state("Telangana", "36"),
    state("Tripura", "16"),
    state("Uttar Pradesh", "09"),
    state("Uttarakhand", "05"),
    state("West Bengal", "19"),
    territory("Delhi", "07"),
    territory("Puducherry", "34"),
    territory("Chandigarh", "04"),
    territory("Andaman and Nicobar Islands", "35"),
    territory("Dadra and Nagar Haveli and Daman and Diu", "26"),
    territory("Lakshadweep", "31"),
    territory("Ladakh", "38"),
    territory("Jammu and Kashmir", "01"),
];

/// Look up a state by name, ignoring case and surrounding whitespace.
pub fn state_by_name(name: &str) -> Option<&'static IndianState> {
    let name = name.trim();
    INDIAN_STATES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Look up a state by its two-digit GST code.
pub fn state_by_code(code: &str) -> Option<&'static IndianState> {
    INDIAN_STATES.iter().find(|s| s.gst_code == code)
}

/// Check whether `name` is one of the known states/union territories.
pub fn is_known_state(name: &str) -> bool {
    state_by_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(state_by_name("delhi").map(|s| s.gst_code), Some("07"));
        assert_eq!(state_by_name("  MAHARASHTRA ").map(|s| s.gst_code), Some("27"));
        assert!(state_by_name("Bavaria").is_none());
        assert!(!is_known_state(""));
    }

    #[test]
    fn lookup_by_code() {
        assert_eq!(state_by_code("29").map(|s| s.name), Some("Karnataka"));
        assert!(state_by_code("99").is_none());
    }

    #[test]
    fn counts_and_uniqueness() {
        assert_eq!(INDIAN_STATES.len(), 36);
        assert_eq!(INDIAN_STATES.iter().filter(|s| s.union_territory).count(), 8);

        let codes: HashSet<_> = INDIAN_STATES.iter().map(|s| s.gst_code).collect();
        assert_eq!(codes.len(), INDIAN_STATES.len(), "duplicate GST state code");
        let names: HashSet<_> = INDIAN_STATES.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), INDIAN_STATES.len(), "duplicate state name");
    }

    #[test]
    fn place_of_supply_label() {
        let delhi = state_by_name("Delhi").unwrap();
        assert_eq!(delhi.place_of_supply(), "Delhi (07)");
    }
}
