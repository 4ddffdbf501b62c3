//! Place-name matching shared by fixed fares and toll routes.

use unicode_normalization::UnicodeNormalization;

/// Lowercase `input`, decompose it (NFD) and drop the combining diacritics in
/// U+0300..=U+036F, so `"Aeropuerto Jorge Newbery"` and `"AEROPUERTO JORGE NEWBÉRY"`
/// compare equal.
pub(crate) fn normalize_place(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|ch| !('\u{0300}'..='\u{036F}').contains(ch))
        .collect()
}

/// A trip's normalized endpoints, computed once per fare evaluation.
#[derive(Debug)]
pub(crate) struct Route {
    origen: String,
    destino: String,
}

impl Route {
    pub(crate) fn new(origen: &str, destino: &str) -> Self {
        Self {
            origen: normalize_place(origen),
            destino: normalize_place(destino),
        }
    }

    /// Direction-agnostic substring match against a rule's endpoints.
    ///
    /// An empty rule endpoint is contained in every address.
    pub(crate) fn matches(&self, rule_origen: &str, rule_destino: &str) -> bool {
        let from = normalize_place(rule_origen);
        let to = normalize_place(rule_destino);
        (self.origen.contains(&from) && self.destino.contains(&to))
            || (self.origen.contains(&to) && self.destino.contains(&from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_and_accents() {
        assert_eq!(normalize_place("Ezeíza"), "ezeiza");
        assert_eq!(normalize_place("SAN ISIDRO ÑANDÚ"), "san isidro nandu");
    }

    #[test]
    fn matches_in_both_directions() {
        let route = Route::new("Terminal Aeropuerto Ezeiza", "Av. Corrientes 1200, CABA");
        assert!(route.matches("ezeiza", "caba"));
        assert!(route.matches("CABA", "Ezéiza"));
        assert!(!route.matches("ezeiza", "la plata"));
    }

    #[test]
    fn blank_rule_endpoint_matches_any_address() {
        let route = Route::new("Pilar", "Tigre");
        assert!(route.matches("", "tigre"));
        assert!(route.matches("tigre", ""));
        assert!(!route.matches("", "nordelta"));
    }

    #[test]
    fn whitespace_endpoint_needs_a_space_in_the_address() {
        assert!(!Route::new("Pilar centro", "Tigre").matches("  ", "tigre"));
        assert!(Route::new("Pilar centro", "Tigre").matches(" ", "tigre"));
    }
}
