/// Canonical form of a test identifier for case- and format-insensitive
/// matching: `"HS Trop-I"`, `"hs_trop_i"` and `"hstropi"` all become `"hstropi"`.
pub fn normalize_key(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_spellings_normalize_together() {
        assert_eq!(normalize_key("HS Trop-I"), "hstropi");
        assert_eq!(normalize_key("hstropi"), "hstropi");
        assert_eq!(normalize_key("hs_trop_i"), "hstropi");
        assert_eq!(normalize_key("EsR"), normalize_key("Es_r"));
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key(" _-"), "");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "PT/INR",
            "  Uric Acid ",
            "dlc_diff",
            "Na-K\t",
            "B_Total",
            "ΔHb",
        ] {
            let once = normalize_key(raw);
            assert_eq!(normalize_key(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn other_whitespace_is_trimmed_not_removed() {
        assert_eq!(normalize_key("\tcpk mb\n"), "cpkmb");
        assert_eq!(normalize_key("pt/inr"), "pt/inr");
    }
}
