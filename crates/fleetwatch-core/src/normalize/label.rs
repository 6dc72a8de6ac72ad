// ── Indicator label canonicalization ──
//
// The scraping vendor encodes indicator state in the label itself
// ("driver door open", "ignition off") and in an icon color class. To
// give the same physical input a stable identity across state changes,
// the state-bearing suffixes are stripped and a small synonym table
// collapses label variants. The transform chain is ordered and applied
// deterministically; it is heuristic and tracks the vendor's portal
// markup, not any published contract.

/// State-bearing suffixes, stripped at most once each, in this order.
const STRIP_SUFFIXES: &[&str] = &[
    " error",
    " off",
    " on",
    " ok",
    " active",
    " inactive",
    " inserted",
    " pulled",
    " pull out",
    " unlocked",
    " locked",
    " closed",
    " open",
    // Greek nominative ending, paired with the prefixes below.
    "ς",
];

/// State-bearing prefixes ("closing"/"opening" in Greek, plus the
/// vendor's "no-" negation).
const STRIP_PREFIXES: &[&str] = &["κλείσιμο ", "άνοιγμα ", "no-"];

/// Label synonym table. NOTE: the unlock→lock and authorized→unauthorized
/// entries invert the apparent meaning of the source label; they replicate
/// the vendor portal's own mapping and are pinned by tests rather than
/// silently corrected.
const SYNONYMS: &[(&str, &str)] = &[("unlock", "lock"), ("authorized", "unauthorized")];

/// Canonicalize a raw indicator label (already lowercased by the caller's
/// extraction step). Idempotent for the label shapes the vendor emits.
pub fn canonicalize_label(raw: &str) -> String {
    let mut label = raw;
    for suffix in STRIP_SUFFIXES {
        if let Some(stripped) = label.strip_suffix(suffix) {
            label = stripped;
        }
    }
    for prefix in STRIP_PREFIXES {
        if let Some(stripped) = label.strip_prefix(prefix) {
            label = stripped;
        }
    }
    for (from, to) in SYNONYMS {
        if label == *from {
            return (*to).to_owned();
        }
    }
    label.to_owned()
}

/// Map an icon color token to an indicator state.
///
/// Two fixed buckets; anything else is indeterminate (`None`).
pub fn color_state(color: &str) -> Option<bool> {
    match color {
        "green" | "blue" | "brightgreen" | "offwhite" => Some(false),
        "yellow" | "red" | "grey" | "lightgrey" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_state_suffixes() {
        assert_eq!(canonicalize_label("driver door open"), "driver door");
        assert_eq!(canonicalize_label("ignition off"), "ignition");
        assert_eq!(canonicalize_label("panic button pulled"), "panic button");
        assert_eq!(canonicalize_label("engine ok"), "engine");
    }

    #[test]
    fn strips_greek_prefixes() {
        assert_eq!(canonicalize_label("κλείσιμο πόρτας"), "πόρτα");
        assert_eq!(canonicalize_label("άνοιγμα πόρτας"), "πόρτα");
    }

    #[test]
    fn strips_negation_prefix() {
        assert_eq!(canonicalize_label("no-motion"), "motion");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        for raw in [
            "driver door open",
            "ignition off",
            "central unlocked",
            "κλείσιμο πόρτας",
            "siren",
        ] {
            let once = canonicalize_label(raw);
            assert_eq!(canonicalize_label(&once), once, "label: {raw}");
        }
    }

    #[test]
    fn synonym_inversions_are_preserved_verbatim() {
        // These invert the source label's apparent meaning; replicated
        // from the vendor portal, pending clarification upstream.
        assert_eq!(canonicalize_label("unlock"), "lock");
        assert_eq!(canonicalize_label("authorized"), "unauthorized");
        // The full chain reaches them through suffix stripping too.
        assert_eq!(canonicalize_label("unlock error"), "lock");
    }

    #[test]
    fn inactive_colors() {
        for color in ["green", "blue", "brightgreen", "offwhite"] {
            assert_eq!(color_state(color), Some(false), "color: {color}");
        }
    }

    #[test]
    fn active_colors() {
        for color in ["yellow", "red", "grey", "lightgrey"] {
            assert_eq!(color_state(color), Some(true), "color: {color}");
        }
    }

    #[test]
    fn unknown_color_is_indeterminate() {
        assert_eq!(color_state("magenta"), None);
        assert_eq!(color_state(""), None);
    }
}
