// ── Domain model ──

mod unit;

pub use unit::{
    BinaryIndicator, EntityCategory, IndicatorClass, Position, ReadingValue, SensorClass,
    SensorReading, StateClass, UnitId, UnitRecord,
};

/// Convert free text into a lowercase `[a-z0-9_]` slug.
///
/// Used for entity identifiers and indicator keys; empty input collapses
/// to `"unknown"` so keys are never blank.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_sep = true;
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "unknown".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("External Battery"), "external_battery");
        assert_eq!(slugify("GSM Signal Strength"), "gsm_signal_strength");
    }

    #[test]
    fn slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("  Door -- Front (L) "), "door_front_l");
    }

    #[test]
    fn slugify_empty_is_unknown() {
        assert_eq!(slugify(""), "unknown");
        assert_eq!(slugify("---"), "unknown");
    }
}
