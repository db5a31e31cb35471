//! Canned offline-fallback messages per API domain
//!
//! Thin lookup tables from an operation name to the text shown when that
//! operation fails and only stale or missing data is available. These sit
//! on top of the generic classifier and do not affect retry behavior.

/// Fallback text for Quran content operations.
pub fn quran_fallback(operation: &str) -> &'static str {
    match operation {
        "fetch_surah" => "Unable to load this surah right now. Showing your last saved reading.",
        "fetch_ayah" => "Unable to load this verse right now. Please try again when you're back online.",
        "fetch_translation" => "Translation is unavailable offline. The Arabic text is still shown.",
        "search" => "Search needs an internet connection. Please try again later.",
        _ => "Quran content is unavailable right now. Please check your connection.",
    }
}

/// Fallback text for prayer-time operations.
pub fn prayer_fallback(operation: &str) -> &'static str {
    match operation {
        "fetch_timings" => "Unable to refresh prayer times. Showing the most recent saved schedule.",
        "fetch_qibla" => "Unable to determine Qibla direction. Please check your connection.",
        "fetch_calendar" => "Unable to load the monthly calendar. Saved days are still available.",
        _ => "Prayer times are unavailable right now. Showing saved data where possible.",
    }
}

/// Fallback text for hadith lookup operations.
pub fn hadith_fallback(operation: &str) -> &'static str {
    match operation {
        "fetch_hadith" => "Unable to load this hadith right now. Please try again later.",
        "fetch_collection" => "This collection is unavailable offline. Please reconnect to browse it.",
        "daily_hadith" => "Today's hadith couldn't be loaded. Showing a previously saved one.",
        _ => "Hadith content is unavailable right now. Please check your connection.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_operations_get_specific_text() {
        assert!(prayer_fallback("fetch_timings").contains("prayer times"));
        assert!(quran_fallback("fetch_surah").contains("surah"));
        assert!(hadith_fallback("daily_hadith").contains("hadith"));
    }

    #[test]
    fn test_unknown_operations_get_domain_default() {
        assert_eq!(
            prayer_fallback("no_such_operation"),
            prayer_fallback("another_unknown")
        );
        assert!(quran_fallback("no_such_operation").contains("Quran"));
        assert!(hadith_fallback("no_such_operation").contains("Hadith"));
    }
}
