//! Timezone registry backed by the IANA database bundled with `chrono-tz`.

use chrono_tz::{Tz, TZ_VARIANTS};

/// Check whether `name` is a known IANA timezone (case-sensitive)
pub fn is_valid(name: &str) -> bool {
    name.parse::<Tz>().is_ok()
}

/// Iterate over every known timezone name
pub fn all() -> impl Iterator<Item = &'static str> {
    TZ_VARIANTS.iter().map(|tz| tz.name())
}
