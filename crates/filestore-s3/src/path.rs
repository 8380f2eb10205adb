//! Storage-key template resolution
//!
//! Minted keys come from a configured template with date, time, UUID and
//! site-code placeholders. Resolution happens fresh on every store call
//! and draws a new UUID each time; nothing is cached. Month through
//! second fields are substituted unpadded.

use chrono::{Datelike, Local, Timelike};
use uuid::Uuid;

/// Expand a path pattern into a concrete storage key. Recognized
/// placeholders: `{YYYY}` `{MM}` `{DD}` `{HH}` `{mm}` `{ss}` `{UUID}`
/// `{code}`. Anything else is left verbatim.
pub fn resolve(pattern: &str, site_code: &str) -> String {
    let now = Local::now();
    pattern
        .replace("{YYYY}", &now.year().to_string())
        .replace("{MM}", &now.month().to_string())
        .replace("{DD}", &now.day().to_string())
        .replace("{HH}", &now.hour().to_string())
        .replace("{mm}", &now.minute().to_string())
        .replace("{ss}", &now.second().to_string())
        .replace("{UUID}", &Uuid::new_v4().to_string())
        .replace("{code}", site_code)
}
