/// Trims a reply and drops it if nothing is left.
pub fn clean_reply(reply: Option<&str>) -> Option<String> {
    reply.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Stored on every delivery a customer confirmed, whatever casing they typed.
pub const CONFIRMED_RESPONSE: &str = "Yes";

/// A reply confirms today's meal only if it reads "yes", ignoring case and surrounding whitespace.
pub fn is_affirmative(reply: &str) -> bool {
    reply.trim().eq_ignore_ascii_case("yes")
}
