//! Label abbreviation used to derive task identifier prefixes.

/// Code returned when a label yields no usable characters.
pub const FALLBACK_ABBREVIATION: &str = "XXX";

/// Abbreviates a free-text label into a short uppercase code.
///
/// The label is trimmed, uppercased, and stripped of everything that is
/// neither alphanumeric nor whitespace. A single remaining word contributes
/// its first `max_len` characters; several words contribute the initial of
/// each of the first `max_len` words. Labels that leave nothing behind map to
/// [`FALLBACK_ABBREVIATION`].
///
/// # Examples
///
/// ```
/// use taskledger::template::domain::abbreviate;
///
/// assert_eq!(abbreviate("Contas a Pagar", 3), "CAP");
/// assert_eq!(abbreviate("Check List", 2), "CL");
/// assert_eq!(abbreviate("  x7!!  ", 3), "X7");
/// assert_eq!(abbreviate("", 3), "XXX");
/// ```
#[must_use]
pub fn abbreviate(text: &str, max_len: usize) -> String {
    let normalized: String = text
        .trim()
        .to_uppercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .collect();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    let abbreviation: String = match words.as_slice() {
        [] => String::new(),
        [word] => word.chars().take(max_len).collect(),
        several => several
            .iter()
            .take(max_len)
            .filter_map(|word| word.chars().next())
            .collect(),
    };

    if abbreviation.is_empty() {
        FALLBACK_ABBREVIATION.to_owned()
    } else {
        abbreviation
    }
}
