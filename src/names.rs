//! Display names: pulling them out of post headings and canonicalizing them
//!
//! The first bold line of a post usually reads `"JOHN DOE : 2 counts"` or
//! `"Jane Roe - Theft"`, but plenty of posts carry just the name. The
//! aggregation key is the canonical form, so `"john doe"`, `"JOHN DOE"` and
//! `" John  Doe "` all land on `"John Doe"`.

/// Delimiters tried in priority order; the first one present wins
const NAME_DELIMITERS: [&str; 4] = [" :", ":", " -", "- "];

/// Extract the bare display name from a raw heading
///
/// Each pass looks for the delimiters in priority order and keeps the text
/// left of the first one present. Passes repeat until no delimiter is left,
/// so the result never contains one and applying the function to its own
/// output changes nothing. Without any delimiter the whole trimmed text is
/// returned.
///
/// ```
/// use blotter::extract_name;
///
/// assert_eq!(extract_name("John Doe : 2 counts"), "John Doe");
/// assert_eq!(extract_name("Jane Roe"), "Jane Roe");
/// assert_eq!(extract_name("A - B: C"), "A");
/// ```
pub fn extract_name(raw: &str) -> String {
    let mut name = raw.trim();
    while let Some(left) = split_once_by_priority(name) {
        name = left.trim();
    }
    name.to_string()
}

fn split_once_by_priority(text: &str) -> Option<&str> {
    NAME_DELIMITERS
        .iter()
        .find_map(|delimiter| text.split_once(delimiter).map(|(left, _)| left))
}

/// Normalize a name for use as an aggregation key
///
/// Lowercases, trims, collapses inner whitespace and title-cases each word.
/// A letter is upper-cased when it follows anything that is not a letter,
/// so `"o'brien-smith"` becomes `"O'Brien-Smith"`.
pub fn canonical_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}
