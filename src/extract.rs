//! Type conversion from extracted HTML text
//!
//! [`FromHtml`] describes how a piece of element text or an attribute value
//! becomes a Rust value. Names, charge lines and image links are trimmed
//! strings. Date headings such as `"Monday, March 4, 2024"` go through
//! [`parse_post_date`] since their pattern comes from the site layout.

use chrono::NaiveDate;

use crate::ParseError;

/// `strftime` pattern of the date headings on the blog
pub const POST_DATE_FORMAT: &str = "%A, %B %d, %Y";

/// Trait for types that can be parsed from HTML text or attributes
///
/// # Examples
///
/// ```
/// use blotter::FromHtml;
///
/// let name = String::from_text("  Jane Roe ").unwrap();
/// assert_eq!(name, "Jane Roe");
///
/// let src = Option::<String>::from_attr("").unwrap();
/// assert_eq!(src, None);
/// ```
pub trait FromHtml: Sized {
    /// Parse a value from element text content
    fn from_text(text: &str) -> Result<Self, ParseError>;

    /// Parse a value from an attribute; delegates to `from_text` by default
    fn from_attr(attr: &str) -> Result<Self, ParseError> {
        Self::from_text(attr)
    }
}

// Trimmed, and blank counts as missing
impl FromHtml for String {
    fn from_text(text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(trimmed.to_string())
    }
}

// Returns None on parse failure instead of an error
impl<T: FromHtml> FromHtml for Option<T> {
    fn from_text(text: &str) -> Result<Self, ParseError> {
        Ok(T::from_text(text).ok())
    }

    fn from_attr(attr: &str) -> Result<Self, ParseError> {
        Ok(T::from_attr(attr).ok())
    }
}

/// Parse a date heading with an explicit `strftime` pattern
///
/// Surrounding whitespace is ignored. A heading whose weekday does not match
/// its calendar date is rejected like any other malformed heading.
pub fn parse_post_date(text: &str, format: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, format).map_err(|error| ParseError::MalformedDate {
        text: trimmed.to_string(),
        error,
    })
}
