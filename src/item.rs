use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CompiledLayout, ExtractionError, FromHtml, HtmlNode, names::extract_name};

/// One arrest notice, as read from a single post container
///
/// `name` is the display name with any trailing charge text stripped, but
/// not yet canonicalized; aggregation does that. `charge_lines` keeps the
/// original wording, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrestRecord {
    pub name: String,
    pub charge_lines: Vec<String>,
    pub image_url: Option<String>,
    pub post_date: Option<NaiveDate>,
}

impl ArrestRecord {
    /// Build a record from a post container
    ///
    /// Only the name is required. Missing charge lines, image or date leave
    /// the corresponding field empty.
    ///
    /// # Errors
    ///
    /// [`ExtractionError::MissingField`] when the name line is absent or
    /// blank once delimiters are stripped.
    pub fn extract<E>(
        post: &E,
        layout: &CompiledLayout,
        post_date: Option<NaiveDate>,
    ) -> Result<Self, ExtractionError>
    where
        E: HtmlNode,
    {
        let missing_name = || ExtractionError::MissingField {
            field: "name",
            post_id: post.id().unwrap_or_default().to_string(),
        };

        let heading = post.select_first(&layout.name).ok_or_else(missing_name)?;
        let name = String::from_text(&extract_name(&heading.text())).map_err(|_| missing_name())?;

        let charge_lines = layout
            .charges
            .iter()
            .filter_map(|selector| post.select_first(selector))
            .filter_map(|line| String::from_text(&line.text()).ok())
            .collect();

        let image_url = post
            .select_first(&layout.image)
            .and_then(|img| Option::<String>::from_attr(img.attr(&layout.image_attr)?).ok()?);

        Ok(Self {
            name,
            charge_lines,
            image_url,
            post_date,
        })
    }
}
