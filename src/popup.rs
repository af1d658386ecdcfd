//! Popup content and decorative labels for markers.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::PlaceResult;

/// Cosmetic prefixes for place names. Not stored, not used for lookup.
pub const DECORATIVE_LABELS: [&str; 3] = ["Reusable", "Eco-Friendly", "Reusable Cups &"];

const SELF_LOCATION_TITLE: &str = "Your Location";

/// Draw a decorative label uniformly from [`DECORATIVE_LABELS`]
pub fn pick_label<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    DECORATIVE_LABELS
        .choose(rng)
        .copied()
        .unwrap_or(DECORATIVE_LABELS[0])
}

/// Fully built popup HTML attached to a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    html: String,
}

impl Popup {
    /// Popup for the user's own position
    pub fn self_location() -> Self {
        Self {
            html: format!("<h4>{}</h4>", SELF_LOCATION_TITLE),
        }
    }

    /// Popup for a search result: label-prefixed name, address, categories
    pub fn for_place(label: &str, place: &PlaceResult) -> Self {
        let html = format!(
            "<h4>{} {}</h4>\n<p>{}</p>\n<p>Category: {}</p>",
            escape_html(label),
            escape_html(&place.name),
            escape_html(place.address_line()),
            escape_html(&place.category_line()),
        );
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Escape text for inclusion in popup HTML
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
