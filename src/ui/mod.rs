//! HTML rendering for the dashboard.
//!
//! The page itself is static; it polls the fragment endpoints with htmx and
//! swaps the returned HTML in place.
//!
//! - [`page`]: the dashboard page served at `/`
//! - [`fragments`]: status line and overview grid

pub mod fragments;
pub mod page;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
