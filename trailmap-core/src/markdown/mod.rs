//! Text processing for roadmap markdown.
//!
//! Data flows leaves-first: [`segment`] splits a document into sections and
//! subsections (using [`classify`] to recognize headings), [`links`] strips
//! hyperlinks outside the resources region, and [`inline`] turns each
//! fragment into HTML. The collapsible composition lives in
//! [`crate::builder`].

pub mod classify;
pub mod inline;
pub mod links;
pub mod segment;

/// Escape text for use in HTML attributes and titles.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Capitalize the first letter of every whitespace-separated word.
///
/// The rest of each word is left alone so acronyms like "SQL" survive.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
