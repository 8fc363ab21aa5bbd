//! Small HTML helpers shared by the detector and the extractor

use crate::error::{Error, Result};
use scraper::{ElementRef, Selector};

/// Parse a CSS selector, naming it in the error
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::selector(selector, e.to_string()))
}

/// All text below an element, concatenated
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Parse a page number out of link text such as " 12 "
pub fn parse_page_number(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}
