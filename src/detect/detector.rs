//! HTML block detector
//!
//! Reads the listing markers of a page (rendered page number, review blocks,
//! listing container, pagination links) and decides whether the page is a
//! usable listing, a legitimately empty one, or something the site served
//! instead of the listing.

use super::types::{BlockReason, EmptyReason, ListingInfo, PageClassification, PageClassifier};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::html::{element_text, parse_page_number, parse_selector};
use crate::http::RawPage;
use scraper::{Html, Selector};

/// Listing markers found in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingShape {
    /// Rendered page number
    pub current_page: Option<u32>,
    /// Highest advertised page number
    pub last_page: Option<u32>,
    /// Number of review blocks
    pub item_count: usize,
    /// Whether the listing container is present
    pub has_listing: bool,
}

/// Classifies listing pages by their markup
#[derive(Debug, Clone)]
pub struct BlockDetector {
    review: Selector,
    page_number: Selector,
    last_page: Option<Selector>,
    listing: Selector,
    challenge_markers: Vec<String>,
    first_page: u32,
}

impl BlockDetector {
    /// Build a detector from the site selectors
    pub fn new(site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            review: parse_selector(&site.review_selector)?,
            page_number: parse_selector(&site.page_number_selector)?,
            last_page: site
                .last_page_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            listing: parse_selector(&site.listing_selector)?,
            challenge_markers: site
                .challenge_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            first_page: site.first_page,
        })
    }

    /// Read the listing markers of a document
    pub fn inspect(&self, body: &str) -> ListingShape {
        let doc = Html::parse_document(body);

        let current_page = doc
            .select(&self.page_number)
            .next()
            .and_then(|el| parse_page_number(&element_text(el)));

        let last_page = self.last_page.as_ref().and_then(|selector| {
            doc.select(selector)
                .filter_map(|el| parse_page_number(&element_text(el)))
                .max()
        });

        ListingShape {
            current_page,
            last_page,
            item_count: doc.select(&self.review).count(),
            has_listing: doc.select(&self.listing).next().is_some(),
        }
    }

    fn has_challenge_marker(&self, body: &str) -> bool {
        let lowered = body.to_lowercase();
        self.challenge_markers
            .iter()
            .any(|marker| lowered.contains(marker.as_str()))
    }
}

impl PageClassifier for BlockDetector {
    fn classify(&self, page: &RawPage, page_number: u32) -> PageClassification {
        if page.is_blank() {
            return PageClassification::Blocked(BlockReason::NoContent);
        }

        let shape = self.inspect(&page.body);

        match shape.current_page {
            // The site clamps out-of-range page numbers to its last page
            Some(rendered) if rendered < page_number => {
                PageClassification::Empty(EmptyReason::PastEnd {
                    last_page: rendered,
                })
            }
            Some(rendered) if rendered > page_number => {
                PageClassification::Blocked(BlockReason::PageMismatch { rendered })
            }
            Some(_) if shape.item_count == 0 => {
                if page_number == self.first_page {
                    PageClassification::Empty(EmptyReason::NoReviews)
                } else {
                    PageClassification::Empty(EmptyReason::NoItems)
                }
            }
            _ if shape.item_count > 0 => PageClassification::Ok(ListingInfo {
                current_page: shape.current_page,
                last_page: shape.last_page,
                item_count: shape.item_count,
            }),
            // No page number and no reviews from here on
            _ if self.has_challenge_marker(&page.body) => {
                PageClassification::Blocked(BlockReason::Challenge)
            }
            _ if !page.is_success() => PageClassification::Blocked(BlockReason::Status {
                status: page.status,
            }),
            _ if shape.has_listing => PageClassification::Empty(EmptyReason::NoItems),
            _ => PageClassification::Blocked(BlockReason::UnrecognizedShape),
        }
    }
}
