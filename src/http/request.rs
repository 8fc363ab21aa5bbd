//! Listing page requests
//!
//! `ListingQuery` holds everything that is fixed for one scrape (listing URL,
//! parameter names, sort values, page size hint). `PageRequest` is the
//! immutable per-attempt value derived from it.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::types::SortVariant;
use url::Url;

/// One attempt at one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page_index: u32,
    /// Page number as the site counts it
    pub page_number: u32,
    /// Request shape
    pub sort_variant: SortVariant,
    /// Fully built URL
    pub target_url: String,
}

/// Fixed request parameters for one scrape
#[derive(Debug, Clone)]
pub struct ListingQuery {
    listing_url: String,
    page_param: String,
    sort_param: String,
    primary_sort: String,
    alternate_sort: String,
    first_page: u32,
    page_size: Option<(String, u32)>,
}

impl ListingQuery {
    /// Build the query for the listing at `listing_path` under the site base URL.
    ///
    /// The page size hint is only sent when the site has a page size parameter.
    pub fn new(site: &SiteConfig, listing_path: &str, page_size_hint: Option<u32>) -> Result<Self> {
        let joined = Url::parse(&site.base_url)?.join(listing_path)?;
        let listing_url = joined.as_str().trim_end_matches('/').to_string();

        let page_size = match (&site.page_size_param, page_size_hint) {
            (Some(param), Some(size)) if size > 0 => Some((param.clone(), size)),
            _ => None,
        };

        Ok(Self {
            listing_url,
            page_param: site.page_param.clone(),
            sort_param: site.sort_param.clone(),
            primary_sort: site.primary_sort.clone(),
            alternate_sort: site.alternate_sort.clone(),
            first_page: site.first_page,
            page_size,
        })
    }

    /// Listing URL without query string
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Site page number for a page index
    pub fn page_number(&self, page_index: u32) -> u32 {
        self.first_page.saturating_add(page_index)
    }

    /// Page index for a site page number, if it is not before the first page
    pub fn page_index(&self, page_number: u32) -> Option<u32> {
        page_number.checked_sub(self.first_page)
    }

    /// Check if a site page number is the first page
    pub fn is_first_page(&self, page_number: u32) -> bool {
        page_number == self.first_page
    }

    /// Request for a page index
    pub fn request(&self, page_index: u32, variant: SortVariant) -> PageRequest {
        self.request_for_number(self.page_number(page_index), variant)
    }

    /// Request for a raw site page number (used by the bound probe)
    pub fn request_for_number(&self, page_number: u32, variant: SortVariant) -> PageRequest {
        let sort = match variant {
            SortVariant::Primary => &self.primary_sort,
            SortVariant::Alternate => &self.alternate_sort,
        };

        // Order matters upstream, and the sort value keeps its raw trailing '='
        let mut target_url = format!(
            "{}?{}={}&{}={}",
            self.listing_url, self.sort_param, sort, self.page_param, page_number
        );
        if let Some((param, size)) = &self.page_size {
            target_url.push_str(&format!("&{param}={size}"));
        }

        PageRequest {
            page_index: self.page_index(page_number).unwrap_or_default(),
            page_number,
            sort_variant: variant,
            target_url,
        }
    }
}
