//! HTML review parser
//!
//! Field text on the review site is free-form prose ("Bruno from Fort Worth, TX",
//! "Reviewed in February 2018", "(4 of 5) stars"), so each field is located
//! with a selector and then matched against an anchored pattern.

use super::types::{Author, PageExtractor, Review};
use crate::config::{ExtractConfig, SiteConfig};
use crate::error::{Error, Result};
use crate::html::{element_text, parse_selector};
use chrono::{Month, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

static STAR_RATING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\((?P<stars>[0-5]) of 5\)\s*stars\s*$").unwrap());

static AUTHOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<name>\S.*?) +from +(?P<location>[a-zA-Z ]+, +[A-Z]{2})\s*$").unwrap()
});

static REVIEW_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*Reviewed in (?P<month>[a-zA-Z]+) (?P<year>\d{4})\s*$").unwrap()
});

/// Selectors for the fields inside one review block
#[derive(Debug, Clone)]
struct FieldSelectors {
    star_rating: Selector,
    text_content: Selector,
    title: Selector,
    author: Selector,
    review_date: Selector,
}

impl FieldSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            star_rating: parse_selector(".numRec")?,
            text_content: parse_selector(".reviewText")?,
            title: parse_selector(".reviewTitle")?,
            author: parse_selector(".consumerName")?,
            review_date: parse_selector(".consumerReviewDate")?,
        })
    }
}

/// Parses one review block into a `Review`
struct ReviewParser<'a> {
    element: ElementRef<'a>,
    fields: &'a FieldSelectors,
}

impl<'a> ReviewParser<'a> {
    fn new(element: ElementRef<'a>, fields: &'a FieldSelectors) -> Self {
        Self { element, fields }
    }

    fn field_text(&self, selector: &Selector, name: &str) -> Result<String> {
        self.element
            .select(selector)
            .next()
            .map(element_text)
            .ok_or_else(|| Error::unprocessable(format!("Couldn't find {name} element")))
    }

    fn star_rating(&self) -> Result<u8> {
        let text = self.field_text(&self.fields.star_rating, "STAR_RATING")?;
        STAR_RATING_PATTERN
            .captures(&text)
            .and_then(|caps| caps["stars"].parse().ok())
            .ok_or_else(|| Error::unprocessable("Couldn't parse star rating text content"))
    }

    fn text_content(&self) -> Result<String> {
        let text = self.field_text(&self.fields.text_content, "TEXT_CONTENT")?;
        Ok(text.trim().to_string())
    }

    fn title(&self) -> Result<String> {
        let text = self.field_text(&self.fields.title, "TITLE")?;
        Ok(text.trim().to_string())
    }

    fn author(&self) -> Result<Author> {
        let text = self.field_text(&self.fields.author, "AUTHOR_TEXT")?;
        let caps = AUTHOR_PATTERN
            .captures(&text)
            .ok_or_else(|| Error::unprocessable("Couldn't parse author text content"))?;
        Ok(Author {
            name: caps["name"].to_string(),
            location: caps["location"].to_string(),
        })
    }

    fn review_date(&self) -> Result<NaiveDate> {
        let text = self.field_text(&self.fields.review_date, "REVIEW_DATE")?;
        let caps = REVIEW_DATE_PATTERN
            .captures(&text)
            .ok_or_else(|| Error::unprocessable("Couldn't parse review date text content"))?;

        // Only full English month names, capitalized as the site renders them
        let month = caps["month"]
            .parse::<Month>()
            .ok()
            .filter(|month| month.name() == &caps["month"])
            .ok_or_else(|| {
                Error::unprocessable("Couldn't parse valid month from review date text content")
            })?;
        let year: i32 = caps["year"]
            .parse()
            .map_err(|_| Error::unprocessable("Couldn't parse year from review date"))?;

        NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
            .ok_or_else(|| Error::unprocessable("Review date out of range"))
    }

    /// Parse all fields
    fn parse(&self) -> Result<Review> {
        Ok(Review {
            title: self.title()?,
            content: self.text_content()?,
            author: self.author()?,
            review_date: self.review_date()?,
            star_rating: self.star_rating()?,
        })
    }
}

/// Extracts reviews from a listing page
#[derive(Debug, Clone)]
pub struct HtmlReviewExtractor {
    review: Selector,
    fields: FieldSelectors,
    strict: bool,
}

impl HtmlReviewExtractor {
    /// Build an extractor for the site's review blocks
    pub fn new(site: &SiteConfig, config: &ExtractConfig) -> Result<Self> {
        Ok(Self {
            review: parse_selector(&site.review_selector)?,
            fields: FieldSelectors::new()?,
            strict: config.strict,
        })
    }
}

impl PageExtractor for HtmlReviewExtractor {
    type Record = Review;

    fn extract(&self, content: &str) -> Result<Vec<Review>> {
        let doc = Html::parse_document(content);
        let mut reviews = Vec::new();

        for (position, element) in doc.select(&self.review).enumerate() {
            match ReviewParser::new(element, &self.fields).parse() {
                Ok(review) => reviews.push(review),
                Err(e) if self.strict => return Err(e),
                Err(e) => warn!("Skipping review #{}: {}", position, e),
            }
        }

        Ok(reviews)
    }
}
