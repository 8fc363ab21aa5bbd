//! Tests for the detect module

use super::*;
use crate::config::SiteConfig;
use crate::http::RawPage;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn detector() -> BlockDetector {
    let site = SiteConfig {
        last_page_selector: Some(".pagination .page-link".to_string()),
        ..SiteConfig::default()
    };
    BlockDetector::new(&site).unwrap()
}

fn listing(page: Option<u32>, reviews: usize, last_page: Option<u32>) -> String {
    let page_num = page
        .map(|p| format!("<li class=\"pageNum\"><a class=\"page-link\">{p}</a></li>"))
        .unwrap_or_default();
    let pagination = last_page
        .map(|last| {
            (1..=last)
                .map(|n| format!("<li class=\"pagination\"><a class=\"page-link\">{n}</a></li>"))
                .collect::<String>()
        })
        .unwrap_or_default();
    let items = (0..reviews)
        .map(|i| format!("<div class=\"mainReviews\"><p class=\"reviewTitle\">r{i}</p></div>"))
        .collect::<String>();

    format!(
        "<html><head><title>Reviews</title></head><body><section class=\"lenderReviews\">{items}</section><ul>{page_num}</ul><ul>{pagination}</ul></body></html>"
    )
}

fn ok_page(body: String) -> RawPage {
    RawPage::new(200, body, "https://www.lendingtree.com/reviews")
}

// ============================================================================
// Inspect Tests
// ============================================================================

#[test]
fn test_inspect_reads_listing_markers() {
    let shape = detector().inspect(&listing(Some(2), 3, Some(4)));
    assert_eq!(
        shape,
        ListingShape {
            current_page: Some(2),
            last_page: Some(4),
            item_count: 3,
            has_listing: true,
        }
    );
}

#[test]
fn test_inspect_without_last_page_selector() {
    let detector = BlockDetector::new(&SiteConfig::default()).unwrap();
    let shape = detector.inspect(&listing(Some(1), 1, Some(9)));
    assert_eq!(shape.last_page, None);
}

#[test]
fn test_detector_rejects_bad_selector() {
    let site = SiteConfig {
        review_selector: "<<<".to_string(),
        ..SiteConfig::default()
    };
    assert!(BlockDetector::new(&site).is_err());
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_classify_ok_page() {
    let class = detector().classify(&ok_page(listing(Some(2), 10, Some(3))), 2);
    assert_eq!(
        class,
        PageClassification::Ok(ListingInfo {
            current_page: Some(2),
            last_page: Some(3),
            item_count: 10,
        })
    );
    assert!(class.is_ok());
    assert_eq!(class.label(), "ok");
}

#[test]
fn test_classify_ok_without_page_number() {
    let class = detector().classify(&ok_page(listing(None, 4, None)), 3);
    assert_eq!(
        class,
        PageClassification::Ok(ListingInfo {
            current_page: None,
            last_page: None,
            item_count: 4,
        })
    );
}

#[test_case(1, EmptyReason::NoReviews ; "first page without reviews")]
#[test_case(5, EmptyReason::NoItems ; "later page without reviews")]
fn test_classify_numbered_empty(page: u32, expected: EmptyReason) {
    let class = detector().classify(&ok_page(listing(Some(page), 0, None)), page);
    assert_eq!(class, PageClassification::Empty(expected));
}

#[test]
fn test_classify_clamped_page_is_past_end() {
    // asked for 9, the site rendered its last page 4 with reviews of page 4
    let class = detector().classify(&ok_page(listing(Some(4), 6, None)), 9);
    assert_eq!(
        class,
        PageClassification::Empty(EmptyReason::PastEnd { last_page: 4 })
    );
}

#[test]
fn test_classify_unnumbered_listing_is_empty() {
    let class = detector().classify(&ok_page(listing(None, 0, None)), 39);
    assert_eq!(class, PageClassification::Empty(EmptyReason::NoItems));
}

#[test]
fn test_classify_later_page_rendered_is_blocked() {
    let class = detector().classify(&ok_page(listing(Some(7), 3, None)), 2);
    assert_eq!(
        class,
        PageClassification::Blocked(BlockReason::PageMismatch { rendered: 7 })
    );
}

#[test_case(200, "<html><body><div id=\"cf-chl-widget\"></div></body></html>", BlockReason::Challenge ; "challenge widget")]
#[test_case(403, "<html><body><h1>Access Denied</h1></body></html>", BlockReason::Challenge ; "access denied")]
#[test_case(429, "<html><body>slow down</body></html>", BlockReason::Status { status: 429 } ; "rate limited status")]
#[test_case(200, "<html><body><p>Welcome</p></body></html>", BlockReason::UnrecognizedShape ; "unrelated page")]
#[test_case(200, "  ", BlockReason::NoContent ; "blank body")]
fn test_classify_blocked(status: u16, body: &str, expected: BlockReason) {
    let page = RawPage::new(status, body, "");
    assert_eq!(
        detector().classify(&page, 2),
        PageClassification::Blocked(expected)
    );
}

#[test]
fn test_listing_wins_over_challenge_marker() {
    // a recaptcha script on a normal listing must not flag it
    let body = listing(Some(2), 3, None).replace(
        "</head>",
        "<script src=\"https://www.google.com/recaptcha/api.js\"></script></head>",
    );
    assert!(detector().classify(&ok_page(body), 2).is_ok());
}

#[test]
fn test_classification_is_idempotent() {
    let detector = detector();
    let pages = [
        ok_page(listing(Some(3), 5, Some(8))),
        ok_page(listing(Some(8), 2, Some(8))),
        ok_page(listing(None, 0, None)),
        RawPage::new(403, "<html>captcha</html>", ""),
    ];

    for page in &pages {
        for requested in [1, 3, 9] {
            let first = detector.classify(page, requested);
            let second = detector.classify(&page.clone(), requested);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_classification_serializes_with_tags() {
    let class = PageClassification::Empty(EmptyReason::PastEnd { last_page: 4 });
    let json = serde_json::to_value(class).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"kind": "empty", "reason": "past_end", "last_page": 4})
    );
}
