//! Affiliate links

use std::borrow::Cow;

/// Tracking parameter for a merchant, matched case-insensitively.
pub fn affiliate_param(merchant: &str) -> Option<&'static str> {
    match merchant.to_lowercase().as_str() {
        "amazon" => Some("tag=spicybeats-21"),
        "flipkart" => Some("affid=spicybeats"),
        "myntra" => Some("utm_source=spicybeats"),
        _ => None,
    }
}

/// Append the merchant's tracking parameter to a deal URL.
///
/// Merchants without a tracking parameter get the URL back unchanged.
pub fn affiliate_link<'a>(url: &'a str, merchant: &str) -> Cow<'a, str> {
    let Some(param) = affiliate_param(merchant) else {
        return Cow::Borrowed(url);
    };

    let separator = if url.contains('?') { '&' } else { '?' };

    Cow::Owned(format!("{url}{separator}{param}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_with_question_mark_when_no_query() {
        assert_eq!(
            affiliate_link("https://x.com/d", "Amazon"),
            "https://x.com/d?tag=spicybeats-21"
        );
    }

    #[test]
    fn appends_with_ampersand_when_query_present() {
        assert_eq!(
            affiliate_link("https://x.com/d?x=1", "flipkart"),
            "https://x.com/d?x=1&affid=spicybeats"
        );
    }

    #[test]
    fn unknown_merchant_is_unchanged() {
        let link = affiliate_link("https://x.com/d", "unknownstore");

        assert!(matches!(link, Cow::Borrowed("https://x.com/d")));
    }

    #[test]
    fn merchant_lookup_ignores_case() {
        assert_eq!(affiliate_param("MYNTRA"), Some("utm_source=spicybeats"));
        assert_eq!(affiliate_param("Croma"), None);
    }
}
