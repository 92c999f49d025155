//! Company name → stock code resolution

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::selectors::Selectors;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::debug;
use url::{form_urlencoded, Url};
use yprice_domain::StockCode;
use yprice_http::{CancelToken, PageFetcher};

/// Maps an entity name to its stock code via the catalog search
///
/// The search either redirects straight to the company page, with the code in
/// the final URL, or renders a listing. In the listing, the first entry whose
/// trimmed display name equals the input exactly wins. There is no fuzzy
/// matching: full-width/half-width or case variants stay unresolved.
pub struct Resolver<F> {
    fetcher: Arc<F>,
    config: Arc<ScraperConfig>,
    selectors: Arc<Selectors>,
}

impl<F: PageFetcher> Resolver<F> {
    pub(crate) fn new(
        fetcher: Arc<F>,
        config: Arc<ScraperConfig>,
        selectors: Arc<Selectors>,
    ) -> Self {
        Self {
            fetcher,
            config,
            selectors,
        }
    }

    /// Resolve `name`, returning an unresolved code when nothing matches
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UpstreamStatus`] for a non-2xx search response
    /// - [`ScrapeError::Transport`] when the request fails
    /// - [`ScrapeError::Cancelled`] when `cancel` fires first
    pub async fn resolve(&self, name: &str, cancel: &CancelToken) -> Result<StockCode, ScrapeError> {
        let url = self.config.search_url(name)?;
        let page = self.fetcher.fetch(url.as_str(), cancel).await?;

        if !page.is_success() {
            return Err(ScrapeError::UpstreamStatus {
                status: page.status,
                url: url.to_string(),
            });
        }

        if let Some(code) = code_from_url(&page.url, &self.config.code_param) {
            debug!("Search for {} redirected to code {}", name, code);
            return Ok(code);
        }

        let code = find_in_listing(
            &page.body,
            name,
            &self.selectors.listing,
            &self.config.code_param,
        );
        debug!("Listing scan for {} found {:?}", name, code.as_str());
        Ok(code)
    }
}

/// Code carried as a query parameter of an absolute URL
fn code_from_url(url: &str, param: &str) -> Option<StockCode> {
    let url = Url::parse(url).ok()?;
    let query = url.query()?;
    code_from_query(query, param)
}

/// Code carried in the query string of a link, which may be relative
fn code_from_href(href: &str, param: &str) -> Option<StockCode> {
    let (_, rest) = href.split_once('?')?;
    let query = rest.split('#').next().unwrap_or_default();
    code_from_query(query, param)
}

fn code_from_query(query: &str, param: &str) -> Option<StockCode> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(StockCode::new)
}

/// Scan a search listing for an entry named exactly `name`
///
/// Stops at the first match. A match whose link carries no code still ends
/// the scan, unresolved.
pub(crate) fn find_in_listing(html: &str, name: &str, listing: &Selector, param: &str) -> StockCode {
    let document = Html::parse_document(html);
    let entry = document
        .select(listing)
        .find(|entry| entry.text().collect::<String>().trim() == name);

    entry
        .and_then(|entry| entry.value().attr("href"))
        .and_then(|href| code_from_href(href, param))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_selector() -> Selector {
        Selector::parse(".m-companyList_item_data_name").unwrap()
    }

    const LISTING: &str = r#"
        <ul class="m-companyList">
          <li><a class="m-companyList_item_data_name" href="/nkd/company/?scode=7205">
            日野自動車
          </a></li>
          <li><a class="m-companyList_item_data_name" href="/nkd/company/?scode=7203&amp;ba=1">
            トヨタ自動車
          </a></li>
          <li><a class="m-companyList_item_data_name" href="/nkd/company/?scode=9999">
            トヨタ自動車
          </a></li>
        </ul>
    "#;

    #[test]
    fn test_code_from_redirect_url() {
        let code = code_from_url("https://www.nikkei.com/nkd/company/?scode=7203", "scode");
        assert_eq!(code, Some(StockCode::new("7203")));
    }

    #[test]
    fn test_search_url_has_no_code() {
        let code = code_from_url(
            "https://www.nikkei.com/nkd/search?searchKeyword=%E4%BB%BB",
            "scode",
        );
        assert_eq!(code, None);
    }

    #[test]
    fn test_empty_code_param_is_no_code() {
        assert_eq!(code_from_url("https://a.test/?scode=", "scode"), None);
    }

    #[test]
    fn test_listing_first_exact_match_wins() {
        let code = find_in_listing(LISTING, "トヨタ自動車", &listing_selector(), "scode");
        assert_eq!(code.as_str(), "7203");
    }

    #[test]
    fn test_listing_requires_exact_match() {
        let selector = listing_selector();
        assert!(find_in_listing(LISTING, "トヨタ", &selector, "scode").is_unresolved());
        assert!(find_in_listing(LISTING, "ﾄﾖﾀ自動車", &selector, "scode").is_unresolved());
        assert!(find_in_listing(LISTING, "トヨタ自動車 ", &selector, "scode").is_unresolved());
    }

    #[test]
    fn test_listing_match_without_href() {
        let html = r#"<span class="m-companyList_item_data_name">任天堂</span>
                      <a class="m-companyList_item_data_name" href="/x?scode=7974">任天堂</a>"#;
        let code = find_in_listing(html, "任天堂", &listing_selector(), "scode");
        assert!(code.is_unresolved());
    }

    #[test]
    fn test_href_without_query() {
        let html = r#"<a class="m-companyList_item_data_name" href="/nkd/company/">任天堂</a>"#;
        let code = find_in_listing(html, "任天堂", &listing_selector(), "scode");
        assert!(code.is_unresolved());
    }

    #[test]
    fn test_href_with_fragment() {
        assert_eq!(
            code_from_href("/nkd/company/?scode=6758#top", "scode"),
            Some(StockCode::new("6758"))
        );
    }

    #[test]
    fn test_empty_listing() {
        let code = find_in_listing("<html><body></body></html>", "任天堂", &listing_selector(), "scode");
        assert!(code.is_unresolved());
    }
}
