//! yprice Extractor
//!
//! Turns company names into stock codes and stock codes into yearly closing
//! prices by reading the catalog's search and history pages.
//!
//! # Architecture
//!
//! ```text
//! Record → Resolver → StockCode → HistoryExtractor → YearlyValues → ScrapeResult
//! ```
//!
//! Every network call goes through a [`PageFetcher`](yprice_http::PageFetcher),
//! so tests drive the whole flow with `MockFetcher`. Markup is parsed
//! synchronously after the response arrives and never held across an await.
//!
//! # Degrading instead of failing
//!
//! - A name with no exactly-matching listing entry yields an empty code.
//! - A page without the yearly section yields all-default prices.
//! - A price cell that does not parse leaves that year at its default.
//!
//! Only non-2xx responses, transport failures and cancellation are errors.
//!
//! # Example Usage
//!
//! ```no_run
//! use yprice_domain::Record;
//! use yprice_extractor::{PriceScraper, ScraperConfig};
//! use yprice_http::{CancelToken, HttpConfig, ReqwestFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = ReqwestFetcher::new(&HttpConfig::default())?;
//! let scraper = PriceScraper::new(fetcher, ScraperConfig::default())?;
//!
//! let record = Record::new(0, "トヨタ自動車")?;
//! let result = scraper.scrape(record, &CancelToken::new()).await?;
//!
//! println!("{} -> {}", result.name, result.code);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod history;
mod price;
mod price_scraper;
mod resolver;
mod selectors;


pub use config::ScraperConfig;
pub use error::{PriceError, ScrapeError};
pub use history::HistoryExtractor;
pub use price::{parse_price, parse_year_label};
pub use price_scraper::PriceScraper;
pub use resolver::Resolver;
