pub mod feed_service;
pub mod quote_service;

pub use feed_service::{FeedService, FeedUpdate};
pub use quote_service::{BuyQuote, QuoteService, QuoteServiceError, SellQuote, DEFAULT_SLIPPAGE_BPS};
