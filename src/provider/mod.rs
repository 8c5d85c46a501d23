pub mod fixed;
pub mod traits;
pub mod yahoo;

pub use fixed::FixedProvider;
pub use traits::MarketDataProvider;
pub use yahoo::YahooProvider;
