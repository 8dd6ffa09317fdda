mod yahoo;

pub use yahoo::{YahooAuthManager, YahooProvider};
