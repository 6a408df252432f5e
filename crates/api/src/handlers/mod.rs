pub mod common;
pub mod health;
pub mod protocols;
pub mod swaps;

pub use health::health;
pub use protocols::get_protocols;
pub use swaps::{post_price, post_quote};
