// Core primitives - address validation and risk banding

pub mod address;
pub mod risk;

pub use address::{is_valid_ethereum_address, same_address};
pub use risk::RiskBand;
