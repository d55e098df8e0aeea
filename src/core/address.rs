// Wallet address helpers - syntax check and identity comparison for Ethereum addresses

use once_cell::sync::Lazy;
use regex::Regex;

static ETHEREUM_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("address pattern compiles"));

/// `0x` followed by exactly 40 hex digits, either case. No checksum check.
pub fn is_valid_ethereum_address(address: &str) -> bool {
    ETHEREUM_ADDRESS.is_match(address)
}

/// Addresses are compared case-insensitively; mixed-case checksummed and
/// lowercase spellings of the same wallet are equal.
pub fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
