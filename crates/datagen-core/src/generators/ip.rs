//! Synthetic IP address generator.

use rand::Rng;

/// Network prefixes that generated addresses are drawn from.
pub const IP_PREFIXES: [&str; 11] = [
    "27.128.178",
    "1.8.110",
    "1.15.255",
    "14.102.158",
    "14.104.149",
    "220.243.255",
    "1.69.127",
    "1.180.240",
    "36.24.191",
    "14.18.159",
    "39.169.231",
];

/// Generate `<prefix>.<octet>` with a uniformly chosen prefix and octet.
pub fn generate_random_ip<R: Rng>(rng: &mut R) -> String {
    let prefix = IP_PREFIXES[rng.random_range(0..IP_PREFIXES.len())];
    let octet: u8 = rng.random();
    format!("{prefix}.{octet}")
}
