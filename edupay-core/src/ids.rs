//! Externally-visible order identifiers.

use rand::Rng;

const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Generates a merchant-side order identifier of the shape
/// `ORD_<unix millis>_<7 random base36 chars>`.
///
/// The random suffix separates identifiers minted in the same
/// millisecond; the store's uniqueness constraint remains the
/// authority on collisions.
pub fn generate_custom_order_id() -> String {
    let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::rng();
    let mut id = format!("ORD_{millis}_");
    for _ in 0..SUFFIX_LEN {
        let index = rng.random_range(0..SUFFIX_ALPHABET.len());
        id.push(SUFFIX_ALPHABET[index] as char);
    }
    id
}
