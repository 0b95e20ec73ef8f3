/// Average characters per language-model token. Coarse on purpose: callers
/// need an order-of-magnitude budget check, not a billing-grade count.
pub const CHARS_PER_TOKEN: usize = 4;

/// Approximate token count of a text, rounding up. Counts characters,
/// not UTF-8 bytes.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
