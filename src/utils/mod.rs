pub mod alias_codec;
pub mod url_validator;

pub use alias_codec::{AliasError, is_valid_code_format, normalize_custom};
pub use url_validator::validate_url;

/// 随机短码字符表（不含特殊字符）
const RANDOM_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| {
        RANDOM_CODE_ALPHABET[rand::random_range(0..RANDOM_CODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}
