//! 短码编解码
//!
//! 校验并规范化用户自定义短码，随机短码生成见 [`super::generate_random_code`]。

use std::fmt;

/// 自定义短码最小长度
pub const MIN_ALIAS_LEN: usize = 3;

/// 自定义短码最大长度
pub const MAX_ALIAS_LEN: usize = 50;

/// 允许出现在短码中的特殊字符
const SPECIAL_CHARS: [char; 3] = ['.', '-', '_'];

/// 自定义短码校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasError {
    EmptyInput,
    InvalidCharacters,
    TooShort,
    TooLong,
    BoundarySpecialChar,
    RepeatedSpecialChar,
}

impl fmt::Display for AliasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Custom name cannot be empty"),
            Self::InvalidCharacters => write!(
                f,
                "Custom name may only contain letters, numbers, '.', '-' and '_'"
            ),
            Self::TooShort => write!(
                f,
                "Custom name must be at least {} characters long",
                MIN_ALIAS_LEN
            ),
            Self::TooLong => write!(
                f,
                "Custom name must be at most {} characters long",
                MAX_ALIAS_LEN
            ),
            Self::BoundarySpecialChar => write!(
                f,
                "Custom name cannot start or end with '.', '-' or '_'"
            ),
            Self::RepeatedSpecialChar => write!(
                f,
                "Custom name cannot contain consecutive '.', '-' or '_' characters"
            ),
        }
    }
}

impl std::error::Error for AliasError {}

#[inline]
fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

#[inline]
fn is_alias_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_special(c)
}

/// 校验并规范化自定义短码
///
/// 检查顺序：
/// 1. 去除首尾空白后不能为空
/// 2. 只允许 ASCII 字母、数字和 `.` `-` `_`
/// 3. 转为小写
/// 4. 长度在 3..=50 之间
/// 5. 首尾不能是特殊字符
/// 6. 不能有连续两个特殊字符
pub fn normalize_custom(input: &str) -> Result<String, AliasError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AliasError::EmptyInput);
    }

    if !trimmed.chars().all(is_alias_char) {
        return Err(AliasError::InvalidCharacters);
    }

    // 此时全部是 ASCII，字节长度等于字符数
    let normalized = trimmed.to_ascii_lowercase();

    if normalized.len() < MIN_ALIAS_LEN {
        return Err(AliasError::TooShort);
    }
    if normalized.len() > MAX_ALIAS_LEN {
        return Err(AliasError::TooLong);
    }

    let bytes = normalized.as_bytes();
    if is_special(bytes[0] as char) || is_special(bytes[bytes.len() - 1] as char) {
        return Err(AliasError::BoundarySpecialChar);
    }

    if bytes
        .windows(2)
        .any(|pair| is_special(pair[0] as char) && is_special(pair[1] as char))
    {
        return Err(AliasError::RepeatedSpecialChar);
    }

    Ok(normalized)
}

/// 重定向路径上的短码格式检查（大小写不敏感，不校验长度）
pub fn is_valid_code_format(code: &str) -> bool {
    !code.is_empty() && code.chars().all(is_alias_char)
}
