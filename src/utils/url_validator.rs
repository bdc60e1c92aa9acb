//! 目标 URL 校验
//!
//! 只接受带主机名的 http / https 绝对 URL

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    UnsupportedScheme(String),
    DangerousScheme(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "Original URL cannot be empty"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported URL scheme '{}': only http and https are allowed",
                scheme
            ),
            Self::DangerousScheme(scheme) => write!(f, "URL scheme '{}' is not allowed", scheme),
            Self::MissingHost => write!(f, "Original URL must include a host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 直接拒绝的协议（先于解析检查，避免 `javascript:` 之类被当作相对路径处理）
const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// 校验目标 URL，返回去除首尾空白后的原始字符串
pub fn validate_url(raw: &str) -> Result<String, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(scheme) = DANGEROUS_SCHEMES
        .iter()
        .find(|s| lower.starts_with(&format!("{}:", s)))
    {
        return Err(UrlValidationError::DangerousScheme(scheme.to_string()));
    }

    let parsed =
        Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert_eq!(
            validate_url("https://example.com/a").unwrap(),
            "https://example.com/a"
        );
        assert!(validate_url("http://localhost:8080/path?q=1#frag").is_ok());
        assert!(validate_url("HTTPS://EXAMPLE.COM").is_ok());
        assert_eq!(
            validate_url("  https://example.com  ").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }

    #[test]
    fn test_dangerous_schemes() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousScheme(_))
        ));
        assert!(matches!(
            validate_url("DATA:text/html,<b>x</b>"),
            Err(UrlValidationError::DangerousScheme(_))
        ));
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::DangerousScheme(_))
        ));
    }

    #[test]
    fn test_unsupported_schemes() {
        assert_eq!(
            validate_url("ftp://example.com/file"),
            Err(UrlValidationError::UnsupportedScheme("ftp".to_string()))
        );
        assert!(matches!(
            validate_url("mailto:someone@example.com"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_relative_urls_rejected() {
        assert!(matches!(
            validate_url("/just/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }
}
