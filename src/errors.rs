use std::fmt;

use crate::utils::alias_codec::AliasError;

#[derive(Debug, Clone)]
pub enum LinkerError {
    /// 自定义短码格式不合法
    InvalidAlias(AliasError),
    InvalidUrl(String),
    /// 重定向路径中的短码格式不合法
    InvalidFormat(String),
    AliasTaken(String),
    ExhaustedRetries(String),
    NotFound(String),
    /// 存储层唯一约束冲突
    DuplicateKey(String),
    StoreConnection(String),
    StoreOperation(String),
    Config(String),
}

impl LinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkerError::InvalidAlias(_) => "E001",
            LinkerError::InvalidUrl(_) => "E002",
            LinkerError::InvalidFormat(_) => "E003",
            LinkerError::AliasTaken(_) => "E004",
            LinkerError::ExhaustedRetries(_) => "E005",
            LinkerError::NotFound(_) => "E006",
            LinkerError::DuplicateKey(_) => "E007",
            LinkerError::StoreConnection(_) => "E008",
            LinkerError::StoreOperation(_) => "E009",
            LinkerError::Config(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkerError::InvalidAlias(_) => "Invalid Alias",
            LinkerError::InvalidUrl(_) => "Invalid URL",
            LinkerError::InvalidFormat(_) => "Invalid Short Code Format",
            LinkerError::AliasTaken(_) => "Alias Taken",
            LinkerError::ExhaustedRetries(_) => "Alias Generation Exhausted",
            LinkerError::NotFound(_) => "Resource Not Found",
            LinkerError::DuplicateKey(_) => "Duplicate Key",
            LinkerError::StoreConnection(_) => "Store Connection Error",
            LinkerError::StoreOperation(_) => "Store Operation Error",
            LinkerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        match self {
            LinkerError::InvalidAlias(err) => err.to_string(),
            LinkerError::InvalidUrl(msg)
            | LinkerError::InvalidFormat(msg)
            | LinkerError::AliasTaken(msg)
            | LinkerError::ExhaustedRetries(msg)
            | LinkerError::NotFound(msg)
            | LinkerError::DuplicateKey(msg)
            | LinkerError::StoreConnection(msg)
            | LinkerError::StoreOperation(msg)
            | LinkerError::Config(msg) => msg.clone(),
        }
    }

    /// 是否为客户端输入导致的错误（映射为 4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LinkerError::InvalidAlias(_)
                | LinkerError::InvalidUrl(_)
                | LinkerError::InvalidFormat(_)
                | LinkerError::AliasTaken(_)
                | LinkerError::NotFound(_)
        )
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            LinkerError::InvalidAlias(_)
            | LinkerError::InvalidUrl(_)
            | LinkerError::InvalidFormat(_)
            | LinkerError::AliasTaken(_) => 400,
            LinkerError::NotFound(_) => 404,
            LinkerError::ExhaustedRetries(_)
            | LinkerError::DuplicateKey(_)
            | LinkerError::StoreConnection(_)
            | LinkerError::StoreOperation(_)
            | LinkerError::Config(_) => 500,
        }
    }

    /// 是否为存储后端错误（对客户端只暴露通用信息）
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            LinkerError::StoreConnection(_)
                | LinkerError::StoreOperation(_)
                | LinkerError::DuplicateKey(_)
        )
    }

    /// 格式化为彩色输出（用于启动失败时输出到终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkerError {}

// 便捷的构造函数
impl LinkerError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        LinkerError::InvalidUrl(msg.into())
    }

    pub fn invalid_format<T: Into<String>>(msg: T) -> Self {
        LinkerError::InvalidFormat(msg.into())
    }

    pub fn alias_taken<T: Into<String>>(msg: T) -> Self {
        LinkerError::AliasTaken(msg.into())
    }

    pub fn exhausted_retries<T: Into<String>>(msg: T) -> Self {
        LinkerError::ExhaustedRetries(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkerError::NotFound(msg.into())
    }

    pub fn duplicate_key<T: Into<String>>(msg: T) -> Self {
        LinkerError::DuplicateKey(msg.into())
    }

    pub fn store_connection<T: Into<String>>(msg: T) -> Self {
        LinkerError::StoreConnection(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        LinkerError::StoreOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkerError::Config(msg.into())
    }
}

impl From<AliasError> for LinkerError {
    fn from(err: AliasError) -> Self {
        LinkerError::InvalidAlias(err)
    }
}

impl From<sea_orm::DbErr> for LinkerError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkerError::StoreOperation(err.to_string())
    }
}

impl From<config::ConfigError> for LinkerError {
    fn from(err: config::ConfigError) -> Self {
        LinkerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkerError>;
