use serde::{Deserialize, Serialize};

use crate::errors::{LinkerError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，例如 `LK__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "LK";

/// 保留天数上限（约 100 年）
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// 清理间隔上限（一年）
pub const MAX_SWEEP_INTERVAL_HOURS: u64 = 24 * 366;

/// 首次清理延迟上限（30 天）
pub const MAX_INITIAL_DELAY_SECS: u64 = 30 * 24 * 60 * 60;

/// 静态配置（从 TOML 与环境变量加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量、短链接前缀
/// - database: 存储连接与重试配置
/// - logging: 日志配置
/// - retention: 闲置短链接清理
/// - tracker: 访问时间异步写入队列
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值。文件不存在时只使用环境变量与默认值；
    /// 文件存在但无法解析时返回错误。
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File, FileFormat};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<StaticConfig>()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 启动前校验，失败时不应绑定任何端口
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(LinkerError::config(
                "server.base_url is required (e.g. https://sho.rt)",
            ));
        }
        let base = self.server.base_url.trim();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(LinkerError::config(format!(
                "server.base_url must start with http:// or https://, got '{}'",
                base
            )));
        }
        if self.database.database_url.trim().is_empty() {
            return Err(LinkerError::config(
                "database.database_url is required (e.g. sqlite://links.db)",
            ));
        }
        if self.server.cpu_count == 0 {
            return Err(LinkerError::config("server.cpu_count must be at least 1"));
        }
        if self.database.pool_size == 0 {
            return Err(LinkerError::config("database.pool_size must be at least 1"));
        }
        if self.database.timeout == 0 {
            return Err(LinkerError::config("database.timeout must be at least 1 second"));
        }
        if !(1..=MAX_RETENTION_DAYS).contains(&self.retention.retention_days) {
            return Err(LinkerError::config(format!(
                "retention.retention_days must be between 1 and {}, got {}",
                MAX_RETENTION_DAYS, self.retention.retention_days
            )));
        }
        if !(1..=MAX_SWEEP_INTERVAL_HOURS).contains(&self.retention.sweep_interval_hours) {
            return Err(LinkerError::config(format!(
                "retention.sweep_interval_hours must be between 1 and {}, got {}",
                MAX_SWEEP_INTERVAL_HOURS, self.retention.sweep_interval_hours
            )));
        }
        if self.retention.initial_delay_secs > MAX_INITIAL_DELAY_SECS {
            return Err(LinkerError::config(format!(
                "retention.initial_delay_secs must be at most {}, got {}",
                MAX_INITIAL_DELAY_SECS, self.retention.initial_delay_secs
            )));
        }
        if self.tracker.queue_capacity == 0 {
            return Err(LinkerError::config("tracker.queue_capacity must be at least 1"));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置
    pub fn generate_sample_config() -> String {
        let mut sample = Self::default();
        sample.server.base_url = "https://sho.rt".to_string();
        sample.database.database_url = "sqlite://links.db".to_string();
        toml::to_string_pretty(&sample)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 对外短链接前缀，例如 `https://sho.rt`
    #[serde(default)]
    pub base_url: String,
}

/// 存储连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite://…`、`mysql://…`、`postgres://…` 或 `memory://`
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// 单次操作超时（秒）
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` 或 `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 闲置短链接清理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,
    /// 最后访问早于该天数的记录会被删除
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,
    /// 启动后首次清理前的等待（秒）
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
}

/// 访问时间写入队列配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_retention_enabled() -> bool {
    true
}

fn default_retention_days() -> i64 {
    365
}

fn default_sweep_interval_hours() -> u64 {
    24
}

fn default_initial_delay_secs() -> u64 {
    300
}

fn default_queue_capacity() -> usize {
    4096
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            base_url: String::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            retention_days: default_retention_days(),
            sweep_interval_hours: default_sweep_interval_hours(),
            initial_delay_secs: default_initial_delay_secs(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}
