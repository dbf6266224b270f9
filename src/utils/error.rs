use thiserror::Error;

#[derive(Error, Debug)]
pub enum BasketError {
    #[error("Invalid item '{name}': {reason}")]
    InvalidItem { name: String, reason: String },

    #[error("Invalid basket limit {limit}: must be a finite number >= 0")]
    InvalidLimit { limit: f64 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Completion signal was resolved without a registered reaction")]
    ResolutionLost,

    #[error("Settlement task failed: {message}")]
    SettlementTask { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Settlement,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BasketError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BasketError::InvalidItem { .. } | BasketError::CsvError(_) => ErrorCategory::Input,
            BasketError::InvalidLimit { .. }
            | BasketError::ConfigError { .. }
            | BasketError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BasketError::ResolutionLost | BasketError::SettlementTask { .. } => {
                ErrorCategory::Settlement
            }
            BasketError::IoError(_) | BasketError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 結果遺失但程序本身沒有出錯
            BasketError::ResolutionLost => ErrorSeverity::Medium,
            BasketError::InvalidItem { .. }
            | BasketError::InvalidLimit { .. }
            | BasketError::CsvError(_)
            | BasketError::ConfigError { .. }
            | BasketError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            BasketError::IoError(_)
            | BasketError::SerializationError(_)
            | BasketError::SettlementTask { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BasketError::InvalidItem { name, reason } => {
                format!("商品資料有誤 ({}): {}", name, reason)
            }
            BasketError::InvalidLimit { limit } => format!("購物籃上限無效: {}", limit),
            BasketError::CsvError(e) => format!("無法解析購買清單: {}", e),
            BasketError::IoError(e) => format!("檔案讀取失敗: {}", e),
            BasketError::SerializationError(e) => format!("輸出格式化失敗: {}", e),
            BasketError::ConfigError { message } => format!("配置錯誤: {}", message),
            BasketError::InvalidConfigValueError { field, value, reason } => {
                format!("配置項 {} 的值 '{}' 無效: {}", field, value, reason)
            }
            BasketError::ResolutionLost => "結算結果在註冊回呼之前就已送出，結果遺失".to_string(),
            BasketError::SettlementTask { message } => format!("結算任務失敗: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the purchase list: a `name,price` header and non-negative prices",
            ErrorCategory::Configuration => "Check --limit / --delay-ms or the TOML config file",
            ErrorCategory::Settlement => "Register the reaction before the settlement delay elapses",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, BasketError>;
