use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 参数校验错误（缺少必填参数或取值非法）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 微信开放接口错误
    #[error("WeChat API error: {0}")]
    WeChatApiError(String),

    /// 微信支付网关错误
    #[error("WeChat Pay API error: {0}")]
    WeChatPayError(String),

    /// 上游响应缺少预期字段
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// 统一下单失败
    #[error("Order construction failed: {0}")]
    OrderConstructionFailed(String),

    /// 签名验证失败
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// HTTP请求错误
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// XML解析错误
    #[error("XML error: {0}")]
    XmlError(String),

    /// 文件存储错误
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// 加密错误
    #[error("Cryptography error: {0}")]
    CryptoError(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
