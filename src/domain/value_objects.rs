use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 交易类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    /// 公众号/小程序支付
    #[default]
    Jsapi,
    /// 扫码支付
    Native,
    /// APP支付
    App,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Jsapi => write!(f, "JSAPI"),
            TradeType::Native => write!(f, "NATIVE"),
            TradeType::App => write!(f, "APP"),
        }
    }
}

impl FromStr for TradeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JSAPI" => Ok(TradeType::Jsapi),
            "NATIVE" => Ok(TradeType::Native),
            "APP" => Ok(TradeType::App),
            other => Err(DomainError::ValidationError(format!(
                "Unsupported tradeType: {}",
                other
            ))),
        }
    }
}

/// 签名类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignType {
    #[default]
    Md5,
    HmacSha256,
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignType::Md5 => write!(f, "MD5"),
            SignType::HmacSha256 => write!(f, "HMAC-SHA256"),
        }
    }
}

impl FromStr for SignType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MD5" => Ok(SignType::Md5),
            "HMAC-SHA256" => Ok(SignType::HmacSha256),
            other => Err(DomainError::ValidationError(format!(
                "Unsupported sign_type: {}",
                other
            ))),
        }
    }
}

/// 小程序版本
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvVersion {
    /// 正式版
    #[default]
    Release,
    /// 体验版
    Trial,
    /// 开发版
    Develop,
}

impl fmt::Display for EnvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvVersion::Release => write!(f, "release"),
            EnvVersion::Trial => write!(f, "trial"),
            EnvVersion::Develop => write!(f, "develop"),
        }
    }
}

impl FromStr for EnvVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "release" => Ok(EnvVersion::Release),
            "trial" => Ok(EnvVersion::Trial),
            "develop" => Ok(EnvVersion::Develop),
            other => Err(DomainError::ValidationError(format!(
                "Unsupported env_version: {}",
                other
            ))),
        }
    }
}

/// 货币金额（分为单位，避免浮点数精度问题）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// 金额（分）
    pub amount_cents: i64,
}

impl Money {
    /// 创建新的金额对象（单位：分）
    pub fn from_cents(cents: i64) -> Self {
        Self { amount_cents: cents }
    }

    /// 转换为元
    pub fn to_yuan(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// 转换为分
    pub fn to_cents(&self) -> i64 {
        self.amount_cents
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "¥{:.2}", self.to_yuan())
    }
}

/// 敏感字符串（AppSecret、商户API密钥等），调试输出时打码
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(********)")
    }
}
