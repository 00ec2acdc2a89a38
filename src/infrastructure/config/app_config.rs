use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::Secret;
use std::path::PathBuf;

/// 服务配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 监听地址
    pub server_host: String,

    /// 监听端口
    pub server_port: u16,

    /// 对外访问的基础URL（图片地址、默认回调地址）
    pub public_base_url: String,

    /// 公众号/小程序 API 基础URL
    pub wechat_api_base_url: String,

    /// 微信支付 V2 网关基础URL
    pub wechat_pay_base_url: String,

    /// 默认支付回调地址
    pub default_notify_url: String,

    /// 回调验签使用的商户API密钥
    pub notify_api_key: Option<Secret>,

    /// 默认商品描述
    pub default_body: String,

    /// 静态文件根目录
    pub static_dir: PathBuf,

    /// 出站请求超时（秒）
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> DomainResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// 从任意变量来源构建配置，空值视为未设置
    pub fn from_vars<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let server_port = match var("SERVER_PORT") {
            Some(port) => port.trim().parse::<u16>().map_err(|e| {
                DomainError::ConfigurationError(format!("Invalid SERVER_PORT '{}': {}", port, e))
            })?,
            None => 3000,
        };

        let http_timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    DomainError::ConfigurationError(format!(
                        "Invalid HTTP_TIMEOUT_SECS '{}': must be a positive integer",
                        secs
                    ))
                })?,
            None => 10,
        };

        let public_base_url = trim_url(
            var("BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
        );
        let default_notify_url = var("WECHAT_PAY_NOTIFY_URL")
            .unwrap_or_else(|| format!("{}/api/wechat/pay/v2/notify", public_base_url));

        Ok(Self {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            wechat_api_base_url: trim_url(
                var("WECHAT_API_BASE_URL")
                    .unwrap_or_else(|| "https://api.weixin.qq.com".to_string()),
            ),
            wechat_pay_base_url: trim_url(
                var("WECHAT_PAY_BASE_URL")
                    .unwrap_or_else(|| "https://api.mch.weixin.qq.com".to_string()),
            ),
            default_notify_url,
            notify_api_key: var("WECHAT_PAY_API_KEY").map(Secret::new),
            default_body: var("WECHAT_PAY_DEFAULT_BODY").unwrap_or_else(|| "商品支付".to_string()),
            static_dir: PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "public".to_string())),
            public_base_url,
            http_timeout_secs,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// 小程序码图片目录
    pub fn images_dir(&self) -> PathBuf {
        self.static_dir.join("images")
    }
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
