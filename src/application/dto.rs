use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// 获取 access_token 请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenQuery {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
}

/// 获取 openid 请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenIdQuery {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub code: Option<String>,
}

/// 生成小程序码请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcodeRequest {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,

    /// 小程序页面路径
    pub page: Option<String>,

    /// 场景值，最大32个字符
    pub scene: Option<String>,

    /// release / trial / develop，默认 release
    #[serde(rename = "env_version")]
    pub env_version: Option<String>,
}

/// 微信支付 V2 下单请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayV2Request {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,

    /// 商户号
    pub mch_id: Option<String>,

    /// 商户API密钥
    pub api_key: Option<String>,

    /// 用户OpenID（JSAPI支付时需要）
    pub open_id: Option<String>,

    /// 回调地址，缺省使用配置值
    pub notify_url: Option<String>,

    /// 商品描述，缺省使用配置值
    pub body: Option<String>,

    /// 附加数据
    pub attach: Option<String>,

    /// 商户订单号，缺省自动生成
    pub out_trade_no: Option<String>,

    /// 支付金额（分），缺省为1
    pub total_fee: Option<i64>,

    /// JSAPI / NATIVE / APP，缺省 JSAPI
    pub trade_type: Option<String>,

    /// 随机字符串，缺省自动生成
    pub nonce_str: Option<String>,

    /// 终端IP
    pub client_ip: Option<String>,
}

/// 成功响应
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

/// 小程序码结果
#[derive(Debug)]
pub enum AcodeOutcome {
    /// 图片已保存
    Stored { url: String },
    /// 微信返回的错误JSON
    Rejected(serde_json::Value),
}

#[derive(Debug, Serialize)]
pub struct AcodeData {
    pub url: String,
}

/// 回调处理结果
#[derive(Debug)]
pub enum NotificationOutcome {
    /// XML 报文解析结果
    Parsed(std::collections::BTreeMap<String, String>),
    /// 非 XML 请求，回显请求头
    Headers(std::collections::BTreeMap<String, String>),
}

/// 取出必填参数，缺失或空白时返回校验错误
pub fn required(value: Option<String>, name: &str) -> DomainResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DomainError::ValidationError(format!(
            "Missing required parameter: {}",
            name
        ))),
    }
}

/// 取出可选参数，空白视为未提供
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let err = required(Some("  ".to_string()), "appId").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required parameter: appId"
        );
        assert!(required(None, "appSecret").is_err());
        assert_eq!(required(Some(" wx1 ".to_string()), "appId").unwrap(), "wx1");
    }

    #[test]
    fn test_optional_drops_blank() {
        assert_eq!(optional(Some(String::new())), None);
        assert_eq!(optional(Some("x".to_string())), Some("x".to_string()));
    }

    #[test]
    fn test_pay_request_wire_names() {
        let request: PayV2Request = serde_json::from_value(serde_json::json!({
            "appId": "wx1",
            "appSecret": "s",
            "mchId": "mch1",
            "apiKey": "k1",
            "openId": "o",
            "totalFee": 5,
        }))
        .unwrap();

        assert_eq!(request.mch_id.as_deref(), Some("mch1"));
        assert_eq!(request.api_key.as_deref(), Some("k1"));
        assert_eq!(request.open_id.as_deref(), Some("o"));
        assert_eq!(request.total_fee, Some(5));
    }

    #[test]
    fn test_acode_request_env_version_name() {
        let request: AcodeRequest = serde_json::from_value(serde_json::json!({
            "appId": "wx1",
            "env_version": "trial",
        }))
        .unwrap();

        assert_eq!(request.env_version.as_deref(), Some("trial"));
    }
}
