use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{EnvVersion, Money, Secret, TradeType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 应用凭据（AppID + AppSecret）
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_secret: Secret,
}

/// 接口调用凭据
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: i64,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"********")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// 登录会话（code2Session 结果）
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginSession {
    pub openid: String,
    pub session_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unionid: Option<String>,
}

impl fmt::Debug for LoginSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSession")
            .field("openid", &self.openid)
            .field("session_key", &"********")
            .field("unionid", &self.unionid)
            .finish()
    }
}

/// 小程序码生成参数
#[derive(Debug, Clone, Serialize)]
pub struct QrCodeRequest {
    pub scene: String,
    pub page: String,
    pub env_version: EnvVersion,
}

/// 小程序码生成结果
#[derive(Debug, Clone)]
pub enum QrCodeOutcome {
    /// 图片数据（PNG）
    Image(Vec<u8>),
    /// 微信返回的错误JSON，原样转发
    Rejected(serde_json::Value),
}

/// 统一下单请求
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// 公众号/小程序APPID
    pub app_id: String,

    /// 商户号
    pub mch_id: String,

    /// 随机字符串
    pub nonce_str: String,

    /// 商品描述
    pub body: String,

    /// 附加数据（原样返回）
    pub attach: Option<String>,

    /// 商户订单号
    pub out_trade_no: String,

    /// 标价金额（分）
    pub total_fee: Money,

    /// 通知地址
    pub notify_url: String,

    /// 用户标识
    pub openid: Option<String>,

    /// 交易类型
    pub trade_type: TradeType,

    /// 终端IP
    pub spbill_create_ip: Option<String>,
}

impl OrderRequest {
    /// 校验订单字段
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            ("appId", &self.app_id),
            ("mchId", &self.mch_id),
            ("nonceStr", &self.nonce_str),
            ("body", &self.body),
            ("outTradeNo", &self.out_trade_no),
            ("notifyUrl", &self.notify_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::ValidationError(format!("{} is required", name)));
            }
        }

        if self.out_trade_no.len() > 32 {
            return Err(DomainError::ValidationError(
                "outTradeNo must be 1-32 characters".to_string(),
            ));
        }

        if self.nonce_str.len() > 32 {
            return Err(DomainError::ValidationError(
                "nonceStr must be 1-32 characters".to_string(),
            ));
        }

        if self.total_fee.to_cents() <= 0 {
            return Err(DomainError::ValidationError(
                "totalFee must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 映射为网关字段名，空值不参与
    pub fn to_gateway_fields(&self) -> BTreeMap<String, String> {
        let entries = [
            ("appid", Some(self.app_id.clone())),
            ("mch_id", Some(self.mch_id.clone())),
            ("nonce_str", Some(self.nonce_str.clone())),
            ("body", Some(self.body.clone())),
            ("attach", self.attach.clone()),
            ("out_trade_no", Some(self.out_trade_no.clone())),
            ("total_fee", Some(self.total_fee.to_cents().to_string())),
            ("notify_url", Some(self.notify_url.clone())),
            ("openid", self.openid.clone()),
            ("trade_type", Some(self.trade_type.to_string())),
            ("spbill_create_ip", self.spbill_create_ip.clone()),
        ];

        entries
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| (name.to_string(), v))
            })
            .collect()
    }
}

/// 已签名的网关请求字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedGatewayPayload {
    fields: BTreeMap<String, String>,
    sign: String,
}

impl SignedGatewayPayload {
    pub fn new(fields: BTreeMap<String, String>, sign: String) -> Self {
        Self { fields, sign }
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn sign(&self) -> &str {
        &self.sign
    }

    /// 含 sign 在内的完整报文字段
    pub fn to_wire_fields(&self) -> BTreeMap<String, String> {
        let mut wire = self.fields.clone();
        wire.insert("sign".to_string(), self.sign.clone());
        wire
    }
}

/// 客户端调起支付参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPaymentParams {
    #[serde(rename = "appId")]
    pub app_id: String,

    #[serde(rename = "timeStamp")]
    pub time_stamp: String,

    #[serde(rename = "nonceStr")]
    pub nonce_str: String,

    pub package: String,

    #[serde(rename = "signType")]
    pub sign_type: String,

    #[serde(rename = "paySign")]
    pub pay_sign: String,
}
