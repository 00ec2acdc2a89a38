use crate::application::dto::{NotificationOutcome, PayV2Request, optional, required};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{
    ClientPaymentParams, Money, OrderRequest, PaymentOrderBuilder, Secret, TradeType, signature,
};
use crate::infrastructure::xml_codec;
use crate::ports::WeChatPayPort;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const DEFAULT_TOTAL_FEE: i64 = 1;

/// 下单默认值与回调验签配置
#[derive(Debug, Clone)]
pub struct PaymentSettings {
    /// 默认回调地址
    pub default_notify_url: String,

    /// 默认商品描述
    pub default_body: String,

    /// 回调验签使用的商户API密钥，未配置时不验签
    pub notify_api_key: Option<Secret>,
}

/// 微信支付服务
pub struct PaymentService<P: WeChatPayPort> {
    gateway: Arc<P>,
    settings: PaymentSettings,
}

impl<P: WeChatPayPort> PaymentService<P> {
    pub fn new(gateway: Arc<P>, settings: PaymentSettings) -> Self {
        Self { gateway, settings }
    }

    /// 处理 V2 下单请求：补齐默认值后统一下单
    pub async fn create_order_v2(&self, request: PayV2Request) -> DomainResult<ClientPaymentParams> {
        let app_id = required(request.app_id, "appId")?;
        required(request.app_secret, "appSecret")?;
        let mch_id = required(request.mch_id, "mchId")?;
        let api_key = Secret::new(required(request.api_key, "apiKey")?);

        let trade_type = match optional(request.trade_type) {
            Some(value) => value.parse()?,
            None => TradeType::default(),
        };

        let order = OrderRequest {
            app_id,
            mch_id,
            nonce_str: optional(request.nonce_str).unwrap_or_else(generate_nonce_str),
            body: optional(request.body).unwrap_or_else(|| self.settings.default_body.clone()),
            attach: optional(request.attach),
            out_trade_no: optional(request.out_trade_no).unwrap_or_else(generate_out_trade_no),
            total_fee: Money::from_cents(request.total_fee.unwrap_or(DEFAULT_TOTAL_FEE)),
            notify_url: optional(request.notify_url)
                .unwrap_or_else(|| self.settings.default_notify_url.clone()),
            openid: optional(request.open_id),
            trade_type,
            spbill_create_ip: optional(request.client_ip),
        };

        self.build_signed_order(&api_key, order).await
    }

    /// 签名下单并生成客户端调起支付参数
    pub async fn build_signed_order(
        &self,
        secret_key: &Secret,
        order: OrderRequest,
    ) -> DomainResult<ClientPaymentParams> {
        info!(
            "Creating unified order: {} ({}, {})",
            order.out_trade_no, order.trade_type, order.total_fee
        );

        let builder = PaymentOrderBuilder::new(secret_key);
        let payload = builder.sign_order(&order)?;
        debug!("Unified order fields: {:?}", payload.fields());

        let response = self.gateway.unified_order(&payload).await.map_err(|e| {
            error!("Unified order call failed: {}", e);
            match e {
                DomainError::OrderConstructionFailed(_) => e,
                other => DomainError::OrderConstructionFailed(other.to_string()),
            }
        })?;
        debug!("Unified order response: {:?}", response);

        let prepay_id = PaymentOrderBuilder::extract_prepay_id(&response)?;
        let time_stamp = chrono::Utc::now().timestamp().to_string();
        let params = builder.client_params(&order.app_id, &prepay_id, &order.nonce_str, &time_stamp);

        info!("Unified order created: {}", order.out_trade_no);
        Ok(params)
    }

    /// 处理支付结果回调
    pub fn handle_notification(
        &self,
        content_type: Option<&str>,
        headers: BTreeMap<String, String>,
        body: &str,
    ) -> DomainResult<NotificationOutcome> {
        if !is_xml(content_type) {
            debug!("Non-XML notification, echoing headers");
            return Ok(NotificationOutcome::Headers(headers));
        }

        let fields = xml_codec::decode(body)?;
        info!(
            "Payment notification received: out_trade_no={}, result_code={}",
            fields.get("out_trade_no").map(String::as_str).unwrap_or("-"),
            fields.get("result_code").map(String::as_str).unwrap_or("-")
        );

        match &self.settings.notify_api_key {
            Some(key) => {
                if !signature::verify(&fields, key.expose())? {
                    warn!("Payment notification signature mismatch");
                    return Err(DomainError::SignatureVerificationFailed);
                }
            }
            None => warn!("WECHAT_PAY_API_KEY not configured, notification signature not verified"),
        }

        Ok(NotificationOutcome::Parsed(fields))
    }
}

fn is_xml(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/xml") || mime.eq_ignore_ascii_case("text/xml")
        })
        .unwrap_or(false)
}

/// 生成随机字符串
fn generate_nonce_str() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 生成商户订单号：14位时间 + 18位随机
fn generate_out_trade_no() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", chrono::Utc::now().format("%Y%m%d%H%M%S"), &random[..18])
}
