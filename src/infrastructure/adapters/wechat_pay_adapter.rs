use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::SignedGatewayPayload;
use crate::infrastructure::xml_codec;
use crate::ports::WeChatPayPort;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::{debug, error};

/// 微信支付 V2 网关适配器
#[derive(Clone)]
pub struct WeChatPayAdapter {
    base_url: String,
    client: Client,
}

impl WeChatPayAdapter {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl WeChatPayPort for WeChatPayAdapter {
    /// 统一下单
    async fn unified_order(
        &self,
        payload: &SignedGatewayPayload,
    ) -> DomainResult<BTreeMap<String, String>> {
        let url = format!("{}/pay/unifiedorder", self.base_url);

        let body = xml_codec::encode(&payload.to_wire_fields());
        debug!("WeChat pay request body: {}", body);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/xml")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("WeChat pay API error: {} - {}", status, error_text);
            return Err(DomainError::WeChatPayError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let text = response.text().await?;
        debug!("WeChat pay response: {}", text);

        xml_codec::decode(&text)
    }
}
