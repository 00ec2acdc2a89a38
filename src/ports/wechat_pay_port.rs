use crate::domain::errors::DomainResult;
use crate::domain::SignedGatewayPayload;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// 微信支付 V2 网关端口
#[async_trait]
pub trait WeChatPayPort: Send + Sync + 'static {
    /// 统一下单，返回解析后的响应字段
    async fn unified_order(
        &self,
        payload: &SignedGatewayPayload,
    ) -> DomainResult<BTreeMap<String, String>>;
}
