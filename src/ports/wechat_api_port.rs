use crate::domain::errors::DomainResult;
use crate::domain::{AccessToken, AppCredentials, LoginSession, QrCodeOutcome, QrCodeRequest};
use async_trait::async_trait;

/// 微信开放接口端口（公众号/小程序服务端 API）
#[async_trait]
pub trait WeChatApiPort: Send + Sync + 'static {
    /// 获取接口调用凭据
    async fn fetch_access_token(&self, credentials: &AppCredentials) -> DomainResult<AccessToken>;

    /// 登录凭证校验（code2Session）
    async fn code_to_session(
        &self,
        credentials: &AppCredentials,
        code: &str,
    ) -> DomainResult<LoginSession>;

    /// 获取不限制的小程序码
    async fn fetch_unlimited_qr_code(
        &self,
        access_token: &str,
        request: &QrCodeRequest,
    ) -> DomainResult<QrCodeOutcome>;
}
