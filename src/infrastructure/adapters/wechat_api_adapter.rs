use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{AccessToken, AppCredentials, LoginSession, QrCodeOutcome, QrCodeRequest};
use crate::ports::WeChatApiPort;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

/// 公众号/小程序服务端 API 适配器
#[derive(Clone)]
pub struct WeChatApiAdapter {
    base_url: String,
    client: Client,
}

impl WeChatApiAdapter {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// 非 2xx 响应转为错误
    async fn ensure_success(response: Response) -> DomainResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!("WeChat API error: {} - {}", status, error_text);
        Err(DomainError::WeChatApiError(format!(
            "API returned {}: {}",
            status, error_text
        )))
    }

    /// 解析 JSON 响应，errcode 非 0 时视为失败
    async fn parse_json<T: DeserializeOwned>(response: Response) -> DomainResult<T> {
        // jscode2session 返回 text/plain，统一按文本解析
        let text = response.text().await?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| DomainError::MalformedResponse(format!("{}: {}", e, text)))?;

        check_errcode(&value)?;

        serde_json::from_value(value).map_err(|e| DomainError::MalformedResponse(e.to_string()))
    }
}

/// errcode 存在且非 0 时返回错误
fn check_errcode(value: &Value) -> DomainResult<()> {
    match value.get("errcode").and_then(Value::as_i64) {
        Some(0) | None => Ok(()),
        Some(code) => {
            let message = value
                .get("errmsg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            error!("WeChat API returned errcode {}: {}", code, message);
            Err(DomainError::WeChatApiError(format!("{}: {}", code, message)))
        }
    }
}

/// 判断小程序码接口返回的是否为错误 JSON
fn as_rejection(content_type: Option<&str>, bytes: &[u8]) -> Option<Value> {
    let declared_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) if declared_json || value.get("errcode").is_some() => Some(value),
        _ => None,
    }
}

#[async_trait]
impl WeChatApiPort for WeChatApiAdapter {
    async fn fetch_access_token(&self, credentials: &AppCredentials) -> DomainResult<AccessToken> {
        let url = format!("{}/cgi-bin/token", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", credentials.app_id.as_str()),
                ("secret", credentials.app_secret.expose()),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let token: AccessToken = Self::parse_json(response).await?;
        debug!("Access token fetched: {:?}", token);
        Ok(token)
    }

    async fn code_to_session(
        &self,
        credentials: &AppCredentials,
        code: &str,
    ) -> DomainResult<LoginSession> {
        let url = format!("{}/sns/jscode2session", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("appid", credentials.app_id.as_str()),
                ("secret", credentials.app_secret.expose()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Self::parse_json(response).await
    }

    async fn fetch_unlimited_qr_code(
        &self,
        access_token: &str,
        request: &QrCodeRequest,
    ) -> DomainResult<QrCodeOutcome> {
        let url = format!("{}/wxa/getwxacodeunlimit", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", access_token)])
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        match as_rejection(content_type.as_deref(), &bytes) {
            Some(value) => Ok(QrCodeOutcome::Rejected(value)),
            None => {
                debug!("Mini program code received: {} bytes", bytes.len());
                Ok(QrCodeOutcome::Image(bytes.to_vec()))
            }
        }
    }
}
