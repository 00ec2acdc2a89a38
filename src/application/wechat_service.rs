use crate::application::dto::{
    AccessTokenQuery, AcodeOutcome, AcodeRequest, OpenIdQuery, optional, required,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{
    AccessToken, AppCredentials, EnvVersion, LoginSession, QrCodeOutcome, QrCodeRequest, Secret,
};
use crate::ports::{ImageStorePort, WeChatApiPort};
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_SCENE_LEN: usize = 32;

/// 公众号/小程序接口服务
pub struct WeChatService<A: WeChatApiPort, S: ImageStorePort> {
    api: Arc<A>,
    images: Arc<S>,
}

impl<A: WeChatApiPort, S: ImageStorePort> WeChatService<A, S> {
    pub fn new(api: Arc<A>, images: Arc<S>) -> Self {
        Self { api, images }
    }

    /// 获取 access_token
    pub async fn access_token(&self, query: AccessTokenQuery) -> DomainResult<AccessToken> {
        let credentials = credentials(query.app_id, query.app_secret)?;
        info!("Fetching access token for app: {}", credentials.app_id);

        self.api.fetch_access_token(&credentials).await
    }

    /// 用登录 code 换取 openid 与 session_key
    pub async fn openid(&self, query: OpenIdQuery) -> DomainResult<LoginSession> {
        let credentials = credentials(query.app_id, query.app_secret)?;
        let code = required(query.code, "code")?;
        info!("Exchanging login code for app: {}", credentials.app_id);

        let session = self.api.code_to_session(&credentials, &code).await?;
        debug!("Login session resolved: {:?}", session);
        Ok(session)
    }

    /// 生成小程序码并保存为图片
    pub async fn acode(&self, request: AcodeRequest) -> DomainResult<AcodeOutcome> {
        let credentials = credentials(request.app_id, request.app_secret)?;
        let page = required(request.page, "page")?;
        let scene = required(request.scene, "scene")?;
        if scene.chars().count() > MAX_SCENE_LEN {
            return Err(DomainError::ValidationError(format!(
                "scene must be at most {} characters",
                MAX_SCENE_LEN
            )));
        }
        let env_version = match optional(request.env_version) {
            Some(value) => value.parse()?,
            None => EnvVersion::default(),
        };

        info!(
            "Generating mini program code for app: {}, page: {}",
            credentials.app_id, page
        );

        let token = self.api.fetch_access_token(&credentials).await?;
        let qr_request = QrCodeRequest {
            scene,
            page,
            env_version,
        };

        match self
            .api
            .fetch_unlimited_qr_code(&token.access_token, &qr_request)
            .await?
        {
            QrCodeOutcome::Image(bytes) => {
                let url = self.images.save_png(&bytes).await?;
                info!("Mini program code stored: {}", url);
                Ok(AcodeOutcome::Stored { url })
            }
            QrCodeOutcome::Rejected(body) => {
                warn!("Mini program code rejected by WeChat: {}", body);
                Ok(AcodeOutcome::Rejected(body))
            }
        }
    }
}

fn credentials(app_id: Option<String>, app_secret: Option<String>) -> DomainResult<AppCredentials> {
    Ok(AppCredentials {
        app_id: required(app_id, "appId")?,
        app_secret: Secret::new(required(app_secret, "appSecret")?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeApi {
        calls: AtomicUsize,
        qr_outcome: Mutex<Option<QrCodeOutcome>>,
        last_qr_request: Mutex<Option<QrCodeRequest>>,
    }

    #[async_trait]
    impl WeChatApiPort for FakeApi {
        async fn fetch_access_token(
            &self,
            credentials: &AppCredentials,
        ) -> DomainResult<AccessToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AccessToken {
                access_token: format!("token-{}", credentials.app_id),
                expires_in: 7200,
            })
        }

        async fn code_to_session(
            &self,
            _credentials: &AppCredentials,
            code: &str,
        ) -> DomainResult<LoginSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoginSession {
                openid: format!("openid-{}", code),
                session_key: "sk".to_string(),
                unionid: None,
            })
        }

        async fn fetch_unlimited_qr_code(
            &self,
            _access_token: &str,
            request: &QrCodeRequest,
        ) -> DomainResult<QrCodeOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_qr_request.lock().unwrap() = Some(request.clone());
            Ok(self
                .qr_outcome
                .lock()
                .unwrap()
                .take()
                .unwrap_or(QrCodeOutcome::Image(vec![0x89, 0x50, 0x4e, 0x47])))
        }
    }

    #[derive(Default)]
    struct FakeImages {
        saved: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl ImageStorePort for FakeImages {
        async fn save_png(&self, bytes: &[u8]) -> DomainResult<String> {
            let mut saved = self.saved.lock().unwrap();
            saved.push(bytes.len());
            Ok(format!("http://localhost/images/{}.png", saved.len()))
        }
    }

    fn service(api: Arc<FakeApi>, images: Arc<FakeImages>) -> WeChatService<FakeApi, FakeImages> {
        WeChatService::new(api, images)
    }

    #[tokio::test]
    async fn test_access_token_missing_secret_makes_no_call() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), Arc::new(FakeImages::default()));

        let result = svc
            .access_token(AccessTokenQuery {
                app_id: Some("wx1".to_string()),
                app_secret: None,
            })
            .await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_access_token_success() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), Arc::new(FakeImages::default()));

        let token = svc
            .access_token(AccessTokenQuery {
                app_id: Some("wx1".to_string()),
                app_secret: Some("secret".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(token.access_token, "token-wx1");
        assert_eq!(token.expires_in, 7200);
    }

    #[tokio::test]
    async fn test_openid_requires_code() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), Arc::new(FakeImages::default()));

        let result = svc
            .openid(OpenIdQuery {
                app_id: Some("wx1".to_string()),
                app_secret: Some("secret".to_string()),
                code: None,
            })
            .await;

        assert!(result.is_err());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);

        let session = svc
            .openid(OpenIdQuery {
                app_id: Some("wx1".to_string()),
                app_secret: Some("secret".to_string()),
                code: Some("c1".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(session.openid, "openid-c1");
    }

    #[tokio::test]
    async fn test_acode_missing_app_id_makes_no_call() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), Arc::new(FakeImages::default()));

        let result = svc
            .acode(AcodeRequest {
                app_secret: Some("secret".to_string()),
                page: Some("pages/index/index".to_string()),
                scene: Some("id=1".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_acode_stores_image_with_default_env_version() {
        let api = Arc::new(FakeApi::default());
        let images = Arc::new(FakeImages::default());
        let svc = service(api.clone(), images.clone());

        let outcome = svc
            .acode(AcodeRequest {
                app_id: Some("wx1".to_string()),
                app_secret: Some("secret".to_string()),
                page: Some("pages/index/index".to_string()),
                scene: Some("id=1".to_string()),
                env_version: None,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, AcodeOutcome::Stored { ref url } if url.ends_with("/1.png")));
        assert_eq!(*images.saved.lock().unwrap(), vec![4]);
        let sent = api.last_qr_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.env_version, EnvVersion::Release);
    }

    #[tokio::test]
    async fn test_acode_relays_rejection() {
        let api = Arc::new(FakeApi::default());
        let rejection = serde_json::json!({ "errcode": 41030, "errmsg": "invalid page" });
        *api.qr_outcome.lock().unwrap() = Some(QrCodeOutcome::Rejected(rejection.clone()));
        let images = Arc::new(FakeImages::default());
        let svc = service(api.clone(), images.clone());

        let outcome = svc
            .acode(AcodeRequest {
                app_id: Some("wx1".to_string()),
                app_secret: Some("secret".to_string()),
                page: Some("pages/missing".to_string()),
                scene: Some("id=1".to_string()),
                env_version: Some("develop".to_string()),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, AcodeOutcome::Rejected(ref body) if *body == rejection));
        assert!(images.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_acode_rejects_long_scene() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), Arc::new(FakeImages::default()));

        let result = svc
            .acode(AcodeRequest {
                app_id: Some("wx1".to_string()),
                app_secret: Some("secret".to_string()),
                page: Some("pages/index/index".to_string()),
                scene: Some("x".repeat(33)),
                env_version: None,
            })
            .await;

        assert!(result.is_err());
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }
}
