use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wechat_proxy::api::{self, AppState};
use wechat_proxy::application::{PaymentService, PaymentSettings, WeChatService};
use wechat_proxy::infrastructure::{
    AppConfig, LocalImageStore, WeChatApiAdapter, WeChatPayAdapter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting WeChat proxy...");

    let config = AppConfig::from_env()?;
    info!(
        "Upstreams: api={}, pay={}",
        config.wechat_api_base_url, config.wechat_pay_base_url
    );
    if config.notify_api_key.is_none() {
        info!("WECHAT_PAY_API_KEY not set, pay notifications will not be signature-verified");
    }

    // 出站HTTP客户端，所有适配器共用
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let api_adapter = Arc::new(WeChatApiAdapter::new(
        config.wechat_api_base_url.clone(),
        client.clone(),
    ));
    let pay_adapter = Arc::new(WeChatPayAdapter::new(
        config.wechat_pay_base_url.clone(),
        client,
    ));
    let image_store = Arc::new(LocalImageStore::new(
        config.images_dir(),
        config.public_base_url.clone(),
    ));

    let wechat_service = Arc::new(WeChatService::new(api_adapter, image_store));
    let payment_service = Arc::new(PaymentService::new(
        pay_adapter,
        PaymentSettings {
            default_notify_url: config.default_notify_url.clone(),
            default_body: config.default_body.clone(),
            notify_api_key: config.notify_api_key.clone(),
        },
    ));

    let app_state = AppState {
        wechat_service,
        payment_service,
    };

    let app = api::create_router(app_state, config.images_dir());

    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  GET  /api/wechat/mp - Access token");
    info!("  GET  /api/wechat/openid - Login code to openid");
    info!("  POST /api/wechat/acode - Mini program code");
    info!("  POST /api/wechat/pay/v2 - WeChat Pay V2 order");
    info!("  POST /api/wechat/pay/v2/notify - WeChat Pay V2 notification");
    info!("  GET  /images/* - Generated mini program codes");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
