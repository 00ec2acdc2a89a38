use super::handlers::*;
use crate::ports::{ImageStorePort, WeChatApiPort, WeChatPayPort};
use axum::{
    Router,
    routing::{get, post},
};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub fn create_router<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort>(
    state: AppState<A, P, S>,
    images_dir: impl AsRef<Path>,
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/wechat/mp", get(get_access_token::<A, P, S>))
        .route("/api/wechat/openid", get(get_openid::<A, P, S>))
        .route("/api/wechat/acode", post(create_acode::<A, P, S>))
        .route("/api/wechat/pay/v2", post(create_pay_v2::<A, P, S>))
        .route("/api/wechat/pay/v2/notify", post(pay_v2_notify::<A, P, S>))
        .nest_service("/images", ServeDir::new(images_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
