use crate::application::{
    AccessTokenQuery, AcodeData, AcodeOutcome, AcodeRequest, DataResponse, ErrorResponse,
    NotificationOutcome, OpenIdQuery, PayV2Request, PaymentService, WeChatService,
};
use crate::domain::DomainError;
use crate::ports::{ImageStorePort, WeChatApiPort, WeChatPayPort};
use axum::{
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Json, Response},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// 应用状态
pub struct AppState<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort> {
    pub wechat_service: Arc<WeChatService<A, S>>,
    pub payment_service: Arc<PaymentService<P>>,
}

impl<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort> Clone for AppState<A, P, S> {
    fn clone(&self) -> Self {
        Self {
            wechat_service: self.wechat_service.clone(),
            payment_service: self.payment_service.clone(),
        }
    }
}

/// 所有已处理的错误统一返回 400 `{ "error": ... }`
fn error_response(context: &str, e: DomainError) -> ApiError {
    error!("{}: {}", context, e);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(e.to_string())),
    )
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        error!("Invalid JSON body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "Invalid JSON body: {}",
                rejection.body_text()
            ))),
        )
    })
}

/// 获取 access_token
pub async fn get_access_token<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort>(
    State(state): State<AppState<A, P, S>>,
    Query(query): Query<AccessTokenQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received access token request");

    state
        .wechat_service
        .access_token(query)
        .await
        .map(|token| Json(DataResponse::new(token)))
        .map_err(|e| error_response("Access token error", e))
}

/// 登录 code 换取 openid
pub async fn get_openid<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort>(
    State(state): State<AppState<A, P, S>>,
    Query(query): Query<OpenIdQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received openid request");

    state
        .wechat_service
        .openid(query)
        .await
        .map(|session| Json(DataResponse::new(session)))
        .map_err(|e| error_response("Openid error", e))
}

/// 生成小程序码
pub async fn create_acode<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort>(
    State(state): State<AppState<A, P, S>>,
    payload: Result<Json<AcodeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    info!("Received mini program code request");
    let request = json_body(payload)?;

    let outcome = state
        .wechat_service
        .acode(request)
        .await
        .map_err(|e| error_response("Mini program code error", e))?;

    Ok(match outcome {
        AcodeOutcome::Stored { url } => Json(DataResponse::new(AcodeData { url })).into_response(),
        // 微信的错误JSON原样返回
        AcodeOutcome::Rejected(body) => Json(body).into_response(),
    })
}

/// 微信支付 V2 下单
pub async fn create_pay_v2<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort>(
    State(state): State<AppState<A, P, S>>,
    payload: Result<Json<PayV2Request>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received WeChat pay v2 order request");
    let request = json_body::<PayV2Request>(payload)?;

    state
        .payment_service
        .create_order_v2(request)
        .await
        .map(|params| Json(DataResponse::new(params)))
        .map_err(|e| error_response("Pay v2 order error", e))
}

/// 微信支付 V2 回调
pub async fn pay_v2_notify<A: WeChatApiPort, P: WeChatPayPort, S: ImageStorePort>(
    State(state): State<AppState<A, P, S>>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received WeChat pay v2 notification");

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let echoed: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    state
        .payment_service
        .handle_notification(content_type, echoed, &body)
        .map(|outcome| match outcome {
            NotificationOutcome::Parsed(fields) | NotificationOutcome::Headers(fields) => {
                Json(DataResponse::new(fields))
            }
        })
        .map_err(|e| error_response("Pay v2 notification error", e))
}

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
