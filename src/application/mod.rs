pub mod dto;
pub mod payment_service;
pub mod wechat_service;

pub use dto::*;
pub use payment_service::{PaymentService, PaymentSettings};
pub use wechat_service::WeChatService;
