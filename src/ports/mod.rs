pub mod image_store_port;
pub mod wechat_api_port;
pub mod wechat_pay_port;

pub use image_store_port::ImageStorePort;
pub use wechat_api_port::WeChatApiPort;
pub use wechat_pay_port::WeChatPayPort;
