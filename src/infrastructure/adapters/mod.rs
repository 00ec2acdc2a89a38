pub mod local_image_store;
pub mod wechat_api_adapter;
pub mod wechat_pay_adapter;

pub use local_image_store::LocalImageStore;
pub use wechat_api_adapter::WeChatApiAdapter;
pub use wechat_pay_adapter::WeChatPayAdapter;
