pub mod adapters;
pub mod config;
pub mod xml_codec;

pub use adapters::{LocalImageStore, WeChatApiAdapter, WeChatPayAdapter};
pub use config::AppConfig;
