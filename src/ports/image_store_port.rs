use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// 小程序码图片存储端口
#[async_trait]
pub trait ImageStorePort: Send + Sync + 'static {
    /// 保存 PNG 图片，返回可访问的 URL。每次调用使用独立的文件名。
    async fn save_png(&self, bytes: &[u8]) -> DomainResult<String>;
}
