use crate::domain::errors::DomainResult;
use crate::ports::ImageStorePort;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// 本地磁盘图片存储，文件经 `/images` 静态路由对外提供
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ImageStorePort for LocalImageStore {
    async fn save_png(&self, bytes: &[u8]) -> DomainResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = format!("{}.png", uuid::Uuid::new_v4().simple());
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Image written: {}", path.display());

        Ok(format!(
            "{}/images/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        ))
    }
}
