use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 以本機目錄為根的檔案存取
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// 以設定檔所在目錄為根
    pub fn beside(config_path: &str) -> Self {
        let base = Path::new(config_path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(base)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
