// ==========================================
// 仓库变更导入系统 - 上传文件来源
// ==========================================
// 职责: 为提取器提供文件名 + 文本/字节内容（唯一的异步边界）
// 红线: 读取失败降级为空内容，不向上抛错
// ==========================================

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

// ==========================================
// FileSource Trait
// ==========================================
// 实现者: InMemoryFile, LocalFile
#[async_trait]
pub trait FileSource: Send + Sync {
    /// 文件名（仅用于扩展名识别）
    fn name(&self) -> Option<&str>;

    /// 以 UTF-8 文本读取（失败返回空串）
    async fn text(&self) -> String;

    /// 以字节读取（不支持或失败返回 None）
    async fn bytes(&self) -> Option<Vec<u8>>;
}

// ==========================================
// InMemoryFile - 内存文件
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InMemoryFile {
    name: Option<String>,
    content: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: Option<&str>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.map(str::to_string),
            content: content.into(),
        }
    }

    pub fn from_text(name: Option<&str>, text: &str) -> Self {
        Self::new(name, text.as_bytes().to_vec())
    }
}

#[async_trait]
impl FileSource for InMemoryFile {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    async fn bytes(&self) -> Option<Vec<u8>> {
        Some(self.content.clone())
    }
}

// ==========================================
// LocalFile - 本地磁盘文件
// ==========================================
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: Option<String>,
}

impl LocalFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn text(&self) -> String {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "文件读取失败，按空内容处理");
                String::new()
            }
        }
    }

    async fn bytes(&self) -> Option<Vec<u8>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "文件读取失败");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_in_memory_file() {
        let file = InMemoryFile::from_text(Some("lines.csv"), "a,b");
        assert_eq!(file.name(), Some("lines.csv"));
        assert_eq!(file.text().await, "a,b");
        assert_eq!(file.bytes().await, Some(b"a,b".to_vec()));
    }

    #[tokio::test]
    async fn test_local_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "pedidoSAP;sku").unwrap();

        let file = LocalFile::new(temp_file.path());
        assert_eq!(file.text().await, "pedidoSAP;sku");
        assert!(file.name().is_some());
    }

    #[tokio::test]
    async fn test_local_file_missing_degrades_to_empty() {
        let file = LocalFile::new("/non/existent/lines.xlsx");
        assert_eq!(file.name(), Some("lines.xlsx"));
        assert_eq!(file.text().await, "");
        assert_eq!(file.bytes().await, None);
    }
}
