//! 页面快照模块
//!
//! 保存最近一次抓取到的页面内容。检测循环是唯一的写入方，
//! 调试接口只读取，任何时刻只保留最新的一份。

use crate::config::SnapshotConfig;
use crate::error::{Result, WatchError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// 快照存储trait
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// 保存新的快照，覆盖之前的内容。内容按原始字节保存，不做解码
    async fn store(&self, body: &[u8]) -> Result<()>;

    /// 读取当前快照，尚未保存过时返回 `None`
    async fn load(&self) -> Result<Option<Vec<u8>>>;
}

/// 内存快照存储
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    latest: RwLock<Option<Arc<[u8]>>>,
}

impl MemorySnapshotStore {
    /// 创建空的内存快照存储
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn store(&self, body: &[u8]) -> Result<()> {
        let mut latest = self.latest.write().await;
        *latest = Some(Arc::from(body));
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<u8>>> {
        let latest = self.latest.read().await;
        Ok(latest.as_deref().map(<[u8]>::to_vec))
    }
}

/// 文件快照存储
///
/// 先写入同目录下的临时文件再重命名，读取方不会看到写了一半的内容。
/// 进程启动前遗留的文件不会被当作本次运行的快照。
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
    written: AtomicBool,
}

impl FileSnapshotStore {
    /// 创建文件快照存储
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: AtomicBool::new(false),
        }
    }

    /// 快照文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn store(&self, body: &[u8]) -> Result<()> {
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, body).await.map_err(|e| {
            WatchError::Snapshot(format!("写入快照文件 {} 失败: {}", temp_path.display(), e))
        })?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            WatchError::Snapshot(format!("替换快照文件 {} 失败: {}", self.path.display(), e))
        })?;

        self.written.store(true, Ordering::Release);
        debug!("页面快照已写入: {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<u8>>> {
        if !self.written.load(Ordering::Acquire) {
            return Ok(None);
        }

        tokio::fs::read(&self.path)
            .await
            .map(Some)
            .map_err(|e| {
                WatchError::Snapshot(format!("读取快照文件 {} 失败: {}", self.path.display(), e))
            })
    }
}

/// 根据配置创建快照存储
pub fn create_snapshot_store(config: &SnapshotConfig) -> Arc<dyn SnapshotStore> {
    match &config.file_path {
        Some(path) if !path.as_os_str().is_empty() => Arc::new(FileSnapshotStore::new(path)),
        _ => Arc::new(MemorySnapshotStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_starts_empty() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_keeps_only_latest() {
        let store = MemorySnapshotStore::new();
        store.store(b"<p>first</p>").await.unwrap();
        store.store(b"<p>second</p>").await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_deref(),
            Some(&b"<p>second</p>"[..])
        );
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("debug.html"));

        let body = "<html>\r\n<body>Ünïcödé ✓</body>\n</html>".as_bytes();
        store.store(body).await.unwrap();

        assert_eq!(store.load().await.unwrap().as_deref(), Some(body));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_stores_non_utf8_bytes_verbatim() {
        let body: &[u8] = b"<html><body>Caf\xE9</body></html>";

        let memory = MemorySnapshotStore::new();
        memory.store(body).await.unwrap();
        assert_eq!(memory.load().await.unwrap().as_deref(), Some(body));

        let dir = tempfile::tempdir().unwrap();
        let file = FileSnapshotStore::new(dir.path().join("debug.html"));
        file.store(body).await.unwrap();
        assert_eq!(file.load().await.unwrap().as_deref(), Some(body));
    }

    #[tokio::test]
    async fn test_file_store_ignores_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.html");
        std::fs::write(&path, "stale").unwrap();

        let store = FileSnapshotStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("debug.html"));
        store.store(b"body").await.unwrap();
        std::fs::remove_file(store.path()).unwrap();

        assert!(store.load().await.is_err());
    }

    #[test]
    fn test_create_snapshot_store_with_empty_path_uses_memory() {
        let config = SnapshotConfig {
            file_path: Some(PathBuf::new()),
        };
        let store = create_snapshot_store(&config);
        tokio_test::block_on(async {
            store.store(b"x").await.unwrap();
            assert_eq!(store.load().await.unwrap().as_deref(), Some(&b"x"[..]));
        });
    }
}
