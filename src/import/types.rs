use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions offered by the file picker. Content checks belong to the data source.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["txt", "json", "csv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FileBlob {
    Disk(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file chosen by the user but not yet submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    name: String,
    blob: FileBlob,
    size: Option<u64>,
}

impl StagedFile {
    /// Stages a file on disk. Returns `None` for paths without a file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_string();
        let size = std::fs::metadata(path).ok().map(|meta| meta.len());
        Some(Self {
            name,
            blob: FileBlob::Disk(path.to_path_buf()),
            size,
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: Some(bytes.len() as u64),
            blob: FileBlob::Memory(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size known at staging time, if any.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.blob {
            FileBlob::Disk(path) => tokio::fs::read(path).await,
            FileBlob::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// What a `request_*` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The data source was called and returned `Ok`.
    Dispatched,
    /// Preconditions did not hold; nothing was called.
    Ignored,
}

/// Everything the host view needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub subtitle: String,
    pub staged_name: Option<String>,
    pub staged_size: Option<u64>,
    pub importing: bool,
    pub import_disabled: bool,
    pub reset_disabled: bool,
    pub help_open: bool,
    pub error: Option<String>,
}
