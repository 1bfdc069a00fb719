use super::types::{ImportOutcome, PanelView, StagedFile};
use crate::data_source::{DataSource, DataSourceDescriptor, DataSourceError, DatasetIdentity};
use derivative::Derivative;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Builds the line shown under the panel title.
pub fn subtitle(descriptor: &DataSourceDescriptor) -> String {
    let group = descriptor
        .group_name
        .as_deref()
        .map(|group| format!(" • Grupo: {}", group))
        .unwrap_or_default();
    format!(
        "{} • Ficheiro: {}{}",
        descriptor.kind.label(),
        descriptor.source_name,
        group
    )
}

/// Holds the importing flag for as long as it lives.
#[derive(Debug)]
pub(crate) struct ImportGuard {
    flag: Arc<AtomicBool>,
}

impl ImportGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for ImportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// An accepted import that has not reached the data source yet.
///
/// Owns everything it needs, so the host can move it onto a runtime. The
/// importing flag is released when this value or its `run` future is
/// dropped, whichever way that happens.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PendingImport {
    guard: ImportGuard,
    #[derivative(Debug = "ignore")]
    source: Arc<dyn DataSource>,
    file: StagedFile,
}

impl PendingImport {
    pub fn file(&self) -> &StagedFile {
        &self.file
    }

    pub async fn run(self) -> Result<(), DataSourceError> {
        let Self {
            guard: _guard,
            source,
            file,
        } = self;
        source.import_file(&file).await
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct PendingReset {
    #[derivative(Debug = "ignore")]
    source: Arc<dyn DataSource>,
}

impl PendingReset {
    pub async fn run(self) -> Result<(), DataSourceError> {
        self.source.reset_to_sample().await
    }
}

/// Mediates between file-picker events and the data source.
///
/// Every read of the data source goes through [`ImportController::descriptor`],
/// which drops the staged file when the dataset identity has changed since
/// the previous read.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ImportController {
    #[derivative(Debug = "ignore")]
    source: Arc<dyn DataSource>,
    staged: Option<StagedFile>,
    importing: Arc<AtomicBool>,
    identity: DatasetIdentity,
    help_open: bool,
}

impl ImportController {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let identity = source.descriptor().identity();
        Self {
            source,
            staged: None,
            importing: Arc::new(AtomicBool::new(false)),
            identity,
            help_open: false,
        }
    }

    pub fn stage_file(&mut self, file: Option<StagedFile>) {
        // Apply any pending dataset swap first so it cannot drop this file later.
        self.descriptor();
        if let Some(file) = &file {
            tracing::debug!("Staged {}", file.name());
        }
        self.staged = file;
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.staged.as_ref()
    }

    pub fn is_importing(&self) -> bool {
        self.importing.load(Ordering::Acquire)
    }

    /// Reads the data source, enforcing the staged-file identity rule.
    pub fn descriptor(&mut self) -> DataSourceDescriptor {
        let descriptor = self.source.descriptor();
        let identity = descriptor.identity();
        if identity != self.identity {
            if let Some(file) = self.staged.take() {
                tracing::debug!(
                    "Dataset changed to {}; dropping staged {}",
                    identity.source_name,
                    file.name()
                );
            }
            self.identity = identity;
        }
        descriptor
    }

    pub fn import_disabled(&self, descriptor: &DataSourceDescriptor) -> bool {
        self.staged.is_none() || self.is_importing() || descriptor.loading
    }

    pub fn reset_disabled(&self, descriptor: &DataSourceDescriptor) -> bool {
        descriptor.loading || descriptor.is_sample()
    }

    pub fn open_help(&mut self) {
        self.help_open = true;
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn view(&mut self) -> PanelView {
        let descriptor = self.descriptor();
        PanelView {
            subtitle: subtitle(&descriptor),
            staged_name: self.staged.as_ref().map(|file| file.name().to_string()),
            staged_size: self.staged.as_ref().and_then(StagedFile::size),
            importing: self.is_importing(),
            import_disabled: self.import_disabled(&descriptor),
            reset_disabled: self.reset_disabled(&descriptor),
            help_open: self.help_open,
            error: descriptor.error,
        }
    }

    /// Claims the importing flag for the staged file, or returns `None`
    /// when the import trigger would be disabled.
    pub fn begin_import(&mut self) -> Option<PendingImport> {
        let descriptor = self.descriptor();
        if descriptor.loading {
            return None;
        }
        let file = self.staged.clone()?;
        let guard = ImportGuard::acquire(&self.importing)?;
        Some(PendingImport {
            guard,
            source: Arc::clone(&self.source),
            file,
        })
    }

    pub async fn request_import(&mut self) -> Result<ImportOutcome, DataSourceError> {
        let Some(pending) = self.begin_import() else {
            return Ok(ImportOutcome::Ignored);
        };
        pending.run().await?;
        Ok(ImportOutcome::Dispatched)
    }

    pub fn begin_reset(&mut self) -> Option<PendingReset> {
        let descriptor = self.descriptor();
        if self.reset_disabled(&descriptor) {
            return None;
        }
        Some(PendingReset {
            source: Arc::clone(&self.source),
        })
    }

    pub async fn request_reset_to_sample(&mut self) -> Result<ImportOutcome, DataSourceError> {
        let Some(pending) = self.begin_reset() else {
            return Ok(ImportOutcome::Ignored);
        };
        pending.run().await?;
        Ok(ImportOutcome::Dispatched)
    }
}
