use super::{DataSource, DataSourceDescriptor, DataSourceError, DataSourceKind, Dataset};
use crate::import::StagedFile;
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const BUILTIN_SAMPLE_NAME: &str = "sample.json";
const BUILTIN_SAMPLE: &[u8] = include_bytes!("../../assets/sample.json");

/// Raw contents of the dataset restored by "reset to sample".
#[derive(Debug, Clone)]
pub struct SampleDataset {
    pub name: String,
    pub contents: Arc<[u8]>,
}

impl SampleDataset {
    pub fn builtin() -> Self {
        Self {
            name: BUILTIN_SAMPLE_NAME.to_string(),
            contents: Arc::from(BUILTIN_SAMPLE),
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| BUILTIN_SAMPLE_NAME.to_string());
        Ok(Self {
            name,
            contents: Arc::from(contents),
        })
    }
}

#[derive(Debug)]
struct SourceState {
    kind: DataSourceKind,
    source_name: String,
    dataset: Dataset,
    loading: bool,
    error: Option<String>,
}

/// Clears `loading` when dropped.
struct LoadingGuard<'a> {
    state: &'a Mutex<SourceState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .loading = false;
    }
}

/// In-memory data source backed by local files.
#[derive(Debug)]
pub struct LocalDataSource {
    state: Mutex<SourceState>,
    sample: SampleDataset,
}

impl LocalDataSource {
    pub fn new(sample: SampleDataset) -> Result<Self, DataSourceError> {
        let dataset = Dataset::parse(&sample.name, &sample.contents)?;
        tracing::info!(
            "Loaded sample {} ({} records)",
            sample.name,
            dataset.records.len()
        );
        Ok(Self {
            state: Mutex::new(SourceState {
                kind: DataSourceKind::Sample,
                source_name: sample.name.clone(),
                dataset,
                loading: false,
                error: None,
            }),
            sample,
        })
    }

    fn state(&self) -> MutexGuard<'_, SourceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the source busy, or returns `None` if it already is.
    fn begin_load(&self) -> Option<LoadingGuard<'_>> {
        let mut state = self.state();
        if state.loading {
            return None;
        }
        state.loading = true;
        state.error = None;
        Some(LoadingGuard { state: &self.state })
    }

    fn settle(
        &self,
        kind: DataSourceKind,
        source_name: &str,
        result: Result<Dataset, DataSourceError>,
    ) -> Result<(), DataSourceError> {
        let mut state = self.state();
        match result {
            Ok(dataset) => {
                tracing::info!(
                    "Active dataset is now {} ({} records)",
                    source_name,
                    dataset.records.len()
                );
                state.kind = kind;
                state.source_name = source_name.to_string();
                state.dataset = dataset;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Could not load {}: {}", source_name, err);
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// The active table with at most `limit` records.
    pub fn dataset_preview(&self, limit: usize) -> Dataset {
        let state = self.state();
        Dataset {
            group: state.dataset.group.clone(),
            columns: state.dataset.columns.clone(),
            records: state.dataset.records.iter().take(limit).cloned().collect(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.state().dataset.records.len()
    }
}

#[async_trait]
impl DataSource for LocalDataSource {
    fn descriptor(&self) -> DataSourceDescriptor {
        let state = self.state();
        DataSourceDescriptor {
            kind: state.kind,
            source_name: state.source_name.clone(),
            group_name: state.dataset.group.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    async fn import_file(&self, file: &StagedFile) -> Result<(), DataSourceError> {
        let Some(_loading) = self.begin_load() else {
            tracing::debug!("Refusing import of {} while busy", file.name());
            return Err(DataSourceError::Busy);
        };

        let result = match file.read().await {
            Ok(bytes) => Dataset::parse(file.name(), &bytes),
            Err(source) => Err(DataSourceError::Read {
                name: file.name().to_string(),
                source,
            }),
        };
        self.settle(DataSourceKind::Imported, file.name(), result)
    }

    async fn reset_to_sample(&self) -> Result<(), DataSourceError> {
        let Some(_loading) = self.begin_load() else {
            tracing::debug!("Refusing reset while busy");
            return Err(DataSourceError::Busy);
        };

        let result = Dataset::parse(&self.sample.name, &self.sample.contents);
        self.settle(DataSourceKind::Sample, &self.sample.name, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn source() -> LocalDataSource {
        LocalDataSource::new(SampleDataset::builtin()).unwrap()
    }

    #[test]
    fn starts_on_builtin_sample() {
        let source = source();
        let descriptor = source.descriptor();
        assert_eq!(descriptor.kind, DataSourceKind::Sample);
        assert_eq!(descriptor.source_name, "sample.json");
        assert_eq!(descriptor.group_name.as_deref(), Some("Riba"));
        assert!(!descriptor.loading);
        assert!(descriptor.error.is_none());
        assert_eq!(source.dataset_preview(2).records.len(), 2);
        assert_eq!(source.record_count(), 5);
    }

    #[tokio::test]
    async fn imports_csv_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clients.csv");
        fs::write(&path, "nome,cidade\nAna,Porto\nRui,Braga\n").unwrap();

        let source = source();
        let file = StagedFile::from_path(&path).unwrap();
        source.import_file(&file).await.unwrap();

        let descriptor = source.descriptor();
        assert_eq!(descriptor.kind, DataSourceKind::Imported);
        assert_eq!(descriptor.source_name, "clients.csv");
        assert_eq!(descriptor.group_name, None);
        assert!(!descriptor.loading);
        assert_eq!(source.record_count(), 2);
    }

    #[tokio::test]
    async fn failed_import_records_error_and_keeps_dataset() {
        let source = source();
        let file = StagedFile::from_bytes("a.json", b"{not json".to_vec());

        let err = source.import_file(&file).await.unwrap_err();
        let descriptor = source.descriptor();
        assert_eq!(descriptor.error, Some(err.to_string()));
        assert_eq!(descriptor.kind, DataSourceKind::Sample);
        assert!(!descriptor.loading);
        assert_eq!(source.record_count(), 5);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.csv");
        fs::write(&path, "a\n1\n").unwrap();
        let file = StagedFile::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let source = source();
        let err = source.import_file(&file).await.unwrap_err();
        assert!(matches!(err, DataSourceError::Read { .. }));
        assert!(source.descriptor().error.is_some());
    }

    #[tokio::test]
    async fn reset_restores_sample_and_clears_error() {
        let source = source();
        source
            .import_file(&StagedFile::from_bytes("notas.txt", b"um\ndois\n".to_vec()))
            .await
            .unwrap();
        source
            .import_file(&StagedFile::from_bytes("x.pdf", b"%PDF".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(source.descriptor().source_name, "notas.txt");
        assert!(source.descriptor().error.is_some());

        source.reset_to_sample().await.unwrap();
        let descriptor = source.descriptor();
        assert_eq!(descriptor.kind, DataSourceKind::Sample);
        assert_eq!(descriptor.group_name.as_deref(), Some("Riba"));
        assert!(descriptor.error.is_none());
    }

    #[tokio::test]
    async fn busy_source_refuses_new_work() {
        let source = source();
        let guard = source.begin_load().unwrap();
        assert!(source.descriptor().loading);

        let err = source
            .import_file(&StagedFile::from_bytes("b.csv", b"x\n1\n".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, DataSourceError::Busy));
        assert!(matches!(
            source.reset_to_sample().await,
            Err(DataSourceError::Busy)
        ));
        let descriptor = source.descriptor();
        assert_eq!(descriptor.source_name, "sample.json");
        assert!(descriptor.error.is_none());

        drop(guard);
        assert!(!source.descriptor().loading);
    }

    #[test]
    fn sample_from_path_uses_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grupo.csv");
        fs::write(&path, "nome\nAna\n").unwrap();

        let sample = SampleDataset::from_path(&path).unwrap();
        assert_eq!(sample.name, "grupo.csv");
        let source = LocalDataSource::new(sample).unwrap();
        assert_eq!(source.descriptor().source_name, "grupo.csv");
    }
}
