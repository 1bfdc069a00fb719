mod dataset;
mod local;

use crate::import::StagedFile;
use async_trait::async_trait;
use std::fmt;

pub use dataset::{Dataset, DatasetFormat};
pub use local::{LocalDataSource, SampleDataset};

/// Where the active dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceKind {
    Sample,
    Imported,
}

impl DataSourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sample => "Exemplo",
            Self::Imported => "Importado",
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The part of the descriptor that names the active dataset. A change here
/// means the dataset was swapped, whoever did it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIdentity {
    pub kind: DataSourceKind,
    pub source_name: String,
}

/// Read-only snapshot of a data source's shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceDescriptor {
    pub kind: DataSourceKind,
    pub source_name: String,
    pub group_name: Option<String>,
    /// Busy flag shared by import and reset.
    pub loading: bool,
    /// Last surfaced error, shown verbatim.
    pub error: Option<String>,
}

impl DataSourceDescriptor {
    pub fn identity(&self) -> DatasetIdentity {
        DatasetIdentity {
            kind: self.kind,
            source_name: self.source_name.clone(),
        }
    }

    pub fn is_sample(&self) -> bool {
        self.kind == DataSourceKind::Sample
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("Formato de ficheiro não suportado: {0}")]
    UnsupportedFormat(String),
    #[error("Não foi possível ler {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("O ficheiro {name} não está em UTF-8")]
    Encoding { name: String },
    #[error("O ficheiro {name} está vazio")]
    Empty { name: String },
    #[error("JSON inválido em {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("CSV inválido em {name}: {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },
    #[error("Estrutura inesperada em {name}: {reason}")]
    Shape { name: String, reason: String },
    /// Another import or reset is still running; nothing was done.
    #[error("Já existe uma operação de dados em curso")]
    Busy,
    /// Opaque rejection from a source that does not classify its failures.
    #[error("{0}")]
    Rejected(String),
}

/// Owner of the authoritative dataset.
///
/// Implementations record every failure of `import_file` and
/// `reset_to_sample` in the descriptor's `error` slot before returning it,
/// so callers may display the descriptor and drop the returned error.
/// The exception is [`DataSourceError::Busy`], returned without touching
/// the slot when work was refused because another operation holds `loading`.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn descriptor(&self) -> DataSourceDescriptor;

    async fn import_file(&self, file: &StagedFile) -> Result<(), DataSourceError>;

    async fn reset_to_sample(&self) -> Result<(), DataSourceError>;
}
