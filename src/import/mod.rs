mod controller;
mod types;

pub use controller::{subtitle, ImportController, PendingImport, PendingReset};
pub use types::{ImportOutcome, PanelView, StagedFile, ACCEPTED_EXTENSIONS};
