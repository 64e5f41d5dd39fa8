pub mod alerts;
pub mod crops;
pub mod data_sync;
pub mod tips;

pub use alerts::AlertEvaluator;
pub use data_sync::{DataSyncService, Outlook};
