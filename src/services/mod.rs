pub mod checkpoint_store;
pub mod extraction_service;
pub mod report_exporter;

pub use checkpoint_store::CheckpointStore;
pub use extraction_service::{ExtractionService, Extractor};
pub use report_exporter::ReportExporter;
