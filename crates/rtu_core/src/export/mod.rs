//! Thumbnail export: sequential copies under sanitized names.

mod exporter;

pub use exporter::{export_thumbnails, extension_of, sanitize, ExportError, ExportResult};
