pub mod cli;
pub mod config;
pub mod element;
pub mod error;
pub mod extract;
pub mod hooks;
pub mod report;
pub mod spec;

pub use crate::config::{Config, RenderConfig};
pub use crate::element::{MetadataElement, ReferenceableHeader};
pub use crate::error::{ReportError, ReportResult};
pub use crate::extract::{ColumnValues, Extractor};
pub use crate::hooks::{EnrichmentHook, HookRegistry};
pub use crate::report::{OutputRenderer, RenderRequest, RenderStats, Rendered, RenderedOutput};
pub use crate::spec::{Column, FormatSpec, FormatVariant, OutputFormat, ReportSpecRef, SpecRegistry};
