//! Core module - data shaping, storage and shared types

pub mod accession;
pub mod config;
pub mod dates;
pub mod export;
pub mod identity;
pub mod project;
pub mod record;
pub mod session;
pub mod sorting;
pub mod store;
pub mod workload;

pub use accession::{generate_prefix, parse_range, validate_range, RangeError};
pub use config::{Config, ConfigError};
pub use dates::{format_for_display, is_future, today, DateError};
pub use export::{download, to_csv, Column, DirectorySink, DownloadSink, ExportError, StdoutSink};
pub use identity::{IdParseError, RecordId, RecordPrefix};
pub use project::{Project, ProjectError};
pub use record::Record;
pub use session::{Session, SessionError};
pub use sorting::{SortDirection, SortValue};
pub use store::{StoreError, YamlStore};
pub use workload::{
    aggregate, aggregate_with_limits, sort_summaries, LimitFlag, SummarySortKey, WorkloadLimits,
    WorkloadSummary,
};
