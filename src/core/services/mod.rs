pub mod entry_service;
pub mod export_service;
pub mod query_service;
pub mod summary_service;

pub use entry_service::EntryService;
pub use export_service::{CsvShape, ExportRows, ExportService};
pub use query_service::{
    CategoryFilter, FilterSpec, FilterStage, KindFilter, LedgerRow, Month, QueryService,
    SortOrder,
};
pub use summary_service::{CategoryAggregate, Report, ReportView, SummaryService, Totals};

use crate::core::errors::BudgetError;

pub type ServiceResult<T> = Result<T, BudgetError>;
