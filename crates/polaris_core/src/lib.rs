pub mod config;
pub mod error;
pub mod flow;
pub mod logging;
pub mod notifications;
pub mod pagination;
pub mod refresher;
pub mod transaction;

pub use config::PolarisConfig;
pub use error::{ErrorCategory, PolarisError};
pub use flow::WriteFlow;
pub use notifications::{
    DEFAULT_SUCCESS_NOTICE, NotificationHandle, NotificationKind, NotificationSnapshot,
    NotificationTimer,
};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, Paginator, page_count, page_range, slice};
pub use refresher::{ReadRefresher, ReadSnapshot};
pub use transaction::{
    TransactionController, TransactionEvent, TransactionRecord, TransactionSnapshot,
    TransactionStatus,
};
