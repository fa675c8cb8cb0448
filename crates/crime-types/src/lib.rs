pub mod query;
pub mod record;

pub use query::{PageMeta, QueryParams, ResultPage, SortOrder};
pub use record::{OffenseRecord, TriState};
