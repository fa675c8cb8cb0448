//! Offense reference core
//!
//! - [`Dataset`]: the immutable record list served by the API
//! - [`query`]: filter, sort and paginate over a dataset
//! - [`Catalog`]: the lookup matcher used by the terminal client
//! - [`ingest`]: normalizes loosely shaped JSON payloads into records

pub mod dataset;
pub mod distance;
pub mod error;
pub mod ingest;
pub mod matcher;
pub mod pipeline;

pub use dataset::Dataset;
pub use distance::levenshtein_distance;
pub use error::DatasetError;
pub use matcher::{
    Catalog, MatchCandidate, MatchResult, MatchStrategy, FUZZY_ACCEPT_DISTANCE, MAX_SUGGESTIONS,
    SUGGESTION_NAME_LIMIT,
};
pub use pipeline::{locale_cmp, parse_bool_token, query};

pub use crime_types::{OffenseRecord, PageMeta, QueryParams, ResultPage, SortOrder, TriState};
