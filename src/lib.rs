pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod source;

pub use config::SearchConfig;
pub use error::{BuildError, SearchError};
pub use models::{ClientRef, Matter, MatterDocument, MatterStatus, StaffAssignment};
pub use search::{
    Category, GroupedResults, SearchIndex, SearchOptions, SearchResultItem, SearchService,
};
pub use source::{EntitySource, HistoryStore, JsonFileHistoryStore, MemoryHistoryStore};
