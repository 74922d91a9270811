//! Query pipeline: criteria in, ordered views and pages out

pub mod criteria;
pub mod page;
pub mod pipeline;

pub use criteria::Criteria;
pub use page::{Page, PageRequest};
pub use pipeline::{PreparedQuery, QueryPipeline, View};
