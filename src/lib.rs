pub mod errors;
pub mod handlers;
pub mod includes;
pub mod params;
pub mod query;
pub mod resource;
pub mod router;

pub use errors::ApiError;
pub use includes::Included;
pub use params::{ItemParams, ListParams};
pub use query::{ItemOptions, QueryOptions};
pub use resource::{CreateOutcome, CrudResource, MergePatch};
pub use router::router;

// Re-export for downstream update models using double_option fields
pub use serde_with;
