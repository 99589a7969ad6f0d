pub mod cleaner;
pub mod encoder;
pub mod etl;
pub mod ingest;
pub mod loader;
pub mod paths;
pub mod pipeline;

pub use crate::domain::event::S3Event;
pub use crate::domain::model::{InvocationResult, ObjectRef, OutputFormat, Table};
pub use crate::domain::ports::{Catalog, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
