pub mod discover;
pub mod executor;
pub mod pipeline;
pub mod write;

pub use discover::discover_documents;
pub use executor::Executor;
pub use pipeline::Pipeline;
pub use write::write_atomic;
