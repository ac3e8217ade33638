pub mod document;
pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod store;

pub use document::Document;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryRepository;
pub use repository::{PgRepository, Repository};
pub use store::Store;
