pub mod http_store;
pub mod memory_store;
pub mod store;
