pub mod bill_store;
pub mod bills;
pub mod submission;
