pub mod cache;
pub mod forest;
