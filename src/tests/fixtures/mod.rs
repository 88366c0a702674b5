pub mod app;
pub mod snapshots;
