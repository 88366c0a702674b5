// Composition root for the artist_watch service.
//
// - config: file plus environment configuration.
// - state: wires adapters into the use case handlers.
// - scheduler: periodic poll and reconciliation cycles.
// - http: operator command router.

pub mod config;
pub mod http;
pub mod scheduler;
pub mod state;
