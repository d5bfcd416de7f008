//! Pipeline entry points.
//!
//! - `run_sync`: one scrape-filter-store-publish pass at a given time
//! - `run_once`: one pass at the current time
//! - `run_forever`: daily loop, one pass per local midnight

pub mod filter;
pub mod schedule;
pub mod sync;

pub use filter::{EventFilter, Verdict, filter_new_events};
pub use schedule::{run_forever, run_once};
pub use sync::{SyncContext, run_sync};
