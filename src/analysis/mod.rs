//! Aggregations over enriched records. All groupings are keyed maps, so
//! results do not depend on input order.

pub mod event;
pub mod geography;
pub mod insider;

pub use event::*;
pub use geography::*;
pub use insider::*;
