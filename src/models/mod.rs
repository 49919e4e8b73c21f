pub mod company;
pub mod event;
pub mod filing;
pub mod insider;
pub mod query;

pub use company::*;
pub use event::*;
pub use filing::*;
pub use insider::*;
pub use query::*;
