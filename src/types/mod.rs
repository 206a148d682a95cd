// Shared domain types used by both the engine layer and the dashboard.
// Neither layer depends on the other; both import from this module.

pub mod error;
pub mod pr;
pub mod query;

pub use error::*;
pub use pr::*;
pub use query::*;
