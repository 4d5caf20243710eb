//! cashcast-domain
//!
//! Pure domain models for the cash-flow projection engine (transactions, recurring
//! charges, budget rules, month projections, alerts).
//! No I/O, no logging. Only data types and core enums.

pub mod alert;
pub mod analysis;
pub mod month;
pub mod projection;
pub mod recurring;
pub mod request;
pub mod rules;
pub mod transaction;

pub use alert::*;
pub use analysis::*;
pub use month::*;
pub use projection::*;
pub use recurring::*;
pub use request::*;
pub use rules::*;
pub use transaction::*;
