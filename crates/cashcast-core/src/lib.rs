//! cashcast-core
//!
//! The financial projection engine: month sequencing, recurring and deferred
//! resolution, deficit carry-over, ceiling/budget/trend evaluation, alerts and
//! analysis. Depends on cashcast-domain. No I/O, no configuration.

pub mod advanced_alert_service;
pub mod alert_service;
pub mod analysis_service;
pub mod budget_service;
pub mod ceiling_service;
pub mod deferred_service;
pub mod deficit_service;
pub mod error;
pub mod history;
pub mod projection_service;
pub mod recurring_service;
pub mod trend_service;
pub mod validation;

pub use advanced_alert_service::*;
pub use alert_service::*;
pub use analysis_service::*;
pub use budget_service::*;
pub use ceiling_service::*;
pub use deferred_service::*;
pub use deficit_service::*;
pub use error::CoreError;
pub use history::SpendHistory;
pub use projection_service::*;
pub use recurring_service::*;
pub use trend_service::*;
pub use validation::*;
