pub mod errors;
pub mod ledger_store;
pub mod services;
pub mod time;
pub mod utils;
pub mod validation;

pub use errors::{BudgetError, Result};
pub use ledger_store::LedgerStore;
pub use time::{Clock, FixedClock, SystemClock};
