//! Content of the day: the persisted record and the gate that decides
//! whether to reuse or regenerate it.

pub mod gate;
pub mod record;

pub use gate::{DailyOutcome, PersistenceGate};
pub use record::{DailyRecord, calendar_date_string, display_date, load_record, save_record};
