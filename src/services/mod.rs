pub mod attribution;
pub mod query;
pub mod rollup;

pub use attribution::{attribute_reading, Attribution, TariffSchedule};
pub use query::{QueryService, View, ViewQuery, ViewResult, ViewRows};
pub use rollup::{roll_up, DailyRollup, RollupBuilder};
