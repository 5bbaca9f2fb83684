pub mod memory;
pub mod readings;
pub mod reference;

use crate::error::Result;
use crate::models::{Appliance, Home, Reading, TariffInterval};
use async_trait::async_trait;
use chrono::NaiveDateTime;

pub use memory::MemoryStore;
pub use readings::ReadingRepository;
pub use reference::ReferenceRepository;

/// Read-only access to homes, appliances and tariff schedules.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn find_home(&self, home_id: &str) -> Result<Option<Home>>;

    async fn list_homes(&self) -> Result<Vec<Home>>;

    async fn list_appliances(&self) -> Result<Vec<Appliance>>;

    async fn home_has_appliance(&self, home_id: &str, appliance_id: &str) -> Result<bool>;

    /// Tariff windows for a region, in declaration order.
    async fn tariff_intervals(&self, region: &str) -> Result<Vec<TariffInterval>>;
}

/// Read-only access to the appliance reading time series.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Readings of a home with `from <= timestamp < to`, optionally for one appliance.
    async fn readings_between(
        &self,
        home_id: &str,
        appliance_id: Option<&str>,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Reading>>;

    /// Every reading of a home stamped with that home's latest timestamp.
    async fn latest_readings(&self, home_id: &str) -> Result<Vec<Reading>>;
}
