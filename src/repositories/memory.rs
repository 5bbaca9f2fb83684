use crate::error::{AppError, Result};
use crate::models::{Appliance, Home, Reading, TariffInterval};
use crate::repositories::{ReadingStore, ReferenceStore};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::time::Duration;

/// Vector-backed store implementing both store interfaces.
///
/// Insertion order is the declaration order of tariff windows.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    homes: Vec<Home>,
    appliances: Vec<Appliance>,
    home_appliances: Vec<(String, String)>,
    tariffs: Vec<TariffInterval>,
    readings: Vec<Reading>,
    latency: Option<Duration>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_home(mut self, home_id: &str, region: &str) -> Self {
        self.homes.push(Home {
            home_id: home_id.into(),
            region: region.into(),
        });
        self
    }

    /// Registers the appliance and links it to the home.
    pub fn with_appliance(mut self, home_id: &str, appliance_id: &str) -> Self {
        if !self.appliances.iter().any(|a| a.appliance_id == appliance_id) {
            self.appliances.push(Appliance {
                appliance_id: appliance_id.into(),
                name: None,
            });
        }
        self.home_appliances
            .push((home_id.into(), appliance_id.into()));
        self
    }

    pub fn with_tariff(mut self, interval: TariffInterval) -> Self {
        self.tariffs.push(interval);
        self
    }

    pub fn with_reading(mut self, reading: Reading) -> Self {
        self.readings.push(reading);
        self
    }

    pub fn with_readings(mut self, readings: impl IntoIterator<Item = Reading>) -> Self {
        self.readings.extend(readings);
        self
    }

    /// Delays every call, for exercising time budgets.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes every call fail as if the backing engine were down.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    async fn access(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable {
            return Err(AppError::StorageUnavailable(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl ReferenceStore for MemoryStore {
    async fn find_home(&self, home_id: &str) -> Result<Option<Home>> {
        self.access().await?;
        Ok(self.homes.iter().find(|h| h.home_id == home_id).cloned())
    }

    async fn list_homes(&self) -> Result<Vec<Home>> {
        self.access().await?;
        let mut homes = self.homes.clone();
        homes.sort_by(|a, b| a.home_id.cmp(&b.home_id));
        Ok(homes)
    }

    async fn list_appliances(&self) -> Result<Vec<Appliance>> {
        self.access().await?;
        let mut appliances = self.appliances.clone();
        appliances.sort_by(|a, b| a.appliance_id.cmp(&b.appliance_id));
        Ok(appliances)
    }

    async fn home_has_appliance(&self, home_id: &str, appliance_id: &str) -> Result<bool> {
        self.access().await?;
        Ok(self
            .home_appliances
            .iter()
            .any(|(h, a)| h == home_id && a == appliance_id))
    }

    async fn tariff_intervals(&self, region: &str) -> Result<Vec<TariffInterval>> {
        self.access().await?;
        Ok(self
            .tariffs
            .iter()
            .filter(|t| t.region == region)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn readings_between(
        &self,
        home_id: &str,
        appliance_id: Option<&str>,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Reading>> {
        self.access().await?;
        Ok(self
            .readings
            .iter()
            .filter(|r| r.home_id == home_id)
            .filter(|r| appliance_id.map_or(true, |a| r.appliance_id == a))
            .filter(|r| from <= r.timestamp && r.timestamp < to)
            .cloned()
            .collect())
    }

    async fn latest_readings(&self, home_id: &str) -> Result<Vec<Reading>> {
        self.access().await?;
        let own = self.readings.iter().filter(|r| r.home_id == home_id);
        let Some(latest) = own.clone().map(|r| r.timestamp).max() else {
            return Ok(Vec::new());
        };
        Ok(own.filter(|r| r.timestamp == latest).cloned().collect())
    }
}
