pub mod aggregate;
pub mod reading;
pub mod reference;

pub use aggregate::{AttributedReading, Coverage, HomeApplianceDaily, HomeDaily, HomeTouDaily};
pub use reading::{LiveApplianceLoad, Reading};
pub use reference::{Appliance, Home, TariffInterval};
