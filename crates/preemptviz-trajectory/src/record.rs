use serde::{Deserialize, Serialize};

/// One vehicle position sample read from the experiment's position table.
///
/// Rows are owned by the table; the trajectory builder only reads them.
/// Within one (scenario, ev) group the row order is the sampling order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PositionRecord {
    /// Simulation scenario the sample belongs to.
    pub scenario: String,
    /// Entity (vehicle) id, or the boundary marker id.
    pub ev: String,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl PositionRecord {
    #[must_use]
    pub fn new(scenario: &str, ev: &str, lon: f64, lat: f64) -> Self {
        Self {
            scenario: scenario.to_owned(),
            ev: ev.to_owned(),
            lon,
            lat,
        }
    }
}
