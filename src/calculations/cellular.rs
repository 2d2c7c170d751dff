//! Cellular network dimensioning.
//!
//! A coarse planning pass: the power budget sets the cell radius through a
//! log-distance model, hexagonal cells tile the coverage area, and the offered
//! traffic is spread evenly over the cells. Channel count, reuse factor and
//! spectrum efficiency use simplified rules of thumb rather than Erlang-B tables.

use super::{FieldSpec, FieldValue};

/// Free-space constant for distance in km and frequency in MHz.
const FSPL_CONSTANT_KM_MHZ: f64 = 32.44;
/// Area of a regular hexagon is `3√3/2 · R²`.
const HEXAGON_AREA_FACTOR: f64 = 2.598;
/// Channels assumed to fit in one reuse cluster step.
const CHANNELS_PER_CLUSTER: f64 = 30.0;
/// Bandwidth assumed per channel (MHz).
const CHANNEL_BANDWIDTH_MHZ: f64 = 0.2;
const SECONDS_PER_HOUR: f64 = 3600.0;

pub const PARAMETER_FIELDS: [FieldSpec; 10] = [
    FieldSpec::new("coverageArea", "Coverage area", "km²"),
    FieldSpec::new("trafficDensity", "Traffic density", "calls/h"),
    FieldSpec::new("callDuration", "Average call duration", "s"),
    FieldSpec::new("blockingProbability", "Blocking probability", ""),
    FieldSpec::new("frequency", "Frequency", "MHz"),
    FieldSpec::new("baseStationPower", "Base station power", "dB"),
    FieldSpec::new("mobilePower", "Mobile power", "dB"),
    FieldSpec::new("pathLossExponent", "Path loss exponent", ""),
    FieldSpec::new("shadowingMargin", "Shadowing margin", "dB"),
    FieldSpec::new("interferenceMargin", "Interference margin", "dB"),
];

pub const RESULT_FIELDS: [FieldSpec; 10] = [
    FieldSpec::new("maxPathLoss", "Maximum path loss", "dB"),
    FieldSpec::new("cellRadius", "Cell radius", "km"),
    FieldSpec::new("cellArea", "Cell area", "km²"),
    FieldSpec::new("numberOfCells", "Number of cells", ""),
    FieldSpec::new("totalTraffic", "Total traffic", "Erl"),
    FieldSpec::new("trafficPerCell", "Traffic per cell", "Erl"),
    FieldSpec::new("channelsPerCell", "Channels per cell", ""),
    FieldSpec::new("cellCapacity", "Cell capacity", "Erl"),
    FieldSpec::new("frequencyReuseFactor", "Frequency reuse factor", ""),
    FieldSpec::new("spectrumEfficiency", "Spectrum efficiency", "Erl/MHz"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularParameters {
    pub coverage_area: f64,
    pub traffic_density: f64,
    pub call_duration: f64,
    pub blocking_probability: f64,
    pub frequency: f64,
    pub base_station_power: f64,
    pub mobile_power: f64,
    pub path_loss_exponent: f64,
    pub shadowing_margin: f64,
    pub interference_margin: f64,
}

impl Default for CellularParameters {
    fn default() -> Self {
        Self {
            coverage_area: 1000.0,
            traffic_density: 10000.0,
            call_duration: 120.0,
            blocking_probability: 0.02,
            frequency: 900.0,
            base_station_power: 110.0,
            mobile_power: 30.0,
            path_loss_exponent: 3.5,
            shadowing_margin: 8.0,
            interference_margin: 3.0,
        }
    }
}

impl CellularParameters {
    /// Build from values ordered like [`PARAMETER_FIELDS`]. Missing values are `0`.
    pub fn from_values(values: &[f64]) -> Self {
        let v = |i: usize| values.get(i).copied().unwrap_or(0.0);
        Self {
            coverage_area: v(0),
            traffic_density: v(1),
            call_duration: v(2),
            blocking_probability: v(3),
            frequency: v(4),
            base_station_power: v(5),
            mobile_power: v(6),
            path_loss_exponent: v(7),
            shadowing_margin: v(8),
            interference_margin: v(9),
        }
    }

    pub fn values(&self) -> [f64; 10] {
        [
            self.coverage_area,
            self.traffic_density,
            self.call_duration,
            self.blocking_probability,
            self.frequency,
            self.base_station_power,
            self.mobile_power,
            self.path_loss_exponent,
            self.shadowing_margin,
            self.interference_margin,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularResults {
    pub max_path_loss: f64,
    pub cell_radius: f64,
    pub cell_area: f64,
    pub number_of_cells: f64,
    /// Offered traffic over the whole area in Erlangs.
    pub total_traffic: f64,
    pub traffic_per_cell: f64,
    pub channels_per_cell: f64,
    pub cell_capacity: f64,
    pub frequency_reuse_factor: f64,
    pub spectrum_efficiency: f64,
}

impl CellularResults {
    pub fn values(&self) -> [FieldValue; 10] {
        [
            FieldValue::Number(self.max_path_loss),
            FieldValue::Number(self.cell_radius),
            FieldValue::Number(self.cell_area),
            FieldValue::Number(self.number_of_cells),
            FieldValue::Number(self.total_traffic),
            FieldValue::Number(self.traffic_per_cell),
            FieldValue::Number(self.channels_per_cell),
            FieldValue::Number(self.cell_capacity),
            FieldValue::Number(self.frequency_reuse_factor),
            FieldValue::Number(self.spectrum_efficiency),
        ]
    }
}

/// Dimension a cellular network.
///
/// # Formula
///
/// ```text
/// PL_max   = P_bs + P_ms - M_shadow - M_interf
/// R        = 10^((PL_max - 32.44 - 20 log₁₀ f) / (10 n))
/// A_cell   = 2.598 R²
/// N_cells  = ⌈A / A_cell⌉
/// T        = density × duration / 3600
/// T_cell   = T / N_cells
/// C        = ⌈T_cell + 3√T_cell + 2⌉
/// capacity = C (1 - P_b)
/// K        = ⌈(3C / 30)^(2/3)⌉
/// η        = capacity / (0.2 C)
/// ```
///
/// A zero exponent, a non-positive frequency or an empty cell count produce
/// infinities or NaN that flow through every later step; `ceil` keeps NaN.
pub fn calculate_cellular_design(params: &CellularParameters) -> CellularResults {
    let max_path_loss = params.base_station_power + params.mobile_power - params.shadowing_margin - params.interference_margin;
    let exponent = (max_path_loss - FSPL_CONSTANT_KM_MHZ - 20.0 * params.frequency.log10()) / (10.0 * params.path_loss_exponent);
    let cell_radius = 10f64.powf(exponent);
    let cell_area = HEXAGON_AREA_FACTOR * cell_radius.powi(2);
    let number_of_cells = (params.coverage_area / cell_area).ceil();

    let total_traffic = params.traffic_density * params.call_duration / SECONDS_PER_HOUR;
    let traffic_per_cell = total_traffic / number_of_cells;
    let channels_per_cell = (traffic_per_cell + 3.0 * traffic_per_cell.sqrt() + 2.0).ceil();
    let cell_capacity = channels_per_cell * (1.0 - params.blocking_probability);

    let frequency_reuse_factor = (3.0 * channels_per_cell / CHANNELS_PER_CLUSTER).powf(2.0 / 3.0).ceil();
    let spectrum_efficiency = cell_capacity / (channels_per_cell * CHANNEL_BANDWIDTH_MHZ);

    CellularResults {
        max_path_loss,
        cell_radius,
        cell_area,
        number_of_cells,
        total_traffic,
        traffic_per_cell,
        channels_per_cell,
        cell_capacity,
        frequency_reuse_factor,
        spectrum_efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_design() {
        let r = calculate_cellular_design(&CellularParameters::default());
        assert_eq!(r.max_path_loss, 129.0);
        assert!((r.cell_radius - 11.77).abs() < 0.01, "radius {}", r.cell_radius);
        assert!((r.cell_area - 359.95).abs() < 0.5, "area {}", r.cell_area);
        assert_eq!(r.number_of_cells, 3.0);
        assert!((r.total_traffic - 333.333).abs() < 1e-3);
        assert!((r.traffic_per_cell - 111.111).abs() < 1e-3);
        assert_eq!(r.channels_per_cell, 145.0);
        assert!((r.cell_capacity - 142.1).abs() < 1e-9);
        assert_eq!(r.frequency_reuse_factor, 6.0);
        assert!((r.spectrum_efficiency - 4.9).abs() < 1e-9);
    }

    #[test]
    fn more_budget_means_bigger_cells_and_fewer_of_them() {
        let base = CellularParameters::default();
        let boosted = CellularParameters {
            base_station_power: base.base_station_power + 20.0,
            ..base
        };
        let r1 = calculate_cellular_design(&base);
        let r2 = calculate_cellular_design(&boosted);
        assert!(r2.cell_radius > r1.cell_radius);
        assert!(r2.number_of_cells <= r1.number_of_cells);
    }

    #[test]
    fn zero_path_loss_exponent_propagates() {
        let params = CellularParameters {
            path_loss_exponent: 0.0,
            ..Default::default()
        };
        let r = calculate_cellular_design(&params);
        assert_eq!(r.cell_radius, f64::INFINITY);
        assert_eq!(r.number_of_cells, 0.0);
        assert_eq!(r.traffic_per_cell, f64::INFINITY);
        assert_eq!(r.channels_per_cell, f64::INFINITY);
        assert_eq!(r.frequency_reuse_factor, f64::INFINITY);
        // ∞ / ∞
        assert!(r.spectrum_efficiency.is_nan());
    }

    #[test]
    fn zero_frequency_gives_unbounded_cells() {
        let params = CellularParameters {
            frequency: 0.0,
            ..Default::default()
        };
        let r = calculate_cellular_design(&params);
        assert_eq!(r.cell_radius, f64::INFINITY);
        assert_eq!(r.number_of_cells, 0.0);
    }

    #[test]
    fn negative_frequency_is_nan_throughout() {
        let params = CellularParameters {
            frequency: -900.0,
            ..Default::default()
        };
        let r = calculate_cellular_design(&params);
        assert!(r.cell_radius.is_nan());
        assert!(r.number_of_cells.is_nan());
        assert!(r.channels_per_cell.is_nan());
        assert!(r.frequency_reuse_factor.is_nan());
        assert!(r.spectrum_efficiency.is_nan());
    }

    #[test]
    fn empty_coverage_area_divides_by_zero_cells() {
        let params = CellularParameters {
            coverage_area: 0.0,
            ..Default::default()
        };
        let r = calculate_cellular_design(&params);
        assert_eq!(r.number_of_cells, 0.0);
        assert_eq!(r.traffic_per_cell, f64::INFINITY);
    }

    #[test]
    fn no_traffic_still_needs_two_channels() {
        let params = CellularParameters {
            traffic_density: 0.0,
            ..Default::default()
        };
        let r = calculate_cellular_design(&params);
        assert_eq!(r.total_traffic, 0.0);
        assert_eq!(r.channels_per_cell, 2.0);
        assert_eq!(r.frequency_reuse_factor, 1.0);
    }

    proptest! {
        #[test]
        fn design_is_deterministic(
            area in 0.0f64..10_000.0,
            density in 0.0f64..100_000.0,
            frequency in 1.0f64..6000.0,
            exponent in 0.0f64..6.0,
            interference in -10.0f64..30.0,
        ) {
            let params = CellularParameters {
                coverage_area: area,
                traffic_density: density,
                frequency,
                path_loss_exponent: exponent,
                interference_margin: interference,
                ..Default::default()
            };
            let first = calculate_cellular_design(&params);
            let second = calculate_cellular_design(&params);
            prop_assert_eq!(format!("{:?}", first), format!("{:?}", second));
        }
    }
}
