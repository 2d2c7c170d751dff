//! OFDM resource-grid throughput.
//!
//! Rates build up from a single resource element (one subcarrier for one
//! symbol) to the whole carrier. The symbol duration is entered in
//! microseconds and scaled by 1000, so the per-element rate is expressed per
//! millisecond. `subcarrierSpacing` is kept with the inputs but not used.

use super::{FieldSpec, FieldValue};

/// Scale from a duration in µs to a rate per millisecond.
const MICROSECONDS_PER_MILLISECOND: f64 = 1000.0;

pub const PARAMETER_FIELDS: [FieldSpec; 9] = [
    FieldSpec::new("subcarrierSpacing", "Subcarrier spacing", "kHz"),
    FieldSpec::new("symbolDuration", "Symbol duration", "µs"),
    FieldSpec::new("cyclicPrefixRatio", "Cyclic prefix ratio", ""),
    FieldSpec::new("resourceElementsPerSymbol", "Resource elements per symbol", ""),
    FieldSpec::new("symbolsPerResourceBlock", "Symbols per resource block", ""),
    FieldSpec::new("resourceBlocksParallel", "Parallel resource blocks", ""),
    FieldSpec::new("modulationOrder", "Modulation order (M)", ""),
    FieldSpec::new("codingRate", "Coding rate", ""),
    FieldSpec::new("bandwidth", "Bandwidth", "Hz"),
];

pub const RESULT_FIELDS: [FieldSpec; 6] = [
    FieldSpec::new("bitsPerResourceElement", "Bits per resource element", "bits"),
    FieldSpec::new("resourceElementRate", "Resource element rate", "kbit/s"),
    FieldSpec::new("ofdmSymbolRate", "OFDM symbol rate", "kbit/s"),
    FieldSpec::new("resourceBlockRate", "Resource block rate", "kbit/s"),
    FieldSpec::new("maxTransmissionCapacity", "Maximum capacity", "kbit/s"),
    FieldSpec::new("spectralEfficiency", "Spectral efficiency", "kbit/s/Hz"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfdmParameters {
    /// Recorded for reference; not used by the rate chain.
    pub subcarrier_spacing: f64,
    /// Useful symbol duration in microseconds.
    pub symbol_duration: f64,
    pub cyclic_prefix_ratio: f64,
    pub resource_elements_per_symbol: f64,
    pub symbols_per_resource_block: f64,
    pub resource_blocks_parallel: f64,
    /// Constellation size M (4 = QPSK, 16 = 16-QAM, ...).
    pub modulation_order: f64,
    pub coding_rate: f64,
    pub bandwidth: f64,
}

impl Default for OfdmParameters {
    fn default() -> Self {
        Self {
            subcarrier_spacing: 15.0,
            symbol_duration: 66.67,
            cyclic_prefix_ratio: 0.07,
            resource_elements_per_symbol: 12.0,
            symbols_per_resource_block: 14.0,
            resource_blocks_parallel: 100.0,
            modulation_order: 4.0,
            coding_rate: 0.5,
            bandwidth: 20_000_000.0,
        }
    }
}

impl OfdmParameters {
    pub fn from_values(values: &[f64]) -> Self {
        let v = |i: usize| values.get(i).copied().unwrap_or(0.0);
        Self {
            subcarrier_spacing: v(0),
            symbol_duration: v(1),
            cyclic_prefix_ratio: v(2),
            resource_elements_per_symbol: v(3),
            symbols_per_resource_block: v(4),
            resource_blocks_parallel: v(5),
            modulation_order: v(6),
            coding_rate: v(7),
            bandwidth: v(8),
        }
    }

    pub fn values(&self) -> [f64; 9] {
        [
            self.subcarrier_spacing,
            self.symbol_duration,
            self.cyclic_prefix_ratio,
            self.resource_elements_per_symbol,
            self.symbols_per_resource_block,
            self.resource_blocks_parallel,
            self.modulation_order,
            self.coding_rate,
            self.bandwidth,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfdmResults {
    pub bits_per_resource_element: f64,
    pub resource_element_rate: f64,
    pub ofdm_symbol_rate: f64,
    pub resource_block_rate: f64,
    pub max_transmission_capacity: f64,
    pub spectral_efficiency: f64,
}

impl OfdmResults {
    pub fn values(&self) -> [FieldValue; 6] {
        [
            FieldValue::Number(self.bits_per_resource_element),
            FieldValue::Number(self.resource_element_rate),
            FieldValue::Number(self.ofdm_symbol_rate),
            FieldValue::Number(self.resource_block_rate),
            FieldValue::Number(self.max_transmission_capacity),
            FieldValue::Number(self.spectral_efficiency),
        ]
    }
}

/// Compute the OFDM rate hierarchy.
///
/// # Formula
///
/// ```text
/// b_RE   = log₂(M) × r
/// R_RE   = b_RE × 1000 / (T_sym × (1 + CP))
/// R_sym  = R_RE × N_RE
/// R_RB   = R_sym × N_sym
/// R_max  = R_RB × N_RB
/// η      = R_max / B
/// ```
///
/// `M ≤ 0`, `T_sym = 0` and `B = 0` give NaN or infinities, never a panic.
pub fn calculate_ofdm_rates(params: &OfdmParameters) -> OfdmResults {
    let bits_per_resource_element = params.modulation_order.log2() * params.coding_rate;
    let resource_element_rate =
        bits_per_resource_element * (MICROSECONDS_PER_MILLISECOND / (params.symbol_duration * (1.0 + params.cyclic_prefix_ratio)));
    let ofdm_symbol_rate = resource_element_rate * params.resource_elements_per_symbol;
    let resource_block_rate = ofdm_symbol_rate * params.symbols_per_resource_block;
    let max_transmission_capacity = resource_block_rate * params.resource_blocks_parallel;
    let spectral_efficiency = max_transmission_capacity / params.bandwidth;

    OfdmResults {
        bits_per_resource_element,
        resource_element_rate,
        ofdm_symbol_rate,
        resource_block_rate,
        max_transmission_capacity,
        spectral_efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rel_close(actual: f64, expected: f64) -> bool {
        ((actual - expected) / expected).abs() < 1e-6
    }

    #[test]
    fn qpsk_half_rate_carrier() {
        let r = calculate_ofdm_rates(&OfdmParameters::default());
        assert_eq!(r.bits_per_resource_element, 1.0);
        // 1000 / (66.67 × 1.07)
        assert!(rel_close(r.resource_element_rate, 14.017_990_689), "re {}", r.resource_element_rate);
        assert!(rel_close(r.ofdm_symbol_rate, 168.215_888_271));
        assert!(rel_close(r.resource_block_rate, 2355.022_435_794));
        assert!(rel_close(r.max_transmission_capacity, 235_502.243_579));
        assert!(rel_close(r.spectral_efficiency, 0.011_775_112_179));
    }

    #[test]
    fn higher_order_modulation_scales_linearly_in_bits() {
        let qam64 = OfdmParameters {
            modulation_order: 64.0,
            ..Default::default()
        };
        let base = calculate_ofdm_rates(&OfdmParameters::default());
        let r = calculate_ofdm_rates(&qam64);
        assert_eq!(r.bits_per_resource_element, 3.0);
        assert!(rel_close(r.max_transmission_capacity, base.max_transmission_capacity * 3.0));
    }

    #[test]
    fn spacing_is_ignored() {
        let wide = OfdmParameters {
            subcarrier_spacing: 30.0,
            ..Default::default()
        };
        assert_eq!(calculate_ofdm_rates(&wide), calculate_ofdm_rates(&OfdmParameters::default()));
    }

    #[test]
    fn zero_modulation_order_is_negative_infinity() {
        let params = OfdmParameters {
            modulation_order: 0.0,
            ..Default::default()
        };
        let r = calculate_ofdm_rates(&params);
        assert_eq!(r.bits_per_resource_element, f64::NEG_INFINITY);
        assert_eq!(r.max_transmission_capacity, f64::NEG_INFINITY);
    }

    #[test]
    fn negative_modulation_order_is_nan() {
        let params = OfdmParameters {
            modulation_order: -4.0,
            ..Default::default()
        };
        let r = calculate_ofdm_rates(&params);
        assert!(r.bits_per_resource_element.is_nan());
        assert!(r.spectral_efficiency.is_nan());
    }

    #[test]
    fn zero_symbol_duration_and_bandwidth() {
        let params = OfdmParameters {
            symbol_duration: 0.0,
            ..Default::default()
        };
        assert_eq!(calculate_ofdm_rates(&params).resource_element_rate, f64::INFINITY);

        let params = OfdmParameters {
            bandwidth: 0.0,
            ..Default::default()
        };
        assert_eq!(calculate_ofdm_rates(&params).spectral_efficiency, f64::INFINITY);
    }

    proptest! {
        #[test]
        fn rates_are_deterministic(
            symbol_duration in 0.0f64..200.0,
            cp in 0.0f64..0.5,
            order in 0.0f64..1024.0,
            coding in 0.0f64..1.0,
            bandwidth in 0.0f64..400.0,
        ) {
            let params = OfdmParameters {
                symbol_duration,
                cyclic_prefix_ratio: cp,
                modulation_order: order,
                coding_rate: coding,
                bandwidth,
                ..Default::default()
            };
            let first = calculate_ofdm_rates(&params);
            let second = calculate_ofdm_rates(&params);
            prop_assert_eq!(format!("{:?}", first), format!("{:?}", second));
        }
    }
}
