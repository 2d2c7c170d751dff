//! Point-to-point link budget.
//!
//! Units:
//! - Power: dBm, gains and losses in dB/dBi
//! - Distance: kilometres
//! - Frequency: megahertz
//!
//! The free-space loss uses the km/MHz form of the Friis equation, hence the
//! 32.44 dB constant.

use super::{FieldSpec, FieldValue};

/// Free-space path loss constant for distance in km and frequency in MHz.
const FSPL_CONSTANT_KM_MHZ: f64 = 32.44;

pub const PARAMETER_FIELDS: [FieldSpec; 8] = [
    FieldSpec::new("transmitterPower", "Transmitter power", "dBm"),
    FieldSpec::new("transmitterGain", "Transmitter antenna gain", "dBi"),
    FieldSpec::new("frequency", "Frequency", "MHz"),
    FieldSpec::new("distance", "Distance", "km"),
    FieldSpec::new("receiverGain", "Receiver antenna gain", "dBi"),
    FieldSpec::new("systemLoss", "System losses", "dB"),
    FieldSpec::new("fadeMargin", "Fade margin", "dB"),
    FieldSpec::new("receiverSensitivity", "Receiver sensitivity", "dBm"),
];

pub const RESULT_FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("eirp", "EIRP", "dBm"),
    FieldSpec::new("freeSpaceLoss", "Free-space path loss", "dB"),
    FieldSpec::new("receivedPower", "Received power", "dBm"),
    FieldSpec::new("linkMargin", "Link margin", "dB"),
    FieldSpec::new("isLinkViable", "Link viable", ""),
];

/// Inputs of the link budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkBudgetParameters {
    pub transmitter_power: f64,
    pub transmitter_gain: f64,
    pub frequency: f64,
    pub distance: f64,
    pub receiver_gain: f64,
    pub system_loss: f64,
    pub fade_margin: f64,
    pub receiver_sensitivity: f64,
}

impl Default for LinkBudgetParameters {
    fn default() -> Self {
        Self {
            transmitter_power: 30.0,
            transmitter_gain: 15.0,
            frequency: 2400.0,
            distance: 10.0,
            receiver_gain: 12.0,
            system_loss: 3.0,
            fade_margin: 10.0,
            receiver_sensitivity: -95.0,
        }
    }
}

impl LinkBudgetParameters {
    /// Build from values ordered like [`PARAMETER_FIELDS`]. Missing values are `0`.
    pub fn from_values(values: &[f64]) -> Self {
        let v = |i: usize| values.get(i).copied().unwrap_or(0.0);
        Self {
            transmitter_power: v(0),
            transmitter_gain: v(1),
            frequency: v(2),
            distance: v(3),
            receiver_gain: v(4),
            system_loss: v(5),
            fade_margin: v(6),
            receiver_sensitivity: v(7),
        }
    }

    /// Values ordered like [`PARAMETER_FIELDS`].
    pub fn values(&self) -> [f64; 8] {
        [
            self.transmitter_power,
            self.transmitter_gain,
            self.frequency,
            self.distance,
            self.receiver_gain,
            self.system_loss,
            self.fade_margin,
            self.receiver_sensitivity,
        ]
    }
}

/// Outputs of the link budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkBudgetResults {
    /// Effective isotropic radiated power (dBm).
    pub eirp: f64,
    /// Free-space path loss (dB).
    pub free_space_loss: f64,
    /// Power at the receiver input after gains and losses (dBm).
    pub received_power: f64,
    /// Headroom above sensitivity plus fade margin (dB).
    pub link_margin: f64,
    /// `true` iff `link_margin > 0`.
    pub is_link_viable: bool,
}

impl LinkBudgetResults {
    /// Values ordered like [`RESULT_FIELDS`].
    pub fn values(&self) -> [FieldValue; 5] {
        [
            FieldValue::Number(self.eirp),
            FieldValue::Number(self.free_space_loss),
            FieldValue::Number(self.received_power),
            FieldValue::Number(self.link_margin),
            FieldValue::Flag(self.is_link_viable),
        ]
    }
}

/// Free-space path loss in dB for a distance in km and a frequency in MHz.
///
/// # Formula
///
/// ```text
/// FSPL = 20 × log₁₀(d) + 20 × log₁₀(f) + 32.44
/// ```
///
/// A zero distance or frequency gives `-∞`, a negative one gives NaN.
pub fn free_space_path_loss(distance_km: f64, frequency_mhz: f64) -> f64 {
    20.0 * distance_km.log10() + 20.0 * frequency_mhz.log10() + FSPL_CONSTANT_KM_MHZ
}

/// Evaluate the link budget.
///
/// # Formula
///
/// ```text
/// EIRP          = P_tx + G_tx
/// P_rx          = EIRP - FSPL + G_rx - L_sys
/// margin        = P_rx - sensitivity - fade margin
/// viable        = margin > 0
/// ```
///
/// Never fails: degenerate inputs show up as infinities or NaN in the result.
pub fn calculate_link_budget(params: &LinkBudgetParameters) -> LinkBudgetResults {
    let eirp = params.transmitter_power + params.transmitter_gain;
    let free_space_loss = free_space_path_loss(params.distance, params.frequency);
    let received_power = eirp - free_space_loss + params.receiver_gain - params.system_loss;
    let link_margin = received_power - params.receiver_sensitivity - params.fade_margin;

    LinkBudgetResults {
        eirp,
        free_space_loss,
        received_power,
        link_margin,
        // NaN compares false, so a degenerate margin is never viable
        is_link_viable: link_margin > 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn textbook_scenario_closes_with_margin() {
        let r = calculate_link_budget(&LinkBudgetParameters::default());
        assert_eq!(r.eirp, 45.0);
        assert!(close(r.free_space_loss, 120.0442, 1e-4), "fspl {}", r.free_space_loss);
        assert!(close(r.received_power, -66.0442, 1e-4), "rx {}", r.received_power);
        assert!(close(r.link_margin, 18.9558, 1e-4), "margin {}", r.link_margin);
        assert!(r.is_link_viable);
    }

    #[test]
    fn fspl_adds_6db_per_distance_doubling() {
        let near = free_space_path_loss(5.0, 2400.0);
        let far = free_space_path_loss(10.0, 2400.0);
        assert!(close(far - near, 6.0206, 1e-3));
    }

    #[test]
    fn zero_margin_is_not_viable() {
        let mut params = LinkBudgetParameters {
            fade_margin: 0.0,
            ..Default::default()
        };
        params.receiver_sensitivity = calculate_link_budget(&params).received_power;
        let r = calculate_link_budget(&params);
        assert_eq!(r.link_margin, 0.0);
        assert!(!r.is_link_viable);
    }

    #[test]
    fn zero_distance_propagates_infinity() {
        let params = LinkBudgetParameters {
            distance: 0.0,
            ..Default::default()
        };
        let r = calculate_link_budget(&params);
        assert_eq!(r.free_space_loss, f64::NEG_INFINITY);
        assert_eq!(r.received_power, f64::INFINITY);
        assert_eq!(r.link_margin, f64::INFINITY);
        assert!(r.is_link_viable);
    }

    #[test]
    fn zero_frequency_and_distance_gives_infinite_margin() {
        let params = LinkBudgetParameters {
            distance: 0.0,
            frequency: 0.0,
            ..Default::default()
        };
        let r = calculate_link_budget(&params);
        assert_eq!(r.free_space_loss, f64::NEG_INFINITY);
        assert!(r.link_margin.is_infinite());
    }

    #[test]
    fn negative_distance_is_nan_and_not_viable() {
        let params = LinkBudgetParameters {
            distance: -1.0,
            ..Default::default()
        };
        let r = calculate_link_budget(&params);
        assert!(r.free_space_loss.is_nan());
        assert!(r.link_margin.is_nan());
        assert!(!r.is_link_viable);
    }

    #[test]
    fn values_follow_field_order() {
        let params = LinkBudgetParameters::default();
        assert_eq!(LinkBudgetParameters::from_values(&params.values()), params);
        assert_eq!(LinkBudgetParameters::from_values(&[1.0]).transmitter_gain, 0.0);
    }

    proptest! {
        #[test]
        fn viability_matches_margin_sign(
            tx in -50.0f64..80.0,
            dist in 0.001f64..1000.0,
            freq in 1.0f64..100_000.0,
            sens in -140.0f64..-30.0,
        ) {
            let params = LinkBudgetParameters {
                transmitter_power: tx,
                distance: dist,
                frequency: freq,
                receiver_sensitivity: sens,
                ..Default::default()
            };
            let first = calculate_link_budget(&params);
            let second = calculate_link_budget(&params);
            prop_assert_eq!(first.link_margin.to_bits(), second.link_margin.to_bits());
            prop_assert_eq!(first.is_link_viable, first.link_margin > 0.0);
        }
    }
}
