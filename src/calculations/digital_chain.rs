//! Bit-rate chain of a digital transmitter.
//!
//! sampler → quantizer → source encoder → channel encoder → interleaver → burst formatter
//!
//! Rates are in bit/s. The interleaver only reorders bits, so its rate equals
//! the channel encoder's. The burst formatter adds 8.25 bits of guard/tail
//! overhead per burst. `sourceBitRate` and `interleaverDepth` are recorded with
//! the inputs but no stage uses them.

use super::{FieldSpec, FieldValue};

/// Guard and tail bits appended to every burst.
const BURST_OVERHEAD_BITS: f64 = 8.25;

pub const PARAMETER_FIELDS: [FieldSpec; 7] = [
    FieldSpec::new("sourceBitRate", "Source bit rate", "bit/s"),
    FieldSpec::new("samplingRate", "Sampling rate", "Hz"),
    FieldSpec::new("quantizationBits", "Quantization bits", "bits"),
    FieldSpec::new("sourceEncodingRatio", "Source encoding ratio", ""),
    FieldSpec::new("channelEncodingRatio", "Channel coding rate", ""),
    FieldSpec::new("interleaverDepth", "Interleaver depth", ""),
    FieldSpec::new("burstLength", "Burst length", "bits"),
];

pub const RESULT_FIELDS: [FieldSpec; 6] = [
    FieldSpec::new("samplerRate", "Sampler output", "bit/s"),
    FieldSpec::new("quantizerRate", "Quantizer output", "bit/s"),
    FieldSpec::new("sourceEncoderRate", "Source encoder output", "bit/s"),
    FieldSpec::new("channelEncoderRate", "Channel encoder output", "bit/s"),
    FieldSpec::new("interleaverRate", "Interleaver output", "bit/s"),
    FieldSpec::new("burstFormatterRate", "Burst formatter output", "bit/s"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitalChainParameters {
    /// Recorded for reference; not used by any stage.
    pub source_bit_rate: f64,
    pub sampling_rate: f64,
    pub quantization_bits: f64,
    /// Output/input ratio of the source coder (compression when < 1).
    pub source_encoding_ratio: f64,
    /// Code rate k/n of the channel coder.
    pub channel_encoding_ratio: f64,
    /// Recorded for reference; not used by any stage.
    pub interleaver_depth: f64,
    pub burst_length: f64,
}

impl Default for DigitalChainParameters {
    fn default() -> Self {
        Self {
            source_bit_rate: 64000.0,
            sampling_rate: 8000.0,
            quantization_bits: 8.0,
            source_encoding_ratio: 0.5,
            channel_encoding_ratio: 0.75,
            interleaver_depth: 4.0,
            burst_length: 148.0,
        }
    }
}

impl DigitalChainParameters {
    pub fn from_values(values: &[f64]) -> Self {
        let v = |i: usize| values.get(i).copied().unwrap_or(0.0);
        Self {
            source_bit_rate: v(0),
            sampling_rate: v(1),
            quantization_bits: v(2),
            source_encoding_ratio: v(3),
            channel_encoding_ratio: v(4),
            interleaver_depth: v(5),
            burst_length: v(6),
        }
    }

    pub fn values(&self) -> [f64; 7] {
        [
            self.source_bit_rate,
            self.sampling_rate,
            self.quantization_bits,
            self.source_encoding_ratio,
            self.channel_encoding_ratio,
            self.interleaver_depth,
            self.burst_length,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitalChainResults {
    pub sampler_rate: f64,
    pub quantizer_rate: f64,
    pub source_encoder_rate: f64,
    pub channel_encoder_rate: f64,
    pub interleaver_rate: f64,
    pub burst_formatter_rate: f64,
}

impl DigitalChainResults {
    pub fn values(&self) -> [FieldValue; 6] {
        [
            FieldValue::Number(self.sampler_rate),
            FieldValue::Number(self.quantizer_rate),
            FieldValue::Number(self.source_encoder_rate),
            FieldValue::Number(self.channel_encoder_rate),
            FieldValue::Number(self.interleaver_rate),
            FieldValue::Number(self.burst_formatter_rate),
        ]
    }
}

/// Propagate the bit rate through every stage of the chain.
///
/// ```text
/// R_sample  = f_s × bits
/// R_quant   = R_sample
/// R_source  = R_quant × ratio_source
/// R_channel = R_source / ratio_channel
/// R_inter   = R_channel
/// R_burst   = R_inter × L / (L + 8.25)
/// ```
pub fn calculate_digital_chain(params: &DigitalChainParameters) -> DigitalChainResults {
    let sampler_rate = params.sampling_rate * params.quantization_bits;
    let quantizer_rate = sampler_rate;
    let source_encoder_rate = quantizer_rate * params.source_encoding_ratio;
    let channel_encoder_rate = source_encoder_rate / params.channel_encoding_ratio;
    let interleaver_rate = channel_encoder_rate;
    let burst_formatter_rate = interleaver_rate * (params.burst_length / (params.burst_length + BURST_OVERHEAD_BITS));

    DigitalChainResults {
        sampler_rate,
        quantizer_rate,
        source_encoder_rate,
        channel_encoder_rate,
        interleaver_rate,
        burst_formatter_rate,
    }
}
