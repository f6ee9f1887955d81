//! Mapping of signed distances to 8 or 16 bit texture samples, and back.

use crate::{Error, Result};

/// Smallest and largest signed distance of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceRange {
    /// Smallest distance.
    pub min: f32,
    /// Largest distance.
    pub max: f32,
}

/// Size of a texture sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BitDepth {
    /// One byte per sample.
    #[default]
    U8,
    /// Two little-endian bytes per sample.
    U16,
}

impl BitDepth {
    /// Largest sample value.
    pub const fn scale(self) -> u32 {
        match self {
            Self::U8 => u8::MAX as u32,
            Self::U16 => u16::MAX as u32,
        }
    }

    /// Number of bytes of a sample.
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
        }
    }

    /// Name of the sample format: `"u8"` or `"u16"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
        }
    }
}

/// How distances are mapped to `[0, 1]` before quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Normalization {
    /// `(value - min) / (max - min)`.
    #[default]
    Linear,
    /// Logarithmic on each side of the surface, which sits at `0.5`.
    /// Samples close to the surface get more precision than far away ones.
    ///
    /// - negative values: `0.5 - 0.5 * ln(1 - value) / ln(1 - min)`
    /// - positive values: `0.5 + 0.5 * ln(1 + value) / ln(1 + max)`
    Logarithmic,
}

/// Quantize a field to texture samples.
///
/// Negative values are rounded down and positive values up,
/// so the sign of the surface is kept by the rounding.
/// 16 bit samples are stored little-endian.
///
/// Fails if the range is empty or not finite.
pub fn quantize(
    field: &[f32],
    range: DistanceRange,
    bits: BitDepth,
    normalization: Normalization,
) -> Result<Vec<u8>> {
    if !range.min.is_finite() || !range.max.is_finite() || range.max <= range.min {
        return Err(Error::FlatField { value: range.min });
    }

    let scale = bits.scale() as f32;
    let mut data = Vec::with_capacity(field.len() * bits.bytes());
    for &value in field {
        let scaled = normalize(value, range, normalization) * scale;
        let rounded = if value < 0.0 {
            scaled.floor()
        } else {
            scaled.ceil()
        };
        let sample = rounded.clamp(0.0, scale) as u32;
        match bits {
            BitDepth::U8 => data.push(sample as u8),
            BitDepth::U16 => data.extend_from_slice(&(sample as u16).to_le_bytes()),
        }
    }
    Ok(data)
}

/// Get back the distance of a quantized sample.
pub fn dequantize(
    sample: u32,
    range: DistanceRange,
    bits: BitDepth,
    normalization: Normalization,
) -> f32 {
    let normalized = sample as f32 / bits.scale() as f32;
    match normalization {
        Normalization::Linear => normalized * (range.max - range.min) + range.min,
        Normalization::Logarithmic => {
            if normalized < 0.5 {
                let log_min = (-range.min).ln_1p();
                if log_min <= 0.0 {
                    return 0.0;
                }
                -((0.5 - normalized) * 2.0 * log_min).exp_m1()
            } else {
                let log_max = range.max.ln_1p();
                if log_max <= 0.0 {
                    return 0.0;
                }
                ((normalized - 0.5) * 2.0 * log_max).exp_m1()
            }
        }
    }
}

/// Map a distance to `[0, 1]`.
pub fn normalize(value: f32, range: DistanceRange, normalization: Normalization) -> f32 {
    match normalization {
        Normalization::Linear => (value - range.min) / (range.max - range.min),
        Normalization::Logarithmic => {
            if value < 0.0 {
                let log_min = (-range.min).ln_1p();
                if log_min <= 0.0 {
                    return 0.5;
                }
                0.5 - 0.5 * (-value).ln_1p() / log_min
            } else {
                let log_max = range.max.ln_1p();
                if log_max <= 0.0 {
                    return 0.5;
                }
                0.5 + 0.5 * value.ln_1p() / log_max
            }
        }
    }
}

/// Read the sample `index` of quantized data.
pub fn read_sample(data: &[u8], index: usize, bits: BitDepth) -> u32 {
    match bits {
        BitDepth::U8 => u32::from(data[index]),
        BitDepth::U16 => u32::from(u16::from_le_bytes([data[2 * index], data[2 * index + 1]])),
    }
}
