//! Mic attenuation while playback is audible.

use crate::models::error::DuplexError;
use crate::models::frame::BYTES_PER_SAMPLE;

/// Denominator of a `FixedGain`: gains resolve to 1/10000.
pub const GAIN_SCALE: i32 = 10_000;

/// Linear gain in fixed point, `GAIN_SCALE` units per 1.0.
///
/// Samples are scaled with integer arithmetic so the result is exactly
/// `round(sample * gain)` (halves away from zero) for every i16 input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedGain(i32);

impl FixedGain {
    pub const UNITY: Self = Self(GAIN_SCALE);

    /// Quantize a linear gain in `0.0..=1.0`.
    pub fn from_linear(gain: f32) -> Result<Self, DuplexError> {
        if !gain.is_finite() || !(0.0..=1.0).contains(&gain) {
            return Err(DuplexError::ConfigurationFailed(format!(
                "ducking gain out of range: {}",
                gain
            )));
        }
        Ok(Self((gain as f64 * GAIN_SCALE as f64).round() as i32))
    }

    /// Gain in `GAIN_SCALE` units.
    pub fn units(self) -> i32 {
        self.0
    }

    pub fn apply(self, sample: i16) -> i16 {
        let product = sample as i32 * self.0;
        let half = GAIN_SCALE / 2;
        let rounded = if product >= 0 {
            (product + half) / GAIN_SCALE
        } else {
            (product - half) / GAIN_SCALE
        };
        rounded.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }
}

/// Scale every 16-bit LE sample of `input` by `gain`.
///
/// Fails on a block that is not a whole number of samples.
pub fn attenuate(input: &[u8], gain: FixedGain) -> Result<Vec<u8>, DuplexError> {
    if input.len() % BYTES_PER_SAMPLE != 0 {
        return Err(DuplexError::InvalidFrame(format!(
            "odd byte length {} for 16-bit samples",
            input.len()
        )));
    }

    let mut output = Vec::with_capacity(input.len());
    for pair in input.chunks_exact(BYTES_PER_SAMPLE) {
        let sample = i16::from_le_bytes([pair[0], pair[1]]);
        output.extend_from_slice(&gain.apply(sample).to_le_bytes());
    }
    Ok(output)
}

/// Outcome of running one captured block through the ducking stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ducked {
    /// Ducking was off; the block is unchanged.
    Passthrough(Vec<u8>),
    /// The block was attenuated.
    Attenuated(Vec<u8>),
    /// Attenuation failed; the block is unchanged.
    Fallback(Vec<u8>),
}

impl Ducked {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Passthrough(bytes) | Self::Attenuated(bytes) | Self::Fallback(bytes) => bytes,
        }
    }
}

/// Apply the ducking decision to one captured block.
///
/// Never fails and never drops the block.
pub fn duck_block(input: &[u8], ducking: bool, gain: FixedGain) -> Ducked {
    if !ducking {
        return Ducked::Passthrough(input.to_vec());
    }
    match attenuate(input, gain) {
        Ok(bytes) => Ducked::Attenuated(bytes),
        Err(_) => Ducked::Fallback(input.to_vec()),
    }
}
