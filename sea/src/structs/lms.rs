//! Sign-sign LMS predictor state.
//!
//! Each channel carries a four-tap adaptive linear filter. The encoder
//! serializes the filter state at the start of every chunk, so prediction is
//! deterministic from the chunk boundary regardless of what came before.

use crate::utils::bitstream_io::ByteCursor;
use crate::utils::errors::BitstreamError;

/// Number of filter taps.
pub const LMS_ORDER: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LmsState {
    pub history: [i32; LMS_ORDER],
    pub weights: [i32; LMS_ORDER],
}

impl LmsState {
    /// Seeds predictor state from a chunk subheader block: four history taps
    /// followed by four weights, each a little-endian i16.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, BitstreamError> {
        let mut state = Self::default();
        for tap in &mut state.history {
            *tap = i32::from(cursor.read_i16_le()?);
        }
        for weight in &mut state.weights {
            *weight = i32::from(cursor.read_i16_le()?);
        }
        Ok(state)
    }

    /// Predicted next sample: the weighted history sum scaled down by 2^13.
    ///
    /// Products and the running sum wrap in 32 bits; the final shift is
    /// arithmetic.
    #[inline]
    pub fn predict(&self) -> i32 {
        let mut prediction = 0i32;
        for (weight, tap) in self.weights.iter().zip(&self.history) {
            prediction = prediction.wrapping_add(weight.wrapping_mul(*tap));
        }
        prediction >> 13
    }

    /// Nudges every weight by `residual >> 4` toward the sign of its history
    /// tap, then shifts the reconstructed sample into the history.
    #[inline]
    pub fn update(&mut self, sample: i16, residual: i32) {
        let delta = residual >> 4;
        for (weight, tap) in self.weights.iter_mut().zip(&self.history) {
            *weight = if *tap < 0 {
                weight.wrapping_sub(delta)
            } else {
                weight.wrapping_add(delta)
            };
        }

        self.history.copy_within(1.., 0);
        self.history[LMS_ORDER - 1] = i32::from(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_seeds_history_then_weights() {
        let mut bytes = Vec::new();
        for value in [1i16, -2, 3, -32768, 100, 200, -300, 32767] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        let mut cursor = ByteCursor::new(&bytes);
        let state = LmsState::read(&mut cursor).unwrap();

        assert_eq!(state.history, [1, -2, 3, -32768]);
        assert_eq!(state.weights, [100, 200, -300, 32767]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn read_rejects_short_seed() {
        let bytes = [0u8; 15];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(LmsState::read(&mut cursor).is_err());
    }

    #[test]
    fn predict_applies_arithmetic_shift() {
        let state = LmsState {
            history: [4, 0, 0, 0],
            weights: [8192, 0, 0, 0],
        };
        assert_eq!(state.predict(), 4);

        let state = LmsState {
            history: [4, 0, 0, 0],
            weights: [-8192, 0, 0, 0],
        };
        assert_eq!(state.predict(), -4);

        // A small negative sum still shifts toward negative infinity.
        let state = LmsState {
            history: [1, 0, 0, 0],
            weights: [-1, 0, 0, 0],
        };
        assert_eq!(state.predict(), -1);
    }

    #[test]
    fn update_moves_weights_with_history_signs() {
        let mut state = LmsState {
            history: [1, -1, 2, -2],
            weights: [0; LMS_ORDER],
        };

        state.update(100, 32);

        // delta = 32 >> 4 = 2, added where the tap was non-negative and
        // subtracted where it was negative.
        assert_eq!(state.weights, [2, -2, 2, -2]);
        assert_eq!(state.history, [-1, 2, -2, 100]);
    }

    #[test]
    fn update_shifts_negative_residuals_arithmetically() {
        let mut state = LmsState {
            history: [-5, 5, 0, 0],
            weights: [0; LMS_ORDER],
        };

        // delta = -1 >> 4 = -1, not 0.
        state.update(-7, -1);

        assert_eq!(state.weights, [1, -1, -1, -1]);
        assert_eq!(state.history, [5, 0, 0, -7]);
    }

    #[test]
    fn newest_history_tap_is_the_sample() {
        let mut state = LmsState::default();
        state.update(1234, 0);
        assert_eq!(state.history, [0, 0, 0, 1234]);
        state.update(-4321, 0);
        assert_eq!(state.history, [0, 0, 1234, -4321]);
    }
}
