//! Dequantization table construction.
//!
//! The table factors the quantizer into an exponential scale factor axis and
//! a per-width shape vector of bin centers. Consecutive column pairs hold
//! `(+v, -v)`, so the least significant bit of a residual code selects the
//! sign and the upper bits the magnitude.
//!
//! Construction is single-precision throughout. Every intermediate value is
//! an IEEE-754 binary32; widening any step to binary64 perturbs entries and
//! diverges the decoded PCM from other decoders.

use crate::utils::errors::ChunkError;

/// Tuned quantizer exponents, indexed by `residual_bits - 1`.
const IDEAL_POW_FACTOR: [f32; 8] = [12.0, 11.65, 11.20, 10.58, 9.64, 8.75, 7.66, 6.63];

/// Signed dequantization values for one `(scale_factor_bits, residual_bits)`
/// pair: `2^scale_factor_bits` rows of `2^residual_bits` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DequantTable {
    scale_factor_bits: u8,
    residual_bits: u8,
    row_len: usize,
    table: Vec<i32>,
}

impl DequantTable {
    pub fn new(scale_factor_bits: u8, residual_bits: u8) -> Result<Self, ChunkError> {
        if !(1..=8).contains(&scale_factor_bits) {
            return Err(ChunkError::InvalidScaleFactorBits {
                read: scale_factor_bits,
            });
        }
        if !(1..=8).contains(&residual_bits) {
            return Err(ChunkError::InvalidResidualBits { read: residual_bits });
        }

        let scale_items = 1usize << scale_factor_bits;
        let dqt_len = 1usize << (residual_bits - 1);

        let power_factor =
            IDEAL_POW_FACTOR[usize::from(residual_bits - 1)] / f32::from(scale_factor_bits);
        let scale_factors: Vec<i32> = (0..scale_items)
            .map(|i| ((i + 1) as f32).powf(power_factor) as i32)
            .collect();

        let shape = quantizer_shape(residual_bits, dqt_len);

        let mut table = Vec::with_capacity(scale_items * dqt_len * 2);
        for &scale in &scale_factors {
            for &center in &shape {
                let value = (scale as f32 * center).round() as i32;
                table.push(value);
                table.push(-value);
            }
        }

        Ok(Self {
            scale_factor_bits,
            residual_bits,
            row_len: dqt_len * 2,
            table,
        })
    }

    /// Whether this table was built for the given quantizer parameters.
    pub fn matches(&self, scale_factor_bits: u8, residual_bits: u8) -> bool {
        self.scale_factor_bits == scale_factor_bits && self.residual_bits == residual_bits
    }

    /// Dequantized value for a scale factor row and residual code column.
    ///
    /// Always in bounds: a `scale_factor_bits`-wide value selects one of the
    /// `2^scale_factor_bits` rows and a `residual_bits`-wide code one of the
    /// `2^residual_bits` columns.
    #[inline]
    pub fn lookup(&self, scale_factor: u8, code: u8) -> i32 {
        self.table[usize::from(scale_factor) * self.row_len + usize::from(code)]
    }
}

/// Quantizer bin centers for one residual width.
fn quantizer_shape(residual_bits: u8, dqt_len: usize) -> Vec<f32> {
    match residual_bits {
        1 => vec![2.0],
        2 => vec![1.115, 4.0],
        _ => {
            let start = 0.75f32;
            let end = ((1u32 << residual_bits) - 1) as f32;
            let step = ((end - start) / (dqt_len - 1) as f32).floor();

            let mut shape = vec![0.0f32; dqt_len];
            shape[0] = start;
            for (i, center) in shape.iter_mut().enumerate().take(dqt_len - 1).skip(1) {
                *center = 0.5 + i as f32 * step;
            }
            shape[dqt_len - 1] = end;
            shape
        }
    }
}
