//! Sentence pooling over BERT token states.

use candle_core::{Tensor, D};

use crate::config::PoolingStrategy;

impl PoolingStrategy {
    /// `states` is `(batch, seq, hidden)`, `mask` is `(batch, seq)` as f32.
    /// Returns `(batch, hidden)`.
    pub fn pool(&self, states: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            PoolingStrategy::Mean => {
                let weights = mask.unsqueeze(D::Minus1)?;
                let summed = states.broadcast_mul(&weights)?.sum(1)?;
                let counts = weights.sum(1)?.clamp(1e-9f32, f32::MAX)?;
                summed.broadcast_div(&counts)
            }
            PoolingStrategy::Cls => states.narrow(1, 0, 1)?.squeeze(1),
            PoolingStrategy::Max => {
                // padding positions pushed far below any real activation
                let penalty = ((mask.unsqueeze(D::Minus1)? - 1.0)? * 1e9)?;
                states.broadcast_add(&penalty)?.max(1)
            }
        }
    }
}

/// Row-wise L2 normalisation of a `(batch, hidden)` tensor.
pub fn normalize_rows(pooled: &Tensor) -> candle_core::Result<Tensor> {
    let norms = pooled.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-9f32, f32::MAX)?;
    pooled.broadcast_div(&norms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn fixture() -> (Tensor, Tensor) {
        let device = Device::Cpu;
        // two sequences of three 2-d token states; the second ends in padding
        let states = Tensor::from_vec(
            vec![
                1.0f32, 4.0,  3.0, 2.0,  5.0, 0.0,
                2.0, 2.0,  4.0, 6.0,  100.0, 100.0,
            ],
            (2, 3, 2),
            &device,
        )
        .unwrap();
        let mask = Tensor::from_vec(vec![1.0f32, 1.0, 1.0, 1.0, 1.0, 0.0], (2, 3), &device).unwrap();
        (states, mask)
    }

    #[test]
    fn test_mean_ignores_padding() {
        let (states, mask) = fixture();
        let rows = PoolingStrategy::Mean.pool(&states, &mask).unwrap().to_vec2::<f32>().unwrap();
        assert!((rows[0][0] - 3.0).abs() < 1e-5);
        assert!((rows[0][1] - 2.0).abs() < 1e-5);
        assert!((rows[1][0] - 3.0).abs() < 1e-5);
        assert!((rows[1][1] - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_cls_takes_first_token() {
        let (states, mask) = fixture();
        let rows = PoolingStrategy::Cls.pool(&states, &mask).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(rows, vec![vec![1.0, 4.0], vec![2.0, 2.0]]);
    }

    #[test]
    fn test_max_ignores_padding() {
        let (states, mask) = fixture();
        let rows = PoolingStrategy::Max.pool(&states, &mask).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(rows[0], vec![5.0, 4.0]);
        assert_eq!(rows[1], vec![4.0, 6.0]);
    }

    #[test]
    fn test_rows_unit_length() {
        let pooled = Tensor::from_vec(vec![3.0f32, 4.0, 0.0, 2.0], (2, 2), &Device::Cpu).unwrap();
        let rows = normalize_rows(&pooled).unwrap().to_vec2::<f32>().unwrap();
        assert!((rows[0][0] - 0.6).abs() < 1e-5);
        assert!((rows[1][1] - 1.0).abs() < 1e-5);
    }
}
