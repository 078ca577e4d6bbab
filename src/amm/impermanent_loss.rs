//! Estimador de impermanent loss para par de produto constante, em bps.
//!
//! ```text
//! r  = current / initial               (WAD, 256 bits)
//! IL = 1 - 2*sqrt(r) / (1 + r)
//! ```
//! A razão `2*sqrt(r)/(1+r)` sai com floor, então a perda sai arredondada para cima.

use crate::amm::error::Result;
use crate::amm::fixed_point::{div_wad_u256, sqrt_wad_u256_metered};
use crate::amm::ops::{NoMeter, Op, OpCount, OpMeter};
use crate::amm::types::{Bps, SqrtAlgorithm, Wad, BPS_SCALE, U256, WAD};

/// IL em bps, clampado em [0, 10000].
/// - `current == initial` ⇒ 0 (inclusive `0, 0`)
/// - `initial == 0` ⇒ 10000 (valor saturado para pool sem preço inicial)
pub fn calculate_impermanent_loss(initial_price: Wad, current_price: Wad, algorithm: SqrtAlgorithm) -> Result<Bps> {
    calculate_impermanent_loss_metered(initial_price, current_price, algorithm, &mut NoMeter)
}

pub fn calculate_impermanent_loss_metered<M: OpMeter>(
    initial_price: Wad,
    current_price: Wad,
    algorithm: SqrtAlgorithm,
    meter: &mut M,
) -> Result<Bps> {
    meter.record(Op::Cmp, 2);
    if current_price == initial_price {
        return Ok(0);
    }
    if initial_price == 0 {
        return Ok(BPS_SCALE);
    }
    let wad = U256::from(WAD);
    // r <= u128::MAX * 1e18 < 2^188; r * 1e18 < 2^248
    let ratio = div_wad_u256(current_price, initial_price)?;
    meter.record(Op::Mul, 1);
    meter.record(Op::Div, 1);
    let root = sqrt_wad_u256_metered(ratio, algorithm, meter)?;
    let held_share = (root << 1) * U256::from(BPS_SCALE) / (wad + ratio);
    meter.record(Op::Shift, 1);
    meter.record(Op::Mul, 1);
    meter.record(Op::Add, 1);
    meter.record(Op::Div, 1);
    let held_share = held_share.min(U256::from(BPS_SCALE)).as_u32();
    Ok(BPS_SCALE - held_share)
}

pub fn calculate_impermanent_loss_profiled(
    initial_price: Wad,
    current_price: Wad,
    algorithm: SqrtAlgorithm,
) -> Result<(Bps, OpCount)> {
    let mut count = OpCount::default();
    let il = calculate_impermanent_loss_metered(initial_price, current_price, algorithm, &mut count)?;
    Ok((il, count))
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_zero_point() {
        for algo in SqrtAlgorithm::ALL {
            for p in [0u128, 1, WAD, 1_234 * WAD, u128::MAX] {
                assert_eq!(calculate_impermanent_loss(p, p, algo).unwrap(), 0, "p={}", p);
            }
        }
    }

    #[test]
    fn t_known_values() {
        // 2x ⇒ 5.72%; 4x ⇒ 20% (exato); 5x ⇒ 25.464% arredondado para cima
        for algo in SqrtAlgorithm::ALL {
            assert_eq!(calculate_impermanent_loss(WAD, 2 * WAD, algo).unwrap(), 572);
            assert_eq!(calculate_impermanent_loss(WAD, 4 * WAD, algo).unwrap(), 2_000);
            assert_eq!(calculate_impermanent_loss(WAD, 5 * WAD, algo).unwrap(), 2_547);
        }
    }

    #[test]
    fn t_symmetry_under_inversion() {
        for algo in SqrtAlgorithm::ALL {
            let up = calculate_impermanent_loss(WAD, 2 * WAD, algo).unwrap();
            let down = calculate_impermanent_loss(WAD, WAD / 2, algo).unwrap();
            assert!(up.abs_diff(down) <= 1, "up={} down={}", up, down);
        }
    }

    #[test]
    fn t_degenerate_prices() {
        for algo in SqrtAlgorithm::ALL {
            assert_eq!(calculate_impermanent_loss(0, WAD, algo).unwrap(), BPS_SCALE);
            assert_eq!(calculate_impermanent_loss(WAD, 0, algo).unwrap(), BPS_SCALE);
            let il = calculate_impermanent_loss(1, u128::MAX, algo).unwrap();
            assert!(il <= BPS_SCALE && il > 9_990);
        }
    }

    #[test]
    fn t_profiled_counts_sqrt_work() {
        let (il, c) = calculate_impermanent_loss_profiled(WAD, 2 * WAD, SqrtAlgorithm::Babylonian).unwrap();
        assert_eq!(il, 572);
        assert!(c.iterations > 0);
        let (_, c0) = calculate_impermanent_loss_profiled(WAD, WAD, SqrtAlgorithm::Babylonian).unwrap();
        assert_eq!(c0.iterations, 0);
    }
}
