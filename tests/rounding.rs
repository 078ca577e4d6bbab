//! Testes de direção de arredondamento: saída do swap e raízes com floor,
//! amount_in com ceil, IL arredondado para cima.

use precision_amm::amm::fixed_point::{ceil_div_u256, div_wad_u256, sqrt};
use precision_amm::amm::impermanent_loss::calculate_impermanent_loss;
use precision_amm::amm::liquidity::calculate_lp_tokens;
use precision_amm::amm::ref_golden::{floor_to_u128, reference_impermanent_loss_bps};
use precision_amm::amm::swap::{calculate_amount_in, calculate_precise_slippage};
use precision_amm::amm::types::{Bps, SlippageParams, SqrtAlgorithm, BPS_SCALE, U256, WAD};

const FEE0: Bps = 0;
const FEE30: Bps = 30; // 0,30%

#[test]
fn r1_amount_out_is_floor_of_continuous_value() {
    let (x, y, dx) = (1_000_000u128 * WAD, 1_000_000u128 * WAD, 10_000u128 * WAD);
    let out = calculate_precise_slippage(SlippageParams::new(dx, x, y, FEE0)).unwrap();
    let n = U256::from(dx) * U256::from(y);
    let d = U256::from(x) + U256::from(dx);
    assert_eq!(U256::from(out), n / d);
    // resto não nulo ⇒ floor estrito
    assert!(!(n % d).is_zero());
    assert!(U256::from(out) * d < n);
}

#[test]
fn r2_amount_in_is_ceil_minimality() {
    let (x, y, dy) = (1_000_000u128 * WAD, 1_000_000u128 * WAD, 9_870u128 * WAD);
    let dx = calculate_amount_in(dy, x, y, FEE30).unwrap();
    let out_prev = calculate_precise_slippage(SlippageParams::new(dx - 1, x, y, FEE30)).unwrap();
    assert!(out_prev < dy);
    let out = calculate_precise_slippage(SlippageParams::new(dx, x, y, FEE30)).unwrap();
    assert!(out >= dy);
}

#[test]
fn r3_sqrt_is_floor() {
    for algo in SqrtAlgorithm::ALL {
        for v in [2 * WAD, 3 * WAD, WAD / 3, 10_000_000_007u128] {
            let s = sqrt(v, algo).unwrap();
            let target = U256::from(v) * U256::from(WAD);
            let s0 = U256::from(s);
            let s1 = s0 + U256::one();
            assert!(s0 * s0 <= target && s1 * s1 > target, "v={} {:?}", v, algo);
        }
    }
}

#[test]
fn r4_mint_is_floor_of_sqrt_xy() {
    let (x, y) = (2_500_000u128 * WAD + 7, 2_500_000u128 * WAD);
    for algo in SqrtAlgorithm::ALL {
        let s = calculate_lp_tokens(x, y, algo).unwrap();
        let k = U256::from(x) * U256::from(y);
        let s0 = U256::from(s);
        let s1 = U256::from(s + 1);
        assert!(s0 * s0 <= k);
        assert!(s1 * s1 > k);
    }
}

#[test]
fn r5_impermanent_loss_rounds_up() {
    // 2x: 571.9 bp; 3x: 1339.7 bp
    for (mult, want) in [(2u128, 572u32), (3, 1_340)] {
        let exact = reference_impermanent_loss_bps(WAD, mult * WAD);
        assert_eq!(floor_to_u128(&exact).unwrap() + 1, u128::from(want));
        for algo in SqrtAlgorithm::ALL {
            assert_eq!(calculate_impermanent_loss(WAD, mult * WAD, algo).unwrap(), want);
        }
    }
    // 0.25x é exato: 20%
    assert_eq!(calculate_impermanent_loss(WAD, WAD / 4, SqrtAlgorithm::NewtonRaphson).unwrap(), 2_000);
}

#[test]
fn r6_wad_helpers_floor_and_ceil() {
    assert_eq!(div_wad_u256(1, 3).unwrap(), U256::from(333_333_333_333_333_333u128));
    assert_eq!(div_wad_u256(2, 3).unwrap(), U256::from(666_666_666_666_666_666u128));
    assert!(div_wad_u256(1, 0).is_err());
    assert_eq!(ceil_div_u256(U256::from(10u8), U256::from(3u8)), U256::from(4u8));
    assert_eq!(ceil_div_u256(U256::from(9u8), U256::from(3u8)), U256::from(3u8));
}

#[test]
fn r7_full_fee_rounds_to_zero_output() {
    let out = calculate_precise_slippage(SlippageParams::new(WAD, WAD, WAD, BPS_SCALE)).unwrap();
    assert_eq!(out, 0);
}
