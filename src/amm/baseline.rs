//! Matemática do pool "baseline": só `u128` nativo, sem largura dupla nem reescala.
//! Serve de linha de base para o harness medir o ganho de precisão do motor.

use crate::amm::error::Result;
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::error_map::{from_slippage_params, to_swap_error};
use crate::amm::ops::{NoMeter, Op, OpMeter};
use crate::amm::types::{SlippageParams, Wad, BPS_SCALE};
use crate::amm_err;

/// `sqrt(WAD)` cru: fator que o baseline aplica depois da raiz.
pub const HALF_WAD: Wad = 1_000_000_000;

/// Babilônico clássico com semente `y/2 + 1`, sobre o valor cru.
pub fn baseline_isqrt(y: u128) -> u128 {
    baseline_isqrt_metered(y, &mut NoMeter)
}

pub fn baseline_isqrt_metered<M: OpMeter>(y: u128, meter: &mut M) -> u128 {
    meter.record(Op::Cmp, 1);
    if y < 4 {
        return if y == 0 { 0 } else { 1 };
    }
    let mut z = y;
    let mut x = y / 2 + 1;
    meter.record(Op::Div, 1);
    meter.record(Op::Add, 1);
    while x < z {
        meter.iteration();
        z = x;
        x = (y / x + x) / 2;
        meter.record(Op::Div, 2);
        meter.record(Op::Add, 1);
        meter.record(Op::Cmp, 1);
    }
    z
}

/// Raiz "ingênua" de um WAD: `isqrt(value) * 1e9`. Perde metade das casas decimais.
pub fn baseline_sqrt<M: OpMeter>(value: Wad, meter: &mut M) -> Result<Wad> {
    let root = baseline_isqrt_metered(value, meter);
    meter.record(Op::Mul, 1);
    root.checked_mul(HALF_WAD)
        .ok_or_else(|| amm_err!(AmmErrorCode::OverflowNumeric, op => "baseline_sqrt", value => value))
}

/// LP inicial com produto em `u128`; estoura quando `a*b >= 2^128`.
pub fn baseline_lp_tokens<M: OpMeter>(amount0: Wad, amount1: Wad, meter: &mut M) -> Result<Wad> {
    meter.record(Op::Mul, 1);
    let k = amount0.checked_mul(amount1).ok_or_else(|| {
        amm_err!(AmmErrorCode::OverflowNumeric, op => "baseline_lp", amount0 => amount0, amount1 => amount1)
    })?;
    Ok(baseline_isqrt_metered(k, meter))
}

/// Mesma fórmula de [`crate::amm::swap::calculate_precise_slippage`], em `u128` checado.
pub fn baseline_amount_out(params: SlippageParams) -> Result<Wad> {
    baseline_amount_out_metered(params, &mut NoMeter)
}

pub fn baseline_amount_out_metered<M: OpMeter>(params: SlippageParams, meter: &mut M) -> Result<Wad> {
    meter.record(Op::Cmp, 4);
    if let Some(code) = from_slippage_params(&params) {
        if code != AmmErrorCode::OverflowNumeric {
            return Err(to_swap_error(code, &params));
        }
    }
    let overflow = || to_swap_error(AmmErrorCode::OverflowNumeric, &params);
    let in_with_fee = params
        .amount_in
        .checked_mul(u128::from(BPS_SCALE - params.fee_bps))
        .ok_or_else(overflow)?;
    let numerator = in_with_fee.checked_mul(params.reserve_out).ok_or_else(overflow)?;
    let denominator = params
        .reserve_in
        .checked_mul(u128::from(BPS_SCALE))
        .and_then(|d| d.checked_add(in_with_fee))
        .ok_or_else(overflow)?;
    meter.record(Op::Mul, 3);
    meter.record(Op::Add, 1);
    meter.record(Op::Div, 1);
    Ok(numerator / denominator)
}
