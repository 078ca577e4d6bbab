//! Funções puras de swap (CPMM x·y=k) com taxa em bps sobre o input.
//! - calculate_precise_slippage: saída X→Y, floor
//! - calculate_amount_in: menor input bruto que entrega ao menos `amount_out` (ceil exato)
//! - price_impact_bps: perda da execução contra o preço spot

use crate::amm::error::Result;
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::error_map::{from_slippage_params, to_swap_error};
use crate::amm::fixed_point::ceil_div_u256;
use crate::amm::guardrails::{checked_mul_u256, ensure_fee_bps, ensure_reserves, u256_to_u128_checked};
use crate::amm::ops::{NoMeter, Op, OpCount, OpMeter};
use crate::amm::types::{Bps, SlippageParams, Wad, BPS_SCALE, U256};
use crate::amm_err;

/// Saída do swap:
/// ```text
/// in_fee = amount_in * (10000 - fee_bps)
/// out    = floor(in_fee * reserve_out / (reserve_in * 10000 + in_fee))
/// ```
/// `fee_bps == 10000` ⇒ 0 (denominador segue `reserve_in * 10000`).
/// Sempre `out < reserve_out`.
pub fn calculate_precise_slippage(params: SlippageParams) -> Result<Wad> {
    calculate_precise_slippage_metered(params, &mut NoMeter)
}

pub fn calculate_precise_slippage_metered<M: OpMeter>(params: SlippageParams, meter: &mut M) -> Result<Wad> {
    meter.record(Op::Cmp, 4);
    if let Some(code) = from_slippage_params(&params) {
        let err = to_swap_error(code, &params);
        tracing::debug!(target: "precision_amm::swap", error = %err.to_log_json(), "swap rejeitado");
        return Err(err);
    }
    let in_with_fee = U256::from(params.amount_in) * U256::from(BPS_SCALE - params.fee_bps);
    // largura já validada em from_slippage_params
    let numerator = in_with_fee * U256::from(params.reserve_out);
    let denominator = U256::from(params.reserve_in) * U256::from(BPS_SCALE) + in_with_fee;
    meter.record(Op::Mul, 3);
    meter.record(Op::Add, 2);
    meter.record(Op::Div, 1);
    u256_to_u128_checked(numerator / denominator)
}

pub fn calculate_precise_slippage_profiled(params: SlippageParams) -> Result<(Wad, OpCount)> {
    let mut count = OpCount::default();
    let out = calculate_precise_slippage_metered(params, &mut count)?;
    Ok((out, count))
}

/// Menor `amount_in` com `calculate_precise_slippage(amount_in) >= amount_out`.
///
/// Como `floor(q) >= A` ⇔ `q >= A` para `A` inteiro, o mínimo é exatamente
/// `ceil(A * R_in * 10000 / ((10000 - fee) * (R_out - A)))`.
pub fn calculate_amount_in(amount_out: Wad, reserve_in: Wad, reserve_out: Wad, fee_bps: Bps) -> Result<Wad> {
    ensure_fee_bps(fee_bps)?;
    if fee_bps == BPS_SCALE {
        // nenhuma entrada produz saída com taxa de 100%
        return Err(amm_err!(AmmErrorCode::InvalidFeeBps, fee_bps => fee_bps));
    }
    ensure_reserves(reserve_in, reserve_out)?;
    if amount_out == 0 {
        return Ok(0);
    }
    if amount_out >= reserve_out {
        return Err(amm_err!(
            AmmErrorCode::InsufficientLiquidity,
            amount_out => amount_out,
            reserve_out => reserve_out,
        ));
    }
    let numerator = checked_mul_u256(
        U256::from(amount_out) * U256::from(reserve_in),
        U256::from(BPS_SCALE),
    )?;
    let denominator = U256::from(BPS_SCALE - fee_bps) * U256::from(reserve_out - amount_out);
    u256_to_u128_checked(ceil_div_u256(numerator, denominator))
}

/// Impacto em bps: `10000 - floor(out * 10000 / ideal)`, onde
/// `ideal = amount_in * R_out / R_in` é a saída com liquidez infinita e sem taxa.
/// Inclui o efeito da taxa; a parcela entregue sai com floor, o impacto com ceil.
///
/// `ideal` pode chegar perto de 2^256, mas `out < 2^128` e `out <= ideal`,
/// então `out * 10000` nunca estoura.
pub fn price_impact_bps(params: SlippageParams) -> Result<Bps> {
    let out = calculate_precise_slippage(params)?;
    let ideal = U256::from(params.amount_in) * U256::from(params.reserve_out) / U256::from(params.reserve_in);
    if ideal.is_zero() {
        return Ok(0);
    }
    let kept = (U256::from(out) * U256::from(BPS_SCALE) / ideal).min(U256::from(BPS_SCALE));
    Ok(BPS_SCALE - kept.as_u32())
}
