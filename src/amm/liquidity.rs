//! Mint inicial de LP: média geométrica dos depósitos.
//! Política: **floor** (nunca mintar a mais).
//!
//! `lp = isqrt(a * b)` sobre o produto em 256 bits. Equivale à raiz em ponto
//! fixo do produto em ponto fixo (`a*b/WAD`, reescalado por `WAD`) sem a
//! truncagem intermediária. Mint proporcional em pool existente é lógica de pool.

use crate::amm::error::Result;
use crate::amm::fixed_point::isqrt_u256_metered;
use crate::amm::guardrails::{mul_u128_to_u256, u256_to_u128_checked};
use crate::amm::ops::{NoMeter, Op, OpCount, OpMeter};
use crate::amm::types::{SqrtAlgorithm, Wad};

/// `floor(sqrt(amount0 * amount1))`. Depósito zerado ⇒ 0 LP (quem rejeita é o pool).
pub fn calculate_lp_tokens(amount0: Wad, amount1: Wad, algorithm: SqrtAlgorithm) -> Result<Wad> {
    calculate_lp_tokens_metered(amount0, amount1, algorithm, &mut NoMeter)
}

pub fn calculate_lp_tokens_metered<M: OpMeter>(
    amount0: Wad,
    amount1: Wad,
    algorithm: SqrtAlgorithm,
    meter: &mut M,
) -> Result<Wad> {
    if amount0 == 0 || amount1 == 0 {
        return Ok(0);
    }
    let k = mul_u128_to_u256(amount0, amount1);
    meter.record(Op::Mul, 1);
    let root = isqrt_u256_metered(k, algorithm, meter)?;
    // a, b < 2^128 ⇒ sqrt(a*b) < 2^128
    u256_to_u128_checked(root)
}

pub fn calculate_lp_tokens_profiled(amount0: Wad, amount1: Wad, algorithm: SqrtAlgorithm) -> Result<(Wad, OpCount)> {
    let mut count = OpCount::default();
    let lp = calculate_lp_tokens_metered(amount0, amount1, algorithm, &mut count)?;
    Ok((lp, count))
}
