//! Raiz quadrada inteira (Newton-Raphson e dígito a dígito) + helpers de escala WAD.
//!
//! Convenção de escala (ponto mais sensível do motor):
//! `sqrt(v)` trata `v` como WAD e devolve WAD, ou seja `sqrt(v) = isqrt(v * 1e18)`.
//! Assim `sqrt(625 * WAD) == 25 * WAD`, enquanto a raiz crua
//! `isqrt_u256(625 * WAD) == 25 * 1e9`.
//!
//! Ambos os algoritmos devolvem **floor**: `r^2 <= n < (r+1)^2`.

use crate::amm::error::Result;
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::guardrails::{checked_mul_u256, u256_to_u128_checked};
use crate::amm::ops::{NoMeter, Op, OpCount, OpMeter};
use crate::amm::types::{SqrtAlgorithm, Wad, U256, WAD};
use crate::amm_err;

/// Teto de iterações do Newton. Com semente `2^ceil(bits/2)` bastam ~8.
pub const MAX_NEWTON_ITERATIONS: u32 = 64;

/// Raiz crua `floor(sqrt(n))` com o algoritmo escolhido.
pub fn isqrt_u256(n: U256, algorithm: SqrtAlgorithm) -> Result<U256> {
    isqrt_u256_metered(n, algorithm, &mut NoMeter)
}

pub fn isqrt_u256_metered<M: OpMeter>(n: U256, algorithm: SqrtAlgorithm, meter: &mut M) -> Result<U256> {
    match algorithm {
        SqrtAlgorithm::NewtonRaphson => newton_isqrt(n, meter),
        SqrtAlgorithm::Babylonian => Ok(digit_isqrt(n, meter)),
    }
}

/// Raiz em ponto fixo: `isqrt(value * WAD)`, mesma escala da entrada.
pub fn sqrt(value: Wad, algorithm: SqrtAlgorithm) -> Result<Wad> {
    sqrt_metered(value, algorithm, &mut NoMeter)
}

pub fn sqrt_metered<M: OpMeter>(value: Wad, algorithm: SqrtAlgorithm, meter: &mut M) -> Result<Wad> {
    let root = sqrt_wad_u256_metered(U256::from(value), algorithm, meter)?;
    // value < 2^128 ⇒ value*WAD < 2^188 ⇒ raiz < 2^94
    u256_to_u128_checked(root)
}

/// Raiz em ponto fixo e o custo contado da chamada.
pub fn sqrt_profiled(value: Wad, algorithm: SqrtAlgorithm) -> Result<(Wad, OpCount)> {
    let mut count = OpCount::default();
    let root = sqrt_metered(value, algorithm, &mut count)?;
    Ok((root, count))
}

/// Versão larga de [`sqrt`] para valores WAD já em 256 bits.
pub fn sqrt_wad_u256_metered<M: OpMeter>(value: U256, algorithm: SqrtAlgorithm, meter: &mut M) -> Result<U256> {
    let scaled = checked_mul_u256(value, U256::from(WAD))?;
    meter.record(Op::Mul, 1);
    isqrt_u256_metered(scaled, algorithm, meter)
}

/// Newton-Raphson: `x' = (x + n/x) / 2`, parando quando deixa de decrescer.
/// A semente `2^ceil(bits/2)` é sempre >= sqrt(n), então a sequência decresce
/// monotonicamente até `floor(sqrt(n))`.
fn newton_isqrt<M: OpMeter>(n: U256, meter: &mut M) -> Result<U256> {
    meter.record(Op::Cmp, 1);
    if n.is_zero() {
        return Ok(U256::zero());
    }
    let mut x = U256::one() << ((n.bits() + 1) / 2);
    meter.record(Op::Shift, 1);
    for _ in 0..MAX_NEWTON_ITERATIONS {
        meter.iteration();
        let y = (x + n / x) >> 1;
        meter.record(Op::Div, 1);
        meter.record(Op::Add, 1);
        meter.record(Op::Shift, 1);
        meter.record(Op::Cmp, 1);
        if y >= x {
            return Ok(x);
        }
        x = y;
    }
    tracing::error!(target: "precision_amm::sqrt", bits = n.bits(), "newton-raphson não convergiu");
    Err(amm_err!(
        AmmErrorCode::SqrtNoConvergence,
        n => n,
        max_iterations => MAX_NEWTON_ITERATIONS,
    ))
}

/// Dígito a dígito em base 4: um bit do resultado por passo, `ceil(bits/2)` passos.
fn digit_isqrt<M: OpMeter>(n: U256, meter: &mut M) -> U256 {
    meter.record(Op::Cmp, 1);
    if n.is_zero() {
        return U256::zero();
    }
    let mut rem = n;
    let mut root = U256::zero();
    // maior potência de 4 <= n
    let mut bit = U256::one() << ((n.bits() - 1) & !1usize);
    meter.record(Op::Shift, 1);
    while !bit.is_zero() {
        meter.iteration();
        let trial = root + bit;
        meter.record(Op::Add, 1);
        meter.record(Op::Cmp, 2);
        if rem >= trial {
            rem = rem - trial;
            root = (root >> 1) + bit;
            meter.record(Op::Add, 2);
        } else {
            root = root >> 1;
        }
        bit = bit >> 2;
        meter.record(Op::Shift, 2);
    }
    root
}

// --------- helpers de escala / arredondamento ---------

/// `floor(a * WAD / b)` mantido em 256 bits (nunca estoura para entradas u128).
pub fn div_wad_u256(a: Wad, b: Wad) -> Result<U256> {
    if b == 0 {
        return Err(amm_err!(AmmErrorCode::OverflowNumeric, op => "div_wad", dividend => a, divisor => 0));
    }
    Ok(U256::from(a) * U256::from(WAD) / U256::from(b))
}

/// `ceil(n / d)` assumindo `d > 0`.
#[inline]
pub fn ceil_div_u256(n: U256, d: U256) -> U256 {
    let q = n / d;
    if (n % d).is_zero() { q } else { q + U256::one() }
}
