//! Referência de alta precisão ("goldens") com **BigUint/BigRational**.
//!
//! Serve de oráculo independente do core em `U256`:
//! 1. raiz WAD exata (`floor(sqrt(v * 1e18))`) e LP inicial exato;
//! 2. saída do swap como racional contínuo, sem quantização;
//! 3. IL contínuo em bps, com a raiz resolvida a 1e-20.
//!
//! Não entra no caminho de produção: só testes, harness e geração de goldens.

use num_bigint::{BigInt, BigUint};
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use crate::amm::baseline::baseline_sqrt;
use crate::amm::error::Result;
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::fixed_point::sqrt;
use crate::amm::guardrails::{ensure_fee_bps, ensure_reserves};
use crate::amm::ops::NoMeter;
use crate::amm::types::{SlippageParams, SqrtAlgorithm, Wad, BPS_SCALE, WAD};
use crate::amm_err;

/// Resolução da raiz usada na referência de IL (1e20).
const IL_ROOT_SCALE: u128 = 100_000_000_000_000_000_000;

// -------------------------
// Helpers de conversão
// -------------------------
#[inline]
fn bu(v: u128) -> BigUint {
    BigUint::from(v)
}

#[inline]
fn q(n: &BigUint, d: &BigUint) -> BigRational {
    BigRational::new(BigInt::from(n.clone()), BigInt::from(d.clone()))
}

fn to_wad(v: &BigUint, op: &'static str) -> Result<Wad> {
    v.to_u128()
        .ok_or_else(|| amm_err!(AmmErrorCode::OverflowNumeric, op => op, value => v))
}

/// `floor(r)` para racional não-negativo.
pub fn floor_to_u128(r: &BigRational) -> Result<u128> {
    r.floor()
        .to_integer()
        .to_u128()
        .ok_or_else(|| amm_err!(AmmErrorCode::OverflowNumeric, op => "floor_to_u128"))
}

// -------------------------
// Raiz e LP
// -------------------------
/// `floor(sqrt(value * 1e18))`: a raiz WAD exata.
pub fn reference_sqrt_wad(value: Wad) -> Result<Wad> {
    let scaled = bu(value) * bu(WAD);
    to_wad(&Roots::sqrt(&scaled), "reference_sqrt_wad")
}

/// `floor(sqrt(a * b))` sobre o produto exato.
pub fn reference_lp_tokens(amount0: Wad, amount1: Wad) -> Result<Wad> {
    let k = bu(amount0) * bu(amount1);
    to_wad(&Roots::sqrt(&k), "reference_lp_tokens")
}

// -------------------------
// Swap contínuo
// -------------------------
/// Saída exata do swap (sem floor):
/// `in_net = a * (1 - f/10000)`, `out = in_net * R_out / (R_in + in_net)`.
pub fn reference_amount_out(params: SlippageParams) -> Result<BigRational> {
    ensure_fee_bps(params.fee_bps)?;
    ensure_reserves(params.reserve_in, params.reserve_out)?;
    let scale = bu(u128::from(BPS_SCALE));
    let net = bu(u128::from(BPS_SCALE - params.fee_bps));
    let in_net = q(&(bu(params.amount_in) * net), &scale);
    let reserve_in = BigRational::from_integer(BigInt::from(params.reserve_in));
    let reserve_out = BigRational::from_integer(BigInt::from(params.reserve_out));
    Ok(in_net.clone() * reserve_out / (reserve_in + in_net))
}

// -------------------------
// Impermanent loss contínuo
// -------------------------
/// IL em bps como racional: `10000 * (1 - 2*sqrt(c*i)/(c + i))`.
///
/// `sqrt(c*i)` é resolvida com floor na escala 1e20, então o erro fica abaixo
/// de 1e-16 bp para qualquer entrada em `u128`.
pub fn reference_impermanent_loss_bps(initial_price: Wad, current_price: Wad) -> BigRational {
    let bps = BigRational::from_integer(BigInt::from(BPS_SCALE));
    if current_price == initial_price {
        return BigRational::zero();
    }
    if initial_price == 0 || current_price == 0 {
        return bps;
    }
    let s = bu(IL_ROOT_SCALE);
    let root = Roots::sqrt(&(bu(initial_price) * bu(current_price) * &s * &s));
    let held = q(&(root << 1usize), &((bu(initial_price) + bu(current_price)) * s));
    let one = BigRational::one();
    let held = if held > one { one.clone() } else { held };
    bps * (one - held)
}

// -------------------------
// Bundles de comparação
// -------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenSqrt {
    pub value: Wad,
    pub reference: Wad,
    pub newton: Wad,
    pub babylonian: Wad,
    /// `None` quando a raiz ingênua estoura.
    pub baseline: Option<Wad>,
}

impl GoldenSqrt {
    /// Pior erro absoluto entre os dois algoritmos do motor.
    pub fn engine_error(&self) -> Wad {
        self.newton
            .abs_diff(self.reference)
            .max(self.babylonian.abs_diff(self.reference))
    }

    pub fn baseline_error(&self) -> Option<Wad> {
        self.baseline.map(|b| b.abs_diff(self.reference))
    }
}

/// Roda a mesma raiz pelos dois algoritmos, pelo baseline e pela referência.
pub fn golden_sqrt(value: Wad) -> Result<GoldenSqrt> {
    Ok(GoldenSqrt {
        value,
        reference: reference_sqrt_wad(value)?,
        newton: sqrt(value, SqrtAlgorithm::NewtonRaphson)?,
        babylonian: sqrt(value, SqrtAlgorithm::Babylonian)?,
        baseline: baseline_sqrt(value, &mut NoMeter).ok(),
    })
}
