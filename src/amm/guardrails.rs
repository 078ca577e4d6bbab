//! Validações de domínio e conversões seguras entre larguras.
//! Objetivo: falhar explicitamente em vez de dar wrap.

use crate::amm::error::Result;
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::types::{Bps, Wad, BPS_SCALE, U256};
use crate::amm_err;

/// `fee_bps` precisa caber em [0, 10_000]; acima disso `10_000 - fee` daria underflow.
#[inline]
pub fn ensure_fee_bps(fee_bps: Bps) -> Result<Bps> {
    if fee_bps > BPS_SCALE {
        return Err(amm_err!(AmmErrorCode::InvalidFeeBps, fee_bps => fee_bps));
    }
    Ok(fee_bps)
}

#[inline]
pub fn ensure_reserves(reserve_in: Wad, reserve_out: Wad) -> Result<()> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(amm_err!(
            AmmErrorCode::ZeroReserve,
            reserve_in => reserve_in,
            reserve_out => reserve_out,
        ));
    }
    Ok(())
}

#[inline]
pub fn mul_u128_to_u256(a: Wad, b: Wad) -> U256 {
    U256::from(a) * U256::from(b)
}

/// Produto em 256 bits; overflow vira erro.
#[inline]
pub fn checked_mul_u256(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b)
        .ok_or_else(|| amm_err!(AmmErrorCode::OverflowNumeric, op => "mul", lhs => a, rhs => b))
}

#[inline]
pub fn u256_to_u128_checked(v: U256) -> Result<Wad> {
    if v > U256::from(u128::MAX) {
        Err(amm_err!(AmmErrorCode::OverflowNumeric, op => "downcast", value => v))
    } else {
        Ok(v.as_u128())
    }
}
