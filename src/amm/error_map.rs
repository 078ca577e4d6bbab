//! Mapeamento entre condições de domínio e códigos de erro do motor.
use crate::amm::error::AmmError;
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::types::{SlippageParams, BPS_SCALE, U256};

/// Determina o código de erro de um swap a partir dos inputs brutos.
/// Ordem: taxa, reservas, largura do numerador.
pub fn from_slippage_params(params: &SlippageParams) -> Option<AmmErrorCode> {
    if params.fee_bps > BPS_SCALE {
        return Some(AmmErrorCode::InvalidFeeBps);
    }
    if params.reserve_in == 0 || params.reserve_out == 0 {
        return Some(AmmErrorCode::ZeroReserve);
    }
    let net_factor = U256::from(BPS_SCALE - params.fee_bps);
    let in_with_fee = U256::from(params.amount_in) * net_factor;
    if in_with_fee.checked_mul(U256::from(params.reserve_out)).is_none() {
        return Some(AmmErrorCode::OverflowNumeric);
    }
    None
}

/// Constrói um [`AmmError`] com o contexto completo do swap.
pub fn to_swap_error(code: AmmErrorCode, params: &SlippageParams) -> AmmError {
    AmmError::new(code)
        .with_context("amount_in", params.amount_in)
        .with_context("reserve_in", params.reserve_in)
        .with_context("reserve_out", params.reserve_out)
        .with_context("fee_bps", params.fee_bps)
}
