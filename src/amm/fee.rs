//! Curva de fee dinâmica: cresce com volatilidade e com utilização (volume/profundidade).
//!
//! ```text
//! x   = w_vol * (vol_bps / 10000) + w_util * (volume_24h / liquidity_depth)   (WAD, saturado)
//! fee = min(max_fee, floor(base_fee * e^x))
//! ```
//! `e^x` é convexa: resposta suave com pouca pressão e íngreme perto da saturação.
//! Cada termo só usa floor de quantidades não-negativas, então a fee é monótona
//! em cada entrada.

use serde::{Deserialize, Serialize};

use crate::amm::error::Result;
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::fixed_point::div_wad_u256;
use crate::amm::types::{Bps, DynamicFeeParams, Wad, BPS_SCALE, MAX_DYNAMIC_FEE_BPS, U256, WAD};
use crate::amm_err;

/// Pressão máxima considerada; `30 bps * e^8` já passa de qualquer teto válido.
pub const PRESSURE_CAP: Wad = 8 * WAD;
/// Score de volatilidade acima disto é tratado como igual (100x).
pub const VOLATILITY_CAP_BPS: u128 = 1_000_000;
/// Utilização acima de 1000x a profundidade é tratada como igual.
pub const UTILIZATION_CAP: Wad = 1_000 * WAD;
const EXP_MAX_TERMS: u32 = 96;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCurve {
    /// Fee com pressão zero.
    pub base_fee_bps: Bps,
    /// Teto rígido da saída.
    pub max_fee_bps: Bps,
    /// Peso (WAD) da volatilidade normalizada.
    pub volatility_weight: Wad,
    /// Peso (WAD) da utilização.
    pub utilization_weight: Wad,
}

impl Default for FeeCurve {
    fn default() -> Self {
        Self {
            base_fee_bps: 30,
            max_fee_bps: MAX_DYNAMIC_FEE_BPS,
            volatility_weight: 2 * WAD,
            utilization_weight: WAD,
        }
    }
}

impl FeeCurve {
    pub fn validate(&self) -> Result<()> {
        if self.max_fee_bps > BPS_SCALE || self.base_fee_bps > self.max_fee_bps {
            return Err(amm_err!(
                AmmErrorCode::InvalidCurveConfig,
                base_fee_bps => self.base_fee_bps,
                max_fee_bps => self.max_fee_bps,
            ));
        }
        Ok(())
    }

    /// Fee em bps para esta curva; valida a configuração antes.
    pub fn fee_bps(&self, params: &DynamicFeeParams) -> Result<Bps> {
        self.validate()?;
        let fee = self.evaluate(params);
        tracing::trace!(
            target: "precision_amm::fee",
            volatility_bps = %params.volatility_bps,
            volume_24h = %params.volume_24h,
            liquidity_depth = %params.liquidity_depth,
            fee,
            "fee dinâmica"
        );
        Ok(fee)
    }

    /// Pressão `x` em WAD, saturada em [`PRESSURE_CAP`]. Profundidade zero satura.
    pub fn pressure(&self, params: &DynamicFeeParams) -> Wad {
        if params.liquidity_depth == 0 {
            return PRESSURE_CAP;
        }
        let wad = U256::from(WAD);
        let vol = params.volatility_bps.min(VOLATILITY_CAP_BPS);
        let vol_ratio = U256::from(vol) * wad / U256::from(BPS_SCALE);
        // profundidade zero já saturou acima
        let util = div_wad_u256(params.volume_24h, params.liquidity_depth)
            .map_or(U256::from(UTILIZATION_CAP), |u| u.min(U256::from(UTILIZATION_CAP)));
        let x = vol_ratio * U256::from(self.volatility_weight) / wad
            + util * U256::from(self.utilization_weight) / wad;
        x.min(U256::from(PRESSURE_CAP)).as_u128()
    }

    // assume configuração válida
    fn evaluate(&self, params: &DynamicFeeParams) -> Bps {
        if params.liquidity_depth == 0 {
            return self.max_fee_bps;
        }
        let growth = exp_wad(self.pressure(params));
        let raw = u128::from(self.base_fee_bps) * growth / WAD;
        raw.min(u128::from(self.max_fee_bps)) as Bps
    }
}

/// Fee dinâmica com a curva padrão (base 30 bps, teto 1000 bps).
pub fn calculate_dynamic_fee(params: DynamicFeeParams) -> Bps {
    FeeCurve::default().evaluate(&params)
}

/// `e^x` em WAD por série de Taylor; `x` saturado em [`PRESSURE_CAP`].
/// Todos os termos são floors de produtos não-negativos, logo a função é monótona.
pub fn exp_wad(x: Wad) -> Wad {
    let wad = U256::from(WAD);
    let x = U256::from(x.min(PRESSURE_CAP));
    let mut sum = wad;
    let mut term = wad;
    for n in 1..=EXP_MAX_TERMS {
        term = term * x / (wad * U256::from(n));
        if term.is_zero() {
            break;
        }
        sum = sum + term;
    }
    // e^8 * 1e18 < 2^128
    sum.as_u128()
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;

    fn params(vol: u128, volume: Wad, depth: Wad) -> DynamicFeeParams {
        DynamicFeeParams::new(vol, volume, depth)
    }

    #[test]
    fn t_exp_accuracy() {
        assert_eq!(exp_wad(0), WAD);
        let e = exp_wad(WAD);
        let reference: u128 = 2_718_281_828_459_045_235;
        assert!(e.abs_diff(reference) < 100, "e={}", e);
        let e8 = exp_wad(8 * WAD);
        let reference8: u128 = 2_980_957_987_041_728_274_743;
        assert!(e8.abs_diff(reference8) < 1_000, "e8={}", e8);
        assert_eq!(exp_wad(100 * WAD), e8);
    }

    #[test]
    fn t_scenario_is_deterministic_and_bounded() {
        let p = params(200, 10_000 * WAD, 1_000_000 * WAD);
        let fee = calculate_dynamic_fee(p);
        // x = 0.04 + 0.01 ⇒ 30 * e^0.05 = 31.54
        assert_eq!(fee, 31);
        for _ in 0..10 {
            assert_eq!(calculate_dynamic_fee(p), fee);
        }
    }

    #[test]
    fn t_zero_pressure_is_base_fee() {
        assert_eq!(calculate_dynamic_fee(params(0, 0, WAD)), 30);
    }

    #[test]
    fn t_zero_depth_is_max_fee() {
        assert_eq!(calculate_dynamic_fee(params(0, 0, 0)), MAX_DYNAMIC_FEE_BPS);
        assert_eq!(calculate_dynamic_fee(params(u128::MAX, u128::MAX, 0)), MAX_DYNAMIC_FEE_BPS);
    }

    #[test]
    fn t_extreme_inputs_clamped() {
        let fee = calculate_dynamic_fee(params(u128::MAX, u128::MAX, 1));
        assert_eq!(fee, MAX_DYNAMIC_FEE_BPS);
    }

    #[test]
    fn t_convex_response() {
        let depth = 1_000_000 * WAD;
        let low = calculate_dynamic_fee(params(0, 100_000 * WAD, depth)); // util 0.1
        let mid = calculate_dynamic_fee(params(0, 1_000_000 * WAD, depth)); // util 1
        let high = calculate_dynamic_fee(params(0, 2_000_000 * WAD, depth)); // util 2
        assert!(low < mid && mid < high);
        assert!(high - mid > mid - low);
    }

    #[test]
    fn t_custom_curve_validation() {
        let bad = FeeCurve { base_fee_bps: 50, max_fee_bps: 40, ..FeeCurve::default() };
        assert_eq!(bad.fee_bps(&params(0, 0, WAD)).unwrap_err().code, AmmErrorCode::InvalidCurveConfig);
        let too_high = FeeCurve { max_fee_bps: BPS_SCALE + 1, ..FeeCurve::default() };
        assert!(too_high.validate().is_err());
        let flat = FeeCurve { base_fee_bps: 0, ..FeeCurve::default() };
        assert_eq!(flat.fee_bps(&params(5_000, 10 * WAD, WAD)).unwrap(), 0);
    }
}
