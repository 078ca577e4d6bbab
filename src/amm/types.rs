//! Tipos básicos do motor (escala fixa 1e18) + U256 para intermediários.
//! Toda quantidade cruza a fronteira como inteiro sem sinal em escala WAD.

use serde::{Deserialize, Serialize};
use uint::construct_uint;

construct_uint! {
    /// Inteiro de 256 bits para produtos intermediários (largura dupla).
    pub struct U256(4);
}

pub type Wad = u128; // escala 1e18
pub type Bps = u32;  // 0..=10_000

pub const WAD: Wad = 1_000_000_000_000_000_000u128; // 1e18
pub const BPS_SCALE: Bps = 10_000;                   // 100%
pub const MAX_DYNAMIC_FEE_BPS: Bps = 1_000;          // teto da fee dinâmica (10%)

/// Seleção do algoritmo de raiz quadrada. Sempre passado explicitamente.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqrtAlgorithm {
    NewtonRaphson,
    /// Método dígito a dígito (base 4).
    Babylonian,
}

impl SqrtAlgorithm {
    pub const ALL: [SqrtAlgorithm; 2] = [SqrtAlgorithm::NewtonRaphson, SqrtAlgorithm::Babylonian];

    /// Converte a flag `useBabylonian` dos contratos para o enum.
    pub const fn from_flag(use_babylonian: bool) -> Self {
        if use_babylonian { Self::Babylonian } else { Self::NewtonRaphson }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::NewtonRaphson => "newton_raphson",
            Self::Babylonian => "babylonian",
        }
    }
}

/// Entrada do cálculo de saída de swap (X→Y) com taxa sobre o input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageParams {
    pub amount_in: Wad,
    pub reserve_in: Wad,
    pub reserve_out: Wad,
    pub fee_bps: Bps,
}

impl SlippageParams {
    pub fn new(amount_in: Wad, reserve_in: Wad, reserve_out: Wad, fee_bps: Bps) -> Self {
        Self { amount_in, reserve_in, reserve_out, fee_bps }
    }
}

/// Entrada da curva de fee dinâmica.
/// `volatility_bps` é um score bruto e pode passar de 10_000.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFeeParams {
    pub volatility_bps: u128,
    pub volume_24h: Wad,
    pub liquidity_depth: Wad,
}

impl DynamicFeeParams {
    pub fn new(volatility_bps: u128, volume_24h: Wad, liquidity_depth: Wad) -> Self {
        Self { volatility_bps, volume_24h, liquidity_depth }
    }
}
