//! Motor de matemática de AMM em ponto fixo (WAD = 1e18), com raiz quadrada
//! selecionável, fee dinâmica, impermanent loss e um harness que compara o
//! motor contra um baseline `u128` e um oráculo BigUint.

pub mod amm;
pub mod harness;
pub mod obs;

pub use amm::error::{AmmError, Result};
pub use amm::error_catalog::AmmErrorCode;
pub use amm::types::{Bps, DynamicFeeParams, SlippageParams, SqrtAlgorithm, Wad, U256, WAD};
