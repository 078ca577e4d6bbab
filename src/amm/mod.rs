pub mod types;
pub mod ops;
pub mod guardrails;
pub mod fixed_point;
pub mod liquidity;
pub mod swap;
pub mod fee;
pub mod impermanent_loss;

// catálogo unificado de erros
pub mod error_catalog;
pub mod error;
pub mod error_map;

// comparação: baseline u128 e oráculo BigUint
pub mod baseline;
pub mod ref_golden;

pub use types::{Bps, SqrtAlgorithm, Wad, U256, WAD};
