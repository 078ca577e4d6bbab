//! Catálogo imutável de erros do motor de precisão.
use core::fmt;

use serde::Serialize;

/// Classe do erro, para o chamador decidir se reverte a operação maior.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Violação de contrato pelo chamador.
    InvalidInput,
    /// Intermediário excedeu a largura representável.
    Overflow,
    /// Invariante interna violada (não deveria ocorrer com entradas válidas).
    Internal,
}

/// Código de erro do AMM.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AmmErrorCode {
    /// `fee_bps` acima de 10_000 (ou igual, onde a saída seria infinita).
    InvalidFeeBps,
    /// Reserva zerada passada ao swap.
    ZeroReserve,
    /// Saída pedida drena (ou excede) a reserva.
    InsufficientLiquidity,
    /// Overflow mesmo em 256 bits.
    OverflowNumeric,
    /// Newton-Raphson não convergiu dentro do teto de iterações.
    SqrtNoConvergence,
    /// Parâmetros da curva de fee inconsistentes.
    InvalidCurveConfig,
}

impl AmmErrorCode {
    /// Código textual estável do erro.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidFeeBps => "AMM-0001",
            Self::ZeroReserve => "AMM-0002",
            Self::InsufficientLiquidity => "AMM-0003",
            Self::OverflowNumeric => "AMM-0004",
            Self::SqrtNoConvergence => "AMM-0005",
            Self::InvalidCurveConfig => "AMM-0006",
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFeeBps
            | Self::ZeroReserve
            | Self::InsufficientLiquidity
            | Self::InvalidCurveConfig => ErrorKind::InvalidInput,
            Self::OverflowNumeric => ErrorKind::Overflow,
            Self::SqrtNoConvergence => ErrorKind::Internal,
        }
    }

    /// Título curto em português.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidFeeBps => "Taxa inválida",
            Self::ZeroReserve => "Reserva zerada",
            Self::InsufficientLiquidity => "Liquidez insuficiente",
            Self::OverflowNumeric => "Overflow numérico",
            Self::SqrtNoConvergence => "Raiz sem convergência",
            Self::InvalidCurveConfig => "Curva de fee inválida",
        }
    }

    /// Mensagem base em português. Placeholders `{chave}` vêm do contexto.
    pub const fn message_pt(&self) -> &'static str {
        match self {
            Self::InvalidFeeBps => "fee_bps={fee_bps} fora de [0, 10000]",
            Self::ZeroReserve => "reserve deve ser > 0",
            Self::InsufficientLiquidity => "saída pedida drenaria a reserva",
            Self::OverflowNumeric => "overflow numérico em 256 bits",
            Self::SqrtNoConvergence => "newton-raphson excedeu o teto de iterações",
            Self::InvalidCurveConfig => "parâmetros da curva de fee inconsistentes",
        }
    }

    /// Retorna todas as variantes em ordem estável.
    pub fn all() -> &'static [AmmErrorCode] {
        const ALL: &[AmmErrorCode] = &[
            AmmErrorCode::InvalidFeeBps,
            AmmErrorCode::ZeroReserve,
            AmmErrorCode::InsufficientLiquidity,
            AmmErrorCode::OverflowNumeric,
            AmmErrorCode::SqrtNoConvergence,
            AmmErrorCode::InvalidCurveConfig,
        ];
        ALL
    }
}

impl fmt::Display for AmmErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Mensagem padrão na localidade ativa (pt-BR).
pub fn default_locale_message(code: AmmErrorCode) -> &'static str {
    code.message_pt()
}
