//! Contagem de operações elementares por chamada.
//!
//! Custo cobrado por primitiva, como numa VM; para comparar os dois algoritmos
//! de raiz de forma reprodutível, as rotinas do motor aceitam um [`OpMeter`].
//! O caminho normal usa [`NoMeter`], que compila para nada.

use core::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Primitiva contabilizada.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Div,
    Mul,
    Add,
    Shift,
    Cmp,
}

pub trait OpMeter {
    fn record(&mut self, op: Op, n: u32);
    fn iteration(&mut self);
}

/// Medidor nulo.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMeter;

impl OpMeter for NoMeter {
    #[inline(always)]
    fn record(&mut self, _op: Op, _n: u32) {}
    #[inline(always)]
    fn iteration(&mut self) {}
}

/// Contadores acumulados de uma ou mais chamadas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpCount {
    pub iterations: u32,
    pub divisions: u32,
    pub multiplications: u32,
    pub additions: u32,
    pub shifts: u32,
    pub comparisons: u32,
}

impl OpCount {
    pub fn total(&self) -> u64 {
        u64::from(self.divisions)
            + u64::from(self.multiplications)
            + u64::from(self.additions)
            + u64::from(self.shifts)
            + u64::from(self.comparisons)
    }

    /// Custo ponderado pelas `weights`.
    pub fn weighted(&self, weights: &OpWeights) -> u64 {
        u64::from(self.divisions) * weights.div
            + u64::from(self.multiplications) * weights.mul
            + u64::from(self.additions) * weights.add
            + u64::from(self.shifts) * weights.shift
            + u64::from(self.comparisons) * weights.cmp
    }
}

impl OpMeter for OpCount {
    #[inline]
    fn record(&mut self, op: Op, n: u32) {
        let slot = match op {
            Op::Div => &mut self.divisions,
            Op::Mul => &mut self.multiplications,
            Op::Add => &mut self.additions,
            Op::Shift => &mut self.shifts,
            Op::Cmp => &mut self.comparisons,
        };
        *slot = slot.saturating_add(n);
    }

    #[inline]
    fn iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }
}

impl AddAssign for OpCount {
    fn add_assign(&mut self, rhs: Self) {
        self.iterations = self.iterations.saturating_add(rhs.iterations);
        self.divisions = self.divisions.saturating_add(rhs.divisions);
        self.multiplications = self.multiplications.saturating_add(rhs.multiplications);
        self.additions = self.additions.saturating_add(rhs.additions);
        self.shifts = self.shifts.saturating_add(rhs.shifts);
        self.comparisons = self.comparisons.saturating_add(rhs.comparisons);
    }
}

/// Peso relativo de cada primitiva (tabela estilo EVM: DIV/MUL 5, ADD/SHR/LT 3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpWeights {
    pub div: u64,
    pub mul: u64,
    pub add: u64,
    pub shift: u64,
    pub cmp: u64,
}

impl Default for OpWeights {
    fn default() -> Self {
        Self { div: 5, mul: 5, add: 3, shift: 3, cmp: 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_and_weigh() {
        let mut c = OpCount::default();
        c.record(Op::Div, 2);
        c.record(Op::Add, 1);
        c.record(Op::Cmp, 3);
        c.iteration();
        assert_eq!(c.total(), 6);
        assert_eq!(c.iterations, 1);
        assert_eq!(c.weighted(&OpWeights::default()), 2 * 5 + 3 + 3 * 3);
    }

    #[test]
    fn add_assign_accumulates() {
        let mut a = OpCount { iterations: 1, divisions: 1, ..OpCount::default() };
        a += OpCount { iterations: 2, shifts: 4, ..OpCount::default() };
        assert_eq!(a.iterations, 3);
        assert_eq!(a.divisions, 1);
        assert_eq!(a.shifts, 4);
    }
}
