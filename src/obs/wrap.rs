use once_cell::sync::OnceCell;
use opentelemetry::metrics::Histogram;
use opentelemetry::{global, KeyValue};
use std::time::Instant;

static DURATION: OnceCell<Histogram<f64>> = OnceCell::new();
static COST: OnceCell<Histogram<u64>> = OnceCell::new();

fn duration_histogram() -> Histogram<f64> {
    DURATION
        .get_or_init(|| {
            global::meter("precision_amm")
                .f64_histogram("op_duration_seconds")
                .with_unit("s")
                .with_description("operation duration")
                .build()
        })
        .clone()
}

fn cost_histogram() -> Histogram<u64> {
    COST.get_or_init(|| {
        global::meter("precision_amm")
            .u64_histogram("op_weighted_cost")
            .with_unit("1")
            .with_description("weighted op cost per call")
            .build()
    })
    .clone()
}

/// Cronometra `f` e registra a duração com o atributo `op`.
pub fn time<F, T>(op: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = f();
    let sec = start.elapsed().as_secs_f64();
    duration_histogram().record(sec, &[KeyValue::new("op", op.to_string())]);
    out
}

/// Registra o custo ponderado de uma chamada (`op`, `algorithm`).
pub fn record_cost(op: &str, algorithm: &str, weighted: u64) {
    cost_histogram().record(
        weighted,
        &[KeyValue::new("op", op.to_string()), KeyValue::new("algorithm", algorithm.to_string())],
    );
}

/// Span INFO com nome estático; o nome dinâmico vai em `span_name`.
pub fn op_span(name: &str, algorithm: &str) -> tracing::Span {
    tracing::info_span!(target: "precision_amm", "op", span_name = %name, algorithm = %algorithm)
}
