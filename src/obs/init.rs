use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Filtro a partir de `RUST_LOG`; sem a variável, `info`.
pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Instala o subscriber global (fmt + EnvFilter).
///
/// Métricas vão para o meter global do OpenTelemetry; sem provider instalado
/// os instrumentos são no-op, então nenhum exporter é montado aqui.
pub fn init_tracing(service_name: &str) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).with_ansi(false);
    let subscriber = Registry::default().with(filter_from_env()).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!(service = service_name, version = env!("CARGO_PKG_VERSION"), "tracing pronto");
    Ok(())
}
