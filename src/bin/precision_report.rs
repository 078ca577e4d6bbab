use anyhow::Result;
use tracing::{info, warn};

use precision_amm::harness::{self, HarnessConfig};
use precision_amm::obs;

fn main() -> Result<()> {
    obs::init::init_tracing("precision-amm")?;
    let config = HarnessConfig::from_env()?;
    info!(samples = config.samples, seed = config.seed, "rodando harness de precisão");

    let report = harness::run(&config)?;
    if report.max_sqrt_divergence > 1 {
        warn!(divergence = %report.max_sqrt_divergence, "newton e babilônico divergem mais de 1 wei");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
