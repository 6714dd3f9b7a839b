//! mcx - Monte Carlo European call pricer with accelerator offload.
//!
//! Prices exactly one option configuration per invocation, once on the
//! software backend and once on the coprocessor path, over the identical
//! sample array, and prints the comparison.
//!
//! Without hardware attached the coprocessor path runs against the
//! register-accurate simulated kernel, exercising the full control
//! sequence (register programming, start/poll handshake, cache
//! synchronisation).

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accel_driver::{price_on_accelerator, PollConfig, SimulatedKernel};
use pricing_core::{
    software_payoff_sum, BackendReport, ComparisonReport, OptionParams, SampleSource,
};

/// Monte Carlo option pricing: software vs. accelerator
#[derive(Parser)]
#[command(name = "mcx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of Monte Carlo samples
    #[arg(short, long, default_value = "1000")]
    n_samples: usize,

    /// Initial stock price (S0)
    #[arg(long, default_value = "100.0")]
    spot: f64,

    /// Strike price (K)
    #[arg(long, default_value = "105.0")]
    strike: f64,

    /// Time to maturity in years (T)
    #[arg(long, default_value = "1.0")]
    maturity: f64,

    /// Annualised risk-free rate (r)
    #[arg(long, default_value = "0.05")]
    rate: f64,

    /// Annualised volatility (sigma)
    #[arg(long, default_value = "0.2")]
    volatility: f64,

    /// RNG seed for the shared sample array
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Accelerator poll deadline in milliseconds
    #[arg(long, default_value = "2000")]
    timeout_ms: u64,

    /// TOML scenario file overriding the parameter flags
    #[arg(long)]
    scenario: Option<String>,
}

impl Cli {
    fn params(&self) -> anyhow::Result<OptionParams> {
        if let Some(path) = &self.scenario {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading scenario file {path}"))?;
            let params: OptionParams =
                toml::from_str(&text).with_context(|| format!("parsing scenario file {path}"))?;
            return Ok(params);
        }

        OptionParams::builder()
            .spot(self.spot)
            .strike(self.strike)
            .maturity(self.maturity)
            .rate(self.rate)
            .volatility(self.volatility)
            .n_samples(self.n_samples)
            .build()
            .context("invalid pricing parameters")
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let params = cli.params()?;

    info!(
        n_samples = params.n_samples(),
        seed = cli.seed,
        "generating shared sample array"
    );
    let samples = SampleSource::from_seed(cli.seed).draw(params.n_samples());

    // Software path first; its result stays valid whatever the
    // accelerator does.
    let software_run = software_payoff_sum(&params, &samples);
    let software = BackendReport::from_run("CPU", &software_run, &params);

    let poll = PollConfig::with_timeout(Duration::from_millis(cli.timeout_ms));
    let accelerator =
        match price_on_accelerator(&params, &samples, SimulatedKernel::new(), &poll) {
            Ok(run) => Some(BackendReport::from_run("FPGA", &run, &params)),
            Err(err) => {
                warn!(%err, "accelerator path failed; reporting software result only");
                None
            }
        };

    let report = ComparisonReport {
        software,
        accelerator,
    };
    println!("{report}");

    Ok(())
}
