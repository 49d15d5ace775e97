//! Backend selection.

use anyhow::{Context, Result};
use clap::ValueEnum;
use qsearch_adapter_sim::SimulatorBackend;
use qsearch_hal::{Backend, BackendConfig, BackendFactory};

/// Backends the CLI can construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Local statevector simulator.
    #[default]
    Simulator,
}

impl BackendKind {
    /// Name used in backend configs and output.
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Simulator => "simulator",
        }
    }
}

/// Build the requested backend, seeding its sampler when `seed` is set.
pub fn create(kind: BackendKind, seed: Option<u64>) -> Result<Box<dyn Backend>> {
    let mut config = BackendConfig::new(kind.as_str());
    if let Some(seed) = seed {
        config = config.with_extra("seed", seed.into());
    }

    match kind {
        BackendKind::Simulator => {
            let backend = SimulatorBackend::from_config(config)
                .context("failed to configure simulator backend")?;
            Ok(Box::new(backend))
        }
    }
}
