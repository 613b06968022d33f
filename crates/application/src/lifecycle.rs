//! Scenario lifecycle.
//!
//! The step framework calls [`ScenarioLifecycle::before_scenario`] before
//! every scenario. Configuration is read again and a fresh transport is
//! built each time, so nothing leaks from one scenario into the next.

use stepcheck_domain::SuiteConfig;
use tracing::{info, warn};

use crate::error::{StepError, StepResult};
use crate::ports::{ClientFactory, ConfigSource, FileSystem};
use crate::scenario::Scenario;

/// Creates and resets scenarios.
#[derive(Debug)]
pub struct ScenarioLifecycle<S, K, F> {
    config: S,
    clients: K,
    files: F,
}

impl<S, K, F> ScenarioLifecycle<S, K, F>
where
    S: ConfigSource,
    K: ClientFactory,
    F: FileSystem + Clone,
{
    /// Creates a lifecycle controller from its collaborators.
    pub const fn new(config: S, clients: K, files: F) -> Self {
        Self {
            config,
            clients,
            files,
        }
    }

    /// Creates a scenario ready for its first step.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the
    /// transport cannot be built.
    pub async fn start(&self) -> StepResult<Scenario<K::Client, F>> {
        let (config, client) = self.prepare().await?;
        info!(base_url = %config.base_url, "starting scenario");
        Ok(Scenario::new(&config, client, self.files.clone()))
    }

    /// Resets `scenario` to a clean state for the next scenario.
    ///
    /// Headers, cookies, body, response and TLS relaxation are all
    /// dropped. On error the scenario is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the
    /// transport cannot be built.
    pub async fn before_scenario(&self, scenario: &mut Scenario<K::Client, F>) -> StepResult<()> {
        let (config, client) = self.prepare().await?;
        info!(base_url = %config.base_url, "resetting scenario");
        scenario.restart(&config, client);
        Ok(())
    }

    async fn prepare(&self) -> StepResult<(SuiteConfig, K::Client)> {
        let config = self.config.load().await?;
        if config.base_url_is_blank() {
            warn!("no base URL configured, every send will fail");
        }
        let client = self
            .clients
            .create(&config)
            .map_err(StepError::TransportSetup)?;
        Ok((config, client))
    }
}
