//! The per-scenario engine.
//!
//! A [`Scenario`] owns the state of one running scenario together with the
//! transport and file access it needs. Steps are methods taking
//! `&mut self`, so a scenario is driven strictly one step at a time.
//!
//! Operations are grouped by concern:
//! - `builder`: header, cookie and body steps
//! - `send`: the three send variants and TLS relaxation
//! - `assert`: response checks and diagnostics

mod assert;
mod builder;
mod send;

use stepcheck_domain::{ScenarioState, SuiteConfig};

use crate::ports::{FileSystem, HttpClient};

/// State and collaborators for one scenario.
#[derive(Debug)]
pub struct Scenario<C, F> {
    state: ScenarioState,
    client: C,
    files: F,
}

impl<C: HttpClient, F: FileSystem> Scenario<C, F> {
    /// Creates a scenario targeting `config.base_url`.
    pub fn new(config: &SuiteConfig, client: C, files: F) -> Self {
        Self {
            state: ScenarioState::new(config.base_url.clone()),
            client,
            files,
        }
    }

    /// Returns the scenario state.
    pub const fn state(&self) -> &ScenarioState {
        &self.state
    }

    /// Returns the scenario state for direct manipulation.
    pub const fn state_mut(&mut self) -> &mut ScenarioState {
        &mut self.state
    }

    /// Returns the transport.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Forgets the last response; request building state is kept.
    pub fn reset_response(&mut self) {
        self.state.reset_response();
    }

    /// Starts over with fresh state and a fresh transport.
    pub(crate) fn restart(&mut self, config: &SuiteConfig, client: C) {
        self.state.reset(config.base_url.clone());
        self.client = client;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::test_support::scenario;
    use pretty_assertions::assert_eq;
    use stepcheck_domain::HttpMethod;

    #[tokio::test]
    async fn test_reset_response_keeps_request() {
        let mut scenario = scenario("http://api");
        scenario.set_header("X-Id", "1");
        scenario.client().respond(204, &[], "");
        scenario.send(HttpMethod::Get, "/").await.unwrap();

        scenario.reset_response();

        assert_eq!(scenario.state().response().status, 0);
        assert_eq!(scenario.state().request_headers.get("X-Id"), Some("1"));
    }
}
