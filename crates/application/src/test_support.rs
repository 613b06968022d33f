//! In-memory ports shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stepcheck_domain::{Headers, RequestSpec, ResponseSpec, SuiteConfig};

use crate::ports::{ClientFactory, FileSystem, FileSystemError, HttpClient, HttpClientError};
use crate::scenario::Scenario;

type Reply = Result<Option<ResponseSpec>, HttpClientError>;

/// Records every request and answers from a script, 200 with an empty
/// body once the script runs out.
#[derive(Debug, Default, Clone)]
pub struct MockHttpClient {
    requests: Arc<Mutex<Vec<RequestSpec>>>,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    insecure: bool,
    rebuilds: usize,
    refuse_rebuild: bool,
}

impl MockHttpClient {
    pub fn reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn respond(&self, status: u16, headers: &[(&str, &str)], body: &str) {
        let headers = headers.iter().copied().collect::<Headers>();
        self.reply(Ok(Some(ResponseSpec::new(
            status,
            headers,
            body.as_bytes().to_vec(),
            Duration::from_millis(3),
        ))));
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RequestSpec {
        self.requests().pop().unwrap()
    }

    pub const fn is_insecure(&self) -> bool {
        self.insecure
    }

    pub const fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn refusing_rebuild(mut self) -> Self {
        self.refuse_rebuild = true;
        self
    }
}

impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Reply {
        self.requests.lock().unwrap().push(request.clone());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(Some(ResponseSpec::new(
                200,
                Headers::new(),
                Vec::new(),
                Duration::ZERO,
            )))
        })
    }

    fn disable_certificate_verification(&mut self) -> Result<(), HttpClientError> {
        if self.refuse_rebuild {
            return Err(HttpClientError::Build("tls backend unavailable".into()));
        }
        self.insecure = true;
        self.rebuilds += 1;
        Ok(())
    }
}

/// Hands out clients and remembers the configs it was asked for.
#[derive(Debug, Default)]
pub struct MockClientFactory {
    configs: Mutex<Vec<SuiteConfig>>,
}

impl MockClientFactory {
    pub fn configs(&self) -> Vec<SuiteConfig> {
        self.configs.lock().unwrap().clone()
    }
}

impl ClientFactory for MockClientFactory {
    type Client = MockHttpClient;

    fn create(&self, config: &SuiteConfig) -> Result<MockHttpClient, HttpClientError> {
        self.configs.lock().unwrap().push(config.clone());
        Ok(MockHttpClient::default())
    }
}

/// Files held in memory.
#[derive(Debug, Default, Clone)]
pub struct MockFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    denied: Vec<PathBuf>,
}

impl MockFileSystem {
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &[u8]) -> Self {
        self.files.insert(path.into(), content.to_vec());
        self
    }

    pub fn with_denied(mut self, path: impl Into<PathBuf>) -> Self {
        self.denied.push(path.into());
        self
    }
}

impl FileSystem for MockFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        if self.denied.iter().any(|denied| denied == path) {
            return Err(FileSystemError::PermissionDenied(path.to_path_buf()));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FileSystemError::NotFound(path.to_path_buf()))
    }
}

pub type TestScenario = Scenario<MockHttpClient, MockFileSystem>;

pub fn scenario(base_url: &str) -> TestScenario {
    scenario_with_files(base_url, MockFileSystem::default())
}

pub fn scenario_with_file(path: &str, content: &[u8]) -> TestScenario {
    scenario_with_files("http://api", MockFileSystem::default().with_file(path, content))
}

pub fn scenario_with_files(base_url: &str, files: MockFileSystem) -> TestScenario {
    Scenario::new(
        &SuiteConfig::new(base_url),
        MockHttpClient::default(),
        files,
    )
}
