//! App Context

use std::{path::PathBuf, sync::Arc};

use dealfeed::fixtures::{Fixture, FixtureError};
use thiserror::Error;

use crate::{
    client::DataClient,
    config::BackendConfig,
    domain::{
        deals::{DealsService, InMemoryDealsService, RestDealsService},
        users::{RestUsersService, UsersService},
    },
};

/// Failures building an [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// Neither a backend nor a fixture was configured.
    #[error("no backend configured; set DEALS_BACKEND_URL and DEALS_BACKEND_KEY or pass --fixture")]
    MissingBackend,

    /// The fixture set could not be loaded.
    #[error("failed to load fixture")]
    Fixture(#[from] FixtureError),
}

/// Where deals come from.
#[derive(Debug, Clone)]
pub enum DealSource {
    /// The hosted backend
    Backend,

    /// A named fixture set under a fixtures directory
    Fixture {
        /// Fixtures directory
        base_path: PathBuf,

        /// Fixture set name
        name: String,
    },
}

/// Services shared by every command.
#[derive(Clone)]
pub struct AppContext {
    /// Deal operations
    pub deals: Arc<dyn DealsService>,

    /// Signed-in user operations; only available against the backend.
    pub users: Option<Arc<dyn UsersService>>,
}

impl AppContext {
    /// Build application context for the given deal source.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is not configured or the fixture cannot be
    /// loaded.
    pub fn new(source: &DealSource, backend: &BackendConfig) -> Result<Self, AppInitError> {
        match source {
            DealSource::Backend => Self::from_backend(backend),
            DealSource::Fixture { base_path, name } => Self::from_fixture(base_path.clone(), name),
        }
    }

    /// Build application context against the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend URL or key is missing.
    pub fn from_backend(backend: &BackendConfig) -> Result<Self, AppInitError> {
        let config = backend.client_config().ok_or(AppInitError::MissingBackend)?;

        let client = DataClient::new(config);

        Ok(Self {
            deals: Arc::new(RestDealsService::new(client.clone())),
            users: Some(Arc::new(RestUsersService::new(client))),
        })
    }

    /// Build application context over a fixture set held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error when the fixture cannot be read or parsed.
    pub fn from_fixture(base_path: PathBuf, name: &str) -> Result<Self, AppInitError> {
        let mut fixture = Fixture::with_base_path(base_path);
        fixture.load(name)?;

        Ok(Self {
            deals: Arc::new(InMemoryDealsService::new(fixture.into_deals())),
            users: None,
        })
    }
}
