//! Users service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    client::{DataClient, Select},
    domain::users::{
        data::{LocationRow, LocationUpdate, User},
        errors::UsersServiceError,
    },
};

/// Table holding user profiles.
pub const USERS_TABLE: &str = "users";

/// Table holding preferred user locations.
pub const USER_LOCATIONS_TABLE: &str = "user_locations";

/// Users service over the hosted backend.
#[derive(Debug, Clone)]
pub struct RestUsersService {
    client: DataClient,
}

impl RestUsersService {
    #[must_use]
    pub fn new(client: DataClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UsersService for RestUsersService {
    async fn current_user(&self) -> Result<Option<User>, UsersServiceError> {
        let Some(account) = self.client.auth_user().await? else {
            return Ok(None);
        };

        let select = Select::table(USERS_TABLE).eq("id", &account.id);

        Ok(self.client.select_single(&select).await?)
    }

    async fn update_location(&self, location: LocationUpdate) -> Result<(), UsersServiceError> {
        let account = self
            .client
            .auth_user()
            .await?
            .ok_or(UsersServiceError::NotSignedIn)?;

        let row = LocationRow {
            user_id: &account.id,
            location: &location,
            updated_at: Timestamp::now(),
        };

        Ok(self.client.upsert(USER_LOCATIONS_TABLE, &row).await?)
    }
}

#[automock]
#[async_trait]
/// Operations on the signed-in user.
pub trait UsersService: Send + Sync {
    /// Profile of the signed-in user, or `None` without a session.
    async fn current_user(&self) -> Result<Option<User>, UsersServiceError>;

    /// Stores the signed-in user's preferred location.
    async fn update_location(&self, location: LocationUpdate) -> Result<(), UsersServiceError>;
}
