//! Profile of the authenticated user

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{ProfileUpdate, UserProfile};

use super::conflict_as;
use crate::db::UserStore;
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct ProfileRepository {
    users: Arc<dyn UserStore>,
}

impl ProfileRepository {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn get(&self, user_id: i64) -> ServiceResult<UserProfile> {
        self.users
            .find_profile(user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).into())
    }

    /// Replace every profile field. The email may be changed, but not to one
    /// held by another account.
    pub async fn update(&self, user_id: i64, update: &ProfileUpdate) -> ServiceResult<UserProfile> {
        if self.users.email_taken_by_other(&update.email, user_id).await? {
            return Err(AppError::new(ErrorCode::EmailAlreadyExists).into());
        }

        let profile = self
            .users
            .update_profile(user_id, update)
            .await
            .map_err(conflict_as(ErrorCode::EmailAlreadyExists))?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

        tracing::info!(principal_id = user_id, "Profile updated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn update(email: &str) -> ProfileUpdate {
        ProfileUpdate {
            email: email.into(),
            name: "Ada Owner".into(),
            user_image_uri: "https://cdn.acme.io/ada.png".into(),
            company_name: "Acme Corp".into(),
            company_image_uri: "https://cdn.acme.io/logo.png".into(),
        }
    }

    #[tokio::test]
    async fn test_fresh_profile_has_only_email() {
        let store = Arc::new(MemoryStore::new());
        let user = store.insert_user("ada@acme.io", "hash").await.unwrap();
        let repo = ProfileRepository::new(store);

        let profile = repo.get(user.principal_id).await.unwrap();
        assert_eq!(profile.email, "ada@acme.io");
        assert!(profile.name.is_none());
        assert!(profile.company_image_uri.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let store = Arc::new(MemoryStore::new());
        let user = store.insert_user("ada@acme.io", "hash").await.unwrap();
        let repo = ProfileRepository::new(store);

        let profile = repo.update(user.principal_id, &update("ada@acme.io")).await.unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ada Owner"));
        assert_eq!(profile.company_name.as_deref(), Some("Acme Corp"));

        let moved = repo.update(user.principal_id, &update("ada@new.io")).await.unwrap();
        assert_eq!(moved.email, "ada@new.io");
        assert_eq!(repo.get(user.principal_id).await.unwrap(), moved);
    }

    #[tokio::test]
    async fn test_email_held_by_another_account() {
        let store = Arc::new(MemoryStore::new());
        let ada = store.insert_user("ada@acme.io", "hash").await.unwrap();
        store.insert_user("bob@acme.io", "hash").await.unwrap();
        let repo = ProfileRepository::new(store);

        let err = repo.update(ada.principal_id, &update("bob@acme.io")).await.unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::EmailAlreadyExists);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let repo = ProfileRepository::new(Arc::new(MemoryStore::new()));
        let err = repo.get(42).await.unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::UserNotFound);
    }
}
