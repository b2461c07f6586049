use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local as LocalTime;

use crate::adapter::datastore::AbstInMemoryDStore;
use crate::constant::datastore::USER_COLLECTION;
use crate::error::{AppError, AppErrorCode};
use crate::model::{AddressModel, AddressSlot, UserProfileModel};
use crate::repository::{validate_user_id, AbsUserProfileRepo};

use super::{dump_user, load_user};

pub struct UserProfileInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl UserProfileInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(USER_COLLECTION).await?;
        Ok(Self { datastore: m })
    }

    async fn count_matches<F>(&self, cond: F) -> DefaultResult<usize, AppError>
    where
        F: Fn(&UserProfileModel) -> bool,
    {
        let rows = self.datastore.fetch_all(USER_COLLECTION).await?;
        let mut num = 0usize;
        for (k, raw) in rows {
            let usr = load_user(Some(raw), k.as_str())?;
            if cond(&usr) {
                num += 1;
            }
        }
        Ok(num)
    }
}

#[async_trait]
impl AbsUserProfileRepo for UserProfileInMemRepo {
    async fn create(&self, profile: UserProfileModel) -> DefaultResult<(), AppError> {
        let key = profile.id_.clone();
        let doc = dump_user(&profile)?;
        self.datastore.save(USER_COLLECTION, key, doc).await
    }

    async fn num_with_email(&self, email: &str) -> DefaultResult<usize, AppError> {
        self.count_matches(|u| u.email == email).await
    }

    async fn num_with_phone(&self, phone: &str) -> DefaultResult<usize, AppError> {
        self.count_matches(|u| u.phone == phone).await
    }

    async fn fetch_by_email(&self, email: &str) -> DefaultResult<UserProfileModel, AppError> {
        let rows = self.datastore.fetch_all(USER_COLLECTION).await?;
        for (k, raw) in rows {
            let usr = load_user(Some(raw), k.as_str())?;
            if usr.email == email {
                return Ok(usr);
            }
        }
        Err(AppError {
            code: AppErrorCode::UserNotExist,
            detail: Some("email-not-registered".to_string()),
        })
    }

    async fn update_tokens(
        &self,
        owner: &str,
        token: &str,
        refresh: &str,
    ) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        usr.token = token.to_string();
        usr.refresh_token = refresh.to_string();
        usr.updated_at = LocalTime::now().fixed_offset();
        let doc = dump_user(&usr)?;
        self.datastore.save_release(USER_COLLECTION, key, doc, lock)
    }

    async fn add_address(&self, owner: &str, addr: AddressModel) -> DefaultResult<bool, AppError> {
        let key = validate_user_id(owner)?;
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        let accepted = usr.try_add_address(addr);
        let doc = dump_user(&usr)?;
        self.datastore
            .save_release(USER_COLLECTION, key, doc, lock)?;
        Ok(accepted)
    }

    async fn edit_address(
        &self,
        owner: &str,
        slot: AddressSlot,
        addr: AddressModel,
    ) -> DefaultResult<bool, AppError> {
        let key = validate_user_id(owner)?;
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        let found = usr.edit_address(slot, addr);
        let doc = dump_user(&usr)?;
        self.datastore
            .save_release(USER_COLLECTION, key, doc, lock)?;
        Ok(found)
    }

    async fn clear_addresses(&self, owner: &str) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        usr.clear_addresses();
        let doc = dump_user(&usr)?;
        self.datastore.save_release(USER_COLLECTION, key, doc, lock)
    }
} // end of impl UserProfileInMemRepo
