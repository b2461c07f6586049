use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local as LocalTime;
use mongodb::bson::{doc, to_document};
use mongodb::error::{ErrorKind, WriteFailure};

use crate::adapter::datastore::{run_with_deadline, AppDocDbStore};
use crate::constant::hard_limit;
use crate::error::{AppError, AppErrorCode};
use crate::model::{AddressModel, AddressSlot, UserProfileModel};
use crate::repository::{validate_user_id, AbsUserProfileRepo};

use super::pick_store;

const DUPLICATE_KEY_ERROR: i32 = 11000;

pub(crate) struct UserProfileDocDbRepo {
    _db: Arc<AppDocDbStore>,
}

impl UserProfileDocDbRepo {
    pub(crate) fn new(dbs: Vec<Arc<AppDocDbStore>>) -> DefaultResult<Self, AppError> {
        let _db = pick_store(&dbs)?;
        Ok(Self { _db })
    }

    async fn count_by_field(
        &self,
        filter: mongodb::bson::Document,
        op_label: &str,
    ) -> DefaultResult<usize, AppError> {
        let col = self._db.users();
        let num = run_with_deadline(hard_limit::SECONDS_READ_OP, op_label, async move {
            let n = col.count_documents(filter).await?;
            Ok(n)
        })
        .await?;
        Ok(num as usize)
    }

    async fn user_exists(&self, key: &str) -> DefaultResult<bool, AppError> {
        let num = self
            .count_by_field(doc! {"_id": key}, "profile-exists")
            .await?;
        Ok(num > 0)
    }
}

#[async_trait]
impl AbsUserProfileRepo for UserProfileDocDbRepo {
    async fn create(&self, profile: UserProfileModel) -> DefaultResult<(), AppError> {
        let col = self._db.users();
        run_with_deadline(hard_limit::SECONDS_MUTATE_OP, "profile-create", async move {
            col.insert_one(&profile).await.map_err(|e| {
                // a unique-index violation on email / phone surfaces as a
                // duplicate-key write error
                if let ErrorKind::Write(WriteFailure::WriteError(ref we)) = *e.kind {
                    if we.code == DUPLICATE_KEY_ERROR {
                        return AppError {
                            code: AppErrorCode::DuplicateIdentity,
                            detail: Some(e.to_string()),
                        };
                    }
                }
                AppError::from(e)
            })?;
            Ok(())
        })
        .await
    }

    async fn num_with_email(&self, email: &str) -> DefaultResult<usize, AppError> {
        self.count_by_field(doc! {"email": email}, "profile-count-email")
            .await
    }

    async fn num_with_phone(&self, phone: &str) -> DefaultResult<usize, AppError> {
        self.count_by_field(doc! {"phone": phone}, "profile-count-phone")
            .await
    }

    async fn fetch_by_email(&self, email: &str) -> DefaultResult<UserProfileModel, AppError> {
        let col = self._db.users();
        let filter = doc! {"email": email};
        let result =
            run_with_deadline(hard_limit::SECONDS_READ_OP, "profile-fetch-email", async move {
                let found = col.find_one(filter).await?;
                Ok(found)
            })
            .await?;
        result.ok_or(AppError {
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
        let now = LocalTime::now().fixed_offset();
        let filter = doc! {"_id": key.as_str()};
        let update = doc! {"$set": {
            "token": token,
            "refresh_token": refresh,
            "updated_at": now.to_rfc3339(),
        }};
        let col = self._db.users();
        let result =
            run_with_deadline(hard_limit::SECONDS_MUTATE_OP, "profile-update-tokens", async move {
                let r = col.update_one(filter, update).await?;
                Ok(r)
            })
            .await?;
        if result.matched_count == 0 {
            Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            })
        } else {
            Ok(())
        }
    }

    async fn add_address(&self, owner: &str, addr: AddressModel) -> DefaultResult<bool, AppError> {
        let key = validate_user_id(owner)?;
        let addr_doc = to_document(&addr).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string()),
        })?;
        // guarded push, it only matches while the last slot is still free,
        // the capacity check and the append are one atomic step
        let last_slot = hard_limit::MAX_NUM_ADDRESSES_PER_USER - 1;
        let mut filter = doc! {"_id": key.as_str()};
        filter.insert(
            format!("addresses.{}", last_slot),
            doc! {"$exists": false},
        );
        let update = doc! {"$push": {"addresses": addr_doc}};
        let col = self._db.users();
        let result =
            run_with_deadline(hard_limit::SECONDS_MUTATE_OP, "profile-add-address", async move {
                let r = col.update_one(filter, update).await?;
                Ok(r)
            })
            .await?;
        if result.matched_count > 0 {
            Ok(true)
        } else if self.user_exists(key.as_str()).await? {
            Ok(false)
        } else {
            Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            })
        }
    } // end of fn add_address

    async fn edit_address(
        &self,
        owner: &str,
        slot: AddressSlot,
        addr: AddressModel,
    ) -> DefaultResult<bool, AppError> {
        let key = validate_user_id(owner)?;
        let addr_doc = to_document(&addr).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string()),
        })?;
        let slot_path = format!("addresses.{}", slot.index());
        // rewrite in place, never extend the array through an edit
        let mut filter = doc! {"_id": key.as_str()};
        filter.insert(slot_path.as_str(), doc! {"$exists": true});
        let mut set_doc = mongodb::bson::Document::new();
        set_doc.insert(slot_path.as_str(), addr_doc);
        let update = doc! {"$set": set_doc};
        let col = self._db.users();
        let result =
            run_with_deadline(hard_limit::SECONDS_MUTATE_OP, "profile-edit-address", async move {
                let r = col.update_one(filter, update).await?;
                Ok(r)
            })
            .await?;
        if result.matched_count > 0 {
            Ok(true)
        } else if self.user_exists(key.as_str()).await? {
            Ok(false)
        } else {
            Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            })
        }
    } // end of fn edit_address

    async fn clear_addresses(&self, owner: &str) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let filter = doc! {"_id": key.as_str()};
        let update = doc! {"$set": {"addresses": []}};
        let col = self._db.users();
        let result = run_with_deadline(
            hard_limit::SECONDS_MUTATE_OP,
            "profile-clear-addresses",
            async move {
                let r = col.update_one(filter, update).await?;
                Ok(r)
            },
        )
        .await?;
        if result.matched_count == 0 {
            Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            })
        } else {
            Ok(())
        }
    }
} // end of impl UserProfileDocDbRepo
