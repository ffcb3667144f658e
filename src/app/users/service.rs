//! 用户业务服务：编排存储、外部数据源与 CSV 导出

use std::{path::PathBuf, sync::Arc};

use tracing::info;
use validator::Validate;

use super::export::export_users;
use super::model::{User, UserInput};
use super::source::UserSource;
use super::store::{SortOrder, UserStore};
use crate::core::error::Result;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    source: UserSource,
    export_path: PathBuf,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, source: UserSource, export_path: PathBuf) -> Self {
        Self {
            store,
            source,
            export_path,
        }
    }

    /// 拉取外部用户并整批写入；任一条不完整则整批不写
    pub async fn import_from_source(&self) -> Result<u64> {
        let records = self.source.fetch().await?;
        for record in &records {
            record.validate()?;
        }
        let inserted = self.store.insert_many(records).await?;
        info!(inserted, "imported users from upstream");
        Ok(inserted)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.store.list_all(SortOrder::CreatedAtDesc).await
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.store.find_by_id(id).await
    }

    pub async fn create_user(&self, input: UserInput) -> Result<User> {
        let fields = input.into_fields()?;
        let user = self.store.insert_next(fields).await?;
        info!(id = user.id, "created user");
        Ok(user)
    }

    pub async fn update_user(&self, id: i64, input: UserInput) -> Result<Option<User>> {
        self.store.update_by_app_id(id, input.into_patch()).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        let deleted = self.store.delete_by_app_id(id).await?;
        if deleted {
            info!(id, "deleted user");
        }
        Ok(deleted)
    }

    /// 导出全部记录到 CSV，返回行数
    pub async fn export_users(&self) -> Result<usize> {
        let users = self.store.list_all(SortOrder::Insertion).await?;
        let rows = export_users(self.export_path.clone(), users).await?;
        info!(rows, path = %self.export_path.display(), "exported users");
        Ok(rows)
    }

    pub async fn health(&self) -> Result<()> {
        self.store.ping().await
    }
}
