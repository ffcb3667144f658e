//! 内存存储：未配置数据库时使用，也用于测试

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::model::{NewUser, User, UserFields, UserPatch};
use super::store::{SortOrder, UserStore};
use crate::core::error::{Error, Result};

/// 按写入顺序保存记录
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(users: &[User]) -> Result<i64> {
    match users.iter().map(|u| u.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::InvalidInput(format!("no id available after {max}"))),
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list_all(&self, sort: SortOrder) -> Result<Vec<User>> {
        let mut users = self.users.read().await.clone();
        if sort == SortOrder::CreatedAtDesc {
            // 稳定排序：同一时间戳保持写入顺序
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_max_id(&self) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().max_by_key(|u| u.id).cloned())
    }

    async fn insert_many(&self, records: Vec<NewUser>) -> Result<u64> {
        let now = Utc::now();
        let count = records.len() as u64;
        let mut users = self.users.write().await;
        users.extend(records.into_iter().map(|r| r.into_user(now)));
        Ok(count)
    }

    async fn insert_one(&self, record: NewUser) -> Result<User> {
        let user = record.into_user(Utc::now());
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn insert_next(&self, fields: UserFields) -> Result<User> {
        let mut users = self.users.write().await;
        let user = NewUser::with_fields(next_id(&users)?, fields).into_user(Utc::now());
        users.push(user.clone());
        Ok(user)
    }

    async fn update_by_app_id(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            patch.apply(user);
            user.clone()
        }))
    }

    async fn delete_by_app_id(&self, id: i64) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.iter().position(|u| u.id == id) {
            Some(index) => {
                users.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
