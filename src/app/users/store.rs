//! 用户记录存储抽象
//!
//! 以应用层 `id` 定位记录；该字段不受唯一约束（导入的数据可能重复），
//! 按 `id` 更新和删除时只作用于最早写入的那一条。

use async_trait::async_trait;

use super::model::{NewUser, User, UserFields, UserPatch};
use crate::core::error::Result;

/// `list_all` 的排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// 按 `created_at` 降序
    #[default]
    CreatedAtDesc,
    /// 按写入顺序
    Insertion,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_all(&self, sort: SortOrder) -> Result<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// `id` 最大的记录
    async fn find_max_id(&self) -> Result<Option<User>>;

    /// 原样批量写入；任一条失败则整批失败
    async fn insert_many(&self, records: Vec<NewUser>) -> Result<u64>;

    async fn insert_one(&self, record: NewUser) -> Result<User>;

    /// 原子地分配 `max(id) + 1`（空表为 1）并写入
    async fn insert_next(&self, fields: UserFields) -> Result<User>;

    /// 不刷新 `updated_at`
    async fn update_by_app_id(&self, id: i64, patch: UserPatch) -> Result<Option<User>>;

    /// 没有匹配记录时返回 `false`，不是错误
    async fn delete_by_app_id(&self, id: i64) -> Result<bool>;

    async fn ping(&self) -> Result<()>;

    /// 关闭底层连接
    async fn close(&self) {}
}
