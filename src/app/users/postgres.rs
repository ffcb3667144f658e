//! PostgreSQL 存储

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPool, Postgres, QueryBuilder};

use super::model::{NewUser, User, UserFields, UserPatch};
use super::store::{SortOrder, UserStore};
use crate::core::error::Result;

const USER_COLUMNS: &str = "id, name, email, gender, status, created_at, updated_at";

/// 每行绑定的参数个数
const BINDS_PER_ROW: usize = 7;

/// 单条 INSERT 的最大行数，Postgres 每条语句最多 65535 个绑定参数
const INSERT_CHUNK_ROWS: usize = u16::MAX as usize / BINDS_PER_ROW;

/// 串行化 `insert_next` 的 advisory lock 键
const NEXT_ID_LOCK: i64 = 0x7573_6572_735f_6964;

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_all(&self, sort: SortOrder) -> Result<Vec<User>> {
        let order = match sort {
            SortOrder::CreatedAtDesc => "created_at DESC, pk",
            SortOrder::Insertion => "pk",
        };
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {order}"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 ORDER BY pk LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_max_id(&self) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id DESC, pk LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_many(&self, records: Vec<NewUser>) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        // 分块多值 INSERT，同一事务内整批要么全部写入要么全部失败
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        let mut records = records.into_iter().peekable();

        while records.peek().is_some() {
            let chunk: Vec<NewUser> = records.by_ref().take(INSERT_CHUNK_ROWS).collect();
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO users ({USER_COLUMNS}) "
            ));
            builder.push_values(chunk, |mut row, record| {
                let user = record.into_user(now);
                row.push_bind(user.id)
                    .push_bind(user.name)
                    .push_bind(user.email)
                    .push_bind(user.gender)
                    .push_bind(user.status)
                    .push_bind(user.created_at)
                    .push_bind(user.updated_at);
            });

            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_one(&self, record: NewUser) -> Result<User> {
        let user = record.into_user(Utc::now());
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.gender)
        .bind(&user.status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_next(&self, fields: UserFields) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(NEXT_ID_LOCK)
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, gender, status) \
             SELECT COALESCE(MAX(id), 0) + 1, $1, $2, $3, $4 FROM users \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.gender)
        .bind(&fields.status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn update_by_app_id(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 gender = COALESCE($4, gender), \
                 status = COALESCE($5, status) \
             WHERE pk = (SELECT pk FROM users WHERE id = $1 ORDER BY pk LIMIT 1) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.gender)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_by_app_id(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM users WHERE pk = (SELECT pk FROM users WHERE id = $1 ORDER BY pk LIMIT 1)",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
