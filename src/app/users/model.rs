//! 用户数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 持久化的用户记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 带调用方指定 id 的待写入记录（批量导入、`insert_one`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewUser {
    pub id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(length(min = 1))]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewUser {
    pub fn with_fields(id: i64, fields: UserFields) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            gender: fields.gender,
            status: fields.status,
            created_at: None,
            updated_at: None,
        }
    }

    /// 缺省时间戳取 `now`
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            gender: self.gender,
            status: self.status,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

/// 四个可变字段，全部必填
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub status: String,
}

/// 更新补丁；缺失的字段保持原值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(gender) = self.gender {
            user.gender = gender;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
    }
}

/// 创建/更新请求体
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserInput {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub gender: Option<String>,
    #[validate(required, length(min = 1))]
    pub status: Option<String>,
}

impl UserInput {
    /// 校验必填字段并转换
    pub fn into_fields(self) -> Result<UserFields, validator::ValidationErrors> {
        self.validate()?;
        Ok(UserFields {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        })
    }

    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: self.name,
            email: self.email,
            gender: self.gender,
            status: self.status,
        }
    }
}

/// 外部数据源的响应包装：`{"data": [...]}`
#[derive(Debug, Deserialize)]
pub struct SourcePage {
    pub data: Vec<NewUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_requires_all_fields() {
        let input = UserInput {
            name: Some("Ann".into()),
            email: Some("a@x.com".into()),
            gender: Some("female".into()),
            status: None,
        };
        assert!(input.into_fields().is_err());

        let empty_name = UserInput {
            name: Some(String::new()),
            email: Some("a@x.com".into()),
            gender: Some("female".into()),
            status: Some("active".into()),
        };
        assert!(empty_name.into_fields().is_err());
    }

    #[test]
    fn input_converts_when_complete() {
        let input: UserInput = serde_json::from_value(serde_json::json!({
            "name": "Ann",
            "email": "a@x.com",
            "gender": "female",
            "status": "active"
        }))
        .unwrap();

        let fields = input.into_fields().unwrap();
        assert_eq!(fields.name, "Ann");
        assert_eq!(fields.status, "active");
    }

    #[test]
    fn patch_keeps_missing_fields() {
        let now = Utc::now();
        let mut user = NewUser::with_fields(
            1,
            UserFields {
                name: "Ann".into(),
                email: "a@x.com".into(),
                gender: "female".into(),
                status: "active".into(),
            },
        )
        .into_user(now);

        UserPatch {
            name: Some("Ann2".into()),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.name, "Ann2");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.updated_at, now);
    }

    #[test]
    fn source_page_decodes_upstream_shape() {
        let page: SourcePage = serde_json::from_value(serde_json::json!({
            "code": 200,
            "meta": { "pagination": { "page": 1 } },
            "data": [{
                "id": 1203,
                "name": "Dev Kaur",
                "email": "dev@example.com",
                "gender": "male",
                "status": "inactive",
                "created_at": "2021-03-02T03:50:03.849+05:30"
            }]
        }))
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, 1203);
        assert!(page.data[0].created_at.is_some());
        assert!(page.data[0].updated_at.is_none());
    }
}
