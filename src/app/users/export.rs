//! CSV 导出

use std::path::{Path, PathBuf};

use chrono::SecondsFormat;

use super::model::User;
use crate::core::error::Result;

pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Name",
    "Email",
    "Gender",
    "Status",
    "Created At",
    "Updated At",
];

/// 覆盖写入；全部记录先在内存中就绪
pub fn write_csv(path: &Path, users: &[User]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;

    for user in users {
        writer.write_record([
            user.id.to_string(),
            user.name.clone(),
            user.email.clone(),
            user.gender.clone(),
            user.status.clone(),
            user.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            user.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 在阻塞线程池上写文件，返回写入的数据行数
pub async fn export_users(path: PathBuf, users: Vec<User>) -> Result<usize> {
    tokio::task::spawn_blocking(move || -> Result<usize> {
        write_csv(&path, &users)?;
        Ok(users.len())
    })
    .await?
}
