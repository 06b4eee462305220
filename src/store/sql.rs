use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};
use uuid::Uuid;

use super::GroupStore;
use crate::config::{StoreConfig, STORE_URL_KEY};
use crate::error::DirectoryError;
use crate::models::{Category, Group, GroupFields, GroupId, GroupPatch};

/// Gateway over a MySQL table of groups.
pub struct SqlGroupStore {
    pool: MySqlPool,
    table: String,
}

impl SqlGroupStore {
    /// Builds the pool without connecting, so an unreachable store surfaces on the
    /// first call instead of at startup.
    pub fn connect_lazy(config: &StoreConfig, timeout: Duration) -> Result<Self, DirectoryError> {
        let options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| {
                error!("Invalid {}: {}", STORE_URL_KEY, e);
                DirectoryError::Configuration(vec![STORE_URL_KEY])
            })?
            .password(&config.key);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(timeout)
            .connect_lazy_with(options);

        Ok(Self::with_pool(pool, &config.table))
    }

    pub fn with_pool(pool: MySqlPool, table: &str) -> Self {
        Self {
            pool,
            table: format!("`{table}`"),
        }
    }

    /// Creates the table when it does not exist yet.
    pub async fn run_migrations(&self) -> Result<(), DirectoryError> {
        let statement = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id            CHAR(36)      NOT NULL PRIMARY KEY,
                name          VARCHAR(255)  NOT NULL,
                description   TEXT          NOT NULL,
                link          VARCHAR(512)  NOT NULL,
                category      VARCHAR(64)   NOT NULL,
                membersCount  INT           NOT NULL DEFAULT 0,
                isVerified    BOOLEAN       NOT NULL DEFAULT FALSE,
                created_at    TIMESTAMP(3)  NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
                CHECK (name <> ''),
                CHECK (description <> ''),
                CHECK (link <> ''),
                CHECK (membersCount >= 0)
            )"#,
            self.table
        );

        sqlx::query(&statement).execute(&self.pool).await.map_err(|e| {
            error!("Failed to create table {}: {}", self.table, e);
            DirectoryError::from(e)
        })?;
        info!("Table {} is ready", self.table);
        Ok(())
    }

    async fn fetch_one(&self, id: &str) -> Result<Group, DirectoryError> {
        let row = sqlx::query(&format!("SELECT * FROM {} WHERE id = ?", self.table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;
        group_from_row(&row)
    }

    async fn exists(&self, id: &GroupId) -> Result<bool, DirectoryError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE id = ?", self.table))
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl GroupStore for SqlGroupStore {
    async fn fetch_all(&self) -> Result<Vec<Group>, DirectoryError> {
        let rows = sqlx::query(&format!("SELECT * FROM {} ORDER BY created_at DESC", self.table))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch groups: {}", e);
                DirectoryError::from(e)
            })?;

        rows.iter().map(group_from_row).collect()
    }

    async fn insert(&self, fields: &GroupFields) -> Result<Group, DirectoryError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(&format!(
            "INSERT INTO {} (id, name, description, link, category, membersCount, isVerified) \
             VALUES (?, ?, ?, ?, ?, ?, FALSE)",
            self.table
        ))
        .bind(&id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.link)
        .bind(fields.category.label())
        .bind(fields.members_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert group {}: {}", fields.name, e);
            DirectoryError::from(e)
        })?;

        // Read back so id, created_at and defaults come from the store
        let group = self.fetch_one(&id).await?;
        info!("Group {} created with ID: {}", group.name, group.id);
        Ok(group)
    }

    async fn update(&self, id: &GroupId, patch: &GroupPatch) -> Result<(), DirectoryError> {
        if patch.is_empty() {
            return if self.exists(id).await? {
                Ok(())
            } else {
                Err(DirectoryError::NotFound(id.to_string()))
            };
        }

        let mut builder = QueryBuilder::<MySql>::new(format!("UPDATE {} SET ", self.table));
        let mut columns = builder.separated(", ");
        if let Some(name) = &patch.name {
            columns.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(description) = &patch.description {
            columns.push("description = ").push_bind_unseparated(description.clone());
        }
        if let Some(link) = &patch.link {
            columns.push("link = ").push_bind_unseparated(link.clone());
        }
        if let Some(category) = patch.category {
            columns.push("category = ").push_bind_unseparated(category.label());
        }
        if let Some(members_count) = patch.members_count {
            columns.push("membersCount = ").push_bind_unseparated(members_count);
        }
        if let Some(is_verified) = patch.is_verified {
            columns.push("isVerified = ").push_bind_unseparated(is_verified);
        }
        builder.push(" WHERE id = ").push_bind(id.as_str());

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            error!("Failed to update group {}: {}", id, e);
            DirectoryError::from(e)
        })?;

        // MySQL reports zero affected rows for a write that changes nothing
        if result.rows_affected() == 0 && !self.exists(id).await? {
            return Err(DirectoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &GroupId) -> Result<(), DirectoryError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.table))
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete group {}: {}", id, e);
                DirectoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(id.to_string()));
        }
        info!("Group {} deleted", id);
        Ok(())
    }
}

/// Maps one stored row into a `Group`.
///
/// Column casing differs between deployments, so `membersCount`/`isVerified` fall back
/// to their lowercase spelling and `created_at` to its camelCase ones. A zero count or a
/// false flag also falls through to the other spelling. Nothing past this function sees
/// the raw column names.
pub fn group_from_row(row: &MySqlRow) -> Result<Group, DirectoryError> {
    let category: String = row.try_get("category")?;
    let members_count: i64 = first_nonzero(present_values(&["membersCount", "memberscount"], |c| {
        row.try_get::<Option<i64>, _>(c)
    })?);
    let is_verified: bool = present_values(&["isVerified", "isverified"], |c| {
        row.try_get::<Option<bool>, _>(c)
    })?
    .into_iter()
    .any(|verified| verified);
    let created_at: DateTime<Utc> = present_values(&["created_at", "createdAt", "createdat"], |c| {
        row.try_get::<Option<DateTime<Utc>>, _>(c)
    })?
    .into_iter()
    .next()
    .ok_or_else(|| DirectoryError::DataIntegrity("group row without created_at".into()))?;

    let id: String = row.try_get("id")?;
    let members_count = u32::try_from(members_count)
        .map_err(|_| DirectoryError::DataIntegrity(format!("group {id} has membersCount {members_count}")))?;

    Ok(Group {
        category: Category::from_str(&category)
            .map_err(|e| DirectoryError::DataIntegrity(format!("group {id}: {e}")))?,
        id: GroupId(id),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        link: row.try_get("link")?,
        members_count,
        is_verified,
        created_at: created_at.timestamp_millis(),
    })
}

/// Non-null values of `columns` in order, skipping columns the row does not have.
fn present_values<T>(
    columns: &[&str],
    mut get: impl FnMut(&str) -> Result<Option<T>, sqlx::Error>,
) -> Result<Vec<T>, sqlx::Error> {
    let mut values = Vec::new();
    for column in columns {
        match get(column) {
            Ok(Some(value)) => values.push(value),
            Ok(None) | Err(sqlx::Error::ColumnNotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(values)
}

fn first_nonzero(counts: Vec<i64>) -> i64 {
    counts.into_iter().find(|&count| count != 0).unwrap_or(0)
}
