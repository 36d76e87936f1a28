use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, Row};

use crate::entities::ProfileRecord;
use crate::error::{user_not_found_error, Error};

/// Member identity and program registration, owned by the CMS.
#[async_trait]
pub trait MemberDirectory {
    async fn is_registered(&self, uid: i64) -> Result<bool, Error>;
    async fn find_profile(&self, uid: i64) -> Result<ProfileRecord, Error>;
}

/// Read-only view over the CMS member tables. This crate never creates or
/// writes them.
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl MemberDirectory for PgStore {
    #[tracing::instrument(skip(self))]
    async fn is_registered(&self, uid: i64) -> Result<bool, Error> {
        let row = sqlx::query(
            "SELECT EXISTS (
                SELECT 1 FROM perm_registrations WHERE uid = $1 AND expires >= CURRENT_DATE
            ) AS registered",
        )
        .bind(uid)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("registered")?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_profile(&self, uid: i64) -> Result<ProfileRecord, Error> {
        let row = sqlx::query(
            "SELECT display_name, first_name, last_name, birthdate, member_id
             FROM members WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| user_not_found_error())?;

        Ok(ProfileRecord {
            uid,
            display_name: row.try_get("display_name")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            birthdate: row.try_get("birthdate")?,
            member_id: row.try_get("member_id")?,
        })
    }
}
