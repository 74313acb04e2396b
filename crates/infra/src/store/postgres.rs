//! Postgres-backed directory store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `UniqueViolation` | Name taken by a concurrent writer |
//! | Database (foreign key violation) | `23503` | `ForeignKeyViolation` | Role/permission vanished, or role still referenced on delete |
//! | Database (other) | Any other | `Backend` | Check constraints, column width, etc. |
//! | PoolClosed / Io / other | N/A | `Backend` | Connection failures |
//!
//! ## Thread Safety
//!
//! `PostgresDirectoryStore` is `Send + Sync`; all access goes through the
//! SQLx connection pool.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use tracing::instrument;

use rolegate_core::{
    NewRole, NewUser, PageWindow, Permission, PermissionId, Role, RoleDetails, RoleFilter,
    RoleId, RoleSummary, User, UserFilter, UserId, UserSummary,
};

use super::r#trait::{DirectoryStore, StoreError, StoreResult};
use crate::config::StoreConfig;

/// Postgres-backed directory store.
///
/// Schema and seed data are applied by the embedded migrations in
/// `crates/infra/migrations` when connecting through [`PostgresDirectoryStore::connect`].
#[derive(Debug, Clone)]
pub struct PostgresDirectoryStore {
    pool: Arc<PgPool>,
}

impl PostgresDirectoryStore {
    /// Wrap an existing pool. Migrations are not run.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool from `config` and bring the schema up to date.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let url = config.database_url.as_deref().ok_or_else(|| {
            StoreError::Backend("DATABASE_URL must be set for the Postgres store".to_string())
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        tracing::info!(max_connections = config.max_connections, "postgres pool ready");

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Apply pending schema migrations (idempotent).
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&*self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to apply migrations: {e}")))?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

fn push_role_predicates(qb: &mut QueryBuilder<'_, Postgres>, filter: &RoleFilter) {
    qb.push(" WHERE TRUE");
    if let Some(search) = &filter.search {
        // strpos: case-sensitive, no LIKE wildcard escaping needed.
        qb.push(" AND strpos(r.name, ");
        qb.push_bind(search.clone());
        qb.push(") > 0");
    }
    if let Some(permission_id) = filter.permission_id {
        qb.push(
            " AND EXISTS (SELECT 1 FROM role_permissions rp WHERE rp.role_id = r.id AND rp.permission_id = ",
        );
        qb.push_bind(permission_id.get());
        qb.push(")");
    }
    if let Some(active) = filter.active {
        qb.push(" AND r.active = ");
        qb.push_bind(active);
    }
}

fn push_user_predicates(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");
    if let Some(search) = &filter.search {
        qb.push(" AND strpos(u.name, ");
        qb.push_bind(search.clone());
        qb.push(") > 0");
    }
    if let Some(role_id) = filter.role_id {
        qb.push(" AND u.role_id = ");
        qb.push_bind(role_id.get());
    }
    if let Some(active) = filter.active {
        qb.push(" AND u.active = ");
        qb.push_bind(active);
    }
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, window: Option<PageWindow>) {
    if let Some(w) = window {
        qb.push(" LIMIT ");
        qb.push_bind(i64::try_from(w.limit).unwrap_or(i64::MAX));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(w.offset).unwrap_or(i64::MAX));
    }
}

fn to_i32s<T: Copy + Into<i32>>(ids: &[T]) -> Vec<i32> {
    ids.iter().map(|id| (*id).into()).collect()
}

async fn insert_role_permissions(
    tx: &mut Transaction<'_, Postgres>,
    role_id: i32,
    permission_ids: &[PermissionId],
) -> StoreResult<()> {
    if permission_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission_id)
        SELECT $1, UNNEST($2::int4[])
        "#,
    )
    .bind(role_id)
    .bind(to_i32s(permission_ids))
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_role_permissions", e))?;
    Ok(())
}

async fn rollback(tx: Transaction<'_, Postgres>) -> StoreResult<()> {
    tx.rollback()
        .await
        .map_err(|e| map_sqlx_error("rollback", e))
}

#[async_trait]
impl DirectoryStore for PostgresDirectoryStore {
    #[instrument(skip(self), err)]
    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        let rows = sqlx::query("SELECT id, name, active FROM permissions ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_permissions", e))?;
        rows.iter().map(permission_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn find_permissions(&self, ids: &[PermissionId]) -> StoreResult<Vec<Permission>> {
        let rows = sqlx::query(
            "SELECT id, name, active FROM permissions WHERE id = ANY($1) ORDER BY id",
        )
        .bind(to_i32s(ids))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_permissions", e))?;
        rows.iter().map(permission_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn find_role(&self, id: RoleId) -> StoreResult<Option<RoleDetails>> {
        let row = sqlx::query("SELECT id, name, active FROM roles WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_role", e))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let role = role_from_row(&row)?;

        let permission_ids: Vec<i32> = sqlx::query_scalar(
            "SELECT permission_id FROM role_permissions WHERE role_id = $1 ORDER BY permission_id",
        )
        .bind(id.get())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_role_permissions", e))?;

        Ok(Some(RoleDetails {
            role,
            permission_ids: permission_ids.into_iter().map(PermissionId::new).collect(),
        }))
    }

    #[instrument(skip(self), err)]
    async fn role_exists(&self, id: RoleId) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("role_exists", e))
    }

    #[instrument(skip(self), err)]
    async fn role_name_taken(&self, name: &str, exclude: Option<RoleId>) -> StoreResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM roles WHERE name = $1 AND ($2::int4 IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude.map(RoleId::get))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("role_name_taken", e))
    }

    #[instrument(skip(self), err)]
    async fn count_roles(&self, filter: &RoleFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM roles r");
        push_role_predicates(&mut qb, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_roles", e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    #[instrument(skip(self), err)]
    async fn list_roles(
        &self,
        filter: &RoleFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<RoleSummary>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                r.id,
                r.name,
                r.active,
                ARRAY(
                    SELECT p.name::text
                    FROM role_permissions rp
                    JOIN permissions p ON p.id = rp.permission_id
                    WHERE rp.role_id = r.id
                    ORDER BY p.id
                ) AS permissions
            FROM roles r
            "#,
        );
        push_role_predicates(&mut qb, filter);
        qb.push(" ORDER BY r.id");
        push_window(&mut qb, window);

        let rows = qb
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_roles", e))?;

        rows.iter()
            .map(|row| {
                Ok(RoleSummary {
                    id: RoleId::new(row.try_get("id").map_err(decode_error)?),
                    name: row.try_get("name").map_err(decode_error)?,
                    active: row.try_get("active").map_err(decode_error)?,
                    permissions: row.try_get("permissions").map_err(decode_error)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn insert_role(&self, role: &NewRole) -> StoreResult<RoleId> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let id: i32 = sqlx::query_scalar("INSERT INTO roles (name, active) VALUES ($1, $2) RETURNING id")
            .bind(role.name.as_str())
            .bind(role.active)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_role", e))?;

        insert_role_permissions(&mut tx, id, &role.permission_ids).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(RoleId::new(id))
    }

    #[instrument(skip(self), err)]
    async fn update_role(&self, id: RoleId, role: &NewRole) -> StoreResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let updated = sqlx::query("UPDATE roles SET name = $1, active = $2 WHERE id = $3")
            .bind(role.name.as_str())
            .bind(role.active)
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_role", e))?;

        if updated.rows_affected() == 0 {
            rollback(tx).await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("clear_role_permissions", e))?;

        insert_role_permissions(&mut tx, id.get(), &role.permission_ids).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(true)
    }

    #[instrument(skip(self), err)]
    async fn delete_role(&self, id: RoleId) -> StoreResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("clear_role_permissions", e))?;

        // users.role_id is ON DELETE RESTRICT: a referenced role fails with 23503
        // and the transaction rolls back on drop.
        let deleted = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_role", e))?;

        if deleted.rows_affected() == 0 {
            rollback(tx).await?;
            return Ok(false);
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(true)
    }

    #[instrument(skip(self), err)]
    async fn role_in_use(&self, id: RoleId) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role_id = $1)")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("role_in_use", e))
    }

    #[instrument(skip(self), err)]
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, name, active, role_id FROM users WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn user_name_taken(&self, name: &str, exclude: Option<UserId>) -> StoreResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE name = $1 AND ($2::int4 IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude.map(UserId::get))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("user_name_taken", e))
    }

    #[instrument(skip(self), err)]
    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u");
        push_user_predicates(&mut qb, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_users", e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    #[instrument(skip(self), err)]
    async fn list_users(
        &self,
        filter: &UserFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<UserSummary>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT u.id, u.name, u.active, r.name AS role
            FROM users u
            JOIN roles r ON r.id = u.role_id
            "#,
        );
        push_user_predicates(&mut qb, filter);
        qb.push(" ORDER BY u.id");
        push_window(&mut qb, window);

        let rows = qb
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;

        rows.iter()
            .map(|row| {
                Ok(UserSummary {
                    id: UserId::new(row.try_get("id").map_err(decode_error)?),
                    name: row.try_get("name").map_err(decode_error)?,
                    role: row.try_get("role").map_err(decode_error)?,
                    active: row.try_get("active").map_err(decode_error)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn insert_user(&self, user: &NewUser) -> StoreResult<UserId> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO users (name, active, role_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user.name.as_str())
        .bind(user.active)
        .bind(user.role_id.get())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(UserId::new(id))
    }

    #[instrument(skip(self), err)]
    async fn update_user(&self, id: UserId, user: &NewUser) -> StoreResult<bool> {
        let updated = sqlx::query("UPDATE users SET name = $1, active = $2, role_id = $3 WHERE id = $4")
            .bind(user.name.as_str())
            .bind(user.active)
            .bind(user.role_id.get())
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_user", e))?;
        Ok(updated.rows_affected() > 0)
    }
}

fn permission_from_row(row: &PgRow) -> StoreResult<Permission> {
    Ok(Permission {
        id: PermissionId::new(row.try_get("id").map_err(decode_error)?),
        name: row.try_get("name").map_err(decode_error)?,
        active: row.try_get("active").map_err(decode_error)?,
    })
}

fn role_from_row(row: &PgRow) -> StoreResult<Role> {
    Ok(Role {
        id: RoleId::new(row.try_get("id").map_err(decode_error)?),
        name: row.try_get("name").map_err(decode_error)?,
        active: row.try_get("active").map_err(decode_error)?,
    })
}

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    Ok(User {
        id: UserId::new(row.try_get("id").map_err(decode_error)?),
        name: row.try_get("name").map_err(decode_error)?,
        active: row.try_get("active").map_err(decode_error)?,
        role_id: RoleId::new(row.try_get("role_id").map_err(decode_error)?),
    })
}

fn decode_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("failed to decode row: {err}"))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::UniqueViolation(msg),
                Some("23503") => StoreError::ForeignKeyViolation(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        other => StoreError::Backend(format!("{} failed: {}", operation, other)),
    }
}
