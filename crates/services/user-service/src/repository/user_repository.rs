//! User repository implementation.
//!
//! Every read joins the owned address, so callers always get a complete
//! [`User`].

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::address::Entity as AddressEntity;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{NewUser, UpdateResult, UpdateUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, address included
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address, address included
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users ordered by email
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Insert a user referencing an already persisted address.
    /// A taken email is reported as a conflict.
    async fn save(&self, fields: NewUser) -> AppResult<User>;

    /// Apply a partial update. Unknown IDs affect zero rows.
    async fn update(&self, id: Uuid, patch: UpdateUser) -> AppResult<UpdateResult>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// User repository bound to the connection pool
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email(&self.db, email).await
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        find_all(&self.db).await
    }

    async fn save(&self, fields: NewUser) -> AppResult<User> {
        save(&self.db, fields).await
    }

    async fn update(&self, id: Uuid, patch: UpdateUser) -> AppResult<UpdateResult> {
        update(&self.db, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete(&self.db, id).await
    }
}

// Queries shared by the pooled and transactional repositories.

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    let result = UserEntity::find_by_id(id)
        .find_also_related(AddressEntity)
        .one(db)
        .await
        .map_err(AppError::from)?;

    result
        .map(|(user, address)| user.into_domain(address))
        .transpose()
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<User>> {
    let result = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .find_also_related(AddressEntity)
        .one(db)
        .await
        .map_err(AppError::from)?;

    result
        .map(|(user, address)| user.into_domain(address))
        .transpose()
}

pub(crate) async fn find_all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<User>> {
    let rows = UserEntity::find()
        .find_also_related(AddressEntity)
        .order_by_asc(user::Column::Email)
        .all(db)
        .await
        .map_err(AppError::from)?;

    rows.into_iter()
        .map(|(user, address)| user.into_domain(address))
        .collect()
}

pub(crate) async fn save<C: ConnectionTrait>(db: &C, fields: NewUser) -> AppResult<User> {
    let NewUser {
        email,
        name,
        age,
        password_hash,
        address,
    } = fields;

    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.clone()),
        name: Set(name),
        age: Set(age),
        password_hash: Set(password_hash),
        address_id: Set(address.id),
    };

    let model = active_model
        .insert(db)
        .await
        .map_err(|e| map_unique_violation(e, &email))?;

    Ok(model.with_address(address))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    patch: UpdateUser,
) -> AppResult<UpdateResult> {
    if patch.is_empty() {
        return Ok(UpdateResult { rows_affected: 0 });
    }

    let UpdateUser { email, name, age } = patch;
    let conflict_email = email.clone().unwrap_or_default();

    let mut query = UserEntity::update_many().filter(user::Column::Id.eq(id));
    if let Some(email) = email {
        query = query.col_expr(user::Column::Email, Expr::value(email));
    }
    if let Some(name) = name {
        query = query.col_expr(user::Column::Name, Expr::value(name));
    }
    if let Some(age) = age {
        query = query.col_expr(user::Column::Age, Expr::value(age));
    }

    let result = query
        .exec(db)
        .await
        .map_err(|e| map_unique_violation(e, &conflict_email))?;

    Ok(UpdateResult {
        rows_affected: result.rows_affected,
    })
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = UserEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found(format!("there is no user with ID {}", id)));
    }

    Ok(())
}

/// The only unique columns a write can collide on are the email and the
/// freshly generated address ID, so a violation means the email is taken.
fn map_unique_violation(err: DbErr, email: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::conflict(format!("{} is already registered", email))
        }
        _ => AppError::from(err),
    }
}
