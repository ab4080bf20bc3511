//! User service - registration, login and address-linked CRUD.
//!
//! Every write that touches both a user and its address runs inside one
//! transaction obtained from the unit of work.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use auth_service_lib::{CredentialService, TokenResponse, DUMMY_PASSWORD_HASH};
use common::{AppError, AppResult, OptionExt};
use domain::{validate, CreateUser, NewAddress, NewUser, UpdateResult, UpdateUser, User};

use crate::infra::{TransactionContext, UnitOfWork};
use crate::repository::{AddressRepository, UserRepository};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a user together with its address
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Issue a token for a user whose credentials were already checked
    async fn login(&self, user: &User) -> AppResult<TokenResponse>;

    /// Check an email/password pair, then issue a token
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Register several users atomically: all of them or none
    async fn create_many_users(&self, inputs: Vec<CreateUser>) -> AppResult<Vec<User>>;

    /// List all users with their addresses
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Get user by ID
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<User>;

    /// Get user by email
    async fn find_user_by_email(&self, email: &str) -> AppResult<User>;

    /// Partially update a user. An unknown ID affects zero rows.
    async fn update_user_by_id(&self, id: Uuid, patch: UpdateUser) -> AppResult<UpdateResult>;

    /// Delete a user and its address
    async fn remove_user_by_id(&self, id: Uuid) -> AppResult<()>;
}

/// Validated input with the password already hashed.
struct PendingUser {
    email: String,
    name: String,
    age: i32,
    password_hash: String,
    address: NewAddress,
}

/// Concrete implementation of UserService.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    credentials: Arc<dyn CredentialService>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance
    pub fn new(uow: Arc<U>, credentials: Arc<dyn CredentialService>) -> Self {
        Self { uow, credentials }
    }

    /// Validate and hash outside the transaction; Argon2 is slow.
    fn prepare(&self, input: CreateUser) -> AppResult<PendingUser> {
        validate(&input)?;
        let password_hash = self.credentials.hash_password(&input.password)?;

        Ok(PendingUser {
            email: input.email,
            name: input.name,
            age: input.age,
            password_hash,
            address: input.address,
        })
    }
}

/// Insert the address, then the user that owns it.
async fn insert_pending(ctx: &TransactionContext<'_>, pending: PendingUser) -> AppResult<User> {
    let address = ctx.addresses().save(pending.address).await?;

    ctx.users()
        .save(NewUser {
            email: pending.email,
            name: pending.name,
            age: pending.age,
            password_hash: pending.password_hash,
            address,
        })
        .await
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        let pending = self.prepare(input)?;

        let user = crate::with_transaction!(self.uow, |ctx| insert_pending(&ctx, pending).await)?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn login(&self, user: &User) -> AppResult<TokenResponse> {
        self.credentials.generate_jwt(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(email).await?;

        // Verify even when the email is unknown so both paths cost the same
        let hash = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |u| u.password_hash.as_str());
        let password_valid = self.credentials.verify_password(password, hash);

        match user {
            Some(user) if password_valid => self.login(&user).await,
            _ => {
                warn!("Rejected login attempt");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn create_many_users(&self, inputs: Vec<CreateUser>) -> AppResult<Vec<User>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let pending = inputs
            .into_iter()
            .map(|input| self.prepare(input))
            .collect::<AppResult<Vec<_>>>()?;
        let count = pending.len();

        let result = crate::with_transaction!(self.uow, |ctx| {
            let mut created = Vec::with_capacity(pending.len());
            for user in pending {
                created.push(insert_pending(&ctx, user).await?);
            }
            Ok::<_, AppError>(created)
        });

        match result {
            Ok(users) => {
                info!(count, "Batch of users created");
                Ok(users)
            }
            Err(e) => {
                warn!(count, error = %e, "Batch creation rolled back");
                Err(e)
            }
        }
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        self.uow.users().find_all().await
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("there is no user with ID {}", id))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_email(email)
            .await?
            .ok_or_not_found(format!("there is no user with email->({})", email))
    }

    async fn update_user_by_id(&self, id: Uuid, patch: UpdateUser) -> AppResult<UpdateResult> {
        validate(&patch)?;

        let result = self.uow.users().update(id, patch).await?;
        debug!(user_id = %id, rows_affected = result.rows_affected, "User updated");
        Ok(result)
    }

    async fn remove_user_by_id(&self, id: Uuid) -> AppResult<()> {
        crate::with_transaction!(self.uow, |ctx| {
            let user = ctx
                .users()
                .find_by_id(id)
                .await?
                .ok_or_not_found(format!("there is no user with ID {}", id))?;

            ctx.users().delete(user.id).await?;
            ctx.addresses().delete(user.address.id).await
        })?;

        info!(user_id = %id, "User removed");
        Ok(())
    }
}
