use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::services::PasswordPolicy;
use crate::stores::RatingStore;
use crate::types::db::role::RoleName;
use crate::types::db::{favorite, refresh_token, role, user, watchlist};
use crate::types::internal::account::{NewUser, UserUpdate};
use crate::types::internal::auth::AuthenticatedUser;
use crate::types::internal::catalog::{Page, PageRequest};

const MAX_USERNAME_LENGTH: usize = 150;
const MAX_PERSON_NAME_LENGTH: usize = 150;

fn clean_username(username: &str) -> Result<String, CredentialError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CredentialError::invalid_field("username", "must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CredentialError::invalid_field(
            "username",
            format!("must be at most {} characters", MAX_USERNAME_LENGTH),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        return Err(CredentialError::invalid_field(
            "username",
            "may only contain letters, digits and @ . + - _",
        ));
    }
    Ok(username.to_string())
}

/// Emails are stored lowercased so the login lookup is case-insensitive
fn clean_email(email: &str) -> Result<String, CredentialError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid {
        return Err(CredentialError::invalid_field("email", "must be a valid email address"));
    }
    Ok(email)
}

fn clean_person_name(field: &str, value: &str) -> Result<String, CredentialError> {
    let value = value.trim();
    if value.chars().count() > MAX_PERSON_NAME_LENGTH {
        return Err(CredentialError::invalid_field(
            field,
            format!("must be at most {} characters", MAX_PERSON_NAME_LENGTH),
        ));
    }
    Ok(value.to_string())
}

/// Accounts, roles and refresh tokens
///
/// Passwords are hashed with Argon2id using the pepper from `SecretManager`
/// as the Argon2 secret parameter.
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
    password_policy: PasswordPolicy,
    rating_store: Arc<RatingStore>,
}

impl CredentialStore {
    /// Create a new CredentialStore
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    /// * `rating_store` - Used by account deletion so rated movies get recomputed
    pub fn new(db: DatabaseConnection, password_pepper: String, rating_store: Arc<RatingStore>) -> Self {
        Self {
            db,
            password_pepper,
            password_policy: PasswordPolicy::new(),
            rating_store,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", format!("Failed to initialize Argon2 with secret: {}", e)))
    }

    fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        Ok(self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?
            .to_string())
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, InternalError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| InternalError::crypto("password_hash_parse", e.to_string()))?;
        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn check_password(&self, password: &str, username: &str) -> Result<(), CredentialError> {
        self.password_policy
            .validate(password, Some(username))
            .map_err(|e| CredentialError::invalid_field("password", e.to_string()))
    }

    // ----- roles -----

    /// Fetch a role row, creating it on first use
    pub async fn get_or_create_role(&self, role_name: RoleName) -> Result<role::Model, InternalError> {
        let existing = role::Entity::find()
            .filter(role::Column::Role.eq(role_name))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_role", e))?;
        if let Some(existing) = existing {
            return Ok(existing);
        }

        role::ActiveModel {
            role: Set(role_name),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_role", e))
    }

    pub async fn list_roles(&self) -> Result<Vec<role::Model>, InternalError> {
        role::Entity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_roles", e))
    }

    /// Role name of an account, `None` when it has no role
    pub async fn role_of(&self, user: &user::Model) -> Result<Option<RoleName>, InternalError> {
        let Some(role_id) = user.role_id else {
            return Ok(None);
        };
        let role = role::Entity::find_by_id(role_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_role_by_id", e))?;
        Ok(role.map(|r| r.role))
    }

    // ----- accounts -----

    /// Create an account after validating every field and the password policy
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user
    /// * `Err(InternalError)` - Invalid field, duplicate email/username, or database error
    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        let username = clean_username(&new_user.username)?;
        let email = clean_email(&new_user.email)?;
        let first_name = clean_person_name("first_name", &new_user.first_name)?;
        let last_name = clean_person_name("last_name", &new_user.last_name)?;
        self.check_password(&new_user.password, &username)?;

        self.ensure_email_free(&email, None).await?;
        self.ensure_username_free(&username, None).await?;

        let role = self.get_or_create_role(new_user.role).await?;
        let password_hash = self.hash_password(&new_user.password)?;
        let now = Utc::now().timestamp();

        let user = user::ActiveModel {
            username: Set(username),
            email: Set(email),
            first_name: Set(first_name),
            last_name: Set(last_name),
            password_hash: Set(password_hash),
            role_id: Set(Some(role.id)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_user", e))?;

        tracing::info!("User created: {} ({}) with role {:?}", user.username, user.id, role.role);
        Ok(user)
    }

    /// Verify email and password, returning the active account
    ///
    /// Unknown email, wrong password and inactive account all fail the same way.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<user::Model, InternalError> {
        let email = email.trim().to_lowercase();
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?
            .ok_or(CredentialError::InvalidCredentials)?;

        if !user.is_active || !self.verify_password(password, &user.password_hash)? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i32) -> Result<user::Model, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))?
            .ok_or_else(|| CredentialError::UserNotFound(user_id).into())
    }

    /// Resolve a token subject to an active account with its role
    pub async fn get_authenticated_user(&self, user_id: i32) -> Result<AuthenticatedUser, InternalError> {
        let user = self.get_user_by_id(user_id).await?;
        if !user.is_active {
            return Err(CredentialError::UserNotFound(user_id).into());
        }
        let role = self.role_of(&user).await?;

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role,
        })
    }

    /// Apply a partial update to an account
    pub async fn update_user(&self, user_id: i32, update: UserUpdate) -> Result<user::Model, InternalError> {
        let existing = self.get_user_by_id(user_id).await?;
        let username_for_policy = update
            .username
            .clone()
            .unwrap_or_else(|| existing.username.clone());
        let mut active: user::ActiveModel = existing.into();

        if let Some(username) = update.username {
            let username = clean_username(&username)?;
            self.ensure_username_free(&username, Some(user_id)).await?;
            active.username = Set(username);
        }
        if let Some(email) = update.email {
            let email = clean_email(&email)?;
            self.ensure_email_free(&email, Some(user_id)).await?;
            active.email = Set(email);
        }
        if let Some(first_name) = update.first_name {
            active.first_name = Set(clean_person_name("first_name", &first_name)?);
        }
        if let Some(last_name) = update.last_name {
            active.last_name = Set(clean_person_name("last_name", &last_name)?);
        }
        if let Some(role_name) = update.role {
            let role = self.get_or_create_role(role_name).await?;
            active.role_id = Set(Some(role.id));
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(password) = update.password {
            self.check_password(&password, &username_for_policy)?;
            active.password_hash = Set(self.hash_password(&password)?);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    /// Change a password after checking the current one
    ///
    /// All refresh tokens of the account are revoked afterwards.
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        let user = self.get_user_by_id(user_id).await?;
        if !self.verify_password(current_password, &user.password_hash)? {
            return Err(CredentialError::IncorrectPassword.into());
        }

        self.update_user(
            user_id,
            UserUpdate {
                password: Some(new_password.to_string()),
                ..Default::default()
            },
        )
        .await?;
        self.revoke_all_refresh_tokens(user_id).await?;

        tracing::info!("Password changed for user {}", user_id);
        Ok(())
    }

    /// Paginated account listing with optional username/email/name search
    pub async fn list_users(&self, search: Option<&str>, page: PageRequest) -> Result<Page<user::Model>, InternalError> {
        let mut query = user::Entity::find();
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Username.contains(search))
                    .add(user::Column::Email.contains(search))
                    .add(user::Column::FirstName.contains(search))
                    .add(user::Column::LastName.contains(search)),
            );
        }

        let paginator = query
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .paginate(&self.db, page.limit);
        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| InternalError::database("count_users", e))?;
        let items = if page.page > counts.number_of_pages {
            Vec::new()
        } else {
            paginator
                .fetch_page(page.page - 1)
                .await
                .map_err(|e| InternalError::database("list_users", e))?
        };

        Ok(Page {
            items,
            total: counts.number_of_items,
            page: page.page,
            pages: counts.number_of_pages,
        })
    }

    /// Delete an account and everything it owns
    ///
    /// Order: ratings first through the rating store (which recomputes the
    /// average of every movie the user rated), then favorites, watchlist
    /// entries, refresh tokens and the user row in one transaction.
    pub async fn delete_user(&self, user_id: i32) -> Result<(), InternalError> {
        self.get_user_by_id(user_id).await?;

        let affected = self.rating_store.delete_all_for_user(user_id).await?;

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user_favorites", e))?;
        watchlist::Entity::delete_many()
            .filter(watchlist::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user_watchlist", e))?;
        refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user_refresh_tokens", e))?;
        user::Entity::delete_by_id(user_id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!("User {} deleted, {} rated movies recomputed", user_id, affected.len());
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<(), InternalError> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(user_id) = except {
            query = query.filter(user::Column::Id.ne(user_id));
        }
        let taken = query
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?;
        match taken {
            Some(_) => Err(CredentialError::DuplicateEmail(email.to_string()).into()),
            None => Ok(()),
        }
    }

    async fn ensure_username_free(&self, username: &str, except: Option<i32>) -> Result<(), InternalError> {
        let mut query = user::Entity::find().filter(user::Column::Username.eq(username));
        if let Some(user_id) = except {
            query = query.filter(user::Column::Id.ne(user_id));
        }
        let taken = query
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))?;
        match taken {
            Some(_) => Err(CredentialError::DuplicateUsername(username.to_string()).into()),
            None => Ok(()),
        }
    }

    // ----- refresh tokens -----

    /// Store a refresh token hash
    ///
    /// # Arguments
    /// * `token_hash` - HMAC-SHA256 of the refresh token
    /// * `user_id` - The account the token belongs to
    /// * `expires_at` - Unix timestamp when the token expires
    pub async fn store_refresh_token(&self, token_hash: String, user_id: i32, expires_at: i64) -> Result<(), InternalError> {
        refresh_token::ActiveModel {
            token_hash: Set(token_hash),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("store_refresh_token", e))?;

        Ok(())
    }

    /// Validate a refresh token hash and return the owning user id
    pub async fn validate_refresh_token(&self, token_hash: &str) -> Result<i32, InternalError> {
        let token = refresh_token::Entity::find_by_id(token_hash.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_refresh_token", e))?
            .ok_or_else(|| CredentialError::invalid_token("refresh_token", "not found"))?;

        if token.expires_at < Utc::now().timestamp() {
            return Err(CredentialError::ExpiredToken("refresh_token".to_string()).into());
        }

        Ok(token.user_id)
    }

    /// Revoke a refresh token, only if it belongs to `user_id`
    pub async fn revoke_refresh_token(&self, token_hash: &str, user_id: i32) -> Result<(), InternalError> {
        let result = refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("revoke_refresh_token", e))?;

        if result.rows_affected == 0 {
            return Err(CredentialError::invalid_token("refresh_token", "not found").into());
        }
        Ok(())
    }

    pub async fn revoke_all_refresh_tokens(&self, user_id: i32) -> Result<u64, InternalError> {
        let result = refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("revoke_all_refresh_tokens", e))?;
        Ok(result.rows_affected)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialStore {{ db: <connection>, password_pepper: <redacted> }}")
    }
}
