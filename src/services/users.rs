//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{AuthResponse, CreateUser, LoginUser, RegisterUser, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password and issue a token
    pub async fn login(&self, request: LoginUser) -> AppResult<AuthResponse> {
        let user = self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !verify_password(&user, &request.password)? {
            tracing::warn!("Failed login attempt for user {}", user.id);
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        tracing::info!("User {} logged in", user.id);
        self.issue_token(user)
    }

    /// Self-service registration, always as a member
    pub async fn register(&self, request: RegisterUser) -> AppResult<AuthResponse> {
        let user = self.create(&request.email, &request.password, Role::Member).await?;
        self.issue_token(user)
    }

    /// Create an account on behalf of a librarian
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        let role = request.role.unwrap_or(Role::Member);
        self.create(&request.email, &request.password, role).await
    }

    async fn create(&self, email: &str, password: &str, role: Role) -> AppResult<User> {
        if self.repository.users.email_exists(email).await? {
            return Err(AppError::BadRequest("User with this email already exists".to_string()));
        }

        let hash = hash_password(password)?;
        let user = self.repository.users.create(email, &hash, role).await?;
        tracing::info!("Created {} account {}", user.role, user.id);
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list(&self, role: Option<Role>) -> AppResult<Vec<User>> {
        self.repository.users.list(role).await
    }

    /// Delete an account. A librarian cannot remove their own account.
    pub async fn delete_user(&self, id: i32, requested_by: i32) -> AppResult<()> {
        if id == requested_by {
            return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
        }
        self.repository.users.delete(id).await?;
        tracing::info!("Deleted user {} (by {})", id, requested_by);
        Ok(())
    }

    /// Make sure the configured librarian account exists
    pub async fn bootstrap_librarian(&self, config: &BootstrapConfig) -> AppResult<()> {
        let (Some(email), Some(password)) = (&config.librarian_email, &config.librarian_password) else {
            tracing::debug!("No bootstrap librarian configured");
            return Ok(());
        };

        if self.repository.users.email_exists(email).await? {
            return Ok(());
        }

        let hash = hash_password(password)?;
        let user = self.repository.users.create(email, &hash, Role::Librarian).await?;
        tracing::info!("Bootstrapped librarian account {} ({})", user.id, user.email);
        Ok(())
    }

    fn issue_token(&self, user: User) -> AppResult<AuthResponse> {
        let token = UserClaims::new(&user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_hours * 3600,
            user,
        })
    }
}

/// Verify a password against the stored argon2 hash
fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
