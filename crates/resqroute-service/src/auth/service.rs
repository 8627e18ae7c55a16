//! Authentication service: sign-up, login, logout, token verification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use resqroute_auth::{Claims, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use resqroute_core::config::AuthConfig;
use resqroute_core::error::AppError;
use resqroute_database::UserStore;
use resqroute_entity::activity::action;
use resqroute_entity::user::{CreateUser, User, UserRole};

use crate::activity::ActivityLogger;
use crate::context::{ClientInfo, RequestContext};

/// Sign-up input.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Requested role; anything unrecognized falls back to `user`.
    pub role: Option<String>,
}

/// Login input.
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Which accounts a login endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginScope {
    /// Any role.
    Any,
    /// Admins only.
    Admin,
    /// Plain `user` accounts only; drivers and admins have their own logins.
    User,
}

impl LoginScope {
    fn admits(&self, role: UserRole) -> bool {
        match self {
            Self::Any => true,
            Self::Admin => role.is_admin(),
            Self::User => role == UserRole::User,
        }
    }

    fn not_found_message(&self) -> &'static str {
        match self {
            Self::Any => "Invalid credentials",
            Self::Admin => "Admin account not found",
            Self::User => "User account not found",
        }
    }

    fn describe(&self, user: &User) -> String {
        match self {
            Self::Any => format!("{} logged in as {}", user.name, user.role),
            Self::Admin => format!("Admin {} logged in", user.name),
            Self::User => format!("User {} logged in", user.name),
        }
    }
}

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Handles account creation and credential checks.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    logger: ActivityLogger,
    allow_admin_signup: bool,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(users: Arc<dyn UserStore>, logger: ActivityLogger, config: &AuthConfig) -> Self {
        Self {
            users,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            logger,
            allow_admin_signup: config.allow_admin_signup,
        }
    }

    /// Public self-registration. Returns a session for the new account.
    pub async fn signup(
        &self,
        input: SignupInput,
        client: &ClientInfo,
    ) -> Result<AuthSession, AppError> {
        let role = input
            .role
            .as_deref()
            .and_then(|r| r.parse::<UserRole>().ok())
            .unwrap_or_default();
        if role.is_admin() && !self.allow_admin_signup {
            return Err(AppError::authorization(
                "Admin accounts cannot be self-registered",
            ));
        }

        let user = self
            .create_account(&input.name, &input.email, &input.password, role)
            .await?;

        self.logger
            .record(
                Some(user.id),
                action::USER_CREATED,
                format!("{} registered as {}", user.name, user.role),
                json!({ "email": user.email, "role": user.role }),
                client,
            )
            .await;

        let (token, expires_at) = self.encoder.issue(&user)?;
        Ok(AuthSession {
            token,
            expires_at,
            user,
        })
    }

    /// Create an account with any role, bypassing the sign-up gate. Used by
    /// the administrative CLI.
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::validation(
                "Name, email, and password are required",
            ));
        }
        self.validator.validate(password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                name: name.to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User account created");
        Ok(user)
    }

    /// Verify credentials for the given scope and issue a session.
    pub async fn login(
        &self,
        input: LoginInput,
        scope: LoginScope,
        client: &ClientInfo,
    ) -> Result<AuthSession, AppError> {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|u| scope.admits(u.role))
            .ok_or_else(|| AppError::authentication(scope.not_found_message()))?;

        if !self
            .hasher
            .verify_password(&input.password, &user.password_hash)?
        {
            return Err(AppError::authentication("Invalid credentials"));
        }

        let now = Utc::now();
        self.users.record_login(user.id, now).await?;

        self.logger
            .record(
                Some(user.id),
                action::LOGIN,
                scope.describe(&user),
                json!({ "email": user.email, "role": user.role }),
                client,
            )
            .await;

        let (token, expires_at) = self.encoder.issue_at(&user, now)?;
        info!(user_id = %user.id, scope = ?scope, "User logged in");
        Ok(AuthSession {
            token,
            expires_at,
            user: User {
                last_login_at: Some(now),
                ..user
            },
        })
    }

    /// Record a logout. Tokens are stateless, so this only writes the audit
    /// entry when the caller's token was valid.
    pub async fn logout(&self, claims: Option<&Claims>, client: &ClientInfo) {
        let Some(claims) = claims else {
            return;
        };
        self.logger
            .record(
                Some(claims.sub),
                action::LOGOUT,
                format!("{} logged out", claims.name),
                json!({ "email": claims.email, "tokenId": claims.jti }),
                client,
            )
            .await;
        info!(user_id = %claims.sub, "User logged out");
    }

    /// The caller's current account.
    pub async fn me(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.find_user(ctx.user_id).await
    }

    /// Decode and verify a bearer token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decoder.decode(token)
    }

    async fn find_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use resqroute_core::error::ErrorKind;
    use resqroute_database::Stores;
    use resqroute_entity::activity::ActivityFilter;
    use resqroute_core::types::pagination::PageRequest;

    fn setup(allow_admin_signup: bool) -> (AuthService, Stores) {
        let stores = Stores::in_memory();
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            allow_admin_signup,
            ..AuthConfig::default()
        };
        let svc = AuthService::new(
            stores.users.clone(),
            ActivityLogger::new(stores.activity.clone()),
            &config,
        );
        (svc, stores)
    }

    fn signup_input(email: &str, role: Option<&str>) -> SignupInput {
        SignupInput {
            name: "Ravi Kumar".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            role: role.map(String::from),
        }
    }

    async fn actions(stores: &Stores) -> Vec<String> {
        stores
            .activity
            .list(&ActivityFilter::default(), PageRequest::default())
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|l| l.action)
            .collect()
    }

    #[tokio::test]
    async fn test_signup_issues_token_and_logs() {
        let (svc, stores) = setup(false);
        let session = svc
            .signup(signup_input(" Ravi@Example.com ", Some("driver")), &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(session.user.email, "ravi@example.com");
        assert_eq!(session.user.role, UserRole::Driver);

        let claims = svc.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(actions(&stores).await, vec!["user_created"]);
    }

    #[tokio::test]
    async fn test_signup_unknown_role_becomes_user() {
        let (svc, _) = setup(false);
        let session = svc
            .signup(signup_input("a@example.com", Some("superhero")), &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(session.user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_signup_admin_gate() {
        let (svc, _) = setup(false);
        let err = svc
            .signup(signup_input("a@example.com", Some("admin")), &ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let (svc, _) = setup(true);
        let session = svc
            .signup(signup_input("a@example.com", Some("admin")), &ClientInfo::default())
            .await
            .unwrap();
        assert!(session.user.is_admin());
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let (svc, _) = setup(false);
        let mut input = signup_input("a@example.com", None);
        input.name = "  ".to_string();
        let err = svc.signup(input, &ClientInfo::default()).await.unwrap_err();
        assert_eq!(err.message, "Name, email, and password are required");

        let mut input = signup_input("a@example.com", None);
        input.password = "abc".to_string();
        let err = svc.signup(input, &ClientInfo::default()).await.unwrap_err();
        assert_eq!(err.message, "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let (svc, _) = setup(false);
        svc.signup(signup_input("a@example.com", None), &ClientInfo::default())
            .await
            .unwrap();
        let err = svc
            .signup(signup_input("A@EXAMPLE.COM", None), &ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Email already registered");
    }

    #[tokio::test]
    async fn test_login_scopes() {
        let (svc, stores) = setup(false);
        svc.create_account("Admin", "admin@example.com", "secret1", UserRole::Admin)
            .await
            .unwrap();
        svc.create_account("Driver", "driver@example.com", "secret1", UserRole::Driver)
            .await
            .unwrap();
        let login = |email: &str| LoginInput {
            email: email.to_string(),
            password: "secret1".to_string(),
        };
        let client = ClientInfo::default();

        let session = svc
            .login(login("admin@example.com"), LoginScope::Admin, &client)
            .await
            .unwrap();
        assert!(session.user.last_login_at.is_some());

        let err = svc
            .login(login("driver@example.com"), LoginScope::Admin, &client)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Admin account not found");

        let err = svc
            .login(login("admin@example.com"), LoginScope::User, &client)
            .await
            .unwrap_err();
        assert_eq!(err.message, "User account not found");
        assert!(svc
            .login(login("driver@example.com"), LoginScope::User, &client)
            .await
            .is_err());

        svc.login(login("driver@example.com"), LoginScope::Any, &client)
            .await
            .unwrap();
        assert_eq!(actions(&stores).await, vec!["login", "login"]);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (svc, _) = setup(false);
        svc.create_account("U", "u@example.com", "secret1", UserRole::User)
            .await
            .unwrap();
        let client = ClientInfo::default();

        let err = svc
            .login(
                LoginInput {
                    email: "u@example.com".to_string(),
                    password: "wrong-pass".to_string(),
                },
                LoginScope::Any,
                &client,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid credentials");

        let err = svc
            .login(LoginInput::default(), LoginScope::Any, &client)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Email and password are required");
    }

    #[tokio::test]
    async fn test_logout_logs_only_with_claims() {
        let (svc, stores) = setup(false);
        let session = svc
            .signup(signup_input("a@example.com", None), &ClientInfo::default())
            .await
            .unwrap();
        svc.logout(None, &ClientInfo::default()).await;
        let claims = svc.verify_token(&session.token).unwrap();
        svc.logout(Some(&claims), &ClientInfo::default()).await;
        assert_eq!(actions(&stores).await, vec!["logout", "user_created"]);
    }

    #[tokio::test]
    async fn test_me_for_deleted_user() {
        let (svc, stores) = setup(false);
        let session = svc
            .signup(signup_input("a@example.com", None), &ClientInfo::default())
            .await
            .unwrap();
        let claims = svc.verify_token(&session.token).unwrap();
        let ctx = RequestContext::from_claims(&claims, ClientInfo::default());
        assert_eq!(svc.me(&ctx).await.unwrap().id, session.user.id);

        stores.users.delete(session.user.id).await.unwrap();
        let err = svc.me(&ctx).await.unwrap_err();
        assert_eq!(err.message, "User not found");
    }
}
