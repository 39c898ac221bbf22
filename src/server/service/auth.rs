//! Passwordless sign-in with e-mailed one-time codes.

use chrono::{Duration, Utc};
use entity::app_user::Role;
use rand::Rng;
use sea_orm::DatabaseConnection;

use crate::{
    model::{auth::RegisterDto, user::UserDto},
    server::{
        data::{login_code::LoginCodeRepository, user::UserRepository},
        error::{auth::AuthError, request::RequestError, Error},
        model::mail::Email,
        service::{mail::MailDispatch, rate_limit::RateLimiter, validate},
    },
};

/// Login code requests allowed per e-mail within [`LOGIN_WINDOW_SECS`]
pub const LOGIN_MAX_REQUESTS: u64 = 5;
pub const LOGIN_WINDOW_SECS: u64 = 15 * 60;
/// Verification attempts allowed per e-mail within [`LOGIN_WINDOW_SECS`]
pub const VERIFY_MAX_ATTEMPTS: u64 = 10;
/// Wrong guesses after which outstanding codes stop working
pub const CODE_MAX_FAILURES: i32 = 5;
/// Minutes a login code stays valid
pub const LOGIN_CODE_TTL_MINUTES: i64 = 10;

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    mail: &'a MailDispatch,
    rate_limiter: &'a RateLimiter,
}

impl<'a> AuthService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        mail: &'a MailDispatch,
        rate_limiter: &'a RateLimiter,
    ) -> Self {
        Self {
            db,
            mail,
            rate_limiter,
        }
    }

    /// Self-service sign-up for landlords and PMCs; e-mails a login code
    pub async fn register(&self, registration: RegisterDto) -> Result<UserDto, Error> {
        if !matches!(registration.role, Role::Landlord | Role::Pmc) {
            return Err(RequestError::validation(
                "Only landlord and pmc accounts can register directly",
            )
            .into());
        }

        let email = validate::normalize_email(&registration.email)?;
        let name = validate::required_text("name", &registration.name)?;
        let phone = validate::optional_text(registration.phone);

        let user_repo = UserRepository::new(self.db);
        if user_repo.get_by_email(&email).await?.is_some() {
            return Err(RequestError::conflict(format!("E-mail {} is already registered", email)).into());
        }

        let user = user_repo
            .create(&email, &name, registration.role, phone)
            .await?;

        tracing::info!("Registered {:?} user {}", user.role, user.id);

        self.issue_code(&user).await?;

        Ok(user.into())
    }

    /// Sends a login code when the address belongs to a user.
    ///
    /// Succeeds for unknown addresses too so callers cannot probe accounts.
    pub async fn request_login_code(&self, email: &str) -> Result<(), Error> {
        let email = validate::normalize_email(email)?;

        self.rate_limiter
            .check(
                &format!("login:{}", email),
                LOGIN_MAX_REQUESTS,
                LOGIN_WINDOW_SECS,
            )
            .await?;

        let Some(user) = UserRepository::new(self.db).get_by_email(&email).await? else {
            tracing::debug!("Login code requested for unknown e-mail");
            return Ok(());
        };

        self.issue_code(&user).await
    }

    /// Exchanges a valid code for the user it was issued to
    pub async fn verify_login_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<entity::app_user::Model, Error> {
        let email = validate::normalize_email(email)?;
        let now = Utc::now().naive_utc();

        self.rate_limiter
            .check(
                &format!("verify:{}", email),
                VERIFY_MAX_ATTEMPTS,
                LOGIN_WINDOW_SECS,
            )
            .await?;

        let Some(user) = UserRepository::new(self.db).get_by_email(&email).await? else {
            return Err(AuthError::InvalidLoginCode.into());
        };

        let login_code_repo = LoginCodeRepository::new(self.db);
        let Some(login_code) = login_code_repo
            .find_valid(user.id, code.trim(), now)
            .await?
        else {
            let retired = login_code_repo
                .record_failure(user.id, CODE_MAX_FAILURES, now)
                .await?;
            if retired > 0 {
                tracing::info!(
                    "Retired {} login code(s) of user {} after repeated failures",
                    retired,
                    user.id
                );
            }
            return Err(AuthError::InvalidLoginCode.into());
        };

        login_code_repo.consume(login_code, now).await?;

        tracing::debug!("User {} signed in", user.id);

        Ok(user)
    }

    /// Creates the configured admin account when missing
    pub async fn bootstrap_admin(
        &self,
        email: &str,
    ) -> Result<Option<entity::app_user::Model>, Error> {
        let email = validate::normalize_email(email)?;
        let user_repo = UserRepository::new(self.db);

        if let Some(existing) = user_repo.get_by_email(&email).await? {
            if existing.role != Role::Admin {
                tracing::warn!(
                    "Admin e-mail {} belongs to a {:?} account, not creating admin",
                    email,
                    existing.role
                );
            }
            return Ok(None);
        }

        let admin = user_repo
            .create(&email, "Administrator", Role::Admin, None)
            .await?;

        tracing::info!("Created admin account {}", admin.id);

        Ok(Some(admin))
    }

    async fn issue_code(&self, user: &entity::app_user::Model) -> Result<(), Error> {
        let now = Utc::now().naive_utc();
        let code = generate_login_code();

        let login_code_repo = LoginCodeRepository::new(self.db);
        login_code_repo.invalidate_for_user(user.id, now).await?;
        login_code_repo
            .create(user.id, &code, now + Duration::minutes(LOGIN_CODE_TTL_MINUTES))
            .await?;

        self.mail
            .send_or_log(Email::login_code(&user.email, &code))
            .await;

        Ok(())
    }
}

/// Random 6-digit code
pub fn generate_login_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use entity::app_user::Role;
    use tenantry_test_utils::prelude::*;

    use super::{generate_login_code, AuthService, CODE_MAX_FAILURES};
    use crate::{
        model::auth::RegisterDto,
        server::{
            error::{auth::AuthError, request::RequestError, Error},
            service::rate_limit::RateLimiter,
            util::test::mail_dispatch,
        },
    };

    fn registration(email: &str, role: Role) -> RegisterDto {
        RegisterDto {
            email: email.to_string(),
            name: "Dana Landlord".to_string(),
            role,
            phone: None,
        }
    }

    #[test]
    fn login_code_has_six_digits() {
        for _ in 0..50 {
            let code = generate_login_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    /// Expect registration to normalize the e-mail and send a code
    #[tokio::test]
    async fn registers_landlord() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_all_tables()
            .with_mail_endpoint(200, 1)
            .build()
            .await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        let user = service
            .register(registration(" Dana@Example.com ", Role::Landlord))
            .await
            .unwrap();

        assert_eq!(user.email, "dana@example.com");
        assert_eq!(user.role, Role::Landlord);
        test.assert_mocks();

        Ok(())
    }

    /// Expect duplicate e-mails and privileged roles to be refused
    #[tokio::test]
    async fn rejects_invalid_registration() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_all_tables()
            .with_mail_endpoint(200, 0)
            .build()
            .await?;
        test.user()
            .insert_user_with_email("taken@example.com", Role::Landlord)
            .await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        let duplicate = service
            .register(registration("TAKEN@example.com", Role::Landlord))
            .await;
        assert!(matches!(
            duplicate,
            Err(Error::RequestError(RequestError::Conflict(_)))
        ));

        let admin = service
            .register(registration("boss@example.com", Role::Admin))
            .await;
        assert!(matches!(
            admin,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));
        test.assert_mocks();

        Ok(())
    }

    /// Expect unknown addresses to succeed without sending mail
    #[tokio::test]
    async fn unknown_email_is_silent() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_all_tables()
            .with_mail_endpoint(200, 0)
            .build()
            .await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        assert!(service
            .request_login_code("nobody@example.com")
            .await
            .is_ok());
        test.assert_mocks();

        Ok(())
    }

    /// Expect a valid code to sign in once and be rejected afterwards
    #[tokio::test]
    async fn verifies_code_once() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let user = test
            .user()
            .insert_user_with_email("tenant@example.com", Role::Tenant)
            .await?;
        test.user()
            .insert_login_code(user.id, "123456", Utc::now().naive_utc() + Duration::minutes(5))
            .await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        let signed_in = service
            .verify_login_code("tenant@example.com", "123456")
            .await
            .unwrap();
        assert_eq!(signed_in.id, user.id);

        let reused = service
            .verify_login_code("tenant@example.com", "123456")
            .await;
        assert!(matches!(
            reused,
            Err(Error::AuthError(AuthError::InvalidLoginCode))
        ));

        Ok(())
    }

    /// Expect repeated wrong guesses to burn the outstanding code
    #[tokio::test]
    async fn wrong_guesses_retire_code() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let user = test
            .user()
            .insert_user_with_email("tenant@example.com", Role::Tenant)
            .await?;
        test.user()
            .insert_login_code(user.id, "123456", Utc::now().naive_utc() + Duration::minutes(5))
            .await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        for guess in 0..CODE_MAX_FAILURES {
            let result = service
                .verify_login_code("tenant@example.com", &format!("{:06}", guess))
                .await;
            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::InvalidLoginCode))
            ));
        }

        let correct = service
            .verify_login_code("tenant@example.com", "123456")
            .await;
        assert!(matches!(
            correct,
            Err(Error::AuthError(AuthError::InvalidLoginCode))
        ));

        Ok(())
    }

    /// Expect a wrong guess below the limit to leave the code usable
    #[tokio::test]
    async fn single_wrong_guess_keeps_code() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let user = test
            .user()
            .insert_user_with_email("tenant@example.com", Role::Tenant)
            .await?;
        test.user()
            .insert_login_code(user.id, "123456", Utc::now().naive_utc() + Duration::minutes(5))
            .await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        assert!(service
            .verify_login_code("tenant@example.com", "000000")
            .await
            .is_err());

        let signed_in = service
            .verify_login_code("tenant@example.com", "123456")
            .await
            .unwrap();
        assert_eq!(signed_in.id, user.id);

        Ok(())
    }

    /// Expect expired codes to be rejected
    #[tokio::test]
    async fn rejects_expired_code() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let user = test
            .user()
            .insert_user_with_email("tenant@example.com", Role::Tenant)
            .await?;
        test.user()
            .insert_login_code(user.id, "654321", Utc::now().naive_utc() - Duration::minutes(1))
            .await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        let result = service
            .verify_login_code("tenant@example.com", "654321")
            .await;
        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::InvalidLoginCode))
        ));

        Ok(())
    }

    /// Expect the admin account to be created only once
    #[tokio::test]
    async fn bootstraps_admin_once() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let mail = mail_dispatch(&test);
        let limiter = RateLimiter::disabled();
        let service = AuthService::new(&test.db, &mail, &limiter);

        let created = service.bootstrap_admin("admin@example.com").await.unwrap();
        assert_eq!(created.map(|user| user.role), Some(Role::Admin));

        let again = service.bootstrap_admin("admin@example.com").await.unwrap();
        assert!(again.is_none());

        Ok(())
    }
}
