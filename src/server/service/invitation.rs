//! E-mail invitations for tenants, vendors and PMCs.

use chrono::{Duration, Utc};
use entity::{
    app_user::Role, invitation::InvitationStatus, lease::LeaseStatus,
    notification::NotificationKind,
};
use rand::{distr::Alphanumeric, Rng};
use sea_orm::{ActiveEnum, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::PageQuery,
        invitation::{
            AcceptInvitationDto, CreateInvitationDto, InvitationDto, InvitationPreviewDto,
        },
    },
    server::{
        data::{
            invitation::{InvitationRepository, NewInvitation},
            lease_tenant::LeaseTenantRepository,
            user::UserRepository,
            Page,
        },
        error::{auth::AuthError, request::RequestError, Error},
        model::mail::Email,
        service::{access::Actor, lookup, mail::MailDispatch, notification::notify, validate},
    },
};

pub const INVITATION_TOKEN_LENGTH: usize = 32;
pub const INVITATION_TTL_DAYS: i64 = 7;

pub struct InvitationService<'a> {
    db: &'a DatabaseConnection,
    mail: &'a MailDispatch,
    app_url: &'a str,
}

impl<'a> InvitationService<'a> {
    pub fn new(db: &'a DatabaseConnection, mail: &'a MailDispatch, app_url: &'a str) -> Self {
        Self { db, mail, app_url }
    }

    /// Invites `email` to join with `role` and e-mails the acceptance link
    pub async fn create(
        &self,
        actor: &Actor,
        invitation: CreateInvitationDto,
    ) -> Result<InvitationDto, Error> {
        actor.ensure_role(&[Role::Admin, Role::Landlord, Role::Pmc])?;

        match invitation.role {
            Role::Tenant | Role::Vendor => {}
            Role::Pmc => actor.ensure_role(&[Role::Admin, Role::Landlord])?,
            Role::Admin | Role::Landlord => {
                return Err(RequestError::validation(
                    "Only tenant, vendor and pmc accounts can be invited",
                )
                .into())
            }
        }

        if let Some(lease_id) = invitation.lease_id {
            if invitation.role != Role::Tenant {
                return Err(
                    RequestError::validation("lease_id is only valid for tenant invitations")
                        .into(),
                );
            }
            let (_, _, property) = lookup::lease(self.db, lease_id).await?;
            actor.ensure_manages(&property)?;
        }

        let email = validate::normalize_email(&invitation.email)?;
        let inviter = lookup::user(self.db, actor.id).await?;
        let token = generate_token();

        let created = InvitationRepository::new(self.db)
            .create(NewInvitation {
                email: email.clone(),
                role: invitation.role,
                token: token.clone(),
                invited_by: actor.id,
                lease_id: invitation.lease_id,
                expires_at: Utc::now().naive_utc() + Duration::days(INVITATION_TTL_DAYS),
            })
            .await?;

        let link = format!("{}/invite/{}", self.app_url.trim_end_matches('/'), token);
        self.mail
            .send_or_log(Email::invitation(
                &email,
                &inviter.name,
                &invitation.role.to_value(),
                &link,
            ))
            .await;

        tracing::info!(
            "User {} invited a {:?} (invitation {})",
            actor.id,
            created.role,
            created.id
        );

        Ok(InvitationDto::from(created))
    }

    /// Invitations the actor sent; admins see all of them
    pub async fn list(&self, actor: &Actor, page: PageQuery) -> Result<Page<InvitationDto>, Error> {
        let invited_by = (!actor.is_admin()).then_some(actor.id);

        let invitations = InvitationRepository::new(self.db)
            .list(invited_by, page.page(), page.limit())
            .await?;

        Ok(invitations.map(InvitationDto::from))
    }

    pub async fn revoke(&self, actor: &Actor, invitation_id: i32) -> Result<InvitationDto, Error> {
        let invitation_repo = InvitationRepository::new(self.db);
        let invitation = invitation_repo
            .get(invitation_id)
            .await?
            .ok_or(RequestError::NotFound("Invitation"))?;

        if !actor.is_admin() && invitation.invited_by != actor.id {
            return Err(AuthError::forbidden(format!(
                "User {} cannot revoke invitation {}",
                actor.id, invitation.id
            ))
            .into());
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(RequestError::invalid_state(format!(
                "Invitation {} is {:?}",
                invitation.id, invitation.status
            ))
            .into());
        }

        let revoked = invitation_repo
            .set_status(invitation, InvitationStatus::Revoked)
            .await?;

        Ok(InvitationDto::from(revoked))
    }

    /// Public view of an invitation by token
    pub async fn preview(&self, token: &str) -> Result<InvitationPreviewDto, Error> {
        let invitation = self.get_by_token(token).await?;
        let inviter = lookup::user(self.db, invitation.invited_by).await?;

        Ok(InvitationPreviewDto {
            email: invitation.email,
            role: invitation.role,
            status: invitation.status,
            inviter_name: inviter.name,
            expires_at: invitation.expires_at,
        })
    }

    /// Accepts a pending invitation, creating the account when needed and
    /// joining the invited lease. Returns the user to sign in.
    pub async fn accept(
        &self,
        token: &str,
        acceptance: AcceptInvitationDto,
    ) -> Result<entity::app_user::Model, Error> {
        let invitation = self.get_by_token(token).await?;
        let now = Utc::now().naive_utc();

        if invitation.status != InvitationStatus::Pending {
            return Err(RequestError::invalid_state(format!(
                "Invitation is {:?}",
                invitation.status
            ))
            .into());
        }
        if invitation.expires_at <= now {
            return Err(RequestError::invalid_state("Invitation has expired").into());
        }

        let name = validate::required_text("name", &acceptance.name)?;
        let phone = validate::optional_text(acceptance.phone);

        let txn = self.db.begin().await?;
        let user_repo = UserRepository::new(&txn);
        let user = match user_repo.get_by_email(&invitation.email).await? {
            Some(existing) if existing.role != invitation.role => {
                return Err(RequestError::conflict(format!(
                    "{} already has a {:?} account",
                    invitation.email, existing.role
                ))
                .into());
            }
            Some(existing) => existing,
            None => {
                user_repo
                    .create(&invitation.email, &name, invitation.role, phone)
                    .await?
            }
        };

        if let Some(lease_id) = invitation.lease_id {
            let (lease, _, _) = lookup::lease(&txn, lease_id).await?;
            let lease_tenant_repo = LeaseTenantRepository::new(&txn);
            if matches!(lease.status, LeaseStatus::Draft | LeaseStatus::Active)
                && !lease_tenant_repo.is_party(lease.id, user.id).await?
            {
                lease_tenant_repo.add(lease.id, user.id).await?;
            }
        }

        let inviter_id = invitation.invited_by;
        InvitationRepository::new(&txn)
            .set_status(invitation, InvitationStatus::Accepted)
            .await?;
        notify(
            &txn,
            &[inviter_id],
            Some(user.id),
            NotificationKind::InvitationAccepted,
            "Invitation accepted",
            format!("{} accepted your invitation", user.name),
            Some(format!("/users/{}", user.id)),
        )
        .await?;
        txn.commit().await?;

        tracing::info!("User {} accepted an invitation", user.id);

        Ok(user)
    }

    async fn get_by_token(&self, token: &str) -> Result<entity::invitation::Model, Error> {
        InvitationRepository::new(self.db)
            .get_by_token(token)
            .await?
            .ok_or_else(|| RequestError::NotFound("Invitation").into())
    }
}

/// Random alphanumeric token of [`INVITATION_TOKEN_LENGTH`] characters
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(INVITATION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use entity::{app_user::Role, invitation::InvitationStatus, notification::NotificationKind};
    use tenantry_test_utils::prelude::*;

    use super::{generate_token, InvitationService, INVITATION_TOKEN_LENGTH};
    use crate::{
        model::{
            api::PageQuery,
            invitation::{AcceptInvitationDto, CreateInvitationDto},
        },
        server::{
            data::{lease_tenant::LeaseTenantRepository, notification::NotificationRepository},
            error::{auth::AuthError, request::RequestError, Error},
            service::access::Actor,
            util::test::mail_dispatch,
        },
    };

    fn acceptance(name: &str) -> AcceptInvitationDto {
        AcceptInvitationDto {
            name: name.to_string(),
            phone: None,
        }
    }

    #[test]
    fn token_is_alphanumeric() {
        let token = generate_token();

        assert_eq!(token.len(), INVITATION_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }

    /// Expect an invitation e-mail and the role rules to hold
    #[tokio::test]
    async fn creates_invitation() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_all_tables()
            .with_mail_endpoint(200, 1)
            .build()
            .await?;
        let landlord = test.user().insert_landlord().await?;
        let pmc = test.user().insert_pmc().await?;
        let mail = mail_dispatch(&test);
        let app_url = test.app_url();
        let service = InvitationService::new(&test.db, &mail, &app_url);

        let invitation = service
            .create(
                &Actor::from(&landlord),
                CreateInvitationDto {
                    email: " New.Tenant@Example.com ".to_string(),
                    role: Role::Tenant,
                    lease_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(invitation.email, "new.tenant@example.com");
        assert_eq!(invitation.status, InvitationStatus::Pending);
        assert!(invitation.expires_at > Utc::now().naive_utc() + Duration::days(6));

        assert!(matches!(
            service
                .create(
                    &Actor::from(&pmc),
                    CreateInvitationDto {
                        email: "other@example.com".to_string(),
                        role: Role::Pmc,
                        lease_id: None,
                    },
                )
                .await,
            Err(Error::AuthError(AuthError::Forbidden(_)))
        ));
        assert!(matches!(
            service
                .create(
                    &Actor::from(&landlord),
                    CreateInvitationDto {
                        email: "vendor@example.com".to_string(),
                        role: Role::Vendor,
                        lease_id: Some(1),
                    },
                )
                .await,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));

        test.assert_mocks();

        Ok(())
    }

    /// Expect acceptance to create the tenant, join the lease and notify the inviter
    #[tokio::test]
    async fn accepts_tenant_invitation() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let current = test.user().insert_tenant().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let lease = test.lease().insert_active_lease(unit.id, &[current.id]).await?;
        let invitation = test
            .invitation()
            .insert_invitation(
                landlord.id,
                "roommate@example.com",
                Role::Tenant,
                Some(lease.id),
                Utc::now().naive_utc() + Duration::days(7),
            )
            .await?;
        let mail = mail_dispatch(&test);
        let app_url = test.app_url();
        let service = InvitationService::new(&test.db, &mail, &app_url);

        let preview = service.preview(&invitation.token).await.unwrap();
        assert_eq!(preview.inviter_name, landlord.name);

        let user = service
            .accept(&invitation.token, acceptance("Robin Roommate"))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Tenant);
        assert_eq!(user.email, "roommate@example.com");

        let tenants = LeaseTenantRepository::new(&test.db)
            .tenant_ids(lease.id)
            .await?;
        assert!(tenants.contains(&user.id));

        let notifications = NotificationRepository::new(&test.db)
            .list(landlord.id, false, 1, 10)
            .await?;
        assert_eq!(
            notifications.items[0].kind,
            NotificationKind::InvitationAccepted
        );

        assert!(matches!(
            service
                .accept(&invitation.token, acceptance("Robin Roommate"))
                .await,
            Err(Error::RequestError(RequestError::InvalidState(_)))
        ));

        Ok(())
    }

    /// Expect expired invitations and role clashes to be refused
    #[tokio::test]
    async fn refuses_expired_or_conflicting() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        test.user()
            .insert_user_with_email("taken@example.com", Role::Landlord)
            .await?;
        let expired = test
            .invitation()
            .insert_invitation(
                landlord.id,
                "late@example.com",
                Role::Vendor,
                None,
                Utc::now().naive_utc() - Duration::minutes(1),
            )
            .await?;
        let clashing = test
            .invitation()
            .insert_invitation(
                landlord.id,
                "taken@example.com",
                Role::Vendor,
                None,
                Utc::now().naive_utc() + Duration::days(1),
            )
            .await?;
        let mail = mail_dispatch(&test);
        let app_url = test.app_url();
        let service = InvitationService::new(&test.db, &mail, &app_url);

        assert!(matches!(
            service.accept(&expired.token, acceptance("Late")).await,
            Err(Error::RequestError(RequestError::InvalidState(_)))
        ));
        assert!(matches!(
            service.accept(&clashing.token, acceptance("Taken")).await,
            Err(Error::RequestError(RequestError::Conflict(_)))
        ));
        assert!(matches!(
            service.preview("missing").await,
            Err(Error::RequestError(RequestError::NotFound(_)))
        ));

        Ok(())
    }

    /// Expect only the inviter or an admin to revoke, and only while pending
    #[tokio::test]
    async fn revokes_pending_invitation() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let other = test.user().insert_landlord().await?;
        let invitation = test
            .invitation()
            .insert_invitation(
                landlord.id,
                "vendor@example.com",
                Role::Vendor,
                None,
                Utc::now().naive_utc() + Duration::days(7),
            )
            .await?;
        let mail = mail_dispatch(&test);
        let app_url = test.app_url();
        let service = InvitationService::new(&test.db, &mail, &app_url);

        let page = service
            .list(&Actor::from(&other), PageQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);

        assert!(matches!(
            service.revoke(&Actor::from(&other), invitation.id).await,
            Err(Error::AuthError(AuthError::Forbidden(_)))
        ));
        let revoked = service
            .revoke(&Actor::from(&landlord), invitation.id)
            .await
            .unwrap();
        assert_eq!(revoked.status, InvitationStatus::Revoked);
        assert!(matches!(
            service.revoke(&Actor::from(&landlord), invitation.id).await,
            Err(Error::RequestError(RequestError::InvalidState(_)))
        ));

        Ok(())
    }
}
