use serde::{Deserialize, Serialize};

/// A rendered outbound e-mail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl Email {
    pub fn login_code(to: &str, code: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Your Tenantry login code".to_string(),
            text: format!(
                "Your login code is {}.\n\nIt expires in 10 minutes. If you did not try to sign in you can ignore this e-mail.",
                code
            ),
        }
    }

    pub fn invitation(to: &str, inviter_name: &str, role: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("{} invited you to Tenantry", inviter_name),
            text: format!(
                "{} invited you to join Tenantry as a {}.\n\nAccept the invitation within 7 days: {}",
                inviter_name, role, link
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_contains_link() {
        let email = Email::invitation(
            "new@example.com",
            "Dana",
            "tenant",
            "https://app.test/invite/abc",
        );

        assert_eq!(email.to, "new@example.com");
        assert!(email.text.contains("https://app.test/invite/abc"));
        assert!(email.subject.contains("Dana"));
    }

    #[test]
    fn login_code_contains_code() {
        let email = Email::login_code("user@example.com", "042917");

        assert!(email.text.contains("042917"));
    }
}
