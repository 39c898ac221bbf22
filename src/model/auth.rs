use entity::app_user::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterDto {
    pub email: String,
    pub name: String,
    /// `landlord` or `pmc`
    #[schema(value_type = String, example = "landlord")]
    pub role: Role,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginDto {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyLoginDto {
    pub email: String,
    /// 6-digit code from the login e-mail
    pub code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginCodeSentDto {
    pub sent: bool,
}
