//! Type aliases for entity models, matching those used in the main crate.

pub type UserModel = entity::app_user::Model;
pub type PropertyModel = entity::property::Model;
pub type UnitModel = entity::unit::Model;
pub type LeaseModel = entity::lease::Model;
pub type RentPaymentModel = entity::rent_payment::Model;
pub type MaintenanceRequestModel = entity::maintenance_request::Model;
pub type DocumentModel = entity::document::Model;
pub type NotificationModel = entity::notification::Model;
pub type InvitationModel = entity::invitation::Model;
pub type ExpenseModel = entity::expense::Model;
