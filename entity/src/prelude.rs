pub use super::app_user::Entity as AppUser;
pub use super::document::Entity as Document;
pub use super::document_version::Entity as DocumentVersion;
pub use super::expense::Entity as Expense;
pub use super::invitation::Entity as Invitation;
pub use super::lease::Entity as Lease;
pub use super::lease_tenant::Entity as LeaseTenant;
pub use super::login_code::Entity as LoginCode;
pub use super::maintenance_comment::Entity as MaintenanceComment;
pub use super::maintenance_request::Entity as MaintenanceRequest;
pub use super::notification::Entity as Notification;
pub use super::property::Entity as Property;
pub use super::rent_payment::Entity as RentPayment;
pub use super::unit::Entity as Unit;
