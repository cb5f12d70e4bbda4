//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every method on a
//! tenant-owned table takes `tenant_id` explicitly — cross-tenant access
//! is a programming error, not a runtime filter.

pub mod booking_repo;
pub mod class_option_repo;
pub mod lesson_repo;
pub mod plan_repo;
pub mod subscription_repo;
pub mod tenant_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use class_option_repo::ClassOptionRepo;
pub use lesson_repo::LessonRepo;
pub use plan_repo::PlanRepo;
pub use subscription_repo::SubscriptionRepo;
pub use tenant_repo::TenantRepo;
pub use user_repo::UserRepo;
