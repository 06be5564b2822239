// Services layer - Derived values and policies shared by stores and coordinators
pub mod average_maintainer;
pub mod password_policy;
pub mod rating_statistics;

pub use average_maintainer::AverageMaintainer;
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use rating_statistics::RatingStatistics;
