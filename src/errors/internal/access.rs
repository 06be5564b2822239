use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    /// Missing, invalid or expired bearer token, or the account behind it is gone
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Admin role required")]
    AdminRequired,

    #[error("Cannot delete your own account")]
    SelfDeletion,
}
