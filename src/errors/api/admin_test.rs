#[cfg(test)]
mod tests {
    use crate::errors::AdminError;
    use crate::errors::internal::{AccessError, CredentialError, InternalError, RatingError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let internal_err = InternalError::database("delete_user", DbErr::Custom("locked".to_string()));
        let admin_err = AdminError::from_internal_error(internal_err);

        assert_eq!(admin_err.status_code(), 500);
        assert_eq!(admin_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_self_deletion_converts_to_bad_request() {
        let admin_err = AdminError::from_internal_error(AccessError::SelfDeletion.into());

        assert!(matches!(admin_err, AdminError::SelfDeletionDenied(_)));
        assert_eq!(admin_err.status_code(), 400);
    }

    #[test]
    fn test_admin_required_converts_to_forbidden() {
        let admin_err = AdminError::from_internal_error(AccessError::AdminRequired.into());

        assert!(matches!(admin_err, AdminError::AdminRequired(_)));
        assert_eq!(admin_err.status_code(), 403);
    }

    #[test]
    fn test_user_not_found_converts_correctly() {
        let internal_err = InternalError::Credential(CredentialError::UserNotFound(42));
        let admin_err = AdminError::from_internal_error(internal_err);

        assert_eq!(admin_err.message(), "User not found: 42");
        assert_eq!(admin_err.status_code(), 404);
    }

    #[test]
    fn test_duplicate_email_converts_to_conflict() {
        let internal_err = InternalError::Credential(CredentialError::DuplicateEmail("a@b.c".to_string()));
        let admin_err = AdminError::from_internal_error(internal_err);

        assert_eq!(admin_err.status_code(), 409);
        assert!(admin_err.message().contains("a@b.c"));
    }

    #[test]
    fn test_unexpected_domain_error_converts_to_internal_server_error() {
        // Rating errors never surface from admin operations
        let admin_err = AdminError::from_internal_error(RatingError::InvalidValue(12).into());

        assert_eq!(admin_err.message(), "An internal error occurred");
    }
}
