// create-admin command implementation

use crate::providers::CryptoProvider;
use crate::stores::CredentialStore;
use crate::types::db::role::RoleName;
use crate::types::db::user;
use crate::types::internal::account::NewUser;
use crate::types::internal::context::RequestContext;

/// Create an account with the admin role
///
/// When no password is given a random one is generated and printed once.
///
/// # Returns
/// * `Ok((user, generated_password))` - The account, plus the password if it was generated
/// * `Err(...)` - Validation failed or the email/username is taken
pub async fn create_admin(
    credential_store: &CredentialStore,
    email: &str,
    username: &str,
    password: Option<String>,
) -> Result<(user::Model, Option<String>), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("create-admin");

    let generated = password.is_none();
    let password = password.unwrap_or_else(|| CryptoProvider::new().generate_secure_password());

    let user = credential_store
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: password.clone(),
            role: RoleName::Admin,
        })
        .await?;

    tracing::info!(actor = %ctx.actor_id, request_id = %ctx.request_id, "Admin account {} created", user.id);
    println!("Admin account created: {} <{}> (id {})", user.username, user.email, user.id);

    if generated {
        println!("Generated password: {}", password);
        println!("Store it now; it will not be shown again.");
        return Ok((user, Some(password)));
    }

    Ok((user, None))
}
