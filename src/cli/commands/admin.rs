//! Create admin command handler

use crate::config::Config;
use crate::services::AccountError;
use crate::state::SharedState;

pub async fn cmd_create_admin(
    config: Config,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            println!("Password for {username}:");
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let state = SharedState::new(config).await?;

    match state.account_service.create_admin(username, &password).await {
        Ok(user) => {
            println!("✓ Created admin '{}' (ID: {})", user.username, user.id);
            Ok(())
        }
        Err(e @ (AccountError::Validation(_) | AccountError::UsernameTaken)) => {
            println!("Could not create admin: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
