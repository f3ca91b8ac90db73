use std::path::Path;
use crate::cli::commands::{TokenArgs, TokenCommand};
use crate::config::load_config;
use crate::db::Database;
use crate::errors::GatewayError;
use tracing::info;

pub async fn handle_token(args: TokenArgs) -> Result<(), GatewayError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let db_path = args.db.unwrap_or_else(|| config.db_path());
    let db = Database::new(&db_path)?;

    match args.command {
        TokenCommand::Create { admin } => {
            let token = db.create_token(admin)?;
            info!(admin, db = %db_path, "Created API token");
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        TokenCommand::List => {
            let tokens = db.list_tokens()?;
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
        TokenCommand::Delete { token } => {
            if !db.delete_token(&token)? {
                return Err(GatewayError::NotFound("Token not found".into()));
            }
            println!("Token deleted successfully");
        }
    }

    Ok(())
}
