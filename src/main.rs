use accounts::{state::AppState, telemetry, users::UserStore};
use anyhow::Context;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let app_state = AppState::init().await?;
    app_state.migrate().await?;

    // every selected column must decode into a User
    app_state
        .users()
        .find_by_id(Uuid::nil())
        .await
        .context("query users table")?;

    tracing::info!(
        max_connections = app_state.config.database.max_connections,
        "users schema up to date"
    );
    Ok(())
}
