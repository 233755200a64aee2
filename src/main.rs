use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use std::sync::Arc;

use identity_backend::api::{AuthApi, HealthApi, UsersApi};
use identity_backend::config::{init_logging, AppConfig};
use identity_backend::services::{AuthService, PasswordHasher, TokenService, UserService};
use identity_backend::stores::{SqlUserStore, UserStore};
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging()?;

    let config = AppConfig::from_env()?;
    tracing::info!(
        environment = %config.app.environment,
        "starting {}",
        config.app.name
    );

    let db = Database::connect(&config.database_url).await?;
    tracing::info!(url = %config.database_url, "connected to database");

    Migrator::up(&db, None).await?;
    tracing::info!("database migrations completed");

    let store: Arc<dyn UserStore> = Arc::new(SqlUserStore::new(db));
    let hasher = Arc::new(PasswordHasher::new(&config.hash)?);
    let tokens = Arc::new(TokenService::new(&config.jwt));

    let auth = Arc::new(AuthService::new(store.clone(), hasher.clone(), tokens));
    let users = Arc::new(UserService::new(store, hasher));

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(auth.clone()),
            UsersApi::new(auth, users),
        ),
        config.app.name.clone(),
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", config.bind_address()));

    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    let bind = config.bind_address();
    tracing::info!(%bind, "listening");
    Server::new(TcpListener::bind(bind)).run(app).await?;

    Ok(())
}
