use migration::MigratorTrait;
use selfserv_qr::{ batch::Generator, Config, Result };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "selfserv_qr=info".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        "Generating {} table code(s) starting at index {}",
        config.count,
        config.start_index
    );
    if let Some(restaurant_id) = config.restaurant_id {
        tracing::info!("Multi-tenant mode, restaurant_id={}", restaurant_id);
    }

    // Initialize database connection
    let db = sea_orm::Database
        ::connect(&config.database_url).await
        .map_err(selfserv_qr::AppError::Database)?;

    tracing::info!("Database connected successfully");

    // Run migrations
    migration::Migrator::up(&db, None).await.map_err(selfserv_qr::AppError::Database)?;

    let generator = Generator::new(config);

    match generator.run(&db).await {
        Ok(()) => {
            tracing::info!("All done.");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Error, rolled back: {}", e);
            Err(e)
        }
    }
}
