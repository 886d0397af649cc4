use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mukando::cli;
use mukando::router::init_router;
use mukando::state::init_app_state;
use mukando_config::ServerConfig;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Check if this is a CLI command
    if args.len() > 1 && args[1] == "create-superadmin" {
        handle_create_superadmin(args).await;
        return;
    }

    // Normal server startup
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;
    let app = init_router(state);

    let config = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();
    println!("🚀 Mukando API running on http://{}", config.bind_addr);
    println!(
        "📚 Swagger UI available at http://{}/swagger-ui",
        config.bind_addr
    );
    println!(
        "📖 Scalar UI available at http://{}/scalar",
        config.bind_addr
    );
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_superadmin(args: Vec<String>) {
    if args.len() != 5 {
        eprintln!(
            "Usage: {} create-superadmin <username> <email> <password>",
            args[0]
        );
        std::process::exit(1);
    }

    let username = &args[2];
    let email = &args[3];
    let password = &args[4];

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    match cli::create_super_admin(&pool, username, email, password).await {
        Ok(true) => {
            println!("✅ Super admin created successfully!");
            println!("   Username: {}", username);
            println!("   Email: {}", email);
        }
        Ok(false) => {
            println!("Super admin '{}' already exists, nothing to do.", username);
        }
        Err(e) => {
            eprintln!("❌ Error creating super admin: {}", e);
            std::process::exit(1);
        }
    }
}
