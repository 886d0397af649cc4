use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mukando_config::{GatewayConfig, JwtConfig};
use mukando_gateway::policy::RolePolicy;
use mukando_gateway::router::init_router;
use mukando_gateway::state::GatewayState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,mukando_core=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    let state = Arc::new(GatewayState::new(
        JwtConfig::from_env(),
        RolePolicy::defaults(),
        config.routes,
    ));
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();
    println!("🚀 Gateway running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.unwrap();
}
