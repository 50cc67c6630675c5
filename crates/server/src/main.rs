//! tanvan server entry point.

mod seed;

use std::sync::Arc;

use axum::{middleware, Router};
use tanvan_api::{middleware::AppState, router as api_router};
use tanvan_common::Config;
use tanvan_core::{
    ArticleService, CommentService, EmailService, FollowService, MailerConfig, PostService,
    ResetService, TimelineService, UserService,
};
use tanvan_db::repositories::{
    ArticleRepository, CategoryRepository, CommentRepository, DiscussionRepository,
    EditorProfileRepository, FollowRepository, MediaRepository, PostRepository, TagRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tanvan=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting tanvan server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = tanvan_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    tanvan_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let editor_repo = EditorProfileRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let article_repo = ArticleRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let tag_repo = TagRepository::new(Arc::clone(&db));
    let media_repo = MediaRepository::new(Arc::clone(&db));
    let discussion_repo = DiscussionRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    // Initialize outgoing mail
    let mailer_config = config.mail.as_ref().map(|mail| MailerConfig {
        smtp_host: mail.smtp_host.clone(),
        smtp_port: mail.smtp_port,
        username: mail.username.clone(),
        password: mail.password.clone(),
        from_address: mail.from_address.clone(),
        from_name: mail.from_name.clone(),
        site_name: mail.from_name.clone(),
        site_url: config.server.url.clone(),
    });
    let email_service = EmailService::new(mailer_config)?;
    if email_service.is_enabled() {
        info!("Outgoing mail configured");
    } else {
        info!("Outgoing mail not configured; reset emails will be dropped");
    }

    // Initialize services
    let user_service = UserService::new(user_repo.clone(), editor_repo);
    let post_service = PostService::new(post_repo.clone());
    let timeline_service = TimelineService::new(
        post_repo.clone(),
        article_repo.clone(),
        follow_repo.clone(),
    );
    let follow_service = FollowService::new(follow_repo);
    let article_service =
        ArticleService::new(article_repo, category_repo, tag_repo, media_repo);
    let comment_service = CommentService::new(comment_repo, discussion_repo);
    let reset_service = ResetService::new(
        user_repo,
        email_service,
        config.security.secret_key.clone(),
        config.security.reset_token_ttl_secs,
        config.server.url.clone(),
    );

    // Seed accounts on first start
    seed::seed_users(&user_service, &config.seed).await?;

    // Create app state
    let state = AppState {
        user_service,
        post_service,
        timeline_service,
        follow_service,
        article_service,
        comment_service,
        reset_service,
        posts_per_page: config.pagination.posts_per_page,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tanvan_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
