use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use intake_api::application::use_cases::drafts::sweep_drafts::SweepStaleDrafts;
use intake_api::bootstrap::app_context::{AppContext, AppServices};
use intake_api::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            intake_api::presentation::http::auth::register,
            intake_api::presentation::http::auth::login,
            intake_api::presentation::http::auth::logout,
            intake_api::presentation::http::auth::me,
            intake_api::presentation::http::consultations::list_consultations,
            intake_api::presentation::http::consultations::create_consultation,
            intake_api::presentation::http::consultations::get_consultation,
            intake_api::presentation::http::consultations::update_consultation,
            intake_api::presentation::http::consultations::complete_consultation,
            intake_api::presentation::http::consultations::archive_consultation,
            intake_api::presentation::http::consultations::delete_consultation,
            intake_api::presentation::http::drafts::save_draft,
            intake_api::presentation::http::drafts::get_draft,
            intake_api::presentation::http::drafts::discard_draft,
            intake_api::presentation::http::drafts::apply_draft,
            intake_api::presentation::http::versions::list_versions,
            intake_api::presentation::http::versions::get_version,
            intake_api::presentation::http::versions::rollback_version,
            intake_api::presentation::http::health::health,
        ),
        components(schemas(
            intake_api::presentation::http::auth::RegisterRequest,
            intake_api::presentation::http::auth::LoginRequest,
            intake_api::presentation::http::auth::LoginResponse,
            intake_api::presentation::http::auth::UserResponse,
            intake_api::presentation::http::consultations::ConsultationResponse,
            intake_api::presentation::http::consultations::ConsultationListResponse,
            intake_api::presentation::http::consultations::ConsultationDetailResponse,
            intake_api::presentation::http::consultations::CreateConsultationRequest,
            intake_api::presentation::http::consultations::UpdateConsultationRequest,
            intake_api::presentation::http::drafts::DraftResponse,
            intake_api::presentation::http::drafts::SaveDraftRequest,
            intake_api::presentation::http::versions::VersionResponse,
            intake_api::presentation::http::versions::VersionListResponse,
            intake_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication"),
            (name = "Consultations", description = "Consultation intake records"),
            (name = "Drafts", description = "Autosaved working copies"),
            (name = "Versions", description = "Append-only version history"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "intake_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting intake backend");

    // Database
    let pool = intake_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    intake_api::infrastructure::db::migrate(&pool).await?;

    let consultation_repo = Arc::new(
        intake_api::infrastructure::db::repositories::consultation_repository_sqlx::SqlxConsultationRepository::new(
            pool.clone(),
        ),
    );
    let draft_repo = Arc::new(
        intake_api::infrastructure::db::repositories::draft_repository_sqlx::SqlxDraftRepository::new(
            pool.clone(),
        ),
    );
    let version_repo = Arc::new(
        intake_api::infrastructure::db::repositories::version_repository_sqlx::SqlxVersionRepository::new(
            pool.clone(),
        ),
    );
    let user_repo = Arc::new(
        intake_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
            pool.clone(),
        ),
    );

    let services = AppServices::new(
        consultation_repo,
        draft_repo.clone(),
        version_repo,
        user_repo,
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let cors = build_cors(&cfg);

    // Build API router
    let api_router = Router::new()
        .nest(
            "/api",
            intake_api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/auth",
            intake_api::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api",
            intake_api::presentation::http::consultations::routes(ctx.clone()),
        )
        .nest(
            "/api",
            intake_api::presentation::http::drafts::routes(ctx.clone()),
        )
        .nest(
            "/api",
            intake_api::presentation::http::versions::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, api_router).await?;
        Ok(())
    });

    // Background sweep of stale autosaved drafts
    let sweep_handle: JoinHandle<anyhow::Result<()>> = {
        let drafts = draft_repo.clone();
        let cfg_for_sweep = cfg.clone();
        tokio::spawn(async move {
            let interval = Duration::from_secs(cfg_for_sweep.draft_sweep_interval_secs);
            loop {
                let sweep = SweepStaleDrafts {
                    drafts: drafts.as_ref(),
                };
                if let Err(e) = sweep.execute(cfg_for_sweep.draft_retention_days).await {
                    tracing::error!(error = ?e, "draft_sweep_failed");
                }
                sleep(interval).await;
            }
        })
    };

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }

    sweep_handle.abort();
    Ok(())
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];

    let origin = cfg
        .frontend_url
        .as_deref()
        .and_then(|o| HeaderValue::from_str(o).ok());
    match origin {
        Some(v) => CorsLayer::new()
            .allow_origin(v)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        None if cfg.is_production => {
            // FRONTEND_URL is mandatory in production (enforced at startup);
            // deny-all if we still get here without one.
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                    "http://invalid",
                )))
                .allow_methods(methods)
                .allow_headers(headers)
        }
        None => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    }
}
