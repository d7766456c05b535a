use axum::{
    routing::{get, post},
    Router,
};
use examination_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/public/exams/:exam_id", get(routes::public::get_exam))
        .route(
            "/api/public/exams/:exam_id/submissions",
            post(routes::public::submit_exam),
        )
        .layer(axum::middleware::from_fn_with_state(
            examination_backend::middleware::rate_limit::RequestBudget::per_second(
                config.public_rps,
            ),
            examination_backend::middleware::rate_limit::rps_middleware,
        ));

    let reporting_api = Router::new()
        .route(
            "/api/reporting/exams/:exam_id/stats",
            get(routes::reporting::list_question_stats),
        )
        .route(
            "/api/reporting/exams/:exam_id/results",
            get(routes::reporting::list_exam_results),
        )
        .route(
            "/api/reporting/exams/:exam_id/results/:student_id",
            get(routes::reporting::get_exam_result),
        )
        .route(
            "/api/reporting/exams/:exam_id/answers/:student_id",
            get(routes::reporting::list_submitted_answers),
        )
        .layer(axum::middleware::from_fn_with_state(
            examination_backend::middleware::rate_limit::RequestBudget::per_second(
                config.reporting_rps,
            ),
            examination_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(public_api)
        .merge(reporting_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
