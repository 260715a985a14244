//! institute-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use institute_api::{AppState, auth_middleware, router as api_router};
use institute_common::Config;
use institute_core::{
    AccountService, ClassService, DeletionService, PaymentService, StudentDeletionTarget,
    StudentService, TeacherDeletionTarget, TeacherService,
};
use institute_db::repositories::{
    AttendanceRepository, ClassSectionRepository, EnrollmentRepository, StudentPaymentRepository,
    StudentRepository, TeacherPaymentRepository, TeacherRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
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

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "institute=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting institute-rs server...");

    let config = Config::load()?;

    let db = Arc::new(institute_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    institute_db::migrate(&db).await?;
    info!("Migrations completed");

    let user_repo = UserRepository::new(Arc::clone(&db));
    let student_repo = StudentRepository::new(Arc::clone(&db));
    let teacher_repo = TeacherRepository::new(Arc::clone(&db));
    let section_repo = ClassSectionRepository::new(Arc::clone(&db));
    let enrollment_repo = EnrollmentRepository::new(Arc::clone(&db));
    let attendance_repo = AttendanceRepository::new(Arc::clone(&db));
    let student_payment_repo = StudentPaymentRepository::new(Arc::clone(&db));
    let teacher_payment_repo = TeacherPaymentRepository::new(Arc::clone(&db));

    let state = AppState {
        account_service: AccountService::new(user_repo),
        student_service: StudentService::new(student_repo.clone()),
        teacher_service: TeacherService::new(teacher_repo.clone()),
        class_service: ClassService::new(
            section_repo,
            enrollment_repo,
            attendance_repo,
            student_repo.clone(),
            teacher_repo.clone(),
        ),
        payment_service: PaymentService::new(
            student_payment_repo,
            teacher_payment_repo,
            student_repo.clone(),
            teacher_repo.clone(),
        ),
        student_deletion: DeletionService::new(StudentDeletionTarget::new(student_repo)),
        teacher_deletion: DeletionService::new(TeacherDeletionTarget::new(teacher_repo)),
    };

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
