//! API Router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    CheckinService, CheckoutService, ParkingService, ReservationService, TaskService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::notifications::{create_notification_state, ws_notifications_handler, SharedEventBus};

use super::modules::{
    auth, checkout, counters, health, incidents, metrics, notifications, reservations, tasks,
    zones,
};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::login,
        auth::handlers::register,
        auth::handlers::get_current_user,
        auth::handlers::change_password,
        // Checkout
        checkout::handlers::checkout,
        checkout::handlers::scan,
        checkout::handlers::list_tickets,
        checkout::handlers::ticket_stats,
        // Counters
        counters::handlers::create_counter,
        counters::handlers::list_counters,
        counters::handlers::get_counter_stats,
        counters::handlers::get_counter,
        counters::handlers::update_counter,
        counters::handlers::delete_counter,
        // Parking
        zones::handlers::create_zone,
        zones::handlers::list_zones,
        zones::handlers::list_zone_spots,
        zones::handlers::set_spot_maintenance,
        zones::handlers::spot_metrics,
        // Reservations
        reservations::handlers::create_reservation,
        reservations::handlers::list_reservations,
        reservations::handlers::get_reservation,
        reservations::handlers::cancel_reservation,
        // Tasks
        tasks::handlers::create_task,
        tasks::handlers::list_tasks,
        tasks::handlers::get_task,
        tasks::handlers::update_task_status,
        tasks::handlers::delete_task,
        // Incidents
        incidents::handlers::report_incident,
        incidents::handlers::list_incidents,
        incidents::handlers::update_incident_status,
        // Notifications
        notifications::handlers::list_notifications,
        notifications::handlers::unread_count,
        notifications::handlers::mark_read,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginationParams,
            // Health
            health::handlers::HealthResponse,
            health::handlers::ComponentHealth,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            auth::UserInfo,
            // Checkout
            checkout::CheckoutRequest,
            checkout::PaymentRequest,
            checkout::ScanRequest,
            checkout::CheckoutResponse,
            checkout::ScanResponse,
            checkout::TicketDto,
            checkout::QrDto,
            PaginatedResponse<checkout::TicketDto>,
            checkout::TicketStats,
            // Counters
            counters::CounterDto,
            counters::CreateCounterRequest,
            counters::UpdateCounterRequest,
            counters::CounterStats,
            // Parking
            zones::CreateZoneRequest,
            zones::CreateZoneResponse,
            zones::ZoneDto,
            zones::SpotDto,
            zones::MaintenanceRequest,
            zones::OccupancyMetricsDto,
            zones::OccupancyTotalsDto,
            zones::ZoneOccupancyDto,
            // Reservations
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            reservations::CancelReservationResponse,
            // Tasks
            tasks::CreateTaskRequest,
            tasks::UpdateTaskStatusRequest,
            tasks::TaskDto,
            // Incidents
            incidents::ReportIncidentRequest,
            incidents::UpdateIncidentStatusRequest,
            incidents::IncidentDto,
            // Notifications
            notifications::handlers::NotificationDto,
            notifications::handlers::UnreadCountDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: login (JWT), registration, password change"),
        (name = "Checkout", description = "Attendee registration, ticket issuance and QR check-in"),
        (name = "Counters", description = "Entry/exit counter management and load statistics"),
        (name = "Parking", description = "Parking zones, spots and occupancy metrics"),
        (name = "Reservations", description = "Parking spot reservations"),
        (name = "Tasks", description = "Coordinator task assignment"),
        (name = "Incidents", description = "On-site incident reporting"),
        (name = "Notifications", description = "Per-user notifications and live event stream"),
    ),
    info(
        title = "CrowdFlow API",
        version = "1.0.0",
        description = "REST API for event/crowd management: tickets, counters, parking, tasks",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
#[allow(clippy::too_many_arguments)]
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    event_bus: SharedEventBus,
    checkout_service: Arc<CheckoutService>,
    checkin_service: Arc<CheckinService>,
    reservation_service: Arc<ReservationService>,
    parking_service: Arc<ParkingService>,
    task_service: Arc<TaskService>,
    app_cfg: &AppConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── Auth ────────────────────────────────────────────────────
    let auth_state = auth::AuthHandlerState {
        repos: repos.clone(),
        jwt_config,
    };

    let auth_routes = Router::new()
        .route("/login", post(auth::handlers::login))
        .route("/register", post(auth::handlers::register))
        .with_state(auth_state.clone());

    let auth_protected_routes = Router::new()
        .route("/me", get(auth::handlers::get_current_user))
        .route("/change-password", axum::routing::put(auth::handlers::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // ── Checkout ────────────────────────────────────────────────
    let checkout_state = checkout::CheckoutAppState {
        repos: repos.clone(),
        checkout: checkout_service,
        checkin: checkin_service,
    };

    // Public purchase endpoint; the scanner endpoint needs a staff token
    let checkout_routes = Router::new()
        .route("/", post(checkout::handlers::checkout))
        .with_state(checkout_state.clone());

    let scan_routes = Router::new()
        .route("/scan", post(checkout::handlers::scan))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(checkout_state.clone());

    let ticket_routes = Router::new()
        .route("/", get(checkout::handlers::list_tickets))
        .route("/stats", get(checkout::handlers::ticket_stats))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(checkout_state);

    // ── Counters (protected) ────────────────────────────────────
    let counter_state = counters::CounterAppState {
        repos: repos.clone(),
    };
    let counter_routes = Router::new()
        .route(
            "/",
            get(counters::handlers::list_counters).post(counters::handlers::create_counter),
        )
        .route("/stats", get(counters::handlers::get_counter_stats))
        .route(
            "/{id}",
            get(counters::handlers::get_counter)
                .put(counters::handlers::update_counter)
                .delete(counters::handlers::delete_counter),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(counter_state);

    // ── Parking ─────────────────────────────────────────────────
    // Browsing zones requires any logged-in role; only the create
    // handler checks for admin/organizer.
    let parking_state = zones::ParkingAppState {
        parking: parking_service,
    };

    let zone_routes = Router::new()
        .route(
            "/",
            get(zones::handlers::list_zones).post(zones::handlers::create_zone),
        )
        .route("/{id}/spots", get(zones::handlers::list_zone_spots))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(parking_state.clone());

    // The occupancy aggregation feeds public dashboards, no token needed
    let spot_routes = Router::new()
        .route("/metrics", get(zones::handlers::spot_metrics))
        .with_state(parking_state.clone());

    let spot_protected_routes = Router::new()
        .route(
            "/{id}/maintenance",
            patch(zones::handlers::set_spot_maintenance),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(parking_state);

    // ── Reservations ────────────────────────────────────────────
    // Create and cancel are public (attendee self-service, matching the
    // checkout flow); listing is for staff dashboards.
    let reservation_state = reservations::ReservationAppState {
        reservations: reservation_service,
    };

    let reservation_public_routes = Router::new()
        .route("/", post(reservations::handlers::create_reservation))
        .route(
            "/{id}/cancel",
            patch(reservations::handlers::cancel_reservation),
        )
        .with_state(reservation_state.clone());

    let reservation_protected_routes = Router::new()
        .route("/", get(reservations::handlers::list_reservations))
        .route("/{id}", get(reservations::handlers::get_reservation))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(reservation_state);

    // ── Tasks (protected) ───────────────────────────────────────
    let task_state = tasks::TaskAppState {
        tasks: task_service,
    };
    let task_routes = Router::new()
        .route(
            "/",
            get(tasks::handlers::list_tasks).post(tasks::handlers::create_task),
        )
        .route(
            "/{id}",
            get(tasks::handlers::get_task).delete(tasks::handlers::delete_task),
        )
        .route("/{id}/status", patch(tasks::handlers::update_task_status))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(task_state);

    // ── Incidents (protected) ───────────────────────────────────
    let incident_state = incidents::IncidentAppState {
        repos: repos.clone(),
        event_bus: event_bus.clone(),
        upload_dir: PathBuf::from(&app_cfg.storage.upload_dir),
        public_prefix: app_cfg.storage.public_prefix.clone(),
    };
    let incident_routes = Router::new()
        .route(
            "/",
            get(incidents::handlers::list_incidents).post(incidents::handlers::report_incident),
        )
        .route(
            "/{id}/status",
            patch(incidents::handlers::update_incident_status),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(incident_state);

    // ── Notifications ───────────────────────────────────────────
    let notification_state = notifications::NotificationAppState { repos };
    let notification_routes = Router::new()
        .route("/", get(notifications::handlers::list_notifications))
        .route("/unread", get(notifications::handlers::unread_count))
        .route("/{id}/read", patch(notifications::handlers::mark_read))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(notification_state);

    // WebSocket event stream (no auth for the upgrade)
    let ws_state = create_notification_state(event_bus);
    let ws_routes = Router::new()
        .route("/ws", get(ws_notifications_handler))
        .with_state(ws_state);

    // ── Health / metrics / uploads ──────────────────────────────
    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let metrics_state = metrics::MetricsState {
        handle: prometheus_handle,
    };

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::handlers::health_check).with_state(health_state))
        // Prometheus scrape endpoint
        .route(
            "/metrics",
            get(metrics::handlers::prometheus_metrics).with_state(metrics_state),
        )
        // Uploaded incident images
        .nest_service(
            &app_cfg.storage.public_prefix,
            ServeDir::new(&app_cfg.storage.upload_dir),
        )
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Checkout
        .nest("/api/v1/checkout", checkout_routes)
        .nest("/api/v1/checkout", scan_routes)
        .nest("/api/v1/tickets", ticket_routes)
        // Counters
        .nest("/api/v1/counters", counter_routes)
        // Parking
        .nest("/api/v1/zones", zone_routes)
        .nest("/api/v1/spots", spot_routes)
        .nest("/api/v1/spots", spot_protected_routes)
        // Reservations
        .nest("/api/v1/reservations", reservation_public_routes)
        .nest("/api/v1/reservations", reservation_protected_routes)
        // Tasks
        .nest("/api/v1/tasks", task_routes)
        // Incidents
        .nest("/api/v1/incidents", incident_routes)
        // Notifications
        .nest("/api/v1/notifications", notification_routes)
        .nest("/api/v1/notifications", ws_routes)
        // Middleware
        .layer(middleware::from_fn(
            metrics::middleware::http_metrics_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
