use std::sync::Arc;

use axum::{
    Router,
    routing::{get, get_service, post},
};
use minijinja::Environment;
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::routes::{admin, api, expenses, export, public};
use crate::util::templates;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub templates: Arc<Environment<'static>>,
}

pub fn create_router(db: DatabaseConnection, config: Arc<Config>) -> Router {
    let state = AppState {
        db,
        config,
        templates: Arc::new(templates::environment()),
    };

    Router::new()
        .route("/", get(public::rsvp_form))
        .route("/enviar", post(public::submit_rsvp))
        .route("/gracias", get(public::thanks))
        .route("/api/invitados", get(api::unconfirmed_guests))
        .route("/admin", get(admin::panel))
        .route("/admin/cargar_invitados", post(admin::load_guests))
        .route("/admin/invitados/rename", post(admin::rename_guest))
        .route("/admin/invitados/delete", post(admin::delete_guest))
        .route("/admin/rsvp/update", post(admin::update_response))
        .route("/admin/gastos", get(expenses::panel))
        .route("/admin/gastos/agregar", post(expenses::add_item))
        .route("/admin/gastos/actualizar", post(expenses::update_item))
        .route("/admin/gastos/borrar", post(expenses::delete_item))
        .route("/admin/export/rsvps.xlsx", get(export::export_rsvps))
        .route("/admin/export/gastos.xlsx", get(export::export_expenses))
        .with_state(state)
        .nest_service("/static", get_service(ServeDir::new("static")))
        .layer(TraceLayer::new_for_http())
}

pub async fn shutdown_signal() {
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
