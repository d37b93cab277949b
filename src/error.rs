use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Request-level error taxonomy. Every variant is recovered at the
/// request boundary; nothing here aborts the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad or missing user input. Carries every message collected while
    /// validating, so the caller can surface them all at once.
    #[error("datos inválidos")]
    Validation(Vec<String>),

    #[error("no se encontró {0}")]
    NotFound(String),

    #[error("ya existe un invitado llamado \"{0}\"")]
    DuplicateName(String),

    #[error("no autorizado")]
    Unauthorized,

    #[error(transparent)]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, errors.join("\n")).into_response()
            }
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                format!("No se encontró {what}."),
            )
                .into_response(),
            AppError::DuplicateName(name) => (
                StatusCode::CONFLICT,
                format!("Ya existe un invitado llamado \"{name}\"."),
            )
                .into_response(),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "No autorizado.").into_response(),
            AppError::Export(e) => {
                tracing::error!("xlsx export failed: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No se pudo generar el archivo Excel. Reintentá; si persiste, revisá los datos cargados.",
                )
                    .into_response()
            }
            AppError::Template(e) => {
                tracing::error!("template error: {e:?}");
                generic_failure()
            }
            AppError::Db(e) => {
                tracing::error!("database error: {e:?}");
                generic_failure()
            }
        }
    }
}

fn generic_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Ocurrió un error. Probá de nuevo.",
    )
        .into_response()
}
