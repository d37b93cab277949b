use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Local;
use sea_orm::{EntityTrait, QueryOrder};
use serde::Deserialize;

use crate::entities::{expense, guest, response};
use crate::error::AppError;
use crate::router::AppState;
use crate::routes::admin::require_admin;
use crate::rsvp::expenses::{self, HeadcountBase};
use crate::rsvp::{export, report};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub base: String,
    pub n: Option<i64>,
}

/// Guest/response report: sheets "Respuestas" and "Faltantes".
pub async fn export_rsvps(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &query.key)?;

    let guest_rows = guest::Entity::find()
        .order_by_asc(guest::Column::Name)
        .all(&state.db)
        .await?;
    let response_rows = response::Entity::find().all(&state.db).await?;
    let report = report::build_guest_report(&guest_rows, &response_rows);

    let bytes = export::guest_workbook(&report)?;
    Ok(xlsx_download(bytes, "rsvps"))
}

/// Expense report under the requested headcount basis: sheets "Gastos"
/// and "Resumen".
pub async fn export_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &query.key)?;

    let base = HeadcountBase::parse(&query.base);
    let headcount = expenses::resolve_headcount(&state.db, base, query.n.unwrap_or(0)).await?;
    let items = expense::Entity::find()
        .order_by_asc(expense::Column::CreatedAt)
        .order_by_asc(expense::Column::Id)
        .all(&state.db)
        .await?;
    let report = report::build_expense_report(&items, headcount);

    let bytes = export::expense_workbook(&report)?;
    Ok(xlsx_download(bytes, "gastos"))
}

fn xlsx_download(bytes: Vec<u8>, stem: &str) -> Response {
    let filename = format!("{stem}_{}.xlsx", Local::now().format("%Y%m%d_%H%M%S"));
    (
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
