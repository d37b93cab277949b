use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use sea_orm::{EntityTrait, QueryOrder};
use serde::Deserialize;

use crate::config::Config;
use crate::entities::{guest, response};
use crate::error::AppError;
use crate::router::AppState;
use crate::rsvp::{guests, report, responses};

/// Shared-secret gate for the administrative surface. The key travels
/// as a `key` query/form field and is compared for exact equality; a
/// mismatch says nothing beyond "unauthorized".
pub fn require_admin(config: &Config, key: &str) -> Result<(), AppError> {
    if !key.is_empty() && key == config.admin_key {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Every admin mutation lands back here, key included.
pub fn admin_url(key: &str) -> String {
    format!("/admin?key={}", utf8_percent_encode(key, NON_ALPHANUMERIC))
}

#[derive(Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub key: String,
}

pub async fn panel(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &query.key)?;

    let guest_rows = guest::Entity::find()
        .order_by_asc(guest::Column::Name)
        .all(&state.db)
        .await?;
    // Full log, newest first, so individual rows stay editable; the
    // report below collapses it to one current status per guest.
    let response_rows = response::Entity::find()
        .order_by_desc(response::Column::SubmittedAt)
        .order_by_desc(response::Column::Id)
        .all(&state.db)
        .await?;
    let report = report::build_guest_report(&guest_rows, &response_rows);

    let tmpl = state.templates.get_template("admin.html")?;
    let html = tmpl.render(context! {
        key => &query.key,
        rsvps => response_rows,
        invitados => guest_rows,
        report => report,
    })?;
    Ok(Html(html).into_response())
}

#[derive(Deserialize)]
pub struct LoadGuestsForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub lista: String,
}

pub async fn load_guests(
    State(state): State<AppState>,
    Form(form): Form<LoadGuestsForm>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &form.key)?;

    let inserted = guests::bulk_load(&state.db, &form.lista).await?;
    tracing::info!("bulk load inserted {inserted} guests");

    Ok(Redirect::to(&admin_url(&form.key)).into_response())
}

#[derive(Deserialize)]
pub struct RenameGuestForm {
    #[serde(default)]
    pub key: String,
    pub id: i32,
    #[serde(default)]
    pub nombre: String,
    /// Checkbox: present means rewrite historical response rows.
    pub cascade: Option<String>,
}

pub async fn rename_guest(
    State(state): State<AppState>,
    Form(form): Form<RenameGuestForm>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &form.key)?;

    guests::rename_guest(&state.db, form.id, &form.nombre, form.cascade.is_some()).await?;

    Ok(Redirect::to(&admin_url(&form.key)).into_response())
}

#[derive(Deserialize)]
pub struct DeleteGuestForm {
    #[serde(default)]
    pub key: String,
    pub id: i32,
    pub cascade: Option<String>,
}

pub async fn delete_guest(
    State(state): State<AppState>,
    Form(form): Form<DeleteGuestForm>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &form.key)?;

    guests::delete_guest(&state.db, form.id, form.cascade.is_some()).await?;

    Ok(Redirect::to(&admin_url(&form.key)).into_response())
}

#[derive(Deserialize)]
pub struct UpdateResponseForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nombre: String,
    /// "1" or "0"; anything else is incomplete data.
    #[serde(default)]
    pub confirma: String,
    #[serde(default)]
    pub menu: String,
    #[serde(default)]
    pub mensaje: String,
}

pub async fn update_response(
    State(state): State<AppState>,
    Form(form): Form<UpdateResponseForm>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &form.key)?;

    responses::admin_update(
        &state.db,
        &form.id,
        &form.nombre,
        &form.confirma,
        &form.menu,
        &form.mensaje,
    )
    .await?;

    Ok(Redirect::to(&admin_url(&form.key)).into_response())
}
