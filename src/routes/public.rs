use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use crate::error::AppError;
use crate::router::AppState;
use crate::rsvp::responses;

#[derive(Debug, Default, Deserialize)]
pub struct RsvpForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub confirma: String,
    #[serde(default)]
    pub menu: String,
    /// Older copies of the form sent the menu under this name.
    #[serde(default)]
    pub restricciones: String,
    #[serde(default)]
    pub mensaje: String,
}

impl RsvpForm {
    fn menu_raw(&self) -> &str {
        if self.menu.trim().is_empty() {
            &self.restricciones
        } else {
            &self.menu
        }
    }
}

pub async fn rsvp_form(State(state): State<AppState>) -> Result<Response, AppError> {
    render_form(&state, &RsvpForm::default(), &[])
}

/// On validation failure the same form comes back with every collected
/// message and the submitted values; on success the client is sent to
/// the confirmation page with a 303 so a refresh cannot resubmit.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Form(form): Form<RsvpForm>,
) -> Result<Response, AppError> {
    match responses::submit(
        &state.db,
        &form.nombre,
        &form.confirma,
        form.menu_raw(),
        &form.mensaje,
    )
    .await
    {
        Ok(saved) => {
            let url = format!(
                "/gracias?nombre={}",
                utf8_percent_encode(&saved.guest_name, NON_ALPHANUMERIC)
            );
            Ok(Redirect::to(&url).into_response())
        }
        Err(AppError::Validation(errors)) => render_form(&state, &form, &errors),
        Err(e) => Err(e),
    }
}

#[derive(Deserialize)]
pub struct ThanksQuery {
    pub nombre: Option<String>,
}

/// Confirmation page. When a name rides along it echoes the guest's
/// current status, which after a resubmission is always the newest row.
pub async fn thanks(
    State(state): State<AppState>,
    Query(query): Query<ThanksQuery>,
) -> Result<Response, AppError> {
    let status = match query.nombre.as_deref() {
        Some(name) => responses::current_status(&state.db, name).await?,
        None => None,
    };

    let tmpl = state.templates.get_template("gracias.html")?;
    let html = tmpl.render(context! { status => status })?;
    Ok(Html(html).into_response())
}

fn render_form(
    state: &AppState,
    form: &RsvpForm,
    errors: &[String],
) -> Result<Response, AppError> {
    let tmpl = state.templates.get_template("rsvp.html")?;
    let html = tmpl.render(context! {
        errors => errors,
        nombre => &form.nombre,
        confirma => &form.confirma,
        menu => form.menu_raw(),
        mensaje => &form.mensaje,
    })?;
    Ok(Html(html).into_response())
}
