use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use sea_orm::{EntityTrait, QueryOrder};
use serde::Deserialize;

use crate::entities::expense;
use crate::error::AppError;
use crate::router::AppState;
use crate::routes::admin::require_admin;
use crate::rsvp::expenses;
use crate::rsvp::expenses::HeadcountBase;
use crate::rsvp::report;

/// The chosen headcount basis rides along on every expense link and
/// redirect so it survives navigation.
fn gastos_url(key: &str, base: HeadcountBase, n: i64) -> String {
    format!(
        "/admin/gastos?key={}&base={}&n={}",
        utf8_percent_encode(key, NON_ALPHANUMERIC),
        base.as_str(),
        n
    )
}

#[derive(Deserialize)]
pub struct ExpenseQuery {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub base: String,
    pub n: Option<i64>,
}

pub async fn panel(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &query.key)?;

    let base = HeadcountBase::parse(&query.base);
    let manual_n = query.n.unwrap_or(0);
    let headcount = expenses::resolve_headcount(&state.db, base, manual_n).await?;

    let items = expense::Entity::find()
        .order_by_asc(expense::Column::CreatedAt)
        .order_by_asc(expense::Column::Id)
        .all(&state.db)
        .await?;
    let report = report::build_expense_report(&items, headcount);

    let tmpl = state.templates.get_template("gastos.html")?;
    let html = tmpl.render(context! {
        key => &query.key,
        base => base.as_str(),
        manual_n => manual_n,
        report => report,
    })?;
    Ok(Html(html).into_response())
}

#[derive(Deserialize)]
pub struct ExpenseItemForm {
    #[serde(default)]
    pub key: String,
    pub id: Option<i32>,
    #[serde(default)]
    pub concepto: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub importe: String,
    #[serde(default)]
    pub nota: String,
    #[serde(default)]
    pub base: String,
    pub n: Option<i64>,
}

impl ExpenseItemForm {
    fn back_url(&self) -> String {
        gastos_url(
            &self.key,
            HeadcountBase::parse(&self.base),
            self.n.unwrap_or(0),
        )
    }
}

pub async fn add_item(
    State(state): State<AppState>,
    Form(form): Form<ExpenseItemForm>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &form.key)?;

    expenses::add_item(&state.db, &form.concepto, &form.tipo, &form.importe, &form.nota).await?;

    Ok(Redirect::to(&form.back_url()).into_response())
}

pub async fn update_item(
    State(state): State<AppState>,
    Form(form): Form<ExpenseItemForm>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &form.key)?;

    let id = form.id.ok_or_else(|| {
        AppError::Validation(vec!["Falta el id del gasto.".to_string()])
    })?;
    expenses::update_item(
        &state.db,
        id,
        &form.concepto,
        &form.tipo,
        &form.importe,
        &form.nota,
    )
    .await?;

    Ok(Redirect::to(&form.back_url()).into_response())
}

#[derive(Deserialize)]
pub struct DeleteExpenseForm {
    #[serde(default)]
    pub key: String,
    pub id: i32,
    #[serde(default)]
    pub base: String,
    pub n: Option<i64>,
}

pub async fn delete_item(
    State(state): State<AppState>,
    Form(form): Form<DeleteExpenseForm>,
) -> Result<Response, AppError> {
    require_admin(&state.config, &form.key)?;

    expenses::delete_item(&state.db, form.id).await?;

    let url = gastos_url(
        &form.key,
        HeadcountBase::parse(&form.base),
        form.n.unwrap_or(0),
    );
    Ok(Redirect::to(&url).into_response())
}
