use std::collections::HashSet;

use chrono::{Timelike, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Serialize;

use crate::entities::{expense, guest, response};
use crate::error::AppError;
use crate::rsvp::money::parse_amount;
use crate::rsvp::responses::latest_by_guest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    PerGuest,
    Flat,
}

impl ExpenseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseKind::PerGuest => "per_guest",
            ExpenseKind::Flat => "flat",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "per_guest" => Some(ExpenseKind::PerGuest),
            "flat" => Some(ExpenseKind::Flat),
            _ => None,
        }
    }
}

/// Which headcount the per-guest items multiply against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadcountBase {
    Invitados,
    Confirmados,
    Manual,
}

impl HeadcountBase {
    /// Unrecognized values fall back to counting every loaded guest.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "confirmados" => HeadcountBase::Confirmados,
            "manual" => HeadcountBase::Manual,
            _ => HeadcountBase::Invitados,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeadcountBase::Invitados => "invitados",
            HeadcountBase::Confirmados => "confirmados",
            HeadcountBase::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Headcount {
    pub base: &'static str,
    pub total_guests: i64,
    pub total_confirmed: i64,
    /// The number per-guest items are multiplied by.
    pub n: i64,
}

/// Picks `n` from the chosen base. Pure so the selection rules are
/// testable without a store.
pub fn pick_headcount(
    base: HeadcountBase,
    manual_n: i64,
    total_guests: i64,
    total_confirmed: i64,
) -> Headcount {
    let n = match base {
        HeadcountBase::Invitados => total_guests,
        HeadcountBase::Confirmados => total_confirmed,
        HeadcountBase::Manual => manual_n.max(0),
    };
    Headcount {
        base: base.as_str(),
        total_guests,
        total_confirmed,
        n,
    }
}

/// Counts the registry members whose current status is attending.
/// Response rows for names no longer in the registry (deleted or
/// renamed without a cascade) do not count.
pub fn count_confirmed(guests: &[guest::Model], responses: &[response::Model]) -> i64 {
    let names: HashSet<&str> = guests.iter().map(|g| g.name.as_str()).collect();
    latest_by_guest(responses)
        .iter()
        .filter(|(name, r)| r.attending && names.contains(*name))
        .count() as i64
}

/// Counts the registry and the currently-attending guests, then applies
/// the base selection.
pub async fn resolve_headcount(
    db: &DatabaseConnection,
    base: HeadcountBase,
    manual_n: i64,
) -> Result<Headcount, AppError> {
    let guests = guest::Entity::find().all(db).await?;
    let responses = response::Entity::find().all(db).await?;
    let total_confirmed = count_confirmed(&guests, &responses);

    Ok(pick_headcount(base, manual_n, guests.len() as i64, total_confirmed))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub per_guest_total: f64,
    pub flat_total: f64,
    pub grand_total: f64,
    pub cost_per_guest: f64,
}

/// Line total for one item against headcount `n`. An unknown kind in
/// storage is treated as flat rather than silently multiplied.
pub fn line_total(item: &expense::Model, n: i64) -> f64 {
    match ExpenseKind::parse(&item.kind) {
        Some(ExpenseKind::PerGuest) => item.unit_amount * n as f64,
        _ => item.unit_amount,
    }
}

pub fn compute_totals(items: &[expense::Model], n: i64) -> Totals {
    let mut per_guest_total = 0.0;
    let mut flat_total = 0.0;
    for item in items {
        match ExpenseKind::parse(&item.kind) {
            Some(ExpenseKind::PerGuest) => per_guest_total += item.unit_amount * n as f64,
            _ => flat_total += item.unit_amount,
        }
    }
    let grand_total = per_guest_total + flat_total;
    let cost_per_guest = if n > 0 { grand_total / n as f64 } else { 0.0 };

    Totals {
        per_guest_total,
        flat_total,
        grand_total,
        cost_per_guest,
    }
}

/// Validates an item's fields, collecting every problem. Amount parsing
/// is lenient, so only a negative result is rejected here.
pub fn validate_item(
    label: &str,
    kind_raw: &str,
    amount_raw: &str,
) -> Result<(String, ExpenseKind, f64), Vec<String>> {
    let mut errors = Vec::new();
    let label = label.trim();
    if label.is_empty() {
        errors.push("El concepto es obligatorio.".to_string());
    }

    let kind = ExpenseKind::parse(kind_raw);
    if kind.is_none() {
        errors.push("El tipo debe ser \"per_guest\" o \"flat\".".to_string());
    }

    let amount = parse_amount(amount_raw);
    if amount < 0.0 {
        errors.push("El importe no puede ser negativo.".to_string());
    }

    match kind {
        Some(kind) if errors.is_empty() => Ok((label.to_string(), kind, amount)),
        _ => Err(errors),
    }
}

pub async fn add_item(
    db: &DatabaseConnection,
    label: &str,
    kind_raw: &str,
    amount_raw: &str,
    note: &str,
) -> Result<expense::Model, AppError> {
    let (label, kind, amount) =
        validate_item(label, kind_raw, amount_raw).map_err(AppError::Validation)?;

    let now = Utc::now().naive_utc();
    let now = now.with_nanosecond(0).unwrap_or(now);
    let row = expense::ActiveModel {
        label: Set(label),
        kind: Set(kind.as_str().to_string()),
        unit_amount: Set(amount),
        note: Set(clean_note(note)),
        created_at: Set(now),
        ..Default::default()
    };

    Ok(row.insert(db).await?)
}

pub async fn update_item(
    db: &DatabaseConnection,
    id: i32,
    label: &str,
    kind_raw: &str,
    amount_raw: &str,
    note: &str,
) -> Result<(), AppError> {
    let (label, kind, amount) =
        validate_item(label, kind_raw, amount_raw).map_err(AppError::Validation)?;

    let row = expense::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("el gasto {id}")))?;

    let mut model: expense::ActiveModel = row.into();
    model.label = Set(label);
    model.kind = Set(kind.as_str().to_string());
    model.unit_amount = Set(amount);
    model.note = Set(clean_note(note));
    model.update(db).await?;

    Ok(())
}

pub async fn delete_item(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let result = expense::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("el gasto {id}")));
    }
    Ok(())
}

fn clean_note(note: &str) -> Option<String> {
    let note = note.trim();
    if note.is_empty() {
        None
    } else {
        Some(note.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(kind: &str, amount: f64) -> expense::Model {
        expense::Model {
            id: 0,
            label: "x".to_string(),
            kind: kind.to_string(),
            unit_amount: amount,
            note: None,
            created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn per_guest_multiplies_and_flat_does_not() {
        let items = vec![item("per_guest", 10.0), item("flat", 50.0)];
        let totals = compute_totals(&items, 5);
        assert_eq!(totals.per_guest_total, 50.0);
        assert_eq!(totals.flat_total, 50.0);
        assert_eq!(totals.grand_total, 100.0);
        assert_eq!(totals.cost_per_guest, 20.0);
    }

    #[test]
    fn zero_headcount_means_zero_cost_per_guest() {
        let items = vec![item("flat", 80.0)];
        let totals = compute_totals(&items, 0);
        assert_eq!(totals.grand_total, 80.0);
        assert_eq!(totals.cost_per_guest, 0.0);
    }

    #[test]
    fn base_selection() {
        let hc = pick_headcount(HeadcountBase::Invitados, 0, 120, 80);
        assert_eq!(hc.n, 120);
        let hc = pick_headcount(HeadcountBase::Confirmados, 0, 120, 80);
        assert_eq!(hc.n, 80);
        let hc = pick_headcount(HeadcountBase::Manual, 95, 120, 80);
        assert_eq!(hc.n, 95);
        // A bogus manual count clamps to zero instead of going negative.
        let hc = pick_headcount(HeadcountBase::Manual, -3, 120, 80);
        assert_eq!(hc.n, 0);
    }

    #[test]
    fn unrecognized_base_falls_back_to_invitados() {
        assert_eq!(HeadcountBase::parse("todos"), HeadcountBase::Invitados);
        assert_eq!(HeadcountBase::parse(""), HeadcountBase::Invitados);
        assert_eq!(
            HeadcountBase::parse(" confirmados "),
            HeadcountBase::Confirmados
        );
    }

    fn guest(id: i32, name: &str) -> guest::Model {
        guest::Model {
            id,
            name: name.to_string(),
        }
    }

    fn resp(id: i32, name: &str, attending: bool, second: u32) -> response::Model {
        response::Model {
            id,
            guest_name: name.to_string(),
            attending,
            menu: None,
            note: None,
            submitted_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 0, second)
                .unwrap(),
        }
    }

    #[test]
    fn confirmed_count_ignores_orphaned_responses() {
        let guests = vec![guest(1, "Ana"), guest(2, "Beto")];
        let responses = vec![
            resp(1, "Beto", true, 1),
            // Left behind by a no-cascade delete; not a registry member.
            resp(2, "Fantasma", true, 2),
        ];
        assert_eq!(count_confirmed(&guests, &responses), 1);
    }

    #[test]
    fn a_latest_decline_is_not_confirmed() {
        let guests = vec![guest(1, "Ana")];
        let responses = vec![resp(1, "Ana", true, 1), resp(2, "Ana", false, 2)];
        assert_eq!(count_confirmed(&guests, &responses), 0);
    }

    #[test]
    fn item_validation_collects_errors() {
        let errors = validate_item("", "mensual", "10").unwrap_err();
        assert_eq!(errors.len(), 2);

        let errors = validate_item("Catering", "flat", "-5").unwrap_err();
        assert_eq!(errors, vec!["El importe no puede ser negativo.".to_string()]);

        let (label, kind, amount) = validate_item(" Catering ", "per_guest", "12,50").unwrap();
        assert_eq!(label, "Catering");
        assert_eq!(kind, ExpenseKind::PerGuest);
        assert_eq!(amount, 12.5);
    }
}
