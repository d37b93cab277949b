use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{Timelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{guest, response};
use crate::error::AppError;
use crate::rsvp::menu::{self, Menu};

/// A validated submission, ready to append to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    pub guest_name: String,
    pub attending: bool,
    pub menu: Option<Menu>,
    pub note: Option<String>,
}

/// Reduces the full response log to each guest's current status: the row
/// with the greatest `submitted_at`. Timestamps have one-second
/// granularity, so same-second resubmissions are real; the higher id is
/// the later write and wins the tie.
pub fn latest_by_guest(rows: &[response::Model]) -> HashMap<&str, &response::Model> {
    let mut latest: HashMap<&str, &response::Model> = HashMap::new();
    for row in rows {
        match latest.entry(row.guest_name.as_str()) {
            Entry::Vacant(e) => {
                e.insert(row);
            }
            Entry::Occupied(mut e) => {
                let current = *e.get();
                if (row.submitted_at, row.id) > (current.submitted_at, current.id) {
                    e.insert(row);
                }
            }
        }
    }
    latest
}

/// The current-status row for a single guest name, if any.
pub async fn current_status(
    db: &DatabaseConnection,
    guest_name: &str,
) -> Result<Option<response::Model>, AppError> {
    Ok(response::Entity::find()
        .filter(response::Column::GuestName.eq(guest_name))
        .order_by_desc(response::Column::SubmittedAt)
        .order_by_desc(response::Column::Id)
        .one(db)
        .await?)
}

/// Validates a public submission without touching storage. All failures
/// are collected so the form can show every problem at once.
pub fn validate_submission(
    name: &str,
    attending_raw: &str,
    menu_raw: &str,
    note: &str,
    guest_exists: bool,
) -> Result<NewResponse, Vec<String>> {
    let name = name.trim();
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push("El nombre es obligatorio.".to_string());
    }

    let attending = menu::parse_attendance(attending_raw);
    if attending.is_none() {
        errors.push("Indicá si asistís o no.".to_string());
    }

    let menu = menu::normalize(Some(menu_raw));
    if attending == Some(true) && menu.is_none() {
        errors.push("Elegí un menú: Standard o Veggie.".to_string());
    }

    if !name.is_empty() && !guest_exists {
        errors.push("El nombre debe coincidir con un invitado cargado.".to_string());
    }

    match attending {
        Some(attending) if errors.is_empty() => Ok(NewResponse {
            guest_name: name.to_string(),
            attending,
            // A declined invitation never records a menu, whatever was sent.
            menu: if attending { menu } else { None },
            note: clean_note(note),
        }),
        _ => Err(errors),
    }
}

/// Public submission path: validate against the registry, then append
/// exactly one row. No write happens on validation failure.
pub async fn submit(
    db: &DatabaseConnection,
    name: &str,
    attending_raw: &str,
    menu_raw: &str,
    note: &str,
) -> Result<response::Model, AppError> {
    let trimmed = name.trim();
    let guest_exists = !trimmed.is_empty()
        && guest::Entity::find()
            .filter(guest::Column::Name.eq(trimmed))
            .one(db)
            .await?
            .is_some();

    let new = validate_submission(name, attending_raw, menu_raw, note, guest_exists)
        .map_err(AppError::Validation)?;

    let now = Utc::now().naive_utc();
    let now = now.with_nanosecond(0).unwrap_or(now);
    let row = response::ActiveModel {
        guest_name: Set(new.guest_name),
        attending: Set(new.attending),
        menu: Set(new.menu.map(|m| m.as_str().to_string())),
        note: Set(new.note),
        submitted_at: Set(now),
        ..Default::default()
    };

    Ok(row.insert(db).await?)
}

/// Admin correction path: mutates an existing row in place instead of
/// appending. The registry is deliberately not consulted, so an admin
/// can repoint a record at any name.
pub async fn admin_update(
    db: &DatabaseConnection,
    id_raw: &str,
    name: &str,
    attending_raw: &str,
    menu_raw: &str,
    note: &str,
) -> Result<(), AppError> {
    let id: Option<i32> = id_raw.trim().parse().ok();
    let name = name.trim();
    let attending = match attending_raw.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    };

    let (Some(id), Some(attending)) = (id, attending) else {
        return Err(incomplete_data());
    };
    if name.is_empty() {
        return Err(incomplete_data());
    }

    let row = response::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("la respuesta {id}")))?;

    let menu = if attending {
        menu::normalize(Some(menu_raw)).map(|m| m.as_str().to_string())
    } else {
        None
    };

    let mut model: response::ActiveModel = row.into();
    model.guest_name = Set(name.to_string());
    model.attending = Set(attending);
    model.menu = Set(menu);
    model.note = Set(clean_note(note));
    model.update(db).await?;

    Ok(())
}

fn incomplete_data() -> AppError {
    AppError::Validation(vec!["Datos incompletos para actualizar el RSVP.".to_string()])
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
    use migration::{Migrator, MigratorTrait};

    async fn test_db() -> DatabaseConnection {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn row(id: i32, name: &str, attending: bool, second: u32) -> response::Model {
        response::Model {
            id,
            guest_name: name.to_string(),
            attending,
            menu: attending.then(|| "standard".to_string()),
            note: None,
            submitted_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, second)
                .unwrap(),
        }
    }

    #[test]
    fn latest_row_wins() {
        let rows = vec![row(1, "Ana", true, 10), row(2, "Ana", false, 20)];
        let latest = latest_by_guest(&rows);
        assert_eq!(latest["Ana"].id, 2);
        assert!(!latest["Ana"].attending);
    }

    #[test]
    fn same_second_tie_breaks_on_higher_id() {
        let rows = vec![row(7, "Ana", true, 30), row(3, "Ana", false, 30)];
        let latest = latest_by_guest(&rows);
        assert_eq!(latest["Ana"].id, 7);

        // Order of the log must not matter.
        let rows = vec![row(3, "Ana", false, 30), row(7, "Ana", true, 30)];
        assert_eq!(latest_by_guest(&rows)["Ana"].id, 7);
    }

    #[test]
    fn one_entry_per_guest() {
        let rows = vec![
            row(1, "Ana", true, 1),
            row(2, "Beto", false, 2),
            row(3, "Ana", true, 3),
        ];
        let latest = latest_by_guest(&rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest["Ana"].id, 3);
        assert_eq!(latest["Beto"].id, 2);
    }

    #[test]
    fn valid_attending_submission() {
        let new = validate_submission("Ana", "si", "vegano", "sin sal", true).unwrap();
        assert_eq!(new.guest_name, "Ana");
        assert!(new.attending);
        assert_eq!(new.menu, Some(Menu::Veggie));
        assert_eq!(new.note.as_deref(), Some("sin sal"));
    }

    #[test]
    fn declining_discards_the_menu() {
        let new = validate_submission("Ana", "no", "standard", "", true).unwrap();
        assert!(!new.attending);
        assert_eq!(new.menu, None);
        assert_eq!(new.note, None);
    }

    #[test]
    fn attending_requires_a_menu() {
        let errors = validate_submission("Ana", "si", "asado", "", true).unwrap_err();
        assert_eq!(errors, vec!["Elegí un menú: Standard o Veggie.".to_string()]);
    }

    #[test]
    fn unknown_guest_is_rejected() {
        let errors = validate_submission("Zoe", "no", "", "", false).unwrap_err();
        assert_eq!(
            errors,
            vec!["El nombre debe coincidir con un invitado cargado.".to_string()]
        );
    }

    #[tokio::test]
    async fn submit_appends_and_current_status_follows_the_newest_row() {
        let db = test_db().await;
        crate::rsvp::guests::bulk_load(&db, "Ana").await.unwrap();

        submit(&db, "Ana", "si", "veggie", "").await.unwrap();
        submit(&db, "Ana", "no", "", "").await.unwrap();

        // Append-only: the first row survives the resubmission.
        assert_eq!(response::Entity::find().all(&db).await.unwrap().len(), 2);

        let status = current_status(&db, "Ana").await.unwrap().unwrap();
        assert!(!status.attending);
        assert_eq!(status.menu, None);
    }

    #[test]
    fn all_errors_are_collected() {
        let errors = validate_submission("", "quizas", "", "", false).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "El nombre es obligatorio.".to_string(),
                "Indicá si asistís o no.".to_string(),
            ]
        );
    }
}
