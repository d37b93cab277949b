use std::collections::HashSet;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{guest, response};
use crate::error::AppError;
use crate::rsvp::responses::latest_by_guest;

/// Splits an admin-pasted blob into guest names: one per line, commas
/// also accepted, surrounding whitespace dropped.
pub fn parse_guest_list(text: &str) -> Vec<String> {
    text.lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inserts every parsed name that is not already in the registry.
/// Loading the same blob twice is a no-op the second time. Returns the
/// number of names actually inserted.
pub async fn bulk_load(db: &DatabaseConnection, text: &str) -> Result<usize, AppError> {
    let mut known: HashSet<String> = guest::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect();

    let mut inserted = 0;
    for name in parse_guest_list(text) {
        if known.contains(&name) {
            continue;
        }
        guest::ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        known.insert(name);
        inserted += 1;
    }

    Ok(inserted)
}

/// Renames a guest. With `cascade`, historical response rows carrying
/// the old name are rewritten to the new one (exact match); without it
/// they keep the stale name and fall out of the registry.
pub async fn rename_guest(
    db: &DatabaseConnection,
    id: i32,
    new_name: &str,
    cascade: bool,
) -> Result<(), AppError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(AppError::Validation(vec![
            "El nombre nuevo es obligatorio.".to_string(),
        ]));
    }

    let guest = guest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("el invitado {id}")))?;

    if let Some(other) = guest::Entity::find()
        .filter(guest::Column::Name.eq(new_name))
        .one(db)
        .await?
    {
        if other.id != id {
            return Err(AppError::DuplicateName(new_name.to_string()));
        }
    }

    let old_name = guest.name.clone();
    let mut model: guest::ActiveModel = guest.into();
    model.name = Set(new_name.to_string());
    model.update(db).await?;

    if cascade && old_name != new_name {
        response::Entity::update_many()
            .col_expr(response::Column::GuestName, Expr::value(new_name))
            .filter(response::Column::GuestName.eq(old_name))
            .exec(db)
            .await?;
    }

    Ok(())
}

/// Deletes a guest; with `cascade` their response rows go too, otherwise
/// the rows stay behind as orphans.
pub async fn delete_guest(
    db: &DatabaseConnection,
    id: i32,
    cascade: bool,
) -> Result<(), AppError> {
    let guest = guest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("el invitado {id}")))?;

    let name = guest.name.clone();
    guest::Entity::delete_by_id(id).exec(db).await?;

    if cascade {
        response::Entity::delete_many()
            .filter(response::Column::GuestName.eq(name))
            .exec(db)
            .await?;
    }

    Ok(())
}

/// Names for the public autocomplete: guests whose current status is not
/// an acceptance, matching `query` as a case-insensitive substring.
pub async fn search_unconfirmed(
    db: &DatabaseConnection,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, AppError> {
    let guests = guest::Entity::find()
        .order_by_asc(guest::Column::Name)
        .all(db)
        .await?;
    let responses = response::Entity::find().all(db).await?;

    Ok(filter_unconfirmed(&guests, &responses, query, limit))
}

/// The pure part of `search_unconfirmed`: a guest qualifies when they
/// never responded or their latest response declines.
pub fn filter_unconfirmed(
    guests: &[guest::Model],
    responses: &[response::Model],
    query: &str,
    limit: usize,
) -> Vec<String> {
    let latest = latest_by_guest(responses);
    let needle = query.trim().to_lowercase();

    guests
        .iter()
        .filter(|g| !matches!(latest.get(g.name.as_str()), Some(r) if r.attending))
        .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
        .take(limit)
        .map(|g| g.name.clone())
        .collect()
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

    #[test]
    fn splits_lines_and_commas() {
        let names = parse_guest_list("Ana, Beto\nCarla\n ,, \n  Diego  ");
        assert_eq!(names, vec!["Ana", "Beto", "Carla", "Diego"]);
    }

    #[test]
    fn empty_blob_yields_nothing() {
        assert!(parse_guest_list("").is_empty());
        assert!(parse_guest_list(" \n , \n").is_empty());
    }

    #[tokio::test]
    async fn loading_the_same_blob_twice_inserts_nothing_new() {
        let db = test_db().await;
        assert_eq!(bulk_load(&db, "Ana, Beto\nCarla").await.unwrap(), 3);
        assert_eq!(bulk_load(&db, "Ana, Beto\nCarla").await.unwrap(), 0);
        assert_eq!(guest::Entity::find().all(&db).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rename_with_cascade_rewrites_response_rows() {
        let db = test_db().await;
        bulk_load(&db, "Ana").await.unwrap();
        crate::rsvp::responses::submit(&db, "Ana", "si", "standard", "")
            .await
            .unwrap();
        let ana = guest::Entity::find().one(&db).await.unwrap().unwrap();

        rename_guest(&db, ana.id, "Ana María", true).await.unwrap();

        let rows = response::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].guest_name, "Ana María");
    }

    #[tokio::test]
    async fn rename_without_cascade_leaves_history_alone() {
        let db = test_db().await;
        bulk_load(&db, "Ana").await.unwrap();
        crate::rsvp::responses::submit(&db, "Ana", "no", "", "")
            .await
            .unwrap();
        let ana = guest::Entity::find().one(&db).await.unwrap().unwrap();

        rename_guest(&db, ana.id, "Ana María", false).await.unwrap();

        let rows = response::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows[0].guest_name, "Ana");
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
                .and_hms_opt(10, 0, second)
                .unwrap(),
        }
    }

    #[test]
    fn excludes_guests_whose_latest_response_accepts() {
        let guests = vec![guest(1, "Ana"), guest(2, "Beto"), guest(3, "Carla")];
        let responses = vec![
            resp(1, "Ana", true, 1),   // accepted -> excluded
            resp(2, "Beto", false, 2), // declined -> included
        ];
        let names = filter_unconfirmed(&guests, &responses, "", 50);
        assert_eq!(names, vec!["Beto", "Carla"]);
    }

    #[test]
    fn a_later_decline_brings_a_guest_back() {
        let guests = vec![guest(1, "Ana")];
        let responses = vec![resp(1, "Ana", true, 1), resp(2, "Ana", false, 2)];
        let names = filter_unconfirmed(&guests, &responses, "", 50);
        assert_eq!(names, vec!["Ana"]);
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let guests = vec![guest(1, "Ana García"), guest(2, "Beto")];
        let names = filter_unconfirmed(&guests, &[], "gar", 50);
        assert_eq!(names, vec!["Ana García"]);
    }

    #[test]
    fn respects_the_limit() {
        let guests = vec![guest(1, "Ana"), guest(2, "Beto"), guest(3, "Carla")];
        let names = filter_unconfirmed(&guests, &[], "", 2);
        assert_eq!(names.len(), 2);
    }
}
