use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entities::{expense, guest, response};
use crate::rsvp::expenses::{Headcount, Totals, compute_totals, line_total};
use crate::rsvp::responses::latest_by_guest;

/// One responded guest: their registry name joined with the latest row
/// from the response log.
#[derive(Debug, Clone, Serialize)]
pub struct GuestReportRow {
    pub response_id: i32,
    pub name: String,
    pub attending: bool,
    pub menu: Option<String>,
    pub note: Option<String>,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total_guests: usize,
    pub total_si: usize,
    pub total_no: usize,
    pub total_standard: usize,
    pub total_veggie: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestReport {
    /// Newest response first.
    pub responded: Vec<GuestReportRow>,
    /// Guests with no response at all, in registry (name) order.
    pub missing: Vec<String>,
    pub summary: Summary,
}

pub fn build_guest_report(
    guests: &[guest::Model],
    responses: &[response::Model],
) -> GuestReport {
    let latest = latest_by_guest(responses);

    let mut responded = Vec::new();
    let mut missing = Vec::new();
    for g in guests {
        match latest.get(g.name.as_str()) {
            Some(r) => responded.push(GuestReportRow {
                response_id: r.id,
                name: g.name.clone(),
                attending: r.attending,
                menu: r.menu.clone(),
                note: r.note.clone(),
                submitted_at: r.submitted_at,
            }),
            None => missing.push(g.name.clone()),
        }
    }
    responded.sort_by(|a, b| {
        (b.submitted_at, b.response_id).cmp(&(a.submitted_at, a.response_id))
    });

    let summary = Summary {
        total_guests: guests.len(),
        total_si: responded.iter().filter(|r| r.attending).count(),
        total_no: responded.iter().filter(|r| !r.attending).count(),
        total_standard: responded
            .iter()
            .filter(|r| r.attending && r.menu.as_deref() == Some("standard"))
            .count(),
        total_veggie: responded
            .iter()
            .filter(|r| r.attending && r.menu.as_deref() == Some("veggie"))
            .count(),
        missing: missing.len(),
    };

    GuestReport {
        responded,
        missing,
        summary,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReportRow {
    pub id: i32,
    pub label: String,
    pub kind: String,
    pub unit_amount: f64,
    pub note: Option<String>,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReport {
    pub rows: Vec<ExpenseReportRow>,
    pub headcount: Headcount,
    pub totals: Totals,
}

pub fn build_expense_report(items: &[expense::Model], headcount: Headcount) -> ExpenseReport {
    let rows = items
        .iter()
        .map(|item| ExpenseReportRow {
            id: item.id,
            label: item.label.clone(),
            kind: item.kind.clone(),
            unit_amount: item.unit_amount,
            note: item.note.clone(),
            line_total: line_total(item, headcount.n),
        })
        .collect();

    ExpenseReport {
        rows,
        headcount,
        totals: compute_totals(items, headcount.n),
    }
}
