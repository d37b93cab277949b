use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::rsvp::report::{ExpenseReport, GuestReport};

/// Two sheets: "Respuestas" (latest response per guest) and "Faltantes"
/// (guests who never responded).
pub fn guest_workbook(report: &GuestReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name("Respuestas")?;
    for (col, header) in ["Nombre", "Asiste", "Menú", "Mensaje", "Fecha"]
        .iter()
        .enumerate()
    {
        sheet.write_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, row) in report.responded.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, row.name.as_str())?;
        sheet.write(r, 1, if row.attending { "si" } else { "no" })?;
        sheet.write(r, 2, row.menu.as_deref().unwrap_or(""))?;
        sheet.write(r, 3, row.note.as_deref().unwrap_or(""))?;
        sheet.write(r, 4, row.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string())?;
    }

    let sheet = workbook.add_worksheet().set_name("Faltantes")?;
    sheet.write_with_format(0, 0, "Nombre", &bold)?;
    for (i, name) in report.missing.iter().enumerate() {
        sheet.write((i + 1) as u32, 0, name.as_str())?;
    }

    workbook.save_to_buffer()
}

/// Two sheets: "Gastos" (one row per item with its line total) and
/// "Resumen" (headcount basis plus the aggregate figures).
pub fn expense_workbook(report: &ExpenseReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet().set_name("Gastos")?;
    for (col, header) in ["Concepto", "Tipo", "Importe unitario", "Nota", "Total línea"]
        .iter()
        .enumerate()
    {
        sheet.write_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, row) in report.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, row.label.as_str())?;
        sheet.write(r, 1, row.kind.as_str())?;
        sheet.write_with_format(r, 2, row.unit_amount, &money)?;
        sheet.write(r, 3, row.note.as_deref().unwrap_or(""))?;
        sheet.write_with_format(r, 4, row.line_total, &money)?;
    }

    let sheet = workbook.add_worksheet().set_name("Resumen")?;
    let lines: [(&str, f64); 4] = [
        ("Total por invitado", report.totals.per_guest_total),
        ("Total fijo", report.totals.flat_total),
        ("Total general", report.totals.grand_total),
        ("Costo por invitado", report.totals.cost_per_guest),
    ];
    sheet.write_with_format(0, 0, "Base", &bold)?;
    sheet.write(0, 1, report.headcount.base)?;
    sheet.write_with_format(1, 0, "Invitados", &bold)?;
    sheet.write(1, 1, report.headcount.total_guests as f64)?;
    sheet.write_with_format(2, 0, "Confirmados", &bold)?;
    sheet.write(2, 1, report.headcount.total_confirmed as f64)?;
    sheet.write_with_format(3, 0, "N utilizado", &bold)?;
    sheet.write(3, 1, report.headcount.n as f64)?;
    for (i, (label, value)) in lines.iter().enumerate() {
        let r = (i + 4) as u32;
        sheet.write_with_format(r, 0, *label, &bold)?;
        sheet.write_with_format(r, 1, *value, &money)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsvp::expenses::{HeadcountBase, pick_headcount};
    use crate::rsvp::report::{build_expense_report, build_guest_report};

    #[test]
    fn workbooks_serialize() {
        let report = build_guest_report(&[], &[]);
        let bytes = guest_workbook(&report).unwrap();
        assert!(!bytes.is_empty());

        let headcount = pick_headcount(HeadcountBase::Invitados, 0, 0, 0);
        let report = build_expense_report(&[], headcount);
        let bytes = expense_workbook(&report).unwrap();
        assert!(!bytes.is_empty());
    }
}
