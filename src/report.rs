//! XLSX export of list views.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use umya_spreadsheet::{new_file, writer};

use crate::model::{FeeStructure, StudentRecord};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("workbook has no sheet")]
    MissingSheet,
    #[error("could not write workbook: {0}")]
    Write(String),
    #[error("export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A table ready to be written: title row, header row, data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// Spreadsheet column name of a 1-based index: 1 → A, 27 → AA.
pub fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        name.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

pub fn students_table(students: &[StudentRecord]) -> Table {
    Table {
        title: "Students".into(),
        headers: vec!["Name", "Class", "Section", "Parent", "Mobile", "Email", "Final Fee", "Transport", "Status"],
        rows: students
            .iter()
            .map(|s| {
                vec![
                    s.full_name(),
                    s.class_name.clone(),
                    s.section_name.clone(),
                    s.parent_name.clone(),
                    s.mobile.clone(),
                    s.email.clone(),
                    money(s.fee_details.final_amount),
                    if s.transport_required { "Yes".into() } else { "No".into() },
                    if s.active { "Active".into() } else { "Inactive".into() },
                ]
            })
            .collect(),
    }
}

/// One row per fee item, with the structure's totals repeated.
pub fn fee_structures_table(structures: &[FeeStructure]) -> Table {
    let mut rows = Vec::new();
    for structure in structures {
        for item in &structure.fee_items {
            rows.push(vec![
                structure.class_name.clone(),
                structure.academic_year.clone(),
                item.name.clone(),
                item.fee_type.name.clone(),
                money(item.amount),
                money(crate::fees::total_amount(&structure.fee_items)),
                structure.number_of_terms.to_string(),
                money(structure.per_term()),
            ]);
        }
    }
    Table {
        title: "Fee Structures".into(),
        headers: vec!["Class", "Academic Year", "Fee", "Type", "Amount", "Total", "Terms", "Per Term"],
        rows,
    }
}

pub fn write_xlsx(table: &Table, output_path: &Path) -> Result<(), ReportError> {
    let mut book = new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").ok_or(ReportError::MissingSheet)?;

    sheet.get_cell_mut("A1").set_value(table.title.clone());
    for (i, header) in table.headers.iter().enumerate() {
        let address = format!("{}3", column_name(i + 1));
        sheet.get_cell_mut(&*address).set_value(*header);
    }
    for (r, row) in table.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let address = format!("{}{}", column_name(c + 1), r + 4);
            sheet.get_cell_mut(&*address).set_value(value);
        }
    }

    writer::xlsx::write(&book, output_path).map_err(|e| ReportError::Write(e.to_string()))?;
    info!(path = %output_path.display(), rows = table.rows.len(), "report written");
    Ok(())
}

/// Asks for a target file, writes the table and opens it in the system
/// viewer. `Ok(None)` means the dialog was cancelled.
pub async fn export_with_dialog(table: Table, file_name: String) -> Result<Option<PathBuf>, String> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .add_filter("Excel", &["xlsx"])
        .set_file_name(&file_name)
        .save_file()
        .await
    else {
        return Ok(None);
    };
    let path = handle.path().to_path_buf();
    let target = path.clone();
    tokio::task::spawn_blocking(move || write_xlsx(&table, &target))
        .await
        .map_err(ReportError::from)
        .and_then(|r| r)
        .map_err(|e| e.to_string())?;
    if let Err(error) = open::that(&path) {
        warn!(%error, "could not open exported file");
    }
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeeDetails, DiscountType, FeeItem, Lookup};

    #[test]
    fn column_names() {
        assert_eq!(column_name(1), "A");
        assert_eq!(column_name(26), "Z");
        assert_eq!(column_name(27), "AA");
        assert_eq!(column_name(52), "AZ");
    }

    #[test]
    fn student_rows_use_final_amount() {
        let student = StudentRecord {
            first_name: "Ravi".into(),
            last_name: "Kumar".into(),
            fee_details: FeeDetails::new(1000.0, DiscountType::Percentage, 10.0),
            active: true,
            ..Default::default()
        };
        let table = students_table(&[student]);
        assert_eq!(table.rows[0][0], "Ravi Kumar");
        assert_eq!(table.rows[0][6], "900.00");
        assert_eq!(table.rows[0][8], "Active");
    }

    #[test]
    fn fee_rows_repeat_structure_totals() {
        let item = |name: &str, amount| FeeItem {
            id: 1,
            name: name.into(),
            amount,
            fee_type: Lookup::new(1, "School Fee"),
            description: None,
            is_required: true,
        };
        let structure = FeeStructure {
            class_name: "LKG".into(),
            fee_items: vec![item("Tuition", 6000.0), item("Books", 3000.0)],
            number_of_terms: 3,
            total_amount: 9000.0,
            ..Default::default()
        };
        let table = fee_structures_table(&[structure]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][5], "9000.00");
        assert_eq!(table.rows[1][7], "3000.00");
    }
}
