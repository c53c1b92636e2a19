// Reads records from an Excel workbook.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::camp::*;

/// The first row of the worksheet is the header. Rows without any value are
/// skipped.
pub fn read_excel_records(path: String, cfs: &FileSource) -> CampResult<Vec<Record>> {
    let wrange = get_range(&path, cfs)?;

    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .context(EmptyExcelSnafu { path: path.clone() })?
        .iter()
        .map(|c| cell_to_string(c).trim().to_string())
        .collect();
    debug!("read_excel_records: header: {:?}", header);

    let mut res: Vec<Record> = Vec::new();
    for row in rows {
        let mut rec = Record::new();
        for (key, cell) in header.iter().zip(row.iter()) {
            if key.is_empty() {
                continue;
            }
            if let Some(v) = cell_to_json(cell) {
                rec.insert(key.clone(), v);
            }
        }
        if !rec.is_empty() {
            res.push(rec);
        }
    }
    Ok(res)
}

fn get_range(path: &String, cfs: &FileSource) -> CampResult<Range<DataType>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path.clone() })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = cfs.excel_worksheet_name.clone() {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
                path: path.clone(),
            })?
            .context(OpeningExcelSnafu { path: path.clone() })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path: path.clone() }.fail(),
            [(worksheet_name, wrange), rest @ ..] => {
                if !rest.is_empty() {
                    warn!(
                        "read_excel_records: {}: {} worksheets found, using the first one: {:?}",
                        simplify_file_name(path),
                        rest.len() + 1,
                        worksheet_name
                    );
                }
                Ok(wrange.clone())
            }
        }
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => "".to_string(),
    }
}

fn cell_to_json(cell: &DataType) -> Option<JSValue> {
    match cell {
        DataType::String(s) => Some(JSValue::String(s.clone())),
        DataType::Int(i) => Some(json!(i)),
        DataType::Float(f) if f.is_finite() => Some(json!(f)),
        DataType::Bool(b) => Some(JSValue::Bool(*b)),
        DataType::Empty => None,
        _ => {
            debug!("read_excel_records: ignoring cell {:?}", cell);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_path() -> String {
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/camp_basic/roster.xlsx").to_string()
    }

    fn source(worksheet: Option<&str>) -> FileSource {
        FileSource {
            provider: "xlsx".to_string(),
            file_path: roster_path(),
            excel_worksheet_name: worksheet.map(|s| s.to_string()),
        }
    }

    #[test]
    fn reads_named_worksheet() {
        let recs = read_excel_records(roster_path(), &source(Some("Roster"))).unwrap();
        // The blank third row is skipped.
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].get("id"), Some(&json!("s01")));
        assert_eq!(recs[0].get("name"), Some(&json!("김민지")));
        assert_eq!(recs[0].get("team"), Some(&json!(1.0)));
        assert_eq!(recs[0].get("attended"), Some(&json!(true)));
        assert_eq!(read_string(&recs[0], &["team"]), Some("1".to_string()));
        assert_eq!(recs[1].get("englishName"), None);
        assert_eq!(recs[1].get("attended"), Some(&json!(false)));
    }

    #[test]
    fn first_worksheet_is_the_default() {
        let recs = read_excel_records(roster_path(), &source(None)).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(read_string(&recs[1], &["id"]), Some("s04".to_string()));
        assert_eq!(read_string(&recs[1], &["team"]), Some("3".to_string()));
    }

    #[test]
    fn header_only_worksheet_has_no_records() {
        let recs = read_excel_records(roster_path(), &source(Some("Notes"))).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn missing_worksheet_is_an_error() {
        let err = read_excel_records(roster_path(), &source(Some("Stamps"))).unwrap_err();
        assert!(matches!(err, CampError::MissingWorksheet { .. }), "{}", err);
    }
}
