// Primitives for reading CSV files.

use csv::StringRecord;

use crate::camp::*;

/// The first row is the header. Every value is read as text.
pub fn read_csv_records(path: String) -> CampResult<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&path)
        .context(CsvOpenSnafu { path: path.clone() })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu { path: path.clone() })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    debug!("read_csv_records: header: {:?}", header);

    let mut res: Vec<Record> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line: StringRecord = match line_r {
            Ok(line) => line,
            Err(e) => {
                warn!(
                    "read_csv_records: {}: skipping line {}: {}",
                    simplify_file_name(&path),
                    lineno,
                    e
                );
                continue;
            }
        };
        let mut rec = Record::new();
        for (key, value) in header.iter().zip(line.iter()) {
            rec.insert(key.clone(), JSValue::String(value.to_string()));
        }
        res.push(rec);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_keyed_records() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/camp_basic/stamps.csv");
        let recs = read_csv_records(path.to_string()).unwrap();
        assert_eq!(recs.len(), 7);
        assert_eq!(
            recs[0].get("student_id"),
            Some(&JSValue::String("s01".to_string()))
        );
        assert_eq!(
            recs[0].get("stamp_count"),
            Some(&JSValue::String("12".to_string()))
        );
    }
}
