// Reads records from a JSON file, as exported from the REST endpoints.

use crate::camp::*;

/// Accepts a list of objects, or an object wrapping that list under `data`.
pub fn read_json_records(path: String) -> CampResult<Vec<Record>> {
    let contents = fs::read_to_string(&path).context(OpeningFileSnafu { path: path.clone() })?;
    let js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: path.clone() })?;

    let items: &Vec<JSValue> = match &js {
        JSValue::Array(items) => items,
        JSValue::Object(obj) => match obj.get("data") {
            Some(JSValue::Array(items)) => items,
            _ => return NotARecordListSnafu { path }.fail(),
        },
        _ => return NotARecordListSnafu { path }.fail(),
    };

    let mut res: Vec<Record> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match item {
            JSValue::Object(obj) => res.push(obj.clone()),
            _ => warn!(
                "read_json_records: {}: skipping entry {} that is not an object: {:?}",
                simplify_file_name(&path),
                idx,
                item
            ),
        }
    }
    debug!("read_json_records: {} records in {:?}", res.len(), path);
    Ok(res)
}
