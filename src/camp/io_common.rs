// Lenient readers for the fields of a record.
//
// The same logical field arrives with different spellings and types depending
// on the source: `student_id` or `id`, a team as `3` or `"3"`, a flag as
// `true` or `"TRUE"`. Blank values are treated as absent.

use std::path::Path;

use serde_json::Value as JSValue;

use crate::camp::Record;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(path)
        .to_string()
}

fn lookup<'a>(rec: &'a Record, keys: &[&str]) -> Option<&'a JSValue> {
    keys.iter()
        .filter_map(|k| rec.get(*k))
        .find(|v| match v {
            JSValue::Null => false,
            JSValue::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

pub fn read_string(rec: &Record, keys: &[&str]) -> Option<String> {
    match lookup(rec, keys)? {
        JSValue::String(s) => Some(s.trim().to_string()),
        JSValue::Number(n) => match n.as_i64() {
            Some(i) => Some(i.to_string()),
            None => n.as_f64().map(|f| f.to_string()),
        },
        JSValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn read_int(rec: &Record, keys: &[&str]) -> Option<i64> {
    match lookup(rec, keys)? {
        JSValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        JSValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

pub fn read_f64(rec: &Record, keys: &[&str]) -> Option<f64> {
    match lookup(rec, keys)? {
        JSValue::Number(n) => n.as_f64(),
        JSValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub fn read_bool(rec: &Record, keys: &[&str]) -> Option<bool> {
    match lookup(rec, keys)? {
        JSValue::Bool(b) => Some(*b),
        JSValue::Number(n) => n.as_f64().map(|f| f != 0.0),
        JSValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" | "o" => Some(true),
            "false" | "f" | "no" | "n" | "0" | "x" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
