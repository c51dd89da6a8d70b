use crate::error::CliError;
use serde::Serialize;
use std::io::Read;

pub fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)
}

/// Writes `value` as pretty JSON to `output`, or to stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&str>) -> Result<(), CliError> {
    let json = to_json(value)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Reads SQL from a file, inline text, or stdin.
pub fn read_sql(file: Option<&str>, query: Option<&str>) -> Result<String, CliError> {
    match (file, query) {
        (Some(path), _) => Ok(std::fs::read_to_string(path)?),
        (None, Some(query)) => Ok(query.to_string()),
        (None, None) => {
            let mut sql = String::new();
            std::io::stdin().read_to_string(&mut sql)?;
            Ok(sql)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let path_str = path.to_str().unwrap();

        write_json(&json!({ "where_clause": "\"a\" = $1" }), Some(path_str)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["where_clause"], "\"a\" = $1");
    }

    #[test]
    fn test_read_sql_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.sql");
        std::fs::write(&path, "SELECT 1").unwrap();

        let sql = read_sql(path.to_str(), Some("SELECT 2")).unwrap();
        assert_eq!(sql, "SELECT 1");
        assert_eq!(read_sql(None, Some("SELECT 2")).unwrap(), "SELECT 2");
    }
}
