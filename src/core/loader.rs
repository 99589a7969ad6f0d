use crate::domain::model::{Column, Table};
use crate::utils::error::{EtlError, Result};
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};

/// Field values read as missing.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_null_token(field: &str) -> bool {
    NULL_TOKENS.contains(&field)
}

/// Parses comma-delimited text with a header row into a typed table.
///
/// A column is numeric when every present value parses as a float, textual
/// otherwise. Columns with no values at all are numeric.
pub fn parse_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        Some(header) => header?,
        None => {
            return Err(EtlError::ProcessingError {
                message: "No columns to parse from file".to_string(),
            })
        }
    };
    let names = column_names(header.iter());
    let width = names.len();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for record in records {
        let record = record?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(EtlError::ProcessingError {
                message: format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                ),
            });
        }

        // 欄位不足的列以空值補齊
        for (index, column) in cells.iter_mut().enumerate() {
            let value = record
                .get(index)
                .filter(|field| !is_null_token(field))
                .map(str::to_string);
            column.push(value);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();

    Table::new(columns)
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|value| match value {
            None => Some(None),
            Some(text) => parse_number(text).map(Some),
        })
        .collect();

    match parsed {
        // NaN 視為缺值
        Some(numbers) => Column::numeric(
            name,
            numbers
                .into_iter()
                .map(|n| n.filter(|v| !v.is_nan()))
                .collect(),
        ),
        None => Column::textual(name, values),
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Blank header names become `Unnamed: <idx>`, repeats get `.1`, `.2`, ...
fn column_names<'a>(header: impl Iterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = header
        .enumerate()
        .map(|(index, name)| {
            if name.is_empty() {
                format!("Unnamed: {}", index)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut used: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(raw.len());

    for name in raw {
        let mut candidate = name.clone();
        while used.contains(&candidate) {
            let count = counts.entry(name.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        used.insert(candidate.clone());
        names.push(candidate);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ColumnData;

    #[test]
    fn test_parse_infers_column_types() {
        let table = parse_csv(b"id,name,balance\n1,Alice,10.5\n2,Bob,\n3,,-4\n").unwrap();

        assert_eq!(table.num_rows(), 3);
        assert_eq!(
            table.column("id").unwrap().data,
            ColumnData::Numeric(vec![Some(1.0), Some(2.0), Some(3.0)])
        );
        assert_eq!(
            table.column("name").unwrap().data,
            ColumnData::Textual(vec![Some("Alice".to_string()), Some("Bob".to_string()), None])
        );
        assert_eq!(
            table.column("balance").unwrap().data,
            ColumnData::Numeric(vec![Some(10.5), None, Some(-4.0)])
        );
    }

    #[test]
    fn test_null_tokens_are_missing() {
        let table = parse_csv(b"a,b\nNA,x\nnull,N/A\nNaN,None\n").unwrap();

        assert_eq!(
            table.column("a").unwrap().data,
            ColumnData::Numeric(vec![None, None, None])
        );
        assert_eq!(
            table.column("b").unwrap().data,
            ColumnData::Textual(vec![Some("x".to_string()), None, None])
        );
    }

    #[test]
    fn test_mixed_column_is_textual() {
        let table = parse_csv(b"code\n10\nA7\n").unwrap();
        assert_eq!(
            table.column("code").unwrap().data,
            ColumnData::Textual(vec![Some("10".to_string()), Some("A7".to_string())])
        );
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = parse_csv(b"id,name\n").unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 2);
        assert!(table.column("id").unwrap().data.is_numeric());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_csv(b"a,b,c\n1,x\n").unwrap();
        assert_eq!(table.num_rows(), 1);
        assert_eq!(
            table.column("c").unwrap().data,
            ColumnData::Numeric(vec![None])
        );
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = parse_csv(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Data processing error: Expected 2 fields in line 3, saw 3"
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = parse_csv(b"").unwrap_err();
        assert!(err.to_string().contains("No columns to parse from file"));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(parse_csv(b"id,name\n1,\xff\xfe\n").is_err());
    }

    #[test]
    fn test_header_names_are_mangled() {
        let table = parse_csv(b"a,,a,a\n1,2,3,4\n").unwrap();
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn test_quoted_fields() {
        let table = parse_csv(b"name,city\n\"Doe, Jane\",\"Oslo\"\n").unwrap();
        assert_eq!(
            table.column("name").unwrap().data,
            ColumnData::Textual(vec![Some("Doe, Jane".to_string())])
        );
    }
}
