use crate::domain::model::OutputFormat;

pub const DEFAULT_SOURCE_PREFIX: &str = "customer-dataCSV-incoming/";
pub const DEFAULT_DESTINATION_PREFIX: &str = "Customer-dataLake-parquet/";

const CSV_SUFFIX_LEN: usize = ".csv".len();

/// Derives where the converted object is written.
///
/// Keys under `source_prefix` keep their sub-path below `destination_prefix`;
/// any other key is flattened to its file name. The trailing `.csv` becomes the
/// extension of `format`.
pub fn target_key(
    key: &str,
    source_prefix: &str,
    destination_prefix: &str,
    format: OutputFormat,
) -> String {
    let relative = match key.strip_prefix(source_prefix) {
        Some(rest) => rest,
        None => key.rsplit('/').next().unwrap_or(key),
    };

    format!(
        "{}{}{}",
        destination_prefix,
        strip_csv_suffix(relative),
        format.extension()
    )
}

fn strip_csv_suffix(name: &str) -> &str {
    let split = name.len().saturating_sub(CSV_SUFFIX_LEN);
    match name.get(split..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(".csv") => &name[..split],
        _ => name,
    }
}
