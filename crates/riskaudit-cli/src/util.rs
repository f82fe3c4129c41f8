use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use riskaudit_analysis::dataset::Dataset;

/// Path argument meaning "write to stdout".
pub const STDOUT_PATH: &str = "-";

/// Writes `value` as pretty JSON to `output_path`, or to stdout for [`STDOUT_PATH`].
pub fn save_json<T>(value: &T, output_path: &Path) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    if is_stdout(Some(output_path)) {
        return write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout");
    }
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    write_json(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write JSON to {}", output_path.display()))
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Whether a JSON report goes to stdout, replacing the text report.
pub fn is_stdout(output_path: Option<&Path>) -> bool {
    output_path.is_some_and(|path| path == Path::new(STDOUT_PATH))
}

/// Read a dataset from a CSV file with a header row
///
/// Header names are trimmed; cells are kept as-is and trimmed on access.
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed, or if a row is not
/// as wide as the header
pub fn read_dataset<P>(path: P) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;
    read_dataset_from(file).with_context(|| format!("Failed to read dataset: {}", path.display()))
}

fn read_dataset_from<R>(reader: R) -> anyhow::Result<Dataset>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect::<Vec<_>>();
    if headers.is_empty() {
        anyhow::bail!("CSV has no header");
    }

    let mut rows = vec![];
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", i + 1))?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(Dataset::new(headers, rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_dataset_trims_headers() {
        let csv = "id, race ,two_year_recid,decile_score\n1,Caucasian,0,3\n2,,1,9\n";
        let dataset = read_dataset_from(csv.as_bytes()).unwrap();
        assert_eq!(
            dataset.headers(),
            ["id", "race", "two_year_recid", "decile_score"]
        );
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.column("race").unwrap().collect::<Vec<_>>(),
            vec![Some("Caucasian"), None]
        );
    }

    #[test]
    fn test_read_dataset_rejects_ragged_rows() {
        let csv = "race,decile_score\nA,3\nB\n";
        let err = read_dataset_from(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Row 2 has 1 fields, expected 2"));
    }

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = vec![];
        write_json(&mut buf, &serde_json::json!({ "threshold": 4 })).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\n  \"threshold\": 4\n}\n");
    }

    #[test]
    fn test_stdout_path() {
        assert!(is_stdout(Some(Path::new("-"))));
        assert!(!is_stdout(Some(Path::new("report.json"))));
        assert!(!is_stdout(None));
    }
}
