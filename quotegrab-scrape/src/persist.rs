use quotegrab_common::{GrabError, OutputFormat, QuoteRecord, Result};
use quotegrab_config::Output;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Write `records` to the configured file for `format`.
///
/// Returns the path written, or `None` (with a log line) when there is
/// nothing to persist. Files are UTF-8 and overwritten on every run.
pub fn persist(
    records: &[QuoteRecord],
    format: OutputFormat,
    output: &Output,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        info!("no records to persist; skipping file write");
        return Ok(None);
    }

    let (path, contents) = match format {
        OutputFormat::Json => (
            PathBuf::from(&output.json_path),
            serde_json::to_string_pretty(records)?,
        ),
        OutputFormat::Text => (PathBuf::from(&output.text_path), render_text(records)),
    };

    fs::write(&path, contents).map_err(GrabError::Persist)?;
    info!(path = %path.display(), records = records.len(), "results written");
    Ok(Some(path))
}

/// Human-readable rendering: one numbered block per record, in input order,
/// separated by a fixed-width divider. Labels match the historical output
/// files, which were in Portuguese.
fn render_text(records: &[QuoteRecord]) -> String {
    let mut out = String::new();
    for (i, quote) in records.iter().enumerate() {
        let _ = writeln!(out, "Citação {}:", i + 1);
        let _ = writeln!(out, "Texto: {}", quote.text);
        let _ = writeln!(out, "Autor: {}", quote.author);
        let _ = writeln!(out, "Tags: {}", quote.tags.join(", "));
        let _ = writeln!(out, "Página: {}", quote.page);
        let _ = writeln!(out, "{}", "-".repeat(50));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<QuoteRecord> {
        vec![
            QuoteRecord {
                text: "O mundo como o criamos é um processo do nosso pensamento.".into(),
                author: "Albert Einstein".into(),
                tags: vec!["change".into(), "deep-thoughts".into(), "world".into()],
                page: 1,
            },
            QuoteRecord {
                text: "It is our choices that show what we truly are.".into(),
                author: "J.K. Rowling".into(),
                tags: vec!["abilities".into(), "choices".into()],
                page: 2,
            },
        ]
    }

    fn output_in(dir: &std::path::Path) -> Output {
        Output {
            format: "json".into(),
            json_path: dir.join("quotes_coletadas.json").display().to_string(),
            text_path: dir.join("quotes_coletadas.txt").display().to_string(),
        }
    }

    #[test]
    fn empty_sequence_writes_nothing_in_either_format() {
        let tmp = tempfile::tempdir().unwrap();
        let output = output_in(tmp.path());

        for format in [OutputFormat::Json, OutputFormat::Text] {
            let written = persist(&[], format, &output).unwrap();
            assert!(written.is_none());
        }
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn json_round_trips_count_fields_and_tag_order() {
        let tmp = tempfile::tempdir().unwrap();
        let output = output_in(tmp.path());
        let records = sample_records();

        let path = persist(&records, OutputFormat::Json, &output)
            .unwrap()
            .expect("file written");

        let raw = fs::read_to_string(&path).unwrap();
        // Non-ASCII stays literal, not \u-escaped.
        assert!(raw.contains("pensamento"));
        assert!(raw.contains("\"citacao\""));
        assert!(raw.contains("\"autor\""));
        assert!(raw.contains("\"pagina\""));

        let reread: Vec<QuoteRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(reread, records);
    }

    #[test]
    fn text_mode_writes_one_block_per_record_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let output = output_in(tmp.path());
        let records = sample_records();

        let path = persist(&records, OutputFormat::Text, &output)
            .unwrap()
            .expect("file written");
        let raw = fs::read_to_string(&path).unwrap();

        assert_eq!(raw.matches("Citação ").count(), records.len());
        assert_eq!(raw.matches(&"-".repeat(50)).count(), records.len());

        let first = raw.find("Autor: Albert Einstein").unwrap();
        let second = raw.find("Autor: J.K. Rowling").unwrap();
        assert!(first < second);
        assert!(raw.contains("Tags: abilities, choices"));
        assert!(raw.contains("Página: 2"));
    }

    #[test]
    fn json_overwrites_previous_run() {
        let tmp = tempfile::tempdir().unwrap();
        let output = output_in(tmp.path());
        let records = sample_records();

        persist(&records, OutputFormat::Json, &output).unwrap();
        persist(&records[..1], OutputFormat::Json, &output).unwrap();

        let reread: Vec<QuoteRecord> =
            serde_json::from_str(&fs::read_to_string(&output.json_path).unwrap()).unwrap();
        assert_eq!(reread.len(), 1);
    }
}
