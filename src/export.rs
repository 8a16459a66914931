//! CSV export of the normalized visit table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::records::NormalizedVisit;
use crate::traits::Clock;

/// Write all normalized visits to a timestamped CSV file.
///
/// The filename derives from the injected clock so exports stay
/// reproducible under test. Returns the path to the created file.
pub fn export_visits_csv<C: Clock>(
    records: &[NormalizedVisit],
    output_dir: &Path,
    clock: &C,
) -> Result<PathBuf> {
    let filename = format!(
        "balai_visits_{}.csv",
        clock.now_local().format("%Y%m%d_%H%M%S")
    );
    let output_path = output_dir.join(&filename);

    let mut wtr =
        csv::Writer::from_path(&output_path).context("Failed to create CSV writer")?;

    for record in records {
        wtr.serialize(record)
            .context("Failed to serialize visit record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::traits::MockClock;

    fn visit(day: &str, anak: u32) -> NormalizedVisit {
        NormalizedVisit {
            id: Some("v1".to_string()),
            date: crate::records::parse_day(day),
            date_raw: day.to_string(),
            balita: 0,
            anak,
            remaja: 0,
            dewasa: 0,
            lansia: 0,
            total: anak,
        }
    }

    #[test]
    fn test_export_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let clock = MockClock::new(Local.with_ymd_and_hms(2025, 3, 15, 9, 30, 0).unwrap());
        let records = vec![visit("2025-03-10", 5), visit("2025-03-11", 7)];

        let path = export_visits_csv(&records, dir.path(), &clock).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "balai_visits_20250315_093000.csv"
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("date"));
        assert!(header.contains("balita"));
        assert!(header.contains("total"));
        assert_eq!(lines.count(), 2);
        assert!(contents.contains("2025-03-10"));
    }

    #[test]
    fn test_export_empty_records_still_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let clock = MockClock::new(Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

        let path = export_visits_csv(&[], dir.path(), &clock).unwrap();
        assert!(path.exists());
    }
}
