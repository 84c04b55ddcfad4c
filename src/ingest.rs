use crate::dlog;
use crate::error::ServiceError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub saved: usize,
    pub rejected: usize,
}

/// Read one aggregate, or a JSON array of aggregates, from `path`.
pub fn load_payload<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let display = path.display();
    let text = fs::read_to_string(path).with_context(|| format!("Reading payload: {display}"))?;
    let json: JsonValue =
        serde_json::from_str(&text).with_context(|| format!("Parsing payload JSON: {display}"))?;

    let items = match json {
        JsonValue::Array(items) => items,
        single => vec![single],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .with_context(|| format!("Payload item #{idx} in {display} has the wrong shape"))
        })
        .collect()
}

/// Save every item of `path` with `save`.
///
/// Items failing validation are logged and counted; a store failure stops the
/// run because later items would fail the same way.
pub fn ingest<T: DeserializeOwned>(
    path: &Path,
    save: impl Fn(&T) -> Result<(), ServiceError>,
) -> Result<IngestSummary> {
    let items: Vec<T> = load_payload(path)?;
    tracing::info!(path = %path.display(), items = items.len(), "loaded payload");

    let mut summary = IngestSummary::default();
    for (idx, item) in items.iter().enumerate() {
        match save(item) {
            Ok(()) => {
                dlog!("ingest_saved idx={idx}");
                summary.saved += 1;
            }
            Err(ServiceError::Validation(e)) => {
                tracing::warn!(idx, err = %e, "rejected invalid item");
                summary.rejected += 1;
            }
            Err(e @ ServiceError::Store(_)) => {
                return Err(e).with_context(|| format!("Saving item #{idx} from {}", path.display()));
            }
        }
    }

    tracing::info!(
        saved = summary.saved,
        rejected = summary.rejected,
        "ingest done"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, ValidationError};
    use crate::types::HeartRateData;
    use std::cell::Cell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn payload(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    fn sample(id: &str, bpm: i32) -> String {
        format!(
            r#"{{"meta": {{"id": "{id}", "exerciseId": "ex1", "timestamp": "2025-04-28T12:00:00Z"}}, "bpm": {bpm}}}"#
        )
    }

    #[test]
    fn test_load_single_object_and_array() {
        let one = payload(&sample("a", 70));
        let items: Vec<HeartRateData> = load_payload(one.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meta.exercise_id, "ex1");

        let many = payload(&format!("[{}, {}]", sample("a", 70), sample("b", 80)));
        let items: Vec<HeartRateData> = load_payload(many.path()).unwrap();
        assert_eq!(items.iter().map(|d| d.bpm).collect::<Vec<_>>(), vec![70, 80]);
    }

    #[test]
    fn test_load_reports_bad_item_index() {
        let f = payload(&format!(r#"[{}, {{"bpm": "fast"}}]"#, sample("a", 70)));
        let err = load_payload::<HeartRateData>(f.path()).unwrap_err();
        assert!(err.to_string().contains("#1"), "{err}");
    }

    #[test]
    fn test_invalid_items_are_counted_and_skipped() {
        let f = payload(&format!(
            "[{}, {}, {}]",
            sample("a", 70),
            sample("b", 0),
            sample("c", 90)
        ));
        let seen = Cell::new(0);

        let summary = ingest(f.path(), |d: &HeartRateData| {
            seen.set(seen.get() + 1);
            if d.bpm <= 0 {
                return Err(ValidationError::NonPositiveHeartRate(d.bpm).into());
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(summary, IngestSummary { saved: 2, rejected: 1 });
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn test_store_failure_stops_the_run() {
        let f = payload(&format!("[{}, {}]", sample("a", 70), sample("b", 80)));
        let seen = Cell::new(0);

        let err = ingest(f.path(), |_: &HeartRateData| {
            seen.set(seen.get() + 1);
            let bad_json = serde_json::from_str::<JsonValue>("{").unwrap_err();
            Err(StoreError::Decode(bad_json).into())
        })
        .unwrap_err();

        assert_eq!(seen.get(), 1);
        assert!(err.to_string().contains("Saving item #0"), "{err}");
        assert!(matches!(
            err.downcast_ref::<ServiceError>(),
            Some(ServiceError::Store(_))
        ));
    }
}
