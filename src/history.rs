use crate::error::Result;
use crate::format::{Unit, format_bytes};
use crate::store::{SessionId, SessionStore};

/// One session as shown in the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub start_time: String,
    pub end_time: Option<String>,
}

impl SessionSummary {
    pub fn label(&self) -> String {
        let end = self.end_time.as_deref().unwrap_or("Ongoing");
        format!("Session {}: {} - {}", self.id, self.start_time, end)
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }
}

/// One sample row ready for display: CPU as a raw percentage string, byte
/// fields converted through the formatter. Always rebuilt from stored raw
/// bytes, so switching units re-derives every cell losslessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSample {
    pub timestamp: String,
    pub cpu: String,
    pub ram_free: String,
    pub ram_total: String,
    pub swap_free: String,
    pub swap_total: String,
}

/// All sessions in creation order.
pub fn session_summaries(store: &SessionStore) -> Result<Vec<SessionSummary>> {
    Ok(store
        .sessions()?
        .into_iter()
        .map(|record| SessionSummary {
            id: record.id,
            start_time: record.start_time,
            end_time: record.end_time,
        })
        .collect())
}

/// Samples of one session, formatted for the requested unit.
pub fn formatted_samples(
    store: &SessionStore,
    session_id: SessionId,
    unit: Unit,
) -> Result<Vec<FormattedSample>> {
    Ok(store
        .samples(session_id)?
        .into_iter()
        .map(|row| FormattedSample {
            timestamp: row.timestamp,
            cpu: row.cpu.to_string(),
            ram_free: format_bytes(row.ram_free as f64, unit),
            ram_total: format_bytes(row.ram_total as f64, unit),
            swap_free: format_bytes(row.swap_free as f64, unit),
            swap_total: format_bytes(row.swap_total as f64, unit),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::sample::SystemSample;

    fn sample(ram_free: u64) -> SystemSample {
        SystemSample {
            cpu_percent: 50.0,
            ram_free,
            ram_total: 8_000_000,
            swap_free: 500_000,
            swap_total: 2_000_000,
        }
    }

    #[test]
    fn open_session_is_labeled_ongoing() {
        let store = SessionStore::in_memory().unwrap();
        let id = store.open_session().unwrap();

        let summaries = session_summaries(&store).unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].is_ongoing());
        let label = summaries[0].label();
        assert!(label.starts_with(&format!("Session {id}:")));
        assert!(label.ends_with("Ongoing"));
    }

    #[test]
    fn closed_session_shows_end_time() {
        let store = SessionStore::in_memory().unwrap();
        let id = store.open_session().unwrap();
        store.close_session(id).unwrap();

        let summaries = session_summaries(&store).unwrap();
        assert!(!summaries[0].is_ongoing());
        assert!(!summaries[0].label().ends_with("Ongoing"));
    }

    #[test]
    fn formatting_derives_from_raw_bytes_per_unit() {
        let store = SessionStore::in_memory().unwrap();
        let id = store.open_session().unwrap();
        store.insert_sample(id, &sample(1_048_576)).unwrap();

        let in_mb = formatted_samples(&store, id, Unit::MB).unwrap();
        assert_eq!(in_mb[0].ram_free, "1.00 MB");
        assert_eq!(in_mb[0].cpu, "50");

        // Re-querying with another unit re-derives from the stored bytes.
        let in_kb = formatted_samples(&store, id, Unit::KB).unwrap();
        assert_eq!(in_kb[0].ram_free, "1024.00 KB");
        assert_eq!(in_kb[0].ram_free, format_bytes(1_048_576.0, Unit::KB));
    }

    #[test]
    fn unknown_session_has_no_rows() {
        let store = SessionStore::in_memory().unwrap();
        assert!(formatted_samples(&store, 99, Unit::GB).unwrap().is_empty());
    }
}
