//! Listing, filtering, and basic reporting over the record store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::{IncidentRecord, IncidentStatus, Nature};

/// Filter applied when listing records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter {
    /// Keep only records with this status.
    pub status: Option<IncidentStatus>,
    /// Keep only records with a payload for this nature.
    pub nature: Option<Nature>,
    /// Maximum number of records to return; `None` means all.
    pub limit: Option<usize>,
}

/// List records matching the filter, newest first, keeping their store
/// indexes.
#[must_use]
pub fn filter_records<'a>(
    records: &'a [IncidentRecord],
    filter: &ListFilter,
) -> Vec<(usize, &'a IncidentRecord)> {
    let matches = records
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, record)| {
            filter.status.map_or(true, |status| record.status == status)
                && filter
                    .nature
                    .map_or(true, |nature| record.has_nature(nature))
        });

    match filter.limit {
        Some(limit) => matches.take(limit).collect(),
        None => matches.collect(),
    }
}

/// Summary statistics over the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Total number of records.
    pub total: usize,
    /// Records still awaiting their nature follow-up.
    pub pending: usize,
    /// Completed records.
    pub ready: usize,
    /// Number of records completed per nature.
    pub by_nature: BTreeMap<Nature, usize>,
    /// Creation time of the oldest record.
    pub oldest: Option<DateTime<Utc>>,
    /// Creation time of the newest record.
    pub newest: Option<DateTime<Utc>>,
}

/// Compute a summary over the full record list.
#[must_use]
pub fn summarize(records: &[IncidentRecord]) -> ReportSummary {
    let mut pending = 0;
    let mut ready = 0;
    let mut by_nature: BTreeMap<Nature, usize> = BTreeMap::new();

    for record in records {
        match record.status {
            IncidentStatus::Pending => pending += 1,
            IncidentStatus::Ready => ready += 1,
        }
        for nature in record.natures.keys() {
            *by_nature.entry(*nature).or_insert(0) += 1;
        }
    }

    ReportSummary {
        total: records.len(),
        pending,
        ready,
        by_nature,
        oldest: records.iter().map(|r| r.created_at).min(),
        newest: records.iter().map(|r| r.created_at).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn record(status: IncidentStatus, natures: &[Nature]) -> IncidentRecord {
        let mut rec = IncidentRecord::new(Map::new());
        rec.status = status;
        for nature in natures {
            rec.natures.insert(*nature, Value::Object(Map::new()));
        }
        rec
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.ready, 0);
        assert!(summary.by_nature.is_empty());
        assert!(summary.oldest.is_none());
        assert!(summary.newest.is_none());
    }

    #[test]
    fn test_summarize_counts() {
        let records = vec![
            record(IncidentStatus::Pending, &[]),
            record(IncidentStatus::Ready, &[Nature::Fire]),
            record(IncidentStatus::Ready, &[Nature::Fire, Nature::Prevention]),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.ready, 2);
        assert_eq!(summary.by_nature.get(&Nature::Fire), Some(&2));
        assert_eq!(summary.by_nature.get(&Nature::Prevention), Some(&1));
        assert_eq!(summary.by_nature.get(&Nature::Community), None);
        assert!(summary.oldest.is_some());
        assert!(summary.newest.is_some());
        assert!(summary.oldest <= summary.newest);
    }

    #[test]
    fn test_filter_no_criteria_returns_all_newest_first() {
        let records = vec![
            record(IncidentStatus::Pending, &[]),
            record(IncidentStatus::Ready, &[Nature::Fire]),
        ];

        let listed = filter_records(&records, &ListFilter::default());
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].0, 1);
        assert_eq!(listed[1].0, 0);
    }

    #[test]
    fn test_filter_by_status() {
        let records = vec![
            record(IncidentStatus::Pending, &[]),
            record(IncidentStatus::Ready, &[Nature::Fire]),
        ];

        let filter = ListFilter {
            status: Some(IncidentStatus::Pending),
            ..ListFilter::default()
        };
        let listed = filter_records(&records, &filter);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, 0);
    }

    #[test]
    fn test_filter_by_nature() {
        let records = vec![
            record(IncidentStatus::Ready, &[Nature::Fire]),
            record(IncidentStatus::Ready, &[Nature::Community]),
        ];

        let filter = ListFilter {
            nature: Some(Nature::Community),
            ..ListFilter::default()
        };
        let listed = filter_records(&records, &filter);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, 1);
    }

    #[test]
    fn test_filter_limit() {
        let records = vec![
            record(IncidentStatus::Ready, &[Nature::Fire]),
            record(IncidentStatus::Ready, &[Nature::Fire]),
            record(IncidentStatus::Ready, &[Nature::Fire]),
        ];

        let filter = ListFilter {
            limit: Some(2),
            ..ListFilter::default()
        };
        let listed = filter_records(&records, &filter);
        assert_eq!(listed.len(), 2);
        // newest first
        assert_eq!(listed[0].0, 2);
        assert_eq!(listed[1].0, 1);
    }

    #[test]
    fn test_summary_serialize() {
        let summary = summarize(&[record(IncidentStatus::Ready, &[Nature::Management])]);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"management\""));
        assert!(json.contains("\"ready\":1"));
    }
}
