//! Pipeline grouping and ingest accounting

use crate::error::Anomaly;
use crate::types::Record;
use indexmap::IndexMap;

/// All records of one pipeline, keyed by fragment id
///
/// Iteration order is arrival order. Reconstruction does not depend on it
/// except when no terminal exists, where the first-arrived record becomes
/// the forward-walk start.
#[derive(Debug, Clone)]
pub struct PipelineGroup {
    pipeline_id: String,
    records: IndexMap<String, Record>,
}

impl PipelineGroup {
    /// Create an empty group for one pipeline
    pub fn new(pipeline_id: impl Into<String>) -> Self {
        Self {
            pipeline_id: pipeline_id.into(),
            records: IndexMap::new(),
        }
    }

    /// The pipeline this group belongs to
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Number of records in the group
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the group holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by fragment id
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    /// Iterate records in arrival order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Iterate fragment ids in arrival order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

/// Partitions validated records by pipeline
///
/// Pipelines iterate in first-seen order, which fixes the output order of
/// the final report.
#[derive(Debug, Clone, Default)]
pub struct Grouper {
    pipelines: IndexMap<String, PipelineGroup>,
}

impl Grouper {
    /// Create an empty grouper
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record into its pipeline's group
    ///
    /// A fragment id already present in the pipeline rejects the incoming
    /// record: the first one is kept, the duplicate dropped, and a
    /// [`Anomaly::DuplicateId`] returned for the caller to report.
    pub fn insert(&mut self, record: Record) -> Result<(), Anomaly> {
        let group = self
            .pipelines
            .entry(record.pipeline_id.clone())
            .or_insert_with(|| PipelineGroup::new(record.pipeline_id.clone()));

        if group.records.contains_key(&record.id) {
            return Err(Anomaly::DuplicateId {
                pipeline_id: record.pipeline_id,
                id: record.id,
            });
        }

        group.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Iterate pipelines in first-seen order
    pub fn pipelines(&self) -> impl Iterator<Item = (&str, &PipelineGroup)> {
        self.pipelines
            .iter()
            .map(|(id, group)| (id.as_str(), group))
    }

    /// Number of distinct pipelines seen
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Whether no pipeline has been seen yet
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Total number of records across all pipelines
    pub fn record_count(&self) -> usize {
        self.pipelines.values().map(|group| group.records.len()).sum()
    }
}

/// Ingest statistics over one run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Input lines consumed
    pub lines_read: usize,

    /// Lines the parser rejected
    pub parse_errors: usize,

    /// Records dropped as in-pipeline duplicates
    pub duplicate_ids: usize,

    /// Distinct pipelines seen
    pub pipelines: usize,

    /// Records accepted into groups
    pub records: usize,
}

impl RunStats {
    /// Share of input lines that became grouped records, as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            (self.records as f64 / self.lines_read as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Encoding;

    fn record(pipeline: &str, id: &str, next: &str) -> Record {
        Record::new(pipeline, id, Encoding::Raw, "body", next)
    }

    #[test]
    fn test_pipelines_iterate_in_first_seen_order() {
        let mut grouper = Grouper::new();
        grouper.insert(record("B", "1", "-1")).unwrap();
        grouper.insert(record("A", "1", "-1")).unwrap();
        grouper.insert(record("B", "2", "1")).unwrap();

        let order: Vec<&str> = grouper.pipelines().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["B", "A"]);
    }

    #[test]
    fn test_duplicate_id_keeps_first_record() {
        let mut grouper = Grouper::new();
        grouper
            .insert(Record::new("P1", "1", Encoding::Raw, "first", "-1"))
            .unwrap();

        let err = grouper
            .insert(Record::new("P1", "1", Encoding::Raw, "second", "2"))
            .unwrap_err();
        assert_eq!(
            err,
            Anomaly::DuplicateId {
                pipeline_id: "P1".to_string(),
                id: "1".to_string(),
            }
        );

        let (_, group) = grouper.pipelines().next().unwrap();
        assert_eq!(group.get("1").unwrap().body, "first");
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_same_id_in_different_pipelines_is_fine() {
        let mut grouper = Grouper::new();
        assert!(grouper.is_empty());

        grouper.insert(record("P1", "1", "-1")).unwrap();
        grouper.insert(record("P2", "1", "-1")).unwrap();

        assert!(!grouper.is_empty());
        assert_eq!(grouper.len(), 2);
        assert_eq!(grouper.record_count(), 2);
    }

    #[test]
    fn test_group_preserves_arrival_order() {
        let mut grouper = Grouper::new();
        grouper.insert(record("P1", "5", "9")).unwrap();
        grouper.insert(record("P1", "2", "5")).unwrap();
        grouper.insert(record("P1", "9", "-1")).unwrap();

        let (_, group) = grouper.pipelines().next().unwrap();
        let ids: Vec<&str> = group.ids().collect();
        assert_eq!(ids, vec!["5", "2", "9"]);
    }

    #[test]
    fn test_acceptance_rate() {
        let stats = RunStats {
            lines_read: 8,
            parse_errors: 1,
            duplicate_ids: 1,
            pipelines: 2,
            records: 6,
        };
        assert!((stats.acceptance_rate() - 75.0).abs() < f64::EPSILON);

        assert_eq!(RunStats::default().acceptance_rate(), 0.0);
    }
}
