// In memory projection repository and query side.
//
// Responsibilities
// - Store read model rows keyed by record id.
// - Publish a revision after every mutation so subscribers can re-list.

use crate::modules::attendance::adapters::outbound::projections::AttendanceProjectionRepository;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::use_cases::list_attendance::projection::AttendanceRow;
use crate::modules::attendance::use_cases::list_attendance::queries_port::AttendanceQueries;
use std::cmp::Reverse;
use std::collections::HashMap;
use tokio::sync::{RwLock, watch};

pub struct InMemoryProjections {
    rows: RwLock<HashMap<String, AttendanceRow>>,
    next_sequence: RwLock<u64>,
    revision: watch::Sender<u64>,
    is_offline: bool,
}

impl Default for InMemoryProjections {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProjections {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            rows: RwLock::new(HashMap::new()),
            next_sequence: RwLock::new(1),
            revision,
            is_offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

#[async_trait::async_trait]
impl AttendanceProjectionRepository for InMemoryProjections {
    async fn upsert(&self, mut row: AttendanceRow) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Projections repository offline"));
        }
        {
            let mut guard = self.rows.write().await;
            row.sequence = match guard.get(&row.record_id) {
                Some(existing) => existing.sequence,
                None => {
                    let mut next = self.next_sequence.write().await;
                    let sequence = *next;
                    *next += 1;
                    sequence
                }
            };
            guard.insert(row.record_id.clone(), row);
        }
        self.bump_revision();
        Ok(())
    }

    async fn remove(&self, record_id: &str) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Projections repository offline"));
        }
        let removed = self.rows.write().await.remove(record_id);
        if removed.is_some() {
            self.bump_revision();
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AttendanceQueries for InMemoryProjections {
    async fn list(&self, owner_id: Option<&str>) -> anyhow::Result<Vec<AttendanceRecord>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Projections repository offline"));
        }
        let guard = self.rows.read().await;
        let mut items: Vec<AttendanceRow> = guard
            .values()
            .filter(|row| owner_id.is_none_or(|owner| row.owner_id == owner))
            .cloned()
            .collect();
        items.sort_by_key(|row| Reverse((row.created_at, row.sequence)));
        Ok(items.into_iter().map(AttendanceRecord::from).collect())
    }

    fn watch(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
pub mod attendance_in_memory_projections_tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn row(record_id: &str, owner_id: &str, created_at: i64) -> AttendanceRow {
        AttendanceRow {
            record_id: record_id.into(),
            owner_id: owner_id.into(),
            owner_label: format!("{owner_id}@example.com"),
            display_name: record_id.into(),
            created_at,
            sequence: 0,
        }
    }

    #[fixture]
    fn repository() -> InMemoryProjections {
        InMemoryProjections::new()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_newest_first_with_sequence_tie_break(repository: InMemoryProjections) {
        repository.upsert(row("a", "u-1", 10)).await.unwrap();
        repository.upsert(row("b", "u-1", 20)).await.unwrap();
        repository.upsert(row("c", "u-1", 10)).await.unwrap();
        let ids: Vec<String> = repository
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_filter_by_owner(repository: InMemoryProjections) {
        repository.upsert(row("a", "u-1", 10)).await.unwrap();
        repository.upsert(row("b", "u-2", 20)).await.unwrap();
        let mine = repository.list(Some("u-1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");
        assert_eq!(repository.list(None).await.unwrap().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_the_sequence_on_re_upsert(repository: InMemoryProjections) {
        repository.upsert(row("a", "u-1", 10)).await.unwrap();
        repository.upsert(row("b", "u-1", 10)).await.unwrap();
        repository.upsert(row("a", "u-1", 10)).await.unwrap();
        let ids: Vec<String> = repository
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_bump_the_revision_on_every_mutation(repository: InMemoryProjections) {
        let receiver = repository.watch();
        repository.upsert(row("a", "u-1", 10)).await.unwrap();
        repository.remove("a").await.unwrap();
        repository.remove("a").await.unwrap();
        assert_eq!(*receiver.borrow(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_list_if_offline(mut repository: InMemoryProjections) {
        repository.toggle_offline();
        let result = repository.list(None).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Projections repository offline")
        );
    }
}
