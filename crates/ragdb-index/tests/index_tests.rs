use std::collections::HashSet;
use std::sync::Mutex;

use ragdb_core::traits::PassageStore;
use ragdb_core::types::{DocumentId, DocumentInfo, Passage};
use ragdb_index::{new_shared_index, IndexSynchronizer, Retriever, VectorIndex};

/// Minimal store backing the synchronizer tests.
struct VecStore {
    passages: Mutex<Vec<Passage>>,
}

impl VecStore {
    fn new(passages: Vec<Passage>) -> Self {
        Self { passages: Mutex::new(passages) }
    }
}

impl PassageStore for VecStore {
    fn insert_document(&self, _doc: DocumentInfo) -> anyhow::Result<()> {
        Ok(())
    }
    fn mark_processed(&self, _document_id: &str, _total: usize) -> anyhow::Result<()> {
        Ok(())
    }
    fn remove_document(&self, _document_id: &str) -> anyhow::Result<()> {
        Ok(())
    }
    fn documents(&self) -> anyhow::Result<Vec<DocumentInfo>> {
        Ok(Vec::new())
    }
    fn insert_passages(&self, mut passages: Vec<Passage>) -> anyhow::Result<()> {
        self.passages.lock().expect("lock").append(&mut passages);
        Ok(())
    }
    fn list_embedded_passages(&self) -> anyhow::Result<Vec<Passage>> {
        Ok(self
            .passages
            .lock()
            .expect("lock")
            .iter()
            .filter(|p| !p.embedding.is_empty())
            .cloned()
            .collect())
    }
    fn passages_for(&self, document_id: &DocumentId) -> anyhow::Result<Vec<Passage>> {
        Ok(self
            .passages
            .lock()
            .expect("lock")
            .iter()
            .filter(|p| &p.document_id == document_id)
            .cloned()
            .collect())
    }
    fn delete_passages_by_document(&self, document_id: &DocumentId) -> anyhow::Result<usize> {
        let mut passages = self.passages.lock().expect("lock");
        let before = passages.len();
        passages.retain(|p| &p.document_id != document_id);
        Ok(before - passages.len())
    }
}

fn passage(id: &str, doc: &str, position: usize, embedding: Vec<f32>) -> Passage {
    Passage {
        id: id.to_string(),
        document_id: doc.to_string(),
        document_name: format!("{}.txt", doc),
        position,
        text: format!("passage {} of {}", position, doc),
        embedding,
    }
}

fn three_passage_store() -> VecStore {
    VecStore::new(vec![
        passage("p1", "d1", 0, vec![1.0, 0.0, 0.0]),
        passage("p2", "d1", 1, vec![0.0, 1.0, 0.0]),
        passage("p3", "d1", 2, vec![0.0, 0.0, 1.0]),
    ])
}

#[test]
fn empty_store_leaves_index_absent() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    let indexed = synchronizer.rebuild(&VecStore::new(Vec::new()));
    assert_eq!(indexed, 0);
    assert!(slot.read().is_none());

    let retriever = Retriever::new(slot);
    assert!(retriever.search(&[1.0, 0.0, 0.0], 5, None).is_empty());
}

#[test]
fn rebuild_upholds_length_invariant() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    assert_eq!(synchronizer.rebuild(&three_passage_store()), 3);

    let slot_guard = slot.read();
    let index = slot_guard.as_ref().expect("index present");
    assert_eq!(index.row_count(), 3);
    assert_eq!(index.live_count(), 3);
    for id in index.passage_ids() {
        assert!(index.meta(id).is_some());
    }
}

#[test]
fn mismatched_dimensions_fail_safe_to_empty() {
    let store = VecStore::new(vec![
        passage("p1", "d1", 0, vec![1.0, 0.0, 0.0]),
        passage("p2", "d1", 1, vec![1.0, 0.0]),
    ]);
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    assert_eq!(synchronizer.rebuild(&store), 0);
    assert!(slot.read().is_none(), "bad rebuild must not serve a partial index");
}

#[test]
fn passages_without_embeddings_are_skipped() {
    let store = VecStore::new(vec![
        passage("p1", "d1", 0, vec![1.0, 0.0, 0.0]),
        passage("p2", "d1", 1, Vec::new()),
    ]);
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    assert_eq!(synchronizer.rebuild(&store), 1);
}

#[test]
fn exact_match_ranks_first_with_similarity_one() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    synchronizer.rebuild(&three_passage_store());

    let retriever = Retriever::new(slot);
    let results = retriever.search(&[0.0, 1.0, 0.0], 2, None);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].passage_id, "p2");
    assert!((results[0].similarity - 1.0).abs() < 1e-6);
    assert!((results[0].distance).abs() < 1e-6);
    assert!(results[1].similarity < results[0].similarity);
}

#[test]
fn similarity_decreases_with_distance() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    synchronizer.rebuild(&VecStore::new(vec![
        passage("near", "d1", 0, vec![0.9, 0.1, 0.0]),
        passage("far", "d1", 1, vec![0.0, 0.9, 0.1]),
    ]));

    let retriever = Retriever::new(slot);
    let results = retriever.search(&[1.0, 0.0, 0.0], 2, None);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].passage_id, "near");
    assert!(results[0].distance < results[1].distance);
    assert!(results[0].similarity > results[1].similarity);
}

#[test]
fn far_matches_fall_below_quality_floor() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    // Squared distance from the query to this row is 3 * 4 = 12 > 2.
    synchronizer.rebuild(&VecStore::new(vec![passage("p1", "d1", 0, vec![2.0, 2.0, 2.0])]));

    let retriever = Retriever::new(slot);
    assert!(retriever.search(&[0.0, 0.0, 0.0], 5, None).is_empty());
}

#[test]
fn document_scope_filters_results() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    synchronizer.rebuild(&VecStore::new(vec![
        passage("p1", "d1", 0, vec![1.0, 0.0, 0.0]),
        passage("p2", "d2", 0, vec![0.9, 0.1, 0.0]),
    ]));

    let retriever = Retriever::new(slot);
    let scope = vec!["d2".to_string()];
    let results = retriever.search(&[1.0, 0.0, 0.0], 5, Some(&scope));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, "d2");
}

#[test]
fn scope_filter_to_zero_is_empty_not_error() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    synchronizer.rebuild(&three_passage_store());

    let retriever = Retriever::new(slot);
    let scope = vec!["unknown-doc".to_string()];
    assert!(retriever.search(&[0.0, 1.0, 0.0], 5, Some(&scope)).is_empty());
}

#[test]
fn prune_keeps_rows_but_hides_document() {
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    synchronizer.rebuild(&VecStore::new(vec![
        passage("p1", "d1", 0, vec![1.0, 0.0, 0.0]),
        passage("p2", "d2", 0, vec![0.0, 1.0, 0.0]),
        passage("p3", "d2", 1, vec![0.0, 0.0, 1.0]),
    ]));

    assert_eq!(synchronizer.prune_document("d2"), 2);
    {
        let slot_guard = slot.read();
        let index = slot_guard.as_ref().expect("index present");
        // Dead rows stay in the arena; the live set shrinks.
        assert_eq!(index.row_count(), 3);
        assert_eq!(index.live_count(), 1);
    }

    // Deletion containment: no result may ever name the pruned document,
    // even though its vectors still occupy rows.
    let retriever = Retriever::new(slot);
    let results = retriever.search(&[0.0, 1.0, 0.0], 5, None);
    assert!(results.iter().all(|r| r.document_id != "d2"));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].passage_id, "p1");
}

#[test]
fn prune_on_absent_index_is_a_noop() {
    let synchronizer = IndexSynchronizer::new(new_shared_index());
    assert_eq!(synchronizer.prune_document("d1"), 0);
}

#[test]
fn rebuild_round_trip_is_stable() {
    let store = three_passage_store();
    let first = VectorIndex::from_passages(&store.list_embedded_passages().expect("list"))
        .expect("build")
        .expect("nonempty");
    let second = VectorIndex::from_passages(&store.list_embedded_passages().expect("list"))
        .expect("build")
        .expect("nonempty");

    let first_ids: HashSet<_> = first.passage_ids().cloned().collect();
    let second_ids: HashSet<_> = second.passage_ids().cloned().collect();
    assert_eq!(first_ids, second_ids);
    for id in &first_ids {
        assert_eq!(first.meta(id), second.meta(id));
    }
}

#[test]
fn overfetch_recovers_results_hidden_by_dead_rows() {
    // Four nearer rows from d2 crowd out d1's row at top_k = 2; after
    // pruning d2, the over-fetch window must still surface d1.
    let mut passages = vec![passage("keep", "d1", 0, vec![0.5, 0.5, 0.0])];
    for i in 0..4 {
        passages.push(passage(
            &format!("noise{}", i),
            "d2",
            i,
            vec![1.0 - 0.01 * i as f32, 0.0, 0.0],
        ));
    }
    let slot = new_shared_index();
    let synchronizer = IndexSynchronizer::new(slot.clone());
    synchronizer.rebuild(&VecStore::new(passages));
    synchronizer.prune_document("d2");

    let retriever = Retriever::new(slot);
    let results = retriever.search(&[1.0, 0.0, 0.0], 2, None);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].passage_id, "keep");
}
