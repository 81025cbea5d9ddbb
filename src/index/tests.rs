//! Index tests

use proptest::prelude::*;

use crate::core::types::{ChunkMetadata, DocumentChunk};

use super::store::squared_l2;
use super::*;

const DIM: usize = 4;

fn chunk(text: &str, id: usize) -> DocumentChunk {
    DocumentChunk::new(text, ChunkMetadata::new("test.txt", id))
}

/// A vector at distance |value| from the origin along the first axis.
fn vector(value: f32) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[0] = value;
    v
}

fn populated(values: &[f32]) -> VectorIndex {
    let index = VectorIndex::new(DIM);
    let chunks = values
        .iter()
        .enumerate()
        .map(|(i, value)| chunk(&format!("{value}"), i))
        .collect();
    let vectors = values.iter().copied().map(vector).collect();
    index.add(chunks, vectors).unwrap();
    index
}

#[test]
fn test_add_keeps_arrays_aligned() {
    let index = populated(&[1.0, 2.0, 3.0]);
    assert_eq!(index.len(), 3);
    assert!(!index.is_empty());
}

#[test]
fn test_empty_add_is_a_noop() {
    let index = VectorIndex::new(DIM);
    index.add(Vec::new(), Vec::new()).unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_misaligned_batch_is_rejected_atomically() {
    let index = populated(&[1.0]);
    let err = index
        .add(vec![chunk("a", 1), chunk("b", 2)], vec![vector(2.0)])
        .unwrap_err();
    assert!(matches!(
        err,
        IndexError::AlignmentMismatch { chunks: 2, vectors: 1 }
    ));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_wrong_dimension_vector_is_rejected() {
    let index = populated(&[1.0]);
    let err = index
        .add(vec![chunk("a", 1)], vec![vec![0.0; DIM + 1]])
        .unwrap_err();
    assert!(matches!(
        err,
        IndexError::DimensionMismatch { expected, actual }
            if expected == DIM && actual == DIM + 1
    ));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_search_orders_by_distance() {
    let index = populated(&[5.0, 1.0, 3.0]);
    let hits = index.search(&vector(0.0), 3).unwrap();
    let texts: Vec<&str> = hits.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["1", "3", "5"]);
}

#[test]
fn test_search_returns_at_most_k() {
    let index = populated(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(index.search(&vector(0.0), 2).unwrap().len(), 2);
    assert_eq!(index.search(&vector(0.0), 10).unwrap().len(), 4);
}

#[test]
fn test_search_on_empty_index_returns_nothing() {
    let index = VectorIndex::new(DIM);
    assert!(index.search(&vector(0.0), 1).unwrap().is_empty());
    assert!(index.search(&vector(0.0), 10).unwrap().is_empty());
}

#[test]
fn test_search_rejects_zero_limit() {
    let index = populated(&[1.0]);
    assert!(matches!(
        index.search(&vector(0.0), 0),
        Err(IndexError::InvalidLimit)
    ));
}

#[test]
fn test_search_rejects_wrong_query_dimension() {
    let index = populated(&[1.0]);
    assert!(matches!(
        index.search(&[0.0; DIM + 1], 1),
        Err(IndexError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_ties_keep_insertion_order() {
    let index = VectorIndex::new(DIM);
    index
        .add(
            vec![chunk("first", 0), chunk("second", 1)],
            vec![vector(2.0), vector(2.0)],
        )
        .unwrap();

    let hits = index.search(&vector(0.0), 2).unwrap();
    assert_eq!(hits[0].text, "first");
    assert_eq!(hits[1].text, "second");
}

#[test]
fn test_reset_empties_the_index() {
    let index = populated(&[1.0, 2.0]);
    index.reset();
    assert!(index.is_empty());
    assert!(index.search(&vector(0.0), 1).unwrap().is_empty());
}

#[test]
fn test_sources_counts_in_first_seen_order() {
    let index = VectorIndex::new(DIM);
    let mut chunks = vec![chunk("a", 0), chunk("b", 1)];
    chunks.push(DocumentChunk::new("c", ChunkMetadata::new("other.pdf", 0)));
    index
        .add(chunks, vec![vector(1.0), vector(2.0), vector(3.0)])
        .unwrap();

    assert_eq!(
        index.sources(),
        vec![("test.txt".to_string(), 2), ("other.pdf".to_string(), 1)]
    );
}

#[test]
fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let index = populated(&[4.0, 1.0, 2.5]);
    index.save(dir.path(), "store").unwrap();

    let restored = VectorIndex::new(DIM);
    assert!(restored.load(dir.path(), "store"));
    assert_eq!(restored.len(), 3);

    let before = index.search(&vector(0.0), 3).unwrap();
    let after = restored.search(&vector(0.0), 3).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_empty_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let index = VectorIndex::new(DIM);
    index.save(dir.path(), "store").unwrap();

    let restored = populated(&[1.0]);
    assert!(restored.load(dir.path(), "store"));
    assert!(restored.is_empty());
}

#[test]
fn test_load_missing_snapshot_returns_false() {
    let dir = tempfile::tempdir().unwrap();
    let index = populated(&[1.0]);
    assert!(!index.load(dir.path(), "absent"));
    // State untouched on failure.
    assert_eq!(index.len(), 1);
}

#[test]
fn test_load_corrupt_snapshot_returns_false_and_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("store.index"), b"garbage").unwrap();
    std::fs::write(dir.path().join("store.chunks"), b"more garbage").unwrap();

    let index = populated(&[1.0, 2.0]);
    assert!(!index.load(dir.path(), "store"));
    assert_eq!(index.len(), 2);
}

#[test]
fn test_load_rejects_dimension_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let index = populated(&[1.0]);
    index.save(dir.path(), "store").unwrap();

    let other = VectorIndex::new(DIM + 1);
    assert!(!other.load(dir.path(), "store"));
    assert!(other.is_empty());
}

#[test]
fn test_remove_snapshot_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let index = populated(&[1.0]);
    index.save(dir.path(), "store").unwrap();

    VectorIndex::remove_snapshot(dir.path(), "store").unwrap();
    VectorIndex::remove_snapshot(dir.path(), "store").unwrap();
    assert!(!index.load(dir.path(), "store"));
}

proptest! {
    #[test]
    fn prop_search_results_ordered_by_distance(
        values in proptest::collection::vec(-1000.0f32..1000.0, 1..50),
        k in 1usize..10,
    ) {
        let index = populated(&values);
        let query = vector(0.0);
        let hits = index.search(&query, k).unwrap();

        let distances: Vec<f32> = hits
            .iter()
            .map(|hit| {
                let value: f32 = hit.text.parse().unwrap();
                squared_l2(&query, &vector(value))
            })
            .collect();
        for pair in distances.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn prop_search_respects_limit(
        values in proptest::collection::vec(-1000.0f32..1000.0, 0..50),
        k in 1usize..20,
    ) {
        let index = populated(&values);
        let hits = index.search(&vector(0.0), k).unwrap();
        prop_assert_eq!(hits.len(), k.min(values.len()));
    }

    #[test]
    fn prop_snapshot_round_trip_preserves_search(
        values in proptest::collection::vec(-100.0f32..100.0, 1..20),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let index = populated(&values);
        index.save(dir.path(), "store").unwrap();

        let restored = VectorIndex::new(DIM);
        prop_assert!(restored.load(dir.path(), "store"));
        prop_assert_eq!(
            index.search(&vector(0.0), 5).unwrap(),
            restored.search(&vector(0.0), 5).unwrap()
        );
    }
}
