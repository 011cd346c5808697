use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use super::HistoryStore;
use crate::backend::{Entry, MemoryBackend, RawHistory, SettingsBackend};
use crate::error::HistoryError;

const NAME: &str = "HISTORY_FILENAME";

fn pairs(items: &[(&str, &str)]) -> Vec<Entry> {
	items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn seeded() -> MemoryBackend {
	MemoryBackend::with_entries(NAME, [("f1", "s1"), ("f2", "s2"), ("f3", "s3")])
}

#[test]
fn open_preserves_stored_order() {
	let backend = seeded();
	let store = HistoryStore::open(&backend, NAME, 4).unwrap();

	assert_eq!(store.entries(), pairs(&[("f1", "s1"), ("f2", "s2"), ("f3", "s3")]));
	assert_eq!(store.name(), NAME);
	assert!(backend.saves().is_empty(), "opening must not write");
}

#[test]
fn open_missing_history_starts_empty() {
	let backend = MemoryBackend::new();
	let store = HistoryStore::open(&backend, NAME, 4).unwrap();

	assert!(store.is_empty());
	assert!(!store.contains("f1"));
}

#[test]
fn set_appends_and_persists() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	store.set("f4", "s4").unwrap();

	let expected = pairs(&[("f1", "s1"), ("f2", "s2"), ("f3", "s3"), ("f4", "s4")]);
	assert_eq!(store.entries(), expected);
	assert_eq!(backend.last_save(), Some((NAME.to_string(), expected)));
}

#[test]
fn delete_removes_and_persists() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	store.delete("f2").unwrap();

	let expected = pairs(&[("f1", "s1"), ("f3", "s3")]);
	assert_eq!(store.entries(), expected);
	assert_eq!(backend.last_save(), Some((NAME.to_string(), expected)));
}

#[test]
fn delete_after_insert() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	store.set("f4", "s4").unwrap();
	store.delete("f2").unwrap();

	assert_eq!(store.entries(), pairs(&[("f1", "s1"), ("f3", "s3"), ("f4", "s4")]));
}

#[test]
fn set_at_capacity_evicts_front() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	store.set("f4", "s4").unwrap();
	assert_eq!(store.entries(), pairs(&[("f1", "s1"), ("f2", "s2"), ("f3", "s3"), ("f4", "s4")]));

	store.set("f5", "s5").unwrap();
	assert_eq!(store.entries(), pairs(&[("f2", "s2"), ("f3", "s3"), ("f4", "s4"), ("f5", "s5")]));

	store.set("f6", "s6").unwrap();
	let expected = pairs(&[("f3", "s3"), ("f4", "s4"), ("f5", "s5"), ("f6", "s6")]);
	assert_eq!(store.entries(), expected);
	assert_eq!(backend.stored(NAME), Some(expected));
}

#[test]
fn contains_does_not_reorder_but_get_does() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	assert!(store.contains("f2"));
	assert_eq!(store.entries(), pairs(&[("f1", "s1"), ("f2", "s2"), ("f3", "s3")]));
	assert!(backend.saves().is_empty());

	assert_eq!(store.get("f2").unwrap(), "s2");
	let expected = pairs(&[("f1", "s1"), ("f3", "s3"), ("f2", "s2")]);
	assert_eq!(store.entries(), expected);
	assert_eq!(backend.last_save(), Some((NAME.to_string(), expected)));
}

#[test]
fn touches_interleaved_with_eviction() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	store.get("f2").unwrap();
	store.get("f1").unwrap();
	assert_eq!(store.entries(), pairs(&[("f3", "s3"), ("f2", "s2"), ("f1", "s1")]));

	store.set("f4", "s4").unwrap();
	assert_eq!(store.entries(), pairs(&[("f3", "s3"), ("f2", "s2"), ("f1", "s1"), ("f4", "s4")]));

	store.set("f5", "s5").unwrap();
	assert_eq!(store.entries(), pairs(&[("f2", "s2"), ("f1", "s1"), ("f4", "s4"), ("f5", "s5")]));

	store.get("f1").unwrap();
	assert_eq!(store.entries(), pairs(&[("f2", "s2"), ("f4", "s4"), ("f5", "s5"), ("f1", "s1")]));

	store.set("f6", "s6").unwrap();
	assert_eq!(store.entries(), pairs(&[("f4", "s4"), ("f5", "s5"), ("f1", "s1"), ("f6", "s6")]));

	store.set("f7", "s7").unwrap();
	assert_eq!(store.entries(), pairs(&[("f5", "s5"), ("f1", "s1"), ("f6", "s6"), ("f7", "s7")]));
}

#[test]
fn missing_keys_report_key_not_found() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	assert!(!store.contains("nope"));
	assert!(matches!(store.get("nope"), Err(HistoryError::KeyNotFound(k)) if k == "nope"));
	assert!(matches!(store.delete("nope"), Err(HistoryError::KeyNotFound(k)) if k == "nope"));
	assert!(backend.saves().is_empty(), "failed lookups must not write");
}

#[test]
fn resetting_same_pair_keeps_size_and_moves_to_back() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	store.set("f1", "s1").unwrap();
	store.set("f1", "s1").unwrap();

	assert_eq!(store.len(), 3);
	assert_eq!(store.entries(), pairs(&[("f2", "s2"), ("f3", "s3"), ("f1", "s1")]));
}

#[test]
fn overwrite_replaces_value_and_moves_to_back() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();

	store.set("f2", "other").unwrap();

	assert_eq!(store.entries(), pairs(&[("f1", "s1"), ("f3", "s3"), ("f2", "other")]));
}

#[test]
fn legacy_mapping_is_normalized_on_first_write() {
	let backend = MemoryBackend::new();
	let legacy: BTreeMap<String, String> = pairs(&[("b", "sb"), ("a", "sa")]).into_iter().collect();
	backend.put(NAME, RawHistory::Legacy(legacy));

	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();
	assert_eq!(store.len(), 2);
	assert!(store.contains("a") && store.contains("b"));

	store.set("c", "sc").unwrap();
	let (_, saved) = backend.last_save().unwrap();
	assert_eq!(saved.len(), 3);
	assert_eq!(saved.last(), Some(&("c".to_string(), "sc".to_string())));
	assert!(matches!(backend.load(NAME).unwrap(), Some(RawHistory::Ordered(_))));
}

#[test]
fn over_capacity_load_is_trimmed_lazily() {
	let backend = MemoryBackend::with_entries(NAME, [("f1", "s1"), ("f2", "s2"), ("f3", "s3"), ("f4", "s4"), ("f5", "s5")]);

	let mut store = HistoryStore::open(&backend, NAME, 2).unwrap();
	assert_eq!(store.len(), 5, "no eviction at load time");
	assert!(store.contains("f1"));

	store.set("f6", "s6").unwrap();
	assert_eq!(store.entries(), pairs(&[("f5", "s5"), ("f6", "s6")]));
}

#[test]
fn touch_on_over_capacity_load_trims_before_saving() {
	let backend = MemoryBackend::with_entries(NAME, [("f1", "s1"), ("f2", "s2"), ("f3", "s3")]);
	let mut store = HistoryStore::open(&backend, NAME, 2).unwrap();

	assert_eq!(store.get("f1").unwrap(), "s1");
	assert_eq!(store.entries(), pairs(&[("f3", "s3"), ("f1", "s1")]));
	assert_eq!(backend.stored(NAME), Some(store.entries()));
}

#[test]
fn failed_save_keeps_in_memory_update() {
	let backend = seeded();
	let mut store = HistoryStore::open(&backend, NAME, 4).unwrap();
	backend.set_read_only(true);

	let err = store.set("f4", "s4").unwrap_err();
	assert!(matches!(err, HistoryError::Persist { ref name, .. } if name == NAME));
	assert!(store.contains("f4"));
	assert_eq!(backend.stored(NAME), Some(pairs(&[("f1", "s1"), ("f2", "s2"), ("f3", "s3")])));

	backend.set_read_only(false);
	store.delete("f1").unwrap();
	assert_eq!(backend.stored(NAME), Some(pairs(&[("f2", "s2"), ("f3", "s3"), ("f4", "s4")])));
}

#[derive(Debug, Clone)]
enum Op {
	Get(u8),
	Set(u8, u8),
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![(0u8..12).prop_map(Op::Get), (0u8..12, 0u8..4).prop_map(|(k, v)| Op::Set(k, v))]
}

proptest! {
	#[test]
	fn lru_invariants_hold(max_items in 1usize..6, ops in prop::collection::vec(op(), 1..60)) {
		let backend = MemoryBackend::new();
		let mut store = HistoryStore::open(&backend, NAME, max_items).unwrap();

		for op in ops {
			let touched = match op {
				Op::Get(k) => {
					let key = format!("f{k}");
					if !store.contains(&key) {
						prop_assert!(matches!(store.get(&key), Err(HistoryError::KeyNotFound(_))));
						continue;
					}
					store.get(&key).unwrap();
					key
				}
				Op::Set(k, v) => {
					let key = format!("f{k}");
					store.set(key.clone(), format!("s{v}")).unwrap();
					key
				}
			};

			let entries = store.entries();
			prop_assert!(entries.len() <= max_items);
			let unique: HashSet<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
			prop_assert_eq!(unique.len(), entries.len());
			prop_assert_eq!(entries.last().map(|(k, _)| k.as_str()), Some(touched.as_str()));
			prop_assert_eq!(backend.stored(NAME), Some(entries));
		}
	}
}
