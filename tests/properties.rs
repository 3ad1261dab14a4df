//! Свойства структур движка на случайных входах (proptest).

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

use theatre_engine::catalog::CatalogIndex;
use theatre_engine::error::EngineError;
use theatre_engine::models::{Booking, BookingStatus, Movie};
use theatre_engine::search::{bad_character_search, prefix_function_search};
use theatre_engine::services::ordering::sorted_indices;
use theatre_engine::services::routing::RoutingGraph;
use theatre_engine::services::BookingIndex;

#[derive(Debug, Clone)]
enum CatalogOp {
    Insert(String),
    Delete(String),
}

fn catalog_op() -> impl Strategy<Value = CatalogOp> {
    let title = "[a-e]{1,3}";
    prop_oneof![
        3 => title.prop_map(CatalogOp::Insert),
        1 => title.prop_map(CatalogOp::Delete),
    ]
}

fn booking(id: u32) -> Booking {
    Booking {
        id,
        show_id: 1,
        seat: "A1".to_string(),
        customer_name: format!("guest {}", id),
        customer_contact: format!("guest{}@example.com", id),
        price_paid: 10.0,
        status: BookingStatus::Active,
        created_at: "2024-05-01 10:00".to_string(),
    }
}

/// Все простые пути перебором, минимум по весу.
fn brute_force(n: usize, weights: &[Vec<Option<u32>>], from: usize, to: usize) -> Option<u64> {
    fn walk(
        at: usize,
        to: usize,
        cost: u64,
        weights: &[Vec<Option<u32>>],
        seen: &mut Vec<bool>,
        best: &mut Option<u64>,
    ) {
        if at == to {
            *best = Some(best.map_or(cost, |b| b.min(cost)));
            return;
        }
        for next in 0..weights.len() {
            if let Some(w) = weights[at][next] {
                if !seen[next] {
                    seen[next] = true;
                    walk(next, to, cost + u64::from(w), weights, seen, best);
                    seen[next] = false;
                }
            }
        }
    }

    let mut seen = vec![false; n];
    seen[from] = true;
    let mut best = None;
    walk(from, to, 0, weights, &mut seen, &mut best);
    best
}

proptest! {
    #[test]
    fn catalog_always_enumerates_in_order(ops in prop::collection::vec(catalog_op(), 0..60)) {
        let mut index = CatalogIndex::new();
        let mut model: BTreeMap<String, u32> = BTreeMap::new();

        for (i, op) in ops.into_iter().enumerate() {
            match op {
                CatalogOp::Insert(title) => {
                    index.insert(Movie::new(i as u32, title.clone(), "genre", 90));
                    model.insert(title, i as u32);
                }
                CatalogOp::Delete(title) => {
                    let removed = index.delete(&title).is_ok();
                    prop_assert_eq!(removed, model.remove(&title).is_some());
                }
            }
            let titles = index.titles();
            prop_assert!(titles.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(titles, model.keys().cloned().collect::<Vec<_>>());
            prop_assert_eq!(index.len(), model.len());
        }

        for (title, id) in &model {
            prop_assert_eq!(index.find(title).map(|m| m.id), Ok(*id));
        }
    }

    #[test]
    fn sorter_yields_ordered_permutation(values in prop::collection::vec(0u8..8, 0..40)) {
        let order = sorted_indices(values.len(), |a, b| values[a].cmp(&values[b]));

        let mut seen = order.clone();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..values.len()).collect::<Vec<_>>());
        prop_assert!(order.windows(2).all(|w| values[w[0]] <= values[w[1]]));
    }

    #[test]
    fn search_algorithms_agree(text in "[ab]{0,24}", pattern in "[ab]{0,5}") {
        let expected = text.contains(&pattern);
        prop_assert_eq!(bad_character_search(&text, &pattern), expected);
        prop_assert_eq!(prefix_function_search(&text, &pattern), expected);
    }

    #[test]
    fn search_agrees_on_unicode_text(text in "\\PC{0,16}", start in 0usize..16, len in 0usize..5) {
        let chars: Vec<char> = text.chars().collect();
        let start = start.min(chars.len());
        let end = (start + len).min(chars.len());
        let pattern: String = chars[start..end].iter().collect();

        prop_assert!(bad_character_search(&text, &pattern));
        prop_assert!(prefix_function_search(&text, &pattern));
    }

    #[test]
    fn booking_index_matches_a_map(
        capacity in 1usize..24,
        ops in prop::collection::vec((any::<bool>(), 0u32..40), 0..80),
    ) {
        let mut index = BookingIndex::with_capacity(capacity);
        let mut model: HashMap<u32, Booking> = HashMap::new();

        for (is_insert, id) in ops {
            if is_insert {
                let result = index.insert(booking(id));
                if model.contains_key(&id) || model.len() < capacity {
                    prop_assert!(result.is_ok());
                    model.insert(id, booking(id));
                } else {
                    prop_assert!(matches!(result, Err(EngineError::CapacityExceeded(_))));
                }
            } else {
                let removed = index.remove(id).map(|b| b.id).ok();
                prop_assert_eq!(removed, model.remove(&id).map(|b| b.id));
            }

            prop_assert_eq!(index.len(), model.len());
            for probe in 0u32..40 {
                prop_assert_eq!(index.get(probe).ok(), model.get(&probe));
            }
        }
    }

    #[test]
    fn dijkstra_matches_brute_force(
        n in 1usize..=6,
        raw in prop::collection::vec(prop::option::of(prop_oneof![0u32..20, (u32::MAX - 20)..=u32::MAX]), 36),
    ) {
        let mut weights = vec![vec![None; n]; n];
        let mut graph = RoutingGraph::new();
        for v in 0..n {
            graph.add_venue(v as u32 + 1);
        }
        for a in 0..n {
            for b in (a + 1)..n {
                if let Some(w) = raw[a * 6 + b] {
                    weights[a][b] = Some(w);
                    weights[b][a] = Some(w);
                    graph.add_edge(a as u32 + 1, b as u32 + 1, w).unwrap();
                }
            }
        }

        let mut dist = vec![vec![None; n]; n];
        for a in 0..n {
            let paths = graph.shortest_path(a as u32 + 1).unwrap();
            for b in 0..n {
                let d = paths.distance_to(b as u32 + 1).unwrap();
                prop_assert_eq!(d, brute_force(n, &weights, a, b));

                match paths.path_to(b as u32 + 1) {
                    Ok((total, path)) => {
                        prop_assert_eq!(Some(total), d);
                        prop_assert_eq!(path.first().copied(), Some(a as u32 + 1));
                        prop_assert_eq!(path.last().copied(), Some(b as u32 + 1));
                        let walked: Option<u64> = path
                            .windows(2)
                            .map(|w| weights[w[0] as usize - 1][w[1] as usize - 1].map(u64::from))
                            .sum();
                        prop_assert_eq!(walked, Some(total));
                    }
                    Err(e) => {
                        prop_assert!(d.is_none());
                        let is_unreachable = matches!(e, EngineError::Unreachable { .. });
                        prop_assert!(is_unreachable);
                    }
                }
                dist[a][b] = d;
            }
        }

        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    if let (Some(ab), Some(bc)) = (dist[a][b], dist[b][c]) {
                        let ac = dist[a][c];
                        prop_assert!(ac.is_some() && ac.unwrap() <= ab + bc);
                    }
                }
            }
        }
    }
}
