//! Граф переходов между залами (эвакуация, расстояния).
//!
//! Матрица смежности по числу залов: `Some(0)` на диагонали, `None` там, где ребра нет.
//! Кратчайшие пути - классический Дейкстра за O(V^2). Расстояния считаются в `u64`,
//! поэтому сумма любых весов `u32` по простому пути не переполняется.

use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{RouteEdge, VenueId};

#[derive(Debug, Default)]
pub struct RoutingGraph {
    venue_ids: Vec<VenueId>,
    matrix: Vec<Vec<Option<u32>>>,
}

/// Результат для одного целевого зала.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Route {
    Reachable { to: VenueId, distance: u64, path: Vec<VenueId> },
    Unreachable { to: VenueId },
}

impl RoutingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.venue_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venue_ids.is_empty()
    }

    /// Расширяет матрицу на одну вершину. Повторное добавление игнорируется.
    pub fn add_venue(&mut self, id: VenueId) {
        if self.venue_ids.contains(&id) {
            return;
        }
        for row in &mut self.matrix {
            row.push(None);
        }
        let n = self.venue_ids.len() + 1;
        let mut row = vec![None; n];
        row[n - 1] = Some(0);
        self.matrix.push(row);
        self.venue_ids.push(id);
    }

    fn index_of(&self, id: VenueId) -> EngineResult<usize> {
        self.venue_ids
            .iter()
            .position(|v| *v == id)
            .ok_or_else(|| EngineError::not_found(format!("venue {} in routing graph", id)))
    }

    /// Ненаправленное ребро, вес задается в обе стороны.
    pub fn add_edge(&mut self, a: VenueId, b: VenueId, weight: u32) -> EngineResult<()> {
        if a == b {
            return Err(EngineError::invalid(format!("route from venue {} to itself", a)));
        }
        let (i, j) = (self.index_of(a)?, self.index_of(b)?);
        self.matrix[i][j] = Some(weight);
        self.matrix[j][i] = Some(weight);
        debug!("Route {} <-> {} weight {}", a, b, weight);
        Ok(())
    }

    pub fn add_route(&mut self, edge: RouteEdge) -> EngineResult<()> {
        self.add_edge(edge.from, edge.to, edge.weight)
    }

    pub fn shortest_path(&self, source: VenueId) -> EngineResult<ShortestPaths> {
        let src = self.index_of(source)?;
        let n = self.venue_ids.len();

        let mut dist: Vec<Option<u64>> = self.matrix[src].iter().map(|w| w.map(u64::from)).collect();
        let mut visited = vec![false; n];
        // Вершина без пути - сама себе предок
        let mut pred: Vec<usize> = (0..n).map(|v| if dist[v].is_some() { src } else { v }).collect();
        dist[src] = Some(0);
        pred[src] = src;

        for _ in 0..n {
            let next = (0..n)
                .filter_map(|v| dist[v].filter(|_| !visited[v]).map(|d| (v, d)))
                .min_by_key(|&(_, d)| d);
            let Some((u, du)) = next else { break };
            visited[u] = true;

            for v in 0..n {
                let Some(w) = self.matrix[u][v] else { continue };
                if visited[v] {
                    continue;
                }
                let candidate = du + u64::from(w);
                if dist[v].map_or(true, |dv| candidate < dv) {
                    dist[v] = Some(candidate);
                    pred[v] = u;
                }
            }
        }

        Ok(ShortestPaths { source: src, venue_ids: self.venue_ids.clone(), dist, pred })
    }

    /// Кратчайший путь между двумя залами или `Unreachable`.
    pub fn path_between(&self, from: VenueId, to: VenueId) -> EngineResult<(u64, Vec<VenueId>)> {
        self.shortest_path(from)?.path_to(to)
    }

    /// Ближайший другой зал, достижимый из `source` (куда эвакуировать).
    pub fn nearest(&self, source: VenueId) -> EngineResult<Option<(VenueId, u64)>> {
        let paths = self.shortest_path(source)?;
        Ok(paths
            .routes()
            .into_iter()
            .filter_map(|route| match route {
                Route::Reachable { to, distance, .. } if to != source => Some((to, distance)),
                _ => None,
            })
            .min_by_key(|(_, distance)| *distance))
    }
}

/// Результат Дейкстры из одного источника.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: usize,
    venue_ids: Vec<VenueId>,
    dist: Vec<Option<u64>>,
    pred: Vec<usize>,
}

impl ShortestPaths {
    pub fn source(&self) -> VenueId {
        self.venue_ids[self.source]
    }

    fn index_of(&self, id: VenueId) -> EngineResult<usize> {
        self.venue_ids
            .iter()
            .position(|v| *v == id)
            .ok_or_else(|| EngineError::not_found(format!("venue {} in routing graph", id)))
    }

    pub fn distance_to(&self, target: VenueId) -> EngineResult<Option<u64>> {
        let t = self.index_of(target)?;
        Ok(self.dist[t])
    }

    /// Восстановление пути по предкам. Останавливается на вершине, которая
    /// сама себе предок, и не делает больше `V` шагов.
    pub fn path_to(&self, target: VenueId) -> EngineResult<(u64, Vec<VenueId>)> {
        let t = self.index_of(target)?;
        let Some(distance) = self.dist[t] else {
            return Err(EngineError::Unreachable { from: self.source(), to: target });
        };

        let mut path = vec![self.venue_ids[t]];
        let mut v = t;
        let mut steps = 0;
        while self.pred[v] != v && steps < self.pred.len() {
            v = self.pred[v];
            path.push(self.venue_ids[v]);
            steps += 1;
        }
        if v != self.source {
            return Err(EngineError::Unreachable { from: self.source(), to: target });
        }
        path.reverse();
        Ok((distance, path))
    }

    /// Маршрут до каждого зала графа, в порядке добавления залов.
    pub fn routes(&self) -> Vec<Route> {
        self.venue_ids
            .iter()
            .map(|&to| match self.path_to(to) {
                Ok((distance, path)) => Route::Reachable { to, distance, path },
                Err(_) => Route::Unreachable { to },
            })
            .collect()
    }
}
