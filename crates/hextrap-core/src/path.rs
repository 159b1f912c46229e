//! Breadth-first escape-route search.
//!
//! Every step between adjacent hexes costs the same, so plain BFS yields a
//! geodesic shortest route. Neighbors are expanded in `Direction::ALL` order,
//! which makes the chosen route deterministic for a given obstacle set.

use crate::grid::GridTopology;
use crate::hex::HexCoordinate;
use std::collections::{HashMap, HashSet, VecDeque};

/// Find the shortest route from `start` to any boundary cell.
///
/// The returned route begins with `start` and ends on a boundary cell.
/// Returns `None` when every boundary cell is cut off, which is the capture
/// condition.
pub fn shortest_escape_route(
    start: HexCoordinate,
    obstacles: &HashSet<HexCoordinate>,
    topology: &GridTopology,
) -> Option<Vec<HexCoordinate>> {
    if !topology.is_in_bounds(&start) {
        return None;
    }

    let mut parents: HashMap<HexCoordinate, HexCoordinate> = HashMap::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if topology.is_boundary(&current) {
            return Some(reconstruct(current, start, &parents));
        }

        for next in topology.neighbors(&current) {
            if obstacles.contains(&next) || !visited.insert(next) {
                continue;
            }
            parents.insert(next, current);
            queue.push_back(next);
        }
    }

    None
}

/// Number of steps to the nearest reachable boundary cell
pub fn escape_distance(
    start: HexCoordinate,
    obstacles: &HashSet<HexCoordinate>,
    topology: &GridTopology,
) -> Option<usize> {
    shortest_escape_route(start, obstacles, topology).map(|route| route.len() - 1)
}

fn reconstruct(
    end: HexCoordinate,
    start: HexCoordinate,
    parents: &HashMap<HexCoordinate, HexCoordinate>,
) -> Vec<HexCoordinate> {
    let mut route = vec![end];
    let mut current = end;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                route.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    route.reverse();
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn h(column: i32, row: i32) -> HexCoordinate {
        HexCoordinate::new(column, row)
    }

    /// Distances from every boundary cell inward, ignoring the BFS under test
    fn brute_force_distance(
        start: HexCoordinate,
        obstacles: &HashSet<HexCoordinate>,
        grid: &GridTopology,
    ) -> Option<usize> {
        let cells: Vec<_> = grid
            .cells()
            .filter(|c| !obstacles.contains(c) || *c == start)
            .collect();
        let mut best: Option<usize> = None;
        for target in cells.iter().filter(|c| grid.is_boundary(c)) {
            // Bellman-Ford style relaxation from the target
            let mut dist: HashMap<HexCoordinate, usize> = HashMap::from([(*target, 0)]);
            let mut changed = true;
            while changed {
                changed = false;
                for cell in &cells {
                    let through = grid
                        .neighbors(cell)
                        .iter()
                        .filter_map(|n| dist.get(n))
                        .min()
                        .map(|d| d + 1);
                    if let Some(d) = through {
                        if dist.get(cell).map_or(true, |cur| d < *cur) {
                            dist.insert(*cell, d);
                            changed = true;
                        }
                    }
                }
            }
            if let Some(&d) = dist.get(&start) {
                best = Some(best.map_or(d, |b: usize| b.min(d)));
            }
        }
        best
    }

    fn assert_valid_route(route: &[HexCoordinate], obstacles: &HashSet<HexCoordinate>, grid: &GridTopology) {
        for pair in route.windows(2) {
            assert!(pair[0].direction_to(&pair[1]).is_some(), "route steps must be adjacent");
        }
        for cell in &route[1..] {
            assert!(!obstacles.contains(cell));
        }
        assert!(grid.is_boundary(route.last().unwrap()));
        assert!(route[..route.len() - 1].iter().all(|c| !grid.is_boundary(c)));
    }

    #[test]
    fn test_open_grid_route_reaches_boundary() {
        let grid = GridTopology::new(11, 10);
        let start = grid.center();
        let obstacles = HashSet::new();

        let route = shortest_escape_route(start, &obstacles, &grid).unwrap();
        assert_eq!(route[0], start);
        assert_valid_route(&route, &obstacles, &grid);
        assert_eq!(
            Some(route.len() - 1),
            brute_force_distance(start, &obstacles, &grid)
        );
    }

    #[test]
    fn test_start_on_boundary_is_single_cell_route() {
        let grid = GridTopology::new(5, 5);
        let route = shortest_escape_route(h(0, 2), &HashSet::new(), &grid).unwrap();
        assert_eq!(route, vec![h(0, 2)]);
    }

    #[test]
    fn test_surrounded_start_has_no_route() {
        let grid = GridTopology::new(11, 11);
        let start = grid.center();
        let obstacles: HashSet<_> = grid.neighbors(&start).into_iter().collect();
        assert_eq!(shortest_escape_route(start, &obstacles, &grid), None);
        assert_eq!(escape_distance(start, &obstacles, &grid), None);
    }

    #[test]
    fn test_enclosure_away_from_start_still_captures() {
        // Ring of radius two around the center, with the inner ring left open
        let grid = GridTopology::new(11, 11);
        let start = grid.center();
        let inner: HashSet<_> = grid.neighbors(&start).into_iter().collect();
        let obstacles: HashSet<_> = inner
            .iter()
            .flat_map(|c| grid.neighbors(c))
            .filter(|c| *c != start && !inner.contains(c))
            .collect();

        assert_eq!(shortest_escape_route(start, &obstacles, &grid), None);
    }

    #[test]
    fn test_tie_break_follows_direction_order() {
        let grid = GridTopology::new(5, 5);
        let start = h(2, 2);

        // Every direction is two steps from the edge; East is discovered first
        let route = shortest_escape_route(start, &HashSet::new(), &grid).unwrap();
        assert_eq!(route, vec![h(2, 2), h(3, 2), h(4, 2)]);

        // Blocking East hands the tie to NorthEast and its first boundary cell
        let obstacles = HashSet::from([h(3, 2)]);
        let route = shortest_escape_route(start, &obstacles, &grid).unwrap();
        assert_eq!(route, vec![h(2, 2), h(2, 1), h(3, 0)]);
    }

    #[test]
    fn test_route_goes_around_wall() {
        let grid = GridTopology::new(7, 7);
        let start = h(3, 3);
        // Wall off everything except the south-west opening
        let mut obstacles: HashSet<_> = grid.neighbors(&start).into_iter().collect();
        obstacles.remove(&h(3, 4));

        let route = shortest_escape_route(start, &obstacles, &grid).unwrap();
        assert_eq!(route[1], h(3, 4));
        assert_valid_route(&route, &obstacles, &grid);
    }

    proptest! {
        #[test]
        fn prop_bfs_matches_brute_force(
            width in 3u32..7,
            height in 3u32..7,
            mask in proptest::collection::vec(any::<bool>(), 36),
        ) {
            let grid = GridTopology::new(width, height);
            let start = grid.center();
            let obstacles: HashSet<_> = grid
                .cells()
                .zip(mask.iter())
                .filter(|(c, blocked)| **blocked && *c != start)
                .map(|(c, _)| c)
                .collect();

            let route = shortest_escape_route(start, &obstacles, &grid);
            let expected = brute_force_distance(start, &obstacles, &grid);
            prop_assert_eq!(route.as_ref().map(|r| r.len() - 1), expected);
            if let Some(route) = route {
                assert_valid_route(&route, &obstacles, &grid);
            }
        }
    }
}
