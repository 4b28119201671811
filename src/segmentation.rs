//! Segmentation (§4.H): partitions `TO_PROCESS` frontier cells into
//! maximal components linked by shared active constraints.
//!
//! Grounded on the teacher's `gaussian::get_connected_components` /
//! `solver::group_frontier_regions` BFS-over-shared-clues pattern,
//! generalized from a flat `frontier_map: Vec<u8>` to a `HashSet`-based
//! visited set since the grid is sparse.

use std::collections::{HashSet, VecDeque};

use crate::cell::Coord;
use crate::frontier::FrontierView;

/// A maximal subset of frontier cells linked by shared active constraints,
/// plus the active cells that constrain it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    pub frontier_cells: Vec<Coord>,
    pub active_cells: HashSet<Coord>,
}

/// Build the graph over `view.frontier_cells()` with an edge between `c1`
/// and `c2` whenever some active cell lists both in its unknown neighbors,
/// and return its connected components.
pub fn segment(view: &FrontierView) -> Vec<Component> {
    let frontier_cells: HashSet<Coord> = view.frontier_cells().iter().copied().collect();
    let mut visited: HashSet<Coord> = HashSet::new();
    let mut components = Vec::new();

    let mut ordered: Vec<Coord> = view.frontier_cells().to_vec();
    ordered.sort();

    for &start in &ordered {
        if visited.contains(&start) {
            continue;
        }

        let mut members = Vec::new();
        let mut actives: HashSet<Coord> = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited.insert(start);

        while let Some(coord) = queue.pop_front() {
            members.push(coord);

            for active in view.constraints_for(coord) {
                actives.insert(active);
                for linked in view.unknown_neighbors(active) {
                    if frontier_cells.contains(&linked) && visited.insert(linked) {
                        queue.push_back(linked);
                    }
                }
            }
        }

        components.push(Component { frontier_cells: members, active_cells: actives });
    }

    components
}
