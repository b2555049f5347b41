//! A* shortest-path search over an occupancy grid
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use thiserror::Error;

use crate::constants::NEIGHBOR_OFFSETS;
use crate::grid::{OccupancyGrid, Point};

/// Which endpoint of a search request an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Goal => write!(f, "goal"),
        }
    }
}

/// Errors raised by the grid search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("{which} point {point} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        which: Endpoint,
        point: Point,
        rows: usize,
        cols: usize,
    },
    #[error("{which} point {point} is on a blocked cell")]
    Blocked { which: Endpoint, point: Point },
    #[error("no path exists from {start} to {goal}")]
    Unreachable { start: Point, goal: Point },
}

/// Find the shortest 4-directional path from `start` to `goal`, inclusive
/// of both endpoints, ordered start-to-goal.
///
/// Moves cost 1 and the Manhattan heuristic never overestimates, so the
/// first time the goal leaves the frontier its recorded cost is optimal.
/// Priority ties in the frontier break on row-major point order, making
/// the returned path deterministic when several shortest paths exist.
///
/// # Errors
///
/// Returns `PathError::OutOfBounds` or `PathError::Blocked` when either
/// endpoint is invalid, and `PathError::Unreachable` when obstacles
/// disconnect the goal from the start.
pub fn shortest_path(
    grid: &OccupancyGrid,
    start: Point,
    goal: Point,
) -> Result<Vec<Point>, PathError> {
    validate_endpoint(grid, Endpoint::Start, start)?;
    validate_endpoint(grid, Endpoint::Goal, goal)?;

    let mut frontier: BinaryHeap<Reverse<(u32, Point)>> = BinaryHeap::new();
    let mut cost_so_far: HashMap<Point, u32> = HashMap::new();
    let mut came_from: HashMap<Point, Point> = HashMap::new();

    frontier.push(Reverse((0, start)));
    cost_so_far.insert(start, 0);

    while let Some(Reverse((_, current))) = frontier.pop() {
        if current == goal {
            // Stop exploring; reconstruction happens below.
            break;
        }
        let Some(&current_cost) = cost_so_far.get(&current) else {
            continue;
        };
        for next in passable_neighbors(grid, current) {
            let tentative = current_cost + 1;
            let improved = cost_so_far
                .get(&next)
                .is_none_or(|&known| tentative < known);
            if improved {
                cost_so_far.insert(next, tentative);
                came_from.insert(next, current);
                frontier.push(Reverse((tentative + next.manhattan(goal), next)));
            }
        }
    }

    reconstruct(&came_from, start, goal)
}

/// Check that a search endpoint is usable before the search touches it.
pub(crate) fn validate_endpoint(
    grid: &OccupancyGrid,
    which: Endpoint,
    point: Point,
) -> Result<(), PathError> {
    if !grid.in_bounds(point) {
        return Err(PathError::OutOfBounds {
            which,
            point,
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    if grid.is_blocked(point) {
        return Err(PathError::Blocked { which, point });
    }
    Ok(())
}

/// In-bounds, unblocked neighbors in fixed up/down/left/right order.
fn passable_neighbors(grid: &OccupancyGrid, point: Point) -> SmallVec<[Point; 4]> {
    let mut neighbors = SmallVec::new();
    for (d_row, d_col) in NEIGHBOR_OFFSETS {
        let next = Point::new(point.row + d_row, point.col + d_col);
        if !grid.is_blocked(next) {
            neighbors.push(next);
        }
    }
    neighbors
}

/// Walk predecessor links goal-to-start, then reverse. A goal with no
/// recorded predecessor was never reached.
fn reconstruct(
    came_from: &HashMap<Point, Point>,
    start: Point,
    goal: Point,
) -> Result<Vec<Point>, PathError> {
    if start == goal {
        return Ok(vec![start]);
    }
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        let Some(&previous) = came_from.get(&cursor) else {
            return Err(PathError::Unreachable { start, goal });
        };
        path.push(previous);
        cursor = previous;
    }
    path.reverse();
    Ok(path)
}
