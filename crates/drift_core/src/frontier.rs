use std::collections::{HashSet, VecDeque};

use crate::route::ROOT_ROUTE;

/// Breadth-first work queue of routes with a page budget.
///
/// A route is marked visited the moment it is handed out by [`Frontier::next_route`],
/// so a failure while processing it can never cause it to be handed out again.
/// The queue may hold duplicates; the visited check at dequeue time is the
/// only dedup gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier {
    queue: VecDeque<String>,
    visited: HashSet<String>,
    processed: usize,
    max_pages: usize,
}

impl Frontier {
    /// Frontier seeded with the root route.
    pub fn new(max_pages: usize) -> Self {
        Self::with_seed(ROOT_ROUTE, max_pages)
    }

    pub fn with_seed(seed: impl Into<String>, max_pages: usize) -> Self {
        Self {
            queue: VecDeque::from([seed.into()]),
            visited: HashSet::new(),
            processed: 0,
            max_pages,
        }
    }

    /// Dequeue the next unvisited route, marking it visited and counting it
    /// against the budget. `None` once the queue drains or the budget is spent.
    pub fn next_route(&mut self) -> Option<String> {
        while self.processed < self.max_pages {
            let route = self.queue.pop_front()?;
            if !self.visited.insert(route.clone()) {
                continue;
            }
            self.processed += 1;
            return Some(route);
        }
        None
    }

    /// Append discovered routes that have not been visited yet, in iteration order.
    pub fn enqueue_discovered<I>(&mut self, routes: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.queue.len();
        for route in routes {
            if !self.visited.contains(&route) {
                self.queue.push_back(route);
            }
        }
        self.queue.len() - before
    }

    pub fn is_visited(&self, route: &str) -> bool {
        self.visited.contains(route)
    }

    /// Number of routes handed out so far.
    pub fn pages_processed(&self) -> usize {
        self.processed
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn budget_exhausted(&self) -> bool {
        self.processed >= self.max_pages
    }
}
