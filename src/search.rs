// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use std::{collections::{BinaryHeap, HashMap, VecDeque, hash_map::Entry::*}, hash::Hash};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome<S> {
	Reached {
		cost: usize,
		#[allow(dead_code)]
		state: S,
	},
	Unreachable,
	/// No goal was found, but the bound kept part of the state space unexplored.
	Bounded,
}

impl<S> Outcome<S> {
	pub(crate) fn cost(&self) -> Option<usize> {
		match self {
			Outcome::Reached { cost, .. } => Some(*cost),
			Outcome::Unreachable | Outcome::Bounded => None,
		}
	}
}

/// A state as yielded by [`Search::flood`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Visit<S> {
	pub(crate) state: S,
	pub(crate) steps: usize,
	pub(crate) via: Option<S>,
}

/// The mutable context of one search: the states expanded so far (each with the state it was
/// reached from) and an optional bound on which states may be queued at all.
pub(crate) struct Search<S> {
	visited: HashMap<S, Option<S>>,
	bound: Option<Box<dyn Fn(&S) -> bool>>,
	pruned: usize,
}

impl<S: Clone + Eq + Hash> Search<S> {
	pub(crate) fn new() -> Self {
		Search { visited: HashMap::new(), bound: None, pruned: 0 }
	}

	/// Only queues states for which `within` holds. This guards against runaway state spaces;
	/// it does not make an unbounded search any more correct.
	pub(crate) fn bounded(self, within: impl Fn(&S) -> bool + 'static) -> Self {
		Search { bound: Some(Box::new(within)), ..self }
	}

	#[cfg(any(test, feature = "logging"))]
	pub(crate) fn expanded(&self) -> usize {
		self.visited.len()
	}

	#[cfg(test)]
	pub(crate) fn pruned(&self) -> usize {
		self.pruned
	}

	fn admits(&mut self, state: &S) -> bool {
		if self.visited.contains_key(state) { return false }
		match &self.bound {
			Some(within) if !within(state) => { self.pruned += 1; false }
			_ => true,
		}
	}

	fn visit(&mut self, state: &S, via: Option<S>) -> bool {
		match self.visited.entry(state.clone()) {
			Vacant(entry) => { entry.insert(via); true }
			Occupied(_) => false,
		}
	}

	fn exhausted(&self) -> Outcome<S> {
		#[cfg(feature = "logging")]
		eprintln!("Exhausted after {} states ({} pruned)", self.expanded(), self.pruned);

		if self.pruned > 0 { Outcome::Bounded } else { Outcome::Unreachable }
	}

	/// Unit-cost breadth-first search; the first goal dequeued is a nearest one.
	pub(crate) fn breadth_first<I>(&mut self,
		start: S,
		mut is_goal: impl FnMut(&S) -> bool,
		mut expand: impl FnMut(&S) -> I,
	) -> Outcome<S> where I: IntoIterator<Item = S> {
		let mut queue = VecDeque::new();
		queue.push_back((start, 0, None));

		while let Some((state, steps, via)) = queue.pop_front() {
			if !self.visit(&state, via) { continue }

			if is_goal(&state) {
				#[cfg(feature = "logging")]
				eprintln!("Reached goal at {steps} after {} states ({} pruned)", self.expanded(), self.pruned);
				return Outcome::Reached { cost: steps, state }
			}

			for next in expand(&state) {
				if self.admits(&next) {
					queue.push_back((next, steps + 1, Some(state.clone())));
				}
			}
		}

		self.exhausted()
	}

	/// Dijkstra over the weighted edges `expand` yields.
	pub(crate) fn best_first<I>(&mut self,
		start: S,
		mut is_goal: impl FnMut(&S) -> bool,
		mut expand: impl FnMut(&S) -> I,
	) -> Outcome<S> where I: IntoIterator<Item = (S, usize)> {
		let mut heap = BinaryHeap::new();
		let mut order = 0_usize;
		heap.push(Frontier { cost: 0, order, state: start, via: None });

		while let Some(Frontier { cost, state, via, .. }) = heap.pop() {
			if !self.visit(&state, via) { continue }

			if is_goal(&state) {
				#[cfg(feature = "logging")]
				eprintln!("Reached goal at {cost} after {} states ({} pruned)", self.expanded(), self.pruned);
				return Outcome::Reached { cost, state }
			}

			for (next, edge_cost) in expand(&state) {
				if self.admits(&next) {
					order += 1;
					heap.push(Frontier { cost: cost + edge_cost, order, state: next, via: Some(state.clone()) });
				}
			}
		}

		self.exhausted()
	}

	/// Breadth-first flood-fill that runs until the frontier is empty, yielding every state
	/// once, nearest first.
	pub(crate) fn flood<'s, F, I>(&'s mut self, start: S, mut expand: F) -> impl Iterator<Item = Visit<S>> + 's
	where
		F: FnMut(&S) -> I + 's,
		I: IntoIterator<Item = S>,
		S: 's,
	{
		let mut queue = VecDeque::new();
		queue.push_back((start, 0, None));
		std::iter::from_fn(move || {
			while let Some((state, steps, via)) = queue.pop_front() {
				if !self.visit(&state, via.clone()) { continue }
				for next in expand(&state) {
					if self.admits(&next) {
						queue.push_back((next, steps + 1, Some(state.clone())));
					}
				}
				return Some(Visit { state, steps, via })
			}
			None
		})
	}

	/// The visited states leading from the start up to and including `to`.
	#[cfg(any(test, feature = "logging"))]
	pub(crate) fn route(&self, to: &S) -> Vec<S> {
		let mut route = std::iter::successors(Some(to.clone()),
			|state| self.visited.get(state).cloned().flatten())
			.collect::<Vec<_>>();
		route.reverse();
		route
	}
}

/// Runs an unweighted search in a fresh context.
pub(crate) fn shortest_path<S, I>(
	start: S,
	is_goal: impl FnMut(&S) -> bool,
	expand: impl FnMut(&S) -> I,
) -> Outcome<S> where S: Clone + Eq + Hash, I: IntoIterator<Item = S> {
	Search::new().breadth_first(start, is_goal, expand)
}


struct Frontier<S> {
	cost: usize,
	order: usize,
	state: S,
	via: Option<S>,
}

impl<S> PartialEq for Frontier<S> {
	fn eq(&self, other: &Self) -> bool {
		self.cost == other.cost && self.order == other.order
	}
}

impl<S> Eq for Frontier<S> {}

impl<S> PartialOrd for Frontier<S> {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl<S> Ord for Frontier<S> {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.cost.cmp(&other.cost).reverse().then_with(|| self.order.cmp(&other.order).reverse())
	}
}
