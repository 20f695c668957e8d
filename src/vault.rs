// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use std::collections::{BTreeMap, HashMap};
use crate::{grid::{Grid, GridError}, search::{Outcome, Search, Visit}};


/// A key’s letter as an index into the alphabet; its door shares the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Key(u8);

impl Key {
	pub(crate) fn from_char(chr: char) -> Option<Self> {
		chr.is_ascii_alphabetic().then(|| Key(chr.to_ascii_lowercase() as u8 - b'a'))
	}

	pub(crate) fn as_char(self) -> char {
		(b'a' + self.0) as char
	}

	fn bit(self) -> u32 {
		1 << self.0
	}
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct KeySet(u32);

impl KeySet {
	pub(crate) const EMPTY: KeySet = KeySet(0);

	pub(crate) fn contains(self, key: Key) -> bool {
		self.0 & key.bit() != 0
	}

	#[must_use]
	pub(crate) fn with(self, key: Key) -> Self {
		KeySet(self.0 | key.bit())
	}

	#[must_use]
	pub(crate) fn without(self, key: Key) -> Self {
		KeySet(self.0 & !key.bit())
	}

	#[cfg(test)]
	pub(crate) fn len(self) -> usize {
		self.0.count_ones() as usize
	}

	pub(crate) fn is_empty(self) -> bool {
		self.0 == 0
	}

	pub(crate) fn is_subset(self, other: KeySet) -> bool {
		self.0 & !other.0 == 0
	}

	pub(crate) fn is_disjoint(self, other: KeySet) -> bool {
		self.0 & other.0 == 0
	}

	pub(crate) fn iter(self) -> impl Iterator<Item = Key> {
		(0..26).map(Key).filter(move |&key| self.contains(key))
	}
}

impl FromIterator<Key> for KeySet {
	fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
		iter.into_iter().fold(KeySet::EMPTY, KeySet::with)
	}
}

impl std::fmt::Debug for KeySet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(self, f)
	}
}

impl std::fmt::Display for KeySet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use itertools::Itertools as _;
		if self.is_empty() { return f.write_str("∅") }
		write!(f, "{{{}}}", self.iter().map(Key::as_char).join(""))
	}
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Space {
	Open,
	Wall,
	Key(Key),
	Door(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DuplicateKind {
	Door(char),
	Key(char),
}

impl std::fmt::Display for DuplicateKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DuplicateKind::Door(chr) => write!(f, "door `{chr}`"),
			DuplicateKind::Key(chr) => write!(f, "key `{chr}`"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum VaultError {
	#[error(transparent)]
	Grid(#[from] GridError),
	#[error("unexpected {found:?} at line {line}, column {column}")]
	Space { line: usize, column: usize, found: char },
	#[error("duplicate {kind} at line {line}, column {column} (first at line {prev_line}, column {prev_column})")]
	Duplicate { line: usize, column: usize, prev_line: usize, prev_column: usize, kind: DuplicateKind },
	#[error("no start (`@`) found")]
	NoStart,
	#[error("expected {expected} start(s), found {found}")]
	Starts { expected: usize, found: usize },
	#[error("entrance at line {line}, column {column} is not surrounded by open space")]
	Entrance { line: usize, column: usize },
}

pub(crate) struct Vault {
	grid: Grid<Space>,
	starts: Vec<usize>,
	keys: KeySet,
}

/// Every agent’s position, plus the keys collected between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Walk<const N: usize> {
	pub(crate) positions: [usize; N],
	pub(crate) keys: KeySet,
}

impl Vault {
	#[cfg(test)]
	pub(crate) fn grid(&self) -> &Grid<Space> {
		&self.grid
	}

	pub(crate) fn starts(&self) -> &[usize] {
		&self.starts
	}

	/// All keys lying in the vault.
	#[cfg(test)]
	pub(crate) fn keys(&self) -> KeySet {
		self.keys
	}

	fn start_positions<const N: usize>(&self) -> Result<[usize; N], VaultError> {
		<[usize; N]>::try_from(self.starts.as_slice())
			.map_err(|_| VaultError::Starts { expected: N, found: self.starts.len() })
	}

	// Doors without a key in the vault never open.
	fn can_enter(&self, pos: usize, keys: KeySet) -> bool {
		match self.grid[pos] {
			Space::Wall => false,
			Space::Door(door) => keys.contains(door),
			Space::Open | Space::Key(_) => true,
		}
	}

	pub(crate) fn start<const N: usize>(&self) -> Result<Walk<N>, VaultError> {
		Ok(Walk { positions: self.start_positions()?, keys: KeySet::EMPTY })
	}

	/// Moves any one agent a single step, picking up the key it steps onto.
	pub(crate) fn steps_from<const N: usize>(&self, walk: Walk<N>) -> impl Iterator<Item = Walk<N>> + '_ {
		(0..N).flat_map(move |agent| self.grid.adjacent_positions(walk.positions[agent])
			.filter(move |&pos| self.can_enter(pos, walk.keys))
			.map(move |pos| {
				let mut positions = walk.positions;
				positions[agent] = pos;
				let keys = match self.grid[pos] {
					Space::Key(key) => walk.keys.with(key),
					_ => walk.keys,
				};
				Walk { positions, keys }
			}))
	}

	/// Walks `N` agents cell by cell until they hold every key.
	pub(crate) fn collect_keys<const N: usize>(&self) -> Result<Outcome<Walk<N>>, VaultError> {
		let start = self.start()?;
		let all_keys = self.keys;
		let mut search = Search::new();
		let outcome = search.breadth_first(start,
			|walk: &Walk<N>| walk.keys == all_keys,
			|walk| self.steps_from(*walk));

		#[cfg(feature = "logging")]
		if let Outcome::Reached { state, .. } = &outcome {
			use itertools::Itertools as _;
			eprintln!("Route: {}", search.route(state).into_iter()
				.dedup_by(|a, b| a.keys == b.keys)
				.map(|walk| walk.keys)
				.join(" -> "));
		}

		Ok(outcome)
	}

	/// Walls off the single entrance and its orthogonal neighbors, and puts four entrances on
	/// its diagonal neighbors (top-left, top-right, bottom-left, bottom-right).
	pub(crate) fn split_entrance(mut self) -> Result<Vault, VaultError> {
		let [entrance] = self.start_positions::<1>()?;
		let [x, y] = self.grid.xy(entrance);
		let error = VaultError::Entrance { line: y + 1, column: x + 1 };
		if x == 0 || y == 0 || x + 1 >= self.grid.width() || y + 1 >= self.grid.height() {
			return Err(error)
		}

		let starts = [[x - 1, y - 1], [x + 1, y - 1], [x - 1, y + 1], [x + 1, y + 1]]
			.map(|xy| self.grid.pos(xy));
		let cross = [[x, y - 1], [x - 1, y], [x, y], [x + 1, y], [x, y + 1]]
			.map(|xy| self.grid.pos(xy));
		if starts.iter().any(|&pos| self.grid[pos] != Space::Open)
				|| cross.iter().any(|&pos| !matches!(self.grid[pos], Space::Open | Space::Wall)) {
			return Err(error)
		}

		for pos in cross { self.grid[pos] = Space::Wall }
		self.starts = starts.to_vec();
		Ok(self)
	}

	// Flood-fills from `origin` through every door that has a key, returning each other key
	// reached with every distance that no shorter walk past fewer doors beats.
	fn edges_from(&self, origin: usize) -> BTreeMap<Key, Vec<Edge>> {
		// Door sets queued so far per position, none a superset of another queued earlier
		let mut queued = HashMap::<usize, Vec<KeySet>>::from([(origin, vec![KeySet::EMPTY])]);
		let mut edges = BTreeMap::<Key, Vec<Edge>>::new();
		let mut search = Search::new();
		let reachable = search.flood((origin, KeySet::EMPTY), move |&(pos, doors): &(usize, KeySet)| {
			self.grid.adjacent_positions(pos)
				.filter(|&adj_pos| self.can_enter(adj_pos, self.keys))
				.map(|adj_pos| (adj_pos, match self.grid[adj_pos] {
					Space::Door(door) => doors.with(door),
					_ => doors,
				}))
				.filter(|&(adj_pos, passed)| {
					let seen = queued.entry(adj_pos).or_default();
					if seen.iter().any(|prev| prev.is_subset(passed)) { return false }
					seen.push(passed);
					true
				})
				.collect::<Vec<_>>()
		});
		for Visit { state: (pos, doors), steps, .. } in reachable {
			let Space::Key(key) = self.grid[pos] else { continue };
			if pos == origin { continue }
			// Nearest first, so only routes just as short can be beaten
			let found = edges.entry(key).or_default();
			found.retain(|edge| edge.steps < steps || !doors.is_subset(edge.doors));
			found.push(Edge { steps, doors });
		}
		edges
	}

	/// Moves `N` agents from key to key over precomputed distances until they hold every key.
	pub(crate) fn plan_keys<const N: usize>(&self) -> Result<Outcome<Plan<N>>, VaultError> {
		self.start_positions::<N>()?;
		let table = DistanceTable::new(self);

		#[cfg(feature = "logging")]
		eprintln!("Distances:\n{table}");

		let start = Plan { nodes: std::array::from_fn(Node::Start), remaining: self.keys };
		Ok(Search::new().best_first(start,
			|plan: &Plan<N>| plan.remaining.is_empty(),
			|plan| table.moves_from(*plan)))
	}
}


/// A point of interest: an agent’s start (by index) or a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Node {
	Start(usize),
	Key(Key),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Edge {
	pub(crate) steps: usize,
	pub(crate) doors: KeySet,
}

pub(crate) struct DistanceTable {
	edges: BTreeMap<Node, BTreeMap<Key, Vec<Edge>>>,
}

/// Every agent’s last point of interest, plus the keys nobody has collected yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Plan<const N: usize> {
	pub(crate) nodes: [Node; N],
	pub(crate) remaining: KeySet,
}

impl DistanceTable {
	pub(crate) fn new(vault: &Vault) -> Self {
		let starts = vault.starts.iter()
			.enumerate()
			.map(|(i, &pos)| (Node::Start(i), pos));
		let keys = vault.grid.positions()
			.filter_map(|(pos, space)| match space {
				Space::Key(key) => Some((Node::Key(*key), pos)),
				_ => None,
			});
		let edges = starts.chain(keys)
			.map(|(node, pos)| (node, vault.edges_from(pos)))
			.collect();
		DistanceTable { edges }
	}

	#[cfg(test)]
	pub(crate) fn edges(&self, from: Node, to: Key) -> &[Edge] {
		self.edges.get(&from).and_then(|edges| edges.get(&to)).map(Vec::as_slice).unwrap_or_default()
	}

	pub(crate) fn edges_from(&self, from: Node) -> impl Iterator<Item = (Key, Edge)> + '_ {
		self.edges.get(&from).into_iter().flatten()
			.flat_map(|(&key, edges)| edges.iter().map(move |&edge| (key, edge)))
	}

	/// Sends any one agent to a remaining key, over any route whose doors are all unlocked.
	pub(crate) fn moves_from<const N: usize>(&self, plan: Plan<N>) -> impl Iterator<Item = (Plan<N>, usize)> + '_ {
		(0..N).flat_map(move |agent| self.edges_from(plan.nodes[agent])
			.filter(move |(key, edge)| plan.remaining.contains(*key) && edge.doors.is_disjoint(plan.remaining))
			.map(move |(key, edge)| {
				let mut nodes = plan.nodes;
				nodes[agent] = Node::Key(key);
				(Plan { nodes, remaining: plan.remaining.without(key) }, edge.steps)
			}))
	}
}


#[cfg(feature = "logging")]
mod displaying {
	use std::fmt::{Display, Formatter, Result, Write};
	use super::*;

	fn node_as_char(node: Node) -> char {
		match node {
			Node::Start(_) => '@',
			Node::Key(key) => key.as_char(),
		}
	}

	impl Display for Vault {
		fn fmt(&self, f: &mut Formatter<'_>) -> Result {
			for (y, row) in self.grid.rows().enumerate() {
				if y > 0 { f.write_char('\n')? }
				for (x, space) in row.iter().enumerate() {
					f.write_char(if self.starts.contains(&self.grid.pos([x, y])) {
						'@'
					} else { match space {
						Space::Open => '.',
						Space::Wall => '#',
						Space::Key(key) => key.as_char(),
						Space::Door(door) => door.as_char().to_ascii_uppercase(),
					} })?
				}
			}
			Ok(())
		}
	}

	impl Display for DistanceTable {
		fn fmt(&self, f: &mut Formatter<'_>) -> Result {
			use itertools::Itertools as _;
			for (i, (&from, edges)) in self.edges.iter().enumerate() {
				if i > 0 { f.write_char('\n')? }
				write!(f, "{} -> {}", node_as_char(from), edges.iter()
					.flat_map(|(key, edges)| edges.iter()
						.map(move |edge| format!("{}: {} {}", key.as_char(), edge.steps, edge.doors)))
					.join(", "))?;
			}
			Ok(())
		}
	}
}


mod parsing {
	use std::{collections::HashMap, str::FromStr};
	use crate::grid::Grid;
	use super::{DuplicateKind, Key, KeySet, Space, Vault, VaultError};

	impl FromStr for Vault {
		type Err = VaultError;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			let mut keys = HashMap::new();
			let mut doors = HashMap::new();
			let mut starts = Vec::new();

			let grid = Grid::parse(s, None, |[c, l], chr| {
				let duplicate = |prev: [usize; 2], kind| VaultError::Duplicate {
					line: l + 1, column: c + 1, prev_line: prev[1] + 1, prev_column: prev[0] + 1, kind };
				Ok(match chr {
					'.' => Space::Open,
					'#' => Space::Wall,
					'@' => { starts.push([c, l]); Space::Open }
					'a'..='z' | 'A'..='Z' => {
						let (seen, kind) = if chr.is_ascii_lowercase() {
							(&mut keys, DuplicateKind::Key(chr))
						} else {
							(&mut doors, DuplicateKind::Door(chr))
						};
						if let Some(prev) = seen.insert(chr, [c, l]) {
							return Err(duplicate(prev, kind))
						}
						let key = Key(chr.to_ascii_lowercase() as u8 - b'a');
						if chr.is_ascii_lowercase() { Space::Key(key) } else { Space::Door(key) }
					}
					found => return Err(VaultError::Space { line: l + 1, column: c + 1, found }),
				})
			})?;

			if starts.is_empty() { return Err(VaultError::NoStart) }
			let starts = starts.into_iter().map(|xy| grid.pos(xy)).collect();

			let keys = keys.keys()
				.filter_map(|&chr| Key::from_char(chr))
				.collect::<KeySet>();

			#[cfg(feature = "logging")]
			for door in doors.keys().filter_map(|&chr| Key::from_char(chr)).filter(|&door| !keys.contains(door)) {
				eprintln!("Door {} has no key", door.as_char().to_ascii_uppercase());
			}

			Ok(Vault { grid, starts, keys })
		}
	}
}


#[cfg(test)]
mod tests {
	use std::collections::{HashMap, VecDeque};
	use crate::grid::GridError;
	use super::*;

	fn vault(s: &str) -> Vault {
		s.parse().unwrap()
	}

	const INPUTS: [&str; 5] = [
		indoc::indoc! { "
			#########
			#b.A.@.a#
			#########
		" },
		indoc::indoc! { "
			########################
			#f.D.E.e.C.b.A.@.a.B.c.#
			######################.#
			#d.....................#
			########################
		" },
		indoc::indoc! { "
			########################
			#...............b.C.D.f#
			#.######################
			#.....@.a.B.c.d.A.e.F.g#
			########################
		" },
		indoc::indoc! { "
			#################
			#i.G..c...e..H.p#
			########.########
			#j.A..b...f..D.o#
			########@########
			#k.E..a...g..B.n#
			########.########
			#l.F..d...h..C.m#
			#################
		" },
		indoc::indoc! { "
			########################
			#@..............ac.GI.b#
			###d#e#f################
			###A#B#C################
			###g#h#i################
			########################
		" },
	];

	const SPLIT_INPUTS: [&str; 3] = [
		indoc::indoc! { "
			#######
			#a.#Cd#
			##...##
			##.@.##
			##...##
			#cB#Ab#
			#######
		" },
		indoc::indoc! { "
			###############
			#d.ABC.#.....a#
			######...######
			######.@.######
			######...######
			#b.....#.....c#
			###############
		" },
		indoc::indoc! { "
			#############
			#DcBa.#.GhKl#
			#.###...#I###
			#e#d#.@.#j#k#
			###C#...###J#
			#fEbA.#.FgHi#
			#############
		" },
	];

	#[test]
	fn key_set() {
		let keys = "dab".chars().filter_map(Key::from_char).collect::<KeySet>();
		assert_eq!(keys.len(), 3);
		assert!(keys.contains(Key::from_char('D').unwrap()));
		assert_eq!(keys.to_string(), "{abd}");
		assert_eq!(keys.without(Key::from_char('a').unwrap()).to_string(), "{bd}");
		assert_eq!(KeySet::EMPTY.to_string(), "∅");
		assert!(KeySet::EMPTY.is_subset(keys));
		assert!(!keys.is_disjoint(KeySet::EMPTY.with(Key::from_char('b').unwrap())));
	}

	#[test]
	fn collect_keys() {
		assert_eq!(vault("@.a.A.b").collect_keys::<1>().unwrap().cost(), Some(6));
		assert_eq!(vault(INPUTS[0]).collect_keys::<1>().unwrap().cost(), Some(8));
		assert_eq!(vault(INPUTS[1]).collect_keys::<1>().unwrap().cost(), Some(86));
		assert_eq!(vault(INPUTS[2]).collect_keys::<1>().unwrap().cost(), Some(132));
		assert_eq!(vault(INPUTS[4]).collect_keys::<1>().unwrap().cost(), Some(81));
	}

	#[test]
	fn plan_keys() {
		assert_eq!(vault("@.a.A.b").plan_keys::<1>().unwrap().cost(), Some(6));
		const EXPECTED: [usize; 5] = [8, 86, 132, 136, 81];
		for (input, expected) in INPUTS.into_iter().zip(EXPECTED) {
			assert_eq!(vault(input).plan_keys::<1>().unwrap().cost(), Some(expected));
		}
	}

	#[test]
	fn distance_table() {
		let vault = vault(INPUTS[0]);
		let table = DistanceTable::new(&vault);
		let [a, b] = ['a', 'b'].map(|chr| Key::from_char(chr).unwrap());
		assert_eq!(table.edges(Node::Start(0), a), [Edge { steps: 2, doors: KeySet::EMPTY }]);
		assert_eq!(table.edges(Node::Start(0), b), [Edge { steps: 4, doors: KeySet::EMPTY.with(a) }]);
		assert_eq!(table.edges(Node::Key(a), b), [Edge { steps: 6, doors: KeySet::EMPTY.with(a) }]);
		assert_eq!(table.edges_from(Node::Key(b)).map(|(key, _)| key).collect::<Vec<_>>(), [a]);

		// The long way round `A` passes over `a`, but needs no key
		let vault = self::vault(indoc::indoc! { "
			#######
			#@.A.b#
			#.###.#
			#..a..#
			#######
		" });
		let table = DistanceTable::new(&vault);
		assert_eq!(table.edges(Node::Start(0), b), [
			Edge { steps: 4, doors: KeySet::EMPTY.with(a) },
			Edge { steps: 8, doors: KeySet::EMPTY },
		]);
		assert_eq!(vault.plan_keys::<1>().unwrap().cost(), Some(8));
		assert_eq!(vault.collect_keys::<1>().unwrap().cost(), Some(8));
	}

	#[test]
	fn equally_short_routes() {
		// `b` is four steps away both through `A` and below it
		let vault = vault(indoc::indoc! { "
			#########
			#.A.#####
			#@#b#####
			#......a#
			#########
		" });
		let table = DistanceTable::new(&vault);
		let b = Key::from_char('b').unwrap();
		assert_eq!(table.edges(Node::Start(0), b), [Edge { steps: 4, doors: KeySet::EMPTY }]);
		assert_eq!(vault.collect_keys::<1>().unwrap().cost(), Some(9));
		assert_eq!(vault.plan_keys::<1>().unwrap().cost(), Some(9));
	}

	#[test]
	fn split_entrance() {
		const EXPECTED: [usize; 3] = [8, 24, 32];
		for (input, expected) in SPLIT_INPUTS.into_iter().zip(EXPECTED) {
			let vault = vault(input).split_entrance().unwrap();
			assert_eq!(vault.starts().len(), 4);
			assert_eq!(vault.plan_keys::<4>().unwrap().cost(), Some(expected));
		}
		for (input, expected) in SPLIT_INPUTS.into_iter().zip(EXPECTED).take(2) {
			let vault = vault(input).split_entrance().unwrap();
			assert_eq!(vault.collect_keys::<4>().unwrap().cost(), Some(expected));
		}

		assert!(matches!(vault(INPUTS[0]).split_entrance(), Err(VaultError::Entrance { line: 2, column: 6 })));
		assert!(matches!(vault("@.@").split_entrance(), Err(VaultError::Starts { expected: 1, found: 2 })));
	}

	#[test]
	fn quadrants() {
		let split = vault(indoc::indoc! { "
			#########
			#a.e#..b#
			#.#.#.#.#
			#...#...#
			####@####
			#...#...#
			#.#.#.#.#
			#c..#f.d#
			#########
		" }).split_entrance().unwrap();
		let quadrants = [
			indoc::indoc! { "
				#####
				#a.e#
				#.#.#
				#..@#
				#####
			" },
			indoc::indoc! { "
				#####
				#..b#
				#.#.#
				#@..#
				#####
			" },
			indoc::indoc! { "
				#####
				#..@#
				#.#.#
				#c..#
				#####
			" },
			indoc::indoc! { "
				#####
				#@..#
				#.#.#
				#f.d#
				#####
			" },
		];

		let sum = quadrants.into_iter()
			.map(|s| vault(s).collect_keys::<1>().unwrap().cost().unwrap())
			.sum::<usize>();
		assert_eq!(sum, 4 + 4 + 4 + 4);
		assert_eq!(split.collect_keys::<4>().unwrap().cost(), Some(sum));
		assert_eq!(split.plan_keys::<4>().unwrap().cost(), Some(sum));
	}

	#[test]
	fn unreachable() {
		let enclosed = vault(indoc::indoc! { "
			#######
			#@..#a#
			#######
		" });
		assert_eq!(enclosed.collect_keys::<1>().unwrap(), Outcome::Unreachable);
		assert_eq!(enclosed.plan_keys::<1>().unwrap(), Outcome::Unreachable);

		// The only key sits behind its own door
		let locked = vault("@.A.a");
		assert_eq!(locked.collect_keys::<1>().unwrap(), Outcome::Unreachable);
		assert_eq!(locked.plan_keys::<1>().unwrap(), Outcome::Unreachable);

		// A door without key never opens
		assert_eq!(vault("@.a.C.b").collect_keys::<1>().unwrap(), Outcome::Unreachable);
		assert_eq!(vault("@.a.C.b").plan_keys::<1>().unwrap(), Outcome::Unreachable);
	}

	#[test]
	fn keys_never_shrink() {
		let vault = vault(INPUTS[1]);
		let mut search = Search::new();
		let outcome = search.breadth_first(vault.start::<1>().unwrap(),
			|walk| walk.keys == vault.keys(),
			|walk| vault.steps_from(*walk));
		let Outcome::Reached { cost, state } = outcome else { panic!("{outcome:?}") };

		let route = search.route(&state);
		assert_eq!(route.len(), cost + 1);
		for pair in route.windows(2) {
			assert!(pair[0].keys.is_subset(pair[1].keys));
			assert!(vault.grid().adjacent_positions(pair[0].positions[0]).any(|pos| pos == pair[1].positions[0]));
		}
		assert_eq!(route.last().map(|walk| walk.keys), Some(vault.keys()));
	}

	#[test]
	fn idempotent() {
		let vault = vault(INPUTS[2]);
		assert_eq!(vault.collect_keys::<1>().unwrap(), vault.collect_keys::<1>().unwrap());
		assert_eq!(vault.plan_keys::<1>().unwrap(), vault.plan_keys::<1>().unwrap());
	}

	#[test]
	fn without_keys() {
		const INPUT: &str = indoc::indoc! { "
			#########
			#@....#.#
			#.##.##.#
			#....#..#
			###.....#
			#########
		" };
		let vault = vault(INPUT);
		assert_eq!(vault.collect_keys::<1>().unwrap().cost(), Some(0));

		// Reference flood-fill over the raw characters
		let rows = INPUT.lines().map(str::as_bytes).collect::<Vec<_>>();
		let width = rows[0].len();
		let [start] = vault.starts() else { panic!() };
		let mut distances = HashMap::new();
		let mut queue = VecDeque::from([(*start, 0)]);
		while let Some((pos, steps)) = queue.pop_front() {
			if rows[pos / width][pos % width] == b'#' || distances.contains_key(&pos) { continue }
			distances.insert(pos, steps);
			queue.extend([pos - width, pos - 1, pos + 1, pos + width].map(|p| (p, steps + 1)));
		}

		assert_eq!(distances.len(), 20);
		for (&goal, &expected) in &distances {
			let outcome = crate::search::shortest_path(vault.start::<1>().unwrap(),
				|walk| walk.positions[0] == goal,
				|walk| vault.steps_from(*walk));
			assert_eq!(outcome.cost(), Some(expected));
		}
	}

	#[test]
	fn errors() {
		assert!(matches!("#@.#\n#..".parse::<Vault>(), Err(VaultError::Grid(GridError::Ragged { line: 2, width: 4, len: 3 }))));
		assert!(matches!("#@.?#".parse::<Vault>(), Err(VaultError::Space { line: 1, column: 4, found: '?' })));
		assert!(matches!("#a@.a#".parse::<Vault>(), Err(VaultError::Duplicate {
			line: 1, column: 5, prev_line: 1, prev_column: 2, kind: DuplicateKind::Key('a') })));
		assert!(matches!("#..a#".parse::<Vault>(), Err(VaultError::NoStart)));
		assert!(matches!(vault("@.@").collect_keys::<1>(), Err(VaultError::Starts { expected: 1, found: 2 })));
		assert!(matches!(vault("@.a").plan_keys::<4>(), Err(VaultError::Starts { expected: 4, found: 1 })));
	}
}
