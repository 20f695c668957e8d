// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use std::collections::HashMap;
use crate::{grid::{Grid, GridError}, search::{Outcome, Search}};


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Label([u8; 2]);

impl Label {
	const ENTRANCE: Label = Label(*b"AA");
	const EXIT: Label = Label(*b"ZZ");

	fn is_terminal(self) -> bool {
		self == Label::ENTRANCE || self == Label::EXIT
	}
}

impl std::fmt::Display for Label {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
	}
}

impl std::fmt::Debug for Label {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(self, f)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Space {
	Void,
	Wall,
	Open,
	Portal(Label),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum LabelError {
	#[error("letter has no partner to its right or below")]
	Incomplete,
	#[error("label does not touch exactly one open space")]
	Misplaced,
	#[error("label already used at line {prev_line}, column {prev_column}")]
	Duplicate { prev_line: usize, prev_column: usize },
	#[error("portal has a single endpoint")]
	Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum MazeError {
	#[error(transparent)]
	Grid(#[from] GridError),
	#[error("unexpected {found:?} at line {line}, column {column}")]
	Space { line: usize, column: usize, found: char },
	#[error("invalid portal at line {line}, column {column}")]
	Label { line: usize, column: usize, source: LabelError },
	#[error("missing portal {0}")]
	MissingPortal(&'static str),
}

pub(crate) struct Maze {
	grid: Grid<Space>,
	portals: HashMap<Label, [usize; 2]>,
	// Top-left and bottom-right corners (inclusive) of the walls and open spaces.
	extents: [[usize; 2]; 2],
	start: usize,
	finish: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Recursion {
	Flat,
	/// Portals on the outer edge lead a level up, inner ones a level down. Levels deeper than
	/// `max_level` are never explored, which is a heuristic cut-off rather than a proven one.
	Levels { max_level: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Pos {
	pub(crate) grid: usize,
	pub(crate) level: usize,
}

impl Maze {
	fn is_outer(&self, pos: usize) -> bool {
		let [x, y] = self.grid.xy(pos);
		let [[left, top], [right, bottom]] = self.extents;
		x == left || x == right || y == top || y == bottom
	}

	// Where stepping through the portal at `from` leads, if anywhere.
	fn warp(&self, from: Pos, recurse: bool) -> Option<Pos> {
		let Space::Portal(label) = self.grid[from.grid] else { return None };
		let &[pos0, pos1] = self.portals.get(&label)?;
		let level = if !recurse { from.level }
			else if self.is_outer(from.grid) { from.level.checked_sub(1)? }
			else { from.level + 1 };
		Some(Pos { grid: if pos0 == from.grid { pos1 } else { pos0 }, level })
	}

	fn can_enter(&self, to: Pos, recurse: bool) -> bool {
		match self.grid[to.grid] {
			Space::Open => true,
			Space::Portal(_) if !recurse => true,
			// `AA` & `ZZ` are walls below the outermost level, other outer portals on it
			Space::Portal(label) if to.level > 0 => !label.is_terminal(),
			Space::Portal(label) => label.is_terminal() || !self.is_outer(to.grid),
			Space::Void | Space::Wall => false,
		}
	}

	pub(crate) fn moves_from(&self, from: Pos, recurse: bool) -> impl Iterator<Item = Pos> + '_ {
		self.warp(from, recurse).into_iter()
			.chain(self.grid.adjacent_positions(from.grid)
				.map(move |grid| Pos { grid, ..from })
				.filter(move |&to| self.can_enter(to, recurse)))
	}

	pub(crate) fn path_steps(&self, recursion: Recursion) -> Outcome<Pos> {
		let (mut search, recurse) = match recursion {
			Recursion::Flat => (Search::new(), false),
			Recursion::Levels { max_level } =>
				(Search::new().bounded(move |pos: &Pos| pos.level <= max_level), true),
		};
		let finish = self.finish;
		search.breadth_first(Pos { grid: self.start, level: 0 },
			|pos| pos.grid == finish && pos.level == 0,
			|&pos| self.moves_from(pos, recurse))
	}
}


#[cfg(feature = "logging")]
impl std::fmt::Display for Maze {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use std::fmt::Write;
		for (y, row) in self.grid.rows().enumerate() {
			if y > 0 { f.write_char('\n')? }
			for (x, space) in row.iter().enumerate() {
				f.write_char(match space {
					Space::Void => ' ',
					Space::Wall => '#',
					Space::Open => '.',
					Space::Portal(_) if self.is_outer(self.grid.pos([x, y])) => 'O',
					Space::Portal(_) => 'I',
				})?
			}
		}
		Ok(())
	}
}


mod parsing {
	use std::{collections::{BTreeMap, HashMap, HashSet}, str::FromStr};
	use crate::grid::{Grid, GridError};
	use super::{Label, LabelError, Maze, MazeError, Space};

	impl FromStr for Maze {
		type Err = MazeError;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			let chars = Grid::parse(s, Some(' '), |[c, l], chr| match chr {
				' ' | '#' | '.' | 'A'..='Z' => Ok(chr),
				found => Err(MazeError::Space { line: l + 1, column: c + 1, found }),
			})?;

			let label_error = |pos, source| {
				let [c, l] = chars.xy(pos);
				MazeError::Label { line: l + 1, column: c + 1, source }
			};

			// Pair up letters, reading left-to-right or top-to-bottom
			let mut paired = HashSet::new();
			let mut endpoints = BTreeMap::<_, Vec<_>>::new();
			for (pos, &chr) in chars.positions() {
				if !chr.is_ascii_uppercase() || paired.contains(&pos) { continue }

				let Some((second, [dx, dy])) = [[1, 0], [0, 1]].into_iter().find_map(|d| chars.offset(pos, d)
					.filter(|&p| chars[p].is_ascii_uppercase() && !paired.contains(&p))
					.map(|p| (p, d))) else {
					return Err(label_error(pos, LabelError::Incomplete))
				};

				let open = [chars.offset(pos, [-dx, -dy]), chars.offset(second, [dx, dy])].into_iter()
					.flatten()
					.filter(|&p| chars[p] == '.')
					.collect::<Vec<_>>();
				let &[open] = open.as_slice() else {
					return Err(label_error(pos, LabelError::Misplaced))
				};

				paired.insert(second);
				endpoints.entry(Label([chr as u8, chars[second] as u8])).or_default().push(open);
			}

			let maze_positions = chars.positions()
				.filter(|(_, &chr)| chr == '#' || chr == '.')
				.map(|(pos, _)| chars.xy(pos));
			let extents = maze_positions.fold(None::<[[usize; 2]; 2]>, |extents, [x, y]| Some(match extents {
				None => [[x, y], [x, y]],
				Some([[l, t], [r, b]]) => [[l.min(x), t.min(y)], [r.max(x), b.max(y)]],
			})).ok_or(GridError::Empty)?;

			let mut grid = chars.map(|_, &chr| match chr {
				'#' => Space::Wall,
				'.' => Space::Open,
				_ => Space::Void,
			});

			let mut terminals = HashMap::new();
			let mut portals = HashMap::new();
			for (label, ends) in endpoints {
				let expected = if label.is_terminal() { 1 } else { 2 };
				match ends[..] {
					[_] if expected == 2 => return Err(label_error(ends[0], LabelError::Unmatched)),
					_ if ends.len() > expected => {
						let [prev_column, prev_line] = chars.xy(ends[0]).map(|n| n + 1);
						return Err(label_error(ends[expected], LabelError::Duplicate { prev_line, prev_column }))
					}
					_ => (),
				}
				for &pos in &ends {
					// Two labels touching the same space
					if matches!(grid[pos], Space::Portal(_)) {
						return Err(label_error(pos, LabelError::Misplaced))
					}
					grid[pos] = Space::Portal(label);
				}
				match ends[..] {
					[end] => _ = terminals.insert(label, end),
					[pos0, pos1] => _ = portals.insert(label, [pos0, pos1]),
					_ => unreachable!(),
				}
			}

			let start = *terminals.get(&Label::ENTRANCE).ok_or(MazeError::MissingPortal("AA"))?;
			let finish = *terminals.get(&Label::EXIT).ok_or(MazeError::MissingPortal("ZZ"))?;

			#[cfg(feature = "logging")]
			eprintln!("Portals: {portals:?}");

			Ok(Maze { grid, portals, extents, start, finish })
		}
	}
}
