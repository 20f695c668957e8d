// Copyright (c) 2022 Bastiaan Marinus van de Weerd


#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum GridError {
	#[error("input has no rows")]
	Empty,
	#[error("line {line} has {len} cells where {width} were expected")]
	Ragged { line: usize, width: usize, len: usize },
}

/// A rectangular grid of cells, stored row by row; positions are indices into the rows.
#[derive(Clone)]
pub(crate) struct Grid<T> {
	cells: Vec<T>,
	width: usize,
}

impl<T> Grid<T> {
	pub(crate) fn width(&self) -> usize {
		self.width
	}

	pub(crate) fn height(&self) -> usize {
		self.cells.len() / self.width
	}

	pub(crate) fn xy(&self, pos: usize) -> [usize; 2] {
		[pos % self.width, pos / self.width]
	}

	pub(crate) fn pos(&self, [x, y]: [usize; 2]) -> usize {
		y * self.width + x
	}

	/// The position `[dx, dy]` away from `from`, if it lies inside the grid.
	pub(crate) fn offset(&self, from: usize, [dx, dy]: [isize; 2]) -> Option<usize> {
		let [x, y] = self.xy(from);
		let x = x.checked_add_signed(dx).filter(|&x| x < self.width)?;
		let y = y.checked_add_signed(dy).filter(|&y| y < self.height())?;
		Some(self.pos([x, y]))
	}

	// Up, left, right, down; never wraps around rows.
	pub(crate) fn adjacent_positions(&self, from: usize) -> impl Iterator<Item = usize> {
		let (w, h) = (self.width as isize, self.height() as isize);
		let [x, y] = self.xy(from);
		[[0, -1], [-1, 0], [1, 0], [0, 1]].into_iter()
			.filter_map(move |[dx, dy]| match [x as isize + dx, y as isize + dy] {
				[neg, _] | [_, neg] if neg < 0 => None,
				[exc, _] if exc >= w => None,
				[_, exc] if exc >= h => None,
				[x, y] => Some((y * w + x) as usize)
			})
	}

	pub(crate) fn positions(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
		self.cells.iter().enumerate()
	}

	pub(crate) fn map<U>(&self, mut f: impl FnMut(usize, &T) -> U) -> Grid<U> {
		Grid { cells: self.cells.iter().enumerate().map(|(pos, cell)| f(pos, cell)).collect(), width: self.width }
	}

	#[cfg(any(test, feature = "logging"))]
	pub(crate) fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
		self.cells.chunks(self.width)
	}
}

impl<T: Clone> Grid<T> {
	/// Parses one row per line, classifying each character with `cell`.
	///
	/// Without `pad`, every row must be as wide as the first; with it, short rows are
	/// padded up to the widest.
	pub(crate) fn parse<E: From<GridError>>(
		s: &str,
		pad: Option<T>,
		mut cell: impl FnMut([usize; 2], char) -> Result<T, E>,
	) -> Result<Self, E> {
		let lines = s.lines().collect::<Vec<_>>();
		let width = match pad {
			Some(_) => lines.iter().map(|line| line.chars().count()).max(),
			None => lines.first().map(|line| line.chars().count()),
		};
		let width = width.filter(|&w| w > 0).ok_or(GridError::Empty)?;

		let mut cells = Vec::with_capacity(width * lines.len());
		for (l, line) in lines.iter().enumerate() {
			let len = line.chars().count();
			if len != width && pad.is_none() {
				return Err(GridError::Ragged { line: l + 1, width, len }.into())
			}
			for (c, chr) in line.chars().enumerate() {
				cells.push(cell([c, l], chr)?);
			}
			if let Some(pad) = &pad {
				cells.extend(std::iter::repeat(pad.clone()).take(width - len));
			}
		}

		Ok(Grid { cells, width })
	}
}

impl<T> std::ops::Index<usize> for Grid<T> {
	type Output = T;
	fn index(&self, pos: usize) -> &T {
		&self.cells[pos]
	}
}

impl<T> std::ops::IndexMut<usize> for Grid<T> {
	fn index_mut(&mut self, pos: usize) -> &mut T {
		&mut self.cells[pos]
	}
}
