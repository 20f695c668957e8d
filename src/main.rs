// Copyright (c) 2022 Bastiaan Marinus van de Weerd

mod grid;
mod maze;
mod search;
mod vault;

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools as _;
use maze::{Maze, MazeError, Recursion};
use search::Outcome;
use vault::{Vault, VaultError};


#[derive(Parser)]
#[command(about = "Fewest steps through key vaults and portal mazes")]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Collects every key of a single-entrance vault, one step at a time.
	Keys {
		input_path: PathBuf,
	},
	/// Collects every key moving from key to key, with one agent per entrance.
	PlanKeys {
		input_path: PathBuf,
	},
	/// Splits the entrance in four and collects every key with four robots.
	Robots {
		/// Walk the robots one step at a time instead of from key to key.
		#[arg(long)]
		walk: bool,
		input_path: PathBuf,
	},
	/// Walks from `AA` to `ZZ`, stepping through portals.
	Portals {
		input_path: PathBuf,
	},
	/// Walks from `AA` to `ZZ` through portals that lead into nested copies of the maze.
	RecursivePortals {
		/// Deepest level to explore before giving up.
		#[arg(long, default_value_t = 1000)]
		max_level: usize,
		input_path: PathBuf,
	},
}


const NO_START: &str = "No start found";

// Drops blank lines around the grid, keeping the leading spaces of its rows.
fn read_input(path: &Path) -> Result<String> {
	let text = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read input from given file({}).", path.display()))?;
	let lines = text.lines().collect_vec();
	let first = lines.iter().position(|line| !line.trim().is_empty()).unwrap_or(lines.len());
	let last = lines.iter().rposition(|line| !line.trim().is_empty()).map_or(first, |l| l + 1);
	Ok(lines[first..last].join("\n"))
}

fn load_vault(path: &Path) -> Result<Option<Vault>> {
	match read_input(path)?.parse::<Vault>() {
		Ok(vault) => {
			#[cfg(feature = "logging")]
			eprintln!("Vault:\n{vault}");

			Ok(Some(vault))
		}
		Err(VaultError::NoStart) => Ok(None),
		Err(err) => Err(err).with_context(|| format!("Failed to parse vault from given file({}).", path.display())),
	}
}

fn load_maze(path: &Path) -> Result<Option<Maze>> {
	match read_input(path)?.parse::<Maze>() {
		Ok(maze) => {
			#[cfg(feature = "logging")]
			eprintln!("Maze:\n{maze}");

			Ok(Some(maze))
		}
		Err(MazeError::MissingPortal("AA")) => Ok(None),
		Err(err) => Err(err).with_context(|| format!("Failed to parse maze from given file({}).", path.display())),
	}
}

fn answer<S>(outcome: Outcome<S>, max_level: Option<usize>) -> String {
	match (outcome, max_level) {
		(Outcome::Reached { cost, .. }, _) => cost.to_string(),
		(Outcome::Bounded, Some(max_level)) => format!("No solution found within level bound {max_level}"),
		(Outcome::Bounded | Outcome::Unreachable, _) => "No solution exists".to_owned(),
	}
}

fn plan_keys(vault: &Vault) -> Result<String> {
	Ok(match vault.starts().len() {
		1 => answer(vault.plan_keys::<1>()?, None),
		2 => answer(vault.plan_keys::<2>()?, None),
		3 => answer(vault.plan_keys::<3>()?, None),
		4 => answer(vault.plan_keys::<4>()?, None),
		found => anyhow::bail!("Vaults with {found} entrances are not supported."),
	})
}

fn robots(vault: Vault, walk: bool) -> Result<String> {
	let vault = match vault.starts().len() {
		4 => vault,
		_ => vault.split_entrance().context("Failed to split the vault’s entrance.")?,
	};

	#[cfg(feature = "logging")]
	eprintln!("Split vault:\n{vault}");

	Ok(if walk {
		answer(vault.collect_keys::<4>()?, None)
	} else {
		answer(vault.plan_keys::<4>()?, None)
	})
}


fn main() -> Result<()> {
	let answer = match Args::parse().command {
		Command::Keys { input_path } => match load_vault(&input_path)? {
			Some(vault) => answer(vault.collect_keys::<1>()?, None),
			None => NO_START.to_owned(),
		},
		Command::PlanKeys { input_path } => match load_vault(&input_path)? {
			Some(vault) => plan_keys(&vault)?,
			None => NO_START.to_owned(),
		},
		Command::Robots { walk, input_path } => match load_vault(&input_path)? {
			Some(vault) => robots(vault, walk)?,
			None => NO_START.to_owned(),
		},
		Command::Portals { input_path } => match load_maze(&input_path)? {
			Some(maze) => answer(maze.path_steps(Recursion::Flat), None),
			None => NO_START.to_owned(),
		},
		Command::RecursivePortals { max_level, input_path } => match load_maze(&input_path)? {
			Some(maze) => answer(maze.path_steps(Recursion::Levels { max_level }), Some(max_level)),
			None => NO_START.to_owned(),
		},
	};
	println!("{answer}");
	Ok(())
}
