//! Command implementations

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{parse_script, TreemapSession};
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands, SourceArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{leaf_group_at, path, select_and_delete, Point, WeightedTree};
use crate::infrastructure::di::{ServiceContainer, TreeSource};
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;
use crate::util::path::expand_path;

/// Execute the parsed CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            cmd_completion(*shell);
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        Commands::Layout => {
            let (container, tree) = load(cli)?;
            cmd_layout(&container.session(tree))
        }
        Commands::Tree => {
            let (_, tree) = load(cli)?;
            output::info(&tree.to_tree_string());
            Ok(())
        }
        Commands::Inspect { at } => {
            let (container, tree) = load(cli)?;
            cmd_inspect(&container, &tree, *at)
        }
        Commands::Delete { at } => {
            let (container, tree) = load(cli)?;
            cmd_delete(&container, tree, *at)
        }
        Commands::Resize {
            at, grow, steps, ..
        } => {
            let (container, tree) = load(cli)?;
            cmd_resize(container.session(tree), *at, *grow, *steps)
        }
        Commands::Replay { script } => {
            let (container, tree) = load(cli)?;
            cmd_replay(&container, tree, script)
        }
    }
}

fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(expand_path(dir)),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("get current directory", e).into()),
    }
}

/// Layered settings plus command-line canvas overrides.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(width) = cli.width {
        settings.canvas.width = width;
    }
    if let Some(height) = cli.height {
        settings.canvas.height = height;
    }
    debug!(?settings, "settings loaded");
    Ok(settings)
}

/// Pick the tree source from flags, then from configured dataset paths.
///
/// Without flags or configured datasets the working directory is scanned.
pub fn resolve_source(source: &SourceArgs, settings: &Settings) -> CliResult<TreeSource> {
    if let Some(path) = &source.fs {
        if source.population.is_some() || source.regions.is_some() {
            return Err(CliError::InvalidArgs(
                "--fs cannot be combined with --population/--regions".to_string(),
            ));
        }
        return Ok(TreeSource::Filesystem(expand_path(path)));
    }

    let populations = source
        .population
        .clone()
        .or_else(|| settings.population.populations_file.clone());
    let regions = source
        .regions
        .clone()
        .or_else(|| settings.population.regions_file.clone());

    match (populations, regions) {
        (Some(populations), Some(regions)) => Ok(TreeSource::Population {
            populations: expand_path(&populations),
            regions: expand_path(&regions),
        }),
        (None, None) => Ok(TreeSource::Filesystem(PathBuf::from("."))),
        _ => Err(CliError::InvalidArgs(
            "population data needs both --population and --regions".to_string(),
        )),
    }
}

fn load(cli: &Cli) -> CliResult<(ServiceContainer, WeightedTree)> {
    let settings = load_settings(cli)?;
    let source = resolve_source(&cli.source, &settings)?;
    let container = ServiceContainer::new(settings);
    let tree = container.load_tree(&source)?;
    Ok((container, tree))
}

#[instrument(skip(session))]
fn cmd_layout(session: &TreemapSession) -> CliResult<()> {
    let tree = session.tree();
    let Some(root) = tree.root() else {
        return Ok(());
    };
    let leaves = tree.weighted_leaves(root);
    for (tile, leaf) in session.tiles().iter().zip(leaves) {
        let label = tree
            .get_node(leaf)
            .and_then(|n| n.label())
            .unwrap_or_default();
        output::info(&format!("{} {} {}", tile.rect, tile.color, label));
    }
    Ok(())
}

#[instrument(skip(container, tree))]
fn cmd_inspect(container: &ServiceContainer, tree: &WeightedTree, at: Point) -> CliResult<()> {
    let group = tree
        .root()
        .and_then(|root| leaf_group_at(tree, root, container.settings.treemap_rect(), at));
    let Some(group) = group else {
        output::warning(&format!("no leaf at {}", at));
        return Ok(());
    };
    output::header(&group.rect);
    for leaf in group.leaves {
        output::detail(&path(tree, leaf)?);
    }
    Ok(())
}

#[instrument(skip(container, tree))]
fn cmd_delete(container: &ServiceContainer, mut tree: WeightedTree, at: Point) -> CliResult<()> {
    let rect = container.settings.treemap_rect();
    let Some(root) = tree.root() else {
        output::warning(&"tree is empty");
        return Ok(());
    };

    // paths must be rendered before the nodes leave the arena
    let mut paths = HashMap::new();
    if let Some(group) = leaf_group_at(&tree, root, rect, at) {
        for leaf in group.leaves {
            paths.insert(leaf, path(&tree, leaf)?);
        }
    }

    let deleted = select_and_delete(&mut tree, rect, at, container.settings.prune)?;
    if deleted.is_empty() {
        output::warning(&format!("no leaf at {}", at));
        return Ok(());
    }
    for leaf in deleted {
        if let Some(p) = paths.get(&leaf) {
            output::action("Deleted", p);
        }
    }

    match tree.root().and_then(|r| tree.get_node(r)) {
        Some(root) => output::detail(&format!("root weight: {}", root.weight())),
        None => output::detail(&"tree is empty"),
    }
    Ok(())
}

#[instrument(skip(session))]
fn cmd_resize(mut session: TreemapSession, at: Point, grow: bool, steps: u32) -> CliResult<()> {
    session.select(at)?;
    if session.selected().is_none() {
        output::warning(&format!("no leaf at {}", at));
        return Ok(());
    }
    for _ in 0..steps {
        session.resize(grow)?;
    }
    output::action(if grow { "Grown" } else { "Shrunk" }, session.status());
    Ok(())
}

#[instrument(skip(container, tree))]
fn cmd_replay(container: &ServiceContainer, tree: WeightedTree, script: &Path) -> CliResult<()> {
    let content = container
        .fs
        .read_to_string(script)
        .with_path_context("read script", script)?;
    let events = parse_script(&content)?;
    debug!("{} events", events.len());

    let mut session = container.session(tree);
    for event in events {
        session.apply(event)?;
    }

    output::header(&"Status");
    if session.status().is_empty() {
        output::detail(&"(no selection)");
    } else {
        output::detail(&session.status());
    }

    let tree = session.tree();
    let root_weight = tree
        .root()
        .and_then(|r| tree.get_node(r))
        .map_or(0, |n| n.weight());
    output::header(&"Layout");
    output::detail(&format!(
        "{} tiles, root weight {}",
        session.tiles().len(),
        root_weight
    ));
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let describe = |path: &Path| {
                let state = if path.exists() { "exists" } else { "not found" };
                format!("{} ({})", path.display(), state)
            };
            match global_config_path() {
                Some(global) => output::action("Global", &describe(&global)),
                None => output::action("Global", &"(no config directory)"),
            }
            let local = local_config_path(&config_dir(cli)?);
            output::action("Local", &describe(&local));
        }
    }
    Ok(())
}

fn cmd_completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_source_defaults_to_working_directory() {
        let source = resolve_source(&SourceArgs::default(), &Settings::default()).unwrap();
        assert_eq!(source, TreeSource::Filesystem(PathBuf::from(".")));
    }

    #[test]
    fn test_resolve_source_falls_back_to_configured_datasets() {
        let mut settings = Settings::default();
        settings.population.populations_file = Some(PathBuf::from("/data/pop.json"));
        let args = SourceArgs {
            regions: Some(PathBuf::from("/data/regions.json")),
            ..Default::default()
        };

        let source = resolve_source(&args, &settings).unwrap();

        assert_eq!(
            source,
            TreeSource::Population {
                populations: PathBuf::from("/data/pop.json"),
                regions: PathBuf::from("/data/regions.json"),
            }
        );
    }

    #[test]
    fn test_resolve_source_rejects_half_population_source() {
        let args = SourceArgs {
            population: Some(PathBuf::from("pop.json")),
            ..Default::default()
        };
        let result = resolve_source(&args, &Settings::default());
        assert!(matches!(result, Err(CliError::InvalidArgs(_))));
    }

    #[test]
    fn test_resolve_source_rejects_fs_with_population() {
        let args = SourceArgs {
            fs: Some(PathBuf::from(".")),
            population: Some(PathBuf::from("pop.json")),
            regions: None,
        };
        let result = resolve_source(&args, &Settings::default());
        assert!(matches!(result, Err(CliError::InvalidArgs(_))));
    }
}
