//! Command dispatch: thin shells over the genealogy service

use std::io;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::view::{render_forest, ExpansionState};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Forest, RecordId};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree {
            collapse,
            collapsed,
            expanded,
            max_depth,
        }) => cmd_tree(&container, collapse, *collapsed, *expanded, *max_depth),
        Some(Commands::Rank { top }) => cmd_rank(&container, *top),
        Some(Commands::Chain { id }) => cmd_chain(&container, id),
        Some(Commands::Stats { anomalies }) => cmd_stats(&container, *anomalies),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try `genealogy --help`".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = std::env::current_dir().ok();
    let mut settings = Settings::load(cwd.as_deref())?;
    if let Some(snapshot) = &cli.snapshot {
        settings.snapshot = Some(snapshot.clone());
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn build(container: &ServiceContainer) -> CliResult<Forest> {
    let service = container.genealogy()?;
    let forest = service.build()?;
    if !forest.report().is_clean() {
        output::warning(&format!(
            "{} data anomalies recovered, see `genealogy stats --anomalies`",
            forest.report().anomalies.len()
        ));
    }
    Ok(forest)
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    collapse: &[String],
    collapsed: bool,
    expanded: bool,
    max_depth: Option<usize>,
) -> CliResult<()> {
    if max_depth == Some(0) {
        return Err(CliError::InvalidArgs("--max-depth must be at least 1".to_string()));
    }
    let forest = build(container)?;
    let settings = &container.settings;

    let mut state = ExpansionState::new(settings.expanded_by_default);
    if collapsed {
        state.collapse_all();
    } else if expanded {
        state.expand_all();
    }
    for id in collapse {
        let id = RecordId::new(id.as_str());
        if forest.get(&id).is_none() {
            output::warning(&format!("cannot collapse unknown constituent: {id}"));
            continue;
        }
        state.set(id, false);
    }

    output::header(&format!(
        "{} constituents in {} trees",
        forest.len(),
        forest.root_indices().len()
    ));
    for tree in render_forest(&forest, &state, &settings.render_options(max_depth)) {
        output::info(&tree);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_rank(container: &ServiceContainer, top: Option<usize>) -> CliResult<()> {
    if top == Some(0) {
        return Err(CliError::InvalidArgs("--top must be at least 1".to_string()));
    }
    let forest = build(container)?;
    let limit = top.unwrap_or(container.settings.top);

    let recruiters = forest.top_recruiters(limit);
    if recruiters.is_empty() {
        output::info(&"No recruiters yet.");
        return Ok(());
    }

    output::header(&format!("Top {} recruiters", recruiters.len()));
    for (pos, node) in recruiters.iter().enumerate() {
        output::detail(&format!(
            "{:>3}. {} [{}] {} recruits ({} direct)",
            pos + 1,
            node,
            node.status,
            node.total_descendants,
            node.direct_children
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_chain(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let forest = build(container)?;
    let chain = forest.chain(&RecordId::new(id))?;
    output::info(&chain.iter().map(|node| node.to_string()).join(" <- "));

    // explain a chain cut short by dirty data
    if let Some(root) = chain.last() {
        for anomaly in forest.report().about(&root.id).filter(|a| a.promoted_to_root()) {
            output::anomaly(anomaly);
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_stats(container: &ServiceContainer, anomalies: bool) -> CliResult<()> {
    let forest = build(container)?;
    let stats = forest.stats();
    let report = forest.report();

    output::header(&"Genealogy");
    output::action("constituents", &stats.constituents);
    output::action("trees", &stats.roots);
    output::action("leaves", &stats.leaves);
    output::action("max depth", &stats.max_depth);
    if let Some((root, size)) = &stats.largest_tree {
        output::action("largest tree", &format!("{root} ({size} people)"));
    }

    output::header(&"Status");
    for (status, count) in &stats.by_status {
        output::detail(&format!("{status:<10} {count}"));
    }

    output::header(&"Data quality");
    output::detail(&format!("malformed rows       {}", report.malformed()));
    output::detail(&format!("duplicate identities {}", report.duplicates()));
    output::detail(&format!("unknown referrers    {}", report.unresolved()));
    output::detail(&format!("self referrals       {}", report.self_referrals()));
    output::detail(&format!("cycles broken        {}", report.cycles()));
    if anomalies {
        let (promoted, repaired): (Vec<_>, Vec<_>) =
            report.anomalies.iter().partition(|a| a.promoted_to_root());
        if !promoted.is_empty() {
            output::header(&"Promoted to root");
            promoted.iter().for_each(|a| output::anomaly(a));
        }
        if !repaired.is_empty() {
            output::header(&"Repaired rows");
            repaired.iter().for_each(|a| output::anomaly(a));
        }
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&std::env::current_dir().map_err(|e| {
                    CliError::Usage(format!("cannot determine current directory: {e}"))
                })?)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create config directory for {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write config {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"(unavailable)"),
            }
            if let Ok(cwd) = std::env::current_dir() {
                output::action("local", &local_config_path(&cwd).display());
            }
            Ok(())
        }
    }
}
