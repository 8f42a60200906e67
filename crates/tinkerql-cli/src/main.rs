//! TinkerQL command-line interface
//!
//! Runs the equipability engine over JSON records in the item-database
//! layout: `check` a single item against a character, `interpolate` a
//! variant family at a quality level, or find the `best` usable variant.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tinkerql::eval::EvaluatedNode;
use tinkerql::model::stat::stats;
use tinkerql::{
    BestVariant, InterpolatedItem, ItemVariant, NullResolver, PartitionRule, RequirementStatus,
    StatSnapshot, build, evaluate, find_best_variant, interpolate,
};

/// TinkerQL command-line tool
#[derive(Parser)]
#[command(name = "tinkerql")]
#[command(author, version, about = "Item compatibility & quality-level tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an item's requirements against a character
    Check {
        /// Item record (JSON)
        item: PathBuf,
        /// Character stat snapshot (JSON, stat id -> value)
        character: PathBuf,
        /// Optional target-entity snapshot for target-scoped requirements
        #[arg(short, long)]
        target: Option<PathBuf>,
    },
    /// Interpolate a variant family at a quality level
    Interpolate {
        /// Variant family (JSON array of item records, same name)
        family: PathBuf,
        /// Target quality level
        #[arg(short, long)]
        ql: i32,
    },
    /// Find the highest-QL variant a character can use
    Best {
        /// Variant family (JSON array of item records, same name)
        family: PathBuf,
        /// Character stat snapshot (JSON)
        character: PathBuf,
        /// Profession id; defaults to the snapshot's Profession stat
        #[arg(short, long)]
        profession: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check {
            item,
            character,
            target,
        } => check(&item, &character, target.as_deref()).await,
        Commands::Interpolate { family, ql } => interpolate_family(&family, ql),
        Commands::Best {
            family,
            character,
            profession,
        } => best(&family, &character, profession).await,
    }
}

async fn check(item_path: &Path, character_path: &Path, target_path: Option<&Path>) -> Result<()> {
    let item: ItemVariant = read_json(item_path)?;
    let character: StatSnapshot = read_json(character_path)?;
    let target: Option<StatSnapshot> = target_path.map(read_json).transpose()?;

    println!("{} (QL {})", item.name.bold(), item.quality_level);
    if item.criteria.is_empty() {
        println!("{}", "no requirements".green());
        return Ok(());
    }

    let tree = build(&item.criteria)
        .with_context(|| format!("malformed requirements in {}", item_path.display()))?;
    let verdict = evaluate(&tree, &character, target.as_ref(), &NullResolver).await;

    render_node(&verdict.root, 0);
    println!();
    let badge = format!("{}/{} requirements met", verdict.met_count, verdict.total_count);
    match verdict.status() {
        RequirementStatus::Met => println!("{} — {}", "USABLE".green().bold(), badge),
        RequirementStatus::Unmet => println!("{} — {}", "NOT USABLE".red().bold(), badge),
        RequirementStatus::Partial => println!("{} — {}", "PARTIAL".yellow().bold(), badge),
        RequirementStatus::Unknown => println!("{} — {}", "UNKNOWN".yellow().bold(), badge),
    }
    for unmet in &verdict.unmet {
        let current = unmet
            .current
            .map_or_else(|| "?".to_string(), |value| value.to_string());
        println!(
            "  {} {} {} {} (currently {})",
            "missing:".red(),
            unmet.stat,
            unmet.comparator.symbol(),
            unmet.required,
            current
        );
    }
    Ok(())
}

fn interpolate_family(family_path: &Path, target_ql: i32) -> Result<()> {
    let family = read_family(family_path)?;
    let item = interpolate_at(&family, target_ql)?;

    let estimate = if item.interpolated {
        format!(
            " (interpolated between QL {} and QL {})",
            item.source_low_ql, item.source_high_ql
        )
        .yellow()
    } else {
        " (exact database variant)".green()
    };
    println!(
        "{} at QL {}{}",
        item.variant.name.bold(),
        item.variant.quality_level,
        estimate
    );
    for (&stat, &value) in &item.variant.stat_block {
        println!("  {stat}: {value}");
    }
    Ok(())
}

async fn best(family_path: &Path, character_path: &Path, profession: Option<i32>) -> Result<()> {
    let family = read_family(family_path)?;
    let character: StatSnapshot = read_json(character_path)?;
    let profession = profession.or_else(|| character.lookup(stats::PROFESSION));
    let rule = PartitionRule {
        stat: stats::PROFESSION,
        fallback: None,
    };

    let best = find_best_variant(&family, &character, profession, Some(&rule), &NullResolver)
        .await
        .with_context(|| format!("malformed requirements in {}", family_path.display()))?;

    match best {
        Some(BestVariant::Exact(variant)) => {
            println!(
                "{}: {} at QL {}",
                "best".green().bold(),
                variant.name,
                variant.quality_level
            );
        }
        Some(BestVariant::Interpolated(item)) => {
            println!(
                "{}: {} at QL {} {}",
                "best".green().bold(),
                item.variant.name,
                item.variant.quality_level,
                format!(
                    "(interpolated between QL {} and QL {}; stats are estimates)",
                    item.source_low_ql, item.source_high_ql
                )
                .yellow()
            );
        }
        None => println!("{}", "no usable variant".red()),
    }
    Ok(())
}

fn render_node(node: &EvaluatedNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        EvaluatedNode::Requirement {
            requirement,
            status,
            current,
        } => {
            let line = format!(
                "{} {} {}",
                requirement.stat,
                requirement.comparator.symbol(),
                requirement.value
            );
            let line = if requirement.target_scoped {
                format!("{line} (on target)")
            } else {
                line
            };
            let current = current.map_or(String::new(), |value| format!("  [{value}]"));
            println!("{indent}{} {line}{current}", chip(*status));
        }
        EvaluatedNode::Operator { op, status, children } => {
            println!("{indent}{} {}", chip(*status), op.as_str().to_uppercase());
            for child in children {
                render_node(child, depth + 1);
            }
        }
        EvaluatedNode::Group { status, children } => {
            println!("{indent}{} ALL OF", chip(*status));
            for child in children {
                render_node(child, depth + 1);
            }
        }
    }
}

fn chip(status: RequirementStatus) -> colored::ColoredString {
    match status {
        RequirementStatus::Met => "✓".green(),
        RequirementStatus::Unmet => "✗".red(),
        RequirementStatus::Partial => "~".yellow(),
        RequirementStatus::Unknown => "?".yellow(),
    }
}

fn interpolate_at(family: &[ItemVariant], target_ql: i32) -> Result<InterpolatedItem> {
    let mut sorted: Vec<&ItemVariant> = family.iter().collect();
    sorted.sort_by_key(|variant| variant.quality_level);

    if let [only] = sorted.as_slice() {
        if only.quality_level == target_ql {
            return Ok(InterpolatedItem {
                variant: (*only).clone(),
                source_low_ql: only.quality_level,
                source_high_ql: only.quality_level,
                interpolated: false,
            });
        }
        bail!(
            "only known variant is QL {}; cannot interpolate to QL {}",
            only.quality_level,
            target_ql
        );
    }

    for pair in sorted.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        if target_ql >= low.quality_level && target_ql <= high.quality_level {
            return interpolate(low, high, target_ql).context("interpolation failed");
        }
    }
    bail!(
        "QL {} is outside the known range of '{}'",
        target_ql,
        family.first().map_or("", |variant| &variant.name)
    )
}

fn read_family(path: &Path) -> Result<Vec<ItemVariant>> {
    let family: Vec<ItemVariant> = read_json(path)?;
    if family.is_empty() {
        bail!("{} contains no variants", path.display());
    }
    Ok(family)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("cannot parse {}", path.display()))
}
