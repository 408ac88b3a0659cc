use colored::Colorize;
use dotprops::{split_key, FallbackCodec, FlatStore, GroupedCodec, PropertyFile};
use indexmap::IndexMap;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Show(args) => cmd_show(args),
        Command::Get(args) => cmd_get(args),
        Command::Set(args) => cmd_set(args),
        Command::Default(args) => cmd_default(args),
        Command::Unset(args) => cmd_unset(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let file = PropertyFile::open(&args.file)?;
    let layout = Layout::of(file.entries());

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&layout.to_json())?),
        OutputFormat::Text => {
            if file.entries().is_empty() {
                println!("No entries in {}.", args.file.display());
            }
            for (group, entries) in &layout.groups {
                println!("{}", group.bold());
                for (sub_key, value) in entries {
                    println!("    {} = {}", sub_key.cyan(), value);
                }
            }
            if !layout.ungrouped.is_empty() {
                println!("{} {}", "!".yellow().bold(), "ungrouped (not savable)".yellow());
                for (key, value) in &layout.ungrouped {
                    println!("    {} = {}", key.cyan(), value);
                }
            }
        }
    }
    Ok(())
}

fn cmd_get(args: KeyArgs) -> anyhow::Result<()> {
    let file = PropertyFile::open(&args.file)?;
    match file.get_string(&args.key) {
        Some(value) => println!("{value}"),
        None => println!("{} = {}", args.key.bold(), "(not set)".dimmed()),
    }
    Ok(())
}

fn cmd_set(args: SetArgs) -> anyhow::Result<()> {
    let mut file = PropertyFile::open(&args.file)?;
    if args.force {
        file.set_string(&args.key, args.value.as_str())?;
        println!("{} Set {} = {}", "✓".green().bold(), args.key.bold(), args.value);
    } else if file.append_string(&args.key, args.value.as_str())? {
        println!("{} Set {} = {}", "✓".green().bold(), args.key.bold(), args.value);
    } else {
        let current = file.get_string(&args.key).unwrap_or_default();
        println!(
            "{} {} already set to {} (use --force to overwrite)",
            "!".yellow().bold(),
            args.key.bold(),
            current
        );
    }
    Ok(())
}

fn cmd_default(args: ValueArgs) -> anyhow::Result<()> {
    let mut file = PropertyFile::open(&args.file)?;
    println!("{}", file.get_or_create(&args.key, &args.value)?);
    Ok(())
}

fn cmd_unset(args: KeyArgs) -> anyhow::Result<()> {
    let mut file = PropertyFile::open(&args.file)?;
    match file.remove(&args.key)? {
        Some(old) => println!("Removed {} (was {})", args.key.bold(), old),
        None => println!("{} = {}", args.key.bold(), "(not set)".dimmed()),
    }
    Ok(())
}

fn cmd_check(args: FileArgs) -> anyhow::Result<()> {
    if !args.file.exists() {
        anyhow::bail!("{} does not exist", args.file.display());
    }
    let file = PropertyFile::open(&args.file)?;
    let entries = file.entries();

    for (key, tag) in opaque_entries(entries) {
        println!("  {} {} ({})", "opaque".dimmed(), key, tag.dimmed());
    }

    let problems = check_entries(entries);
    if problems.is_empty() {
        println!(
            "{} {} entries in {} groups",
            "✓".green().bold(),
            entries.len(),
            Layout::of(entries).groups.len()
        );
        return Ok(());
    }

    for problem in &problems {
        println!("  {} {}", "✗".red(), problem);
    }
    anyhow::bail!("{} problem(s) in {}", problems.len(), args.file.display())
}

/// Entries as they would be written: grouped by their first two key
/// segments in first-seen order, plus the keys that cannot be grouped.
#[derive(Debug, PartialEq)]
struct Layout<'a> {
    groups: IndexMap<&'a str, Vec<(&'a str, &'a str)>>,
    ungrouped: Vec<(&'a str, &'a str)>,
}

impl<'a> Layout<'a> {
    fn of(store: &'a FlatStore) -> Self {
        let mut layout = Self {
            groups: IndexMap::new(),
            ungrouped: Vec::new(),
        };
        for (key, value) in store.iter() {
            match split_key(key) {
                Ok((group, sub_key)) => {
                    layout.groups.entry(group).or_default().push((sub_key, value));
                }
                Err(_) => layout.ungrouped.push((key, value)),
            }
        }
        layout
    }

    fn to_json(&self) -> serde_json::Value {
        let groups: Vec<_> = self
            .groups
            .iter()
            .map(|(group, entries)| json!({ "group": group, "entries": pairs_to_json(entries) }))
            .collect();
        json!({ "groups": groups, "ungrouped": pairs_to_json(&self.ungrouped) })
    }
}

fn pairs_to_json(entries: &[(&str, &str)]) -> Vec<serde_json::Value> {
    entries
        .iter()
        .map(|(key, value)| json!({ "key": key, "value": value }))
        .collect()
}

/// Entries holding fallback-encoded values, with their stored type tag.
fn opaque_entries(store: &FlatStore) -> Vec<(&str, String)> {
    store
        .iter()
        .filter_map(|(key, value)| FallbackCodec::type_tag(value).ok().map(|tag| (key, tag)))
        .collect()
}

/// Every reason the entries could not be written back.
fn check_entries(store: &FlatStore) -> Vec<String> {
    if GroupedCodec::render(store).is_ok() {
        return Vec::new();
    }
    store
        .iter()
        .filter_map(|(key, value)| {
            let single: FlatStore = [(key, value)].into_iter().collect();
            GroupedCodec::render(&single).err().map(|e| e.to_string())
        })
        .collect()
}
