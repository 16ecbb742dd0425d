use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use regraft::log_status;
use regraft::rewrite;
use regraft::rules::{self, RuleSet};
use regraft::Error;

use super::CmdResult;

#[derive(Args)]
pub struct RewriteArgs {
    /// Literal text to find (requires --to)
    #[arg(long)]
    pub from: Option<String>,

    /// Replacement text (requires --from)
    #[arg(long)]
    pub to: Option<String>,

    /// Rules file with an ordered substitution list (alternative to --from/--to)
    #[arg(long)]
    pub rules: Option<String>,

    /// Root directory to rewrite (default: current directory)
    #[arg(long)]
    pub path: Option<String>,

    /// File suffix to match (repeatable; overrides the rules file suffixes)
    #[arg(long)]
    pub suffix: Vec<String>,

    /// Glob pattern to exclude, relative to the root (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    pub write: bool,
}

#[derive(Serialize)]
pub struct RewriteOutput {
    pub command: &'static str,
    pub root: String,
    pub dry_run: bool,
    pub rules: Vec<RuleSummary>,
    pub files_scanned: usize,
    pub total_replacements: usize,
    pub total_files: usize,
    pub edits: Vec<EditSummary>,
    pub applied: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

#[derive(Serialize)]
pub struct RuleSummary {
    pub from: String,
    pub to: String,
    pub suffixes: Vec<String>,
}

#[derive(Serialize)]
pub struct EditSummary {
    pub file: String,
    pub replacements: usize,
}

pub fn run(args: RewriteArgs, _global: &super::GlobalArgs) -> CmdResult<RewriteOutput> {
    let mut set = resolve_rule_set(&args)?;

    if !args.suffix.is_empty() {
        set.suffixes = args.suffix.clone();
    }
    set.exclude.extend(args.exclude.iter().cloned());

    let root = expand_root(args.path.as_deref());

    let mut result = rewrite::scan(&set, &root)?;

    if args.write {
        rewrite::apply(&mut result, &root)?;
        log_status!(
            "rewrite",
            "Rewrote {} file(s) under {}",
            result.total_files,
            root.display()
        );
    }

    let mut hints = Vec::new();
    if result.total_replacements == 0 {
        hints.push("No occurrences found.".to_string());
    } else if !args.write {
        hints.push("Dry-run only. Re-run with --write to apply.".to_string());
    }

    let exit_code = if result.total_replacements == 0 { 1 } else { 0 };

    Ok((
        RewriteOutput {
            command: "rewrite",
            root: root.display().to_string(),
            dry_run: !args.write,
            rules: set
                .rules
                .iter()
                .map(|r| RuleSummary {
                    from: r.from.clone(),
                    to: r.to.clone(),
                    suffixes: set.suffixes_for(r).to_vec(),
                })
                .collect(),
            files_scanned: result.files_scanned,
            total_replacements: result.total_replacements,
            total_files: result.total_files,
            edits: result
                .edits
                .iter()
                .map(|e| EditSummary {
                    file: e.file.clone(),
                    replacements: e.replacements,
                })
                .collect(),
            applied: result.applied,
            hints,
        },
        exit_code,
    ))
}

/// Resolve the substitution source: an explicit --from/--to pair or a
/// rules file, never both, never neither.
fn resolve_rule_set(args: &RewriteArgs) -> regraft::Result<RuleSet> {
    let has_pair = args.from.is_some() || args.to.is_some();

    if args.rules.is_some() && has_pair {
        return Err(Error::validation_invalid_argument(
            "rules",
            "Cannot combine --rules with --from/--to",
        ));
    }

    if let Some(rules_path) = &args.rules {
        let expanded = shellexpand::tilde(rules_path).to_string();
        return rules::load(std::path::Path::new(&expanded));
    }

    match (&args.from, &args.to) {
        (Some(from), Some(to)) => Ok(RuleSet::single(from.as_str(), to.as_str())),
        (Some(_), None) => Err(Error::validation_missing_argument(vec![
            "--to".to_string()
        ])),
        (None, Some(_)) => Err(Error::validation_missing_argument(vec![
            "--from".to_string()
        ])),
        (None, None) => Err(Error::validation_missing_argument(vec![
            "--from".to_string(),
            "--to".to_string(),
        ])
        .with_hint("Pass a --from/--to pair, or --rules with a JSON rules file")),
    }
}

fn expand_root(path: Option<&str>) -> PathBuf {
    let raw = path.unwrap_or(".");
    PathBuf::from(shellexpand::tilde(raw).to_string())
}
