use clap::Args;
use serde::Serialize;

use regraft::rules::{self, Rule};

use super::CmdResult;

#[derive(Args)]
pub struct CheckArgs {
    /// Rules file to validate
    #[arg(long)]
    pub rules: String,
}

#[derive(Serialize)]
pub struct CheckOutput {
    pub command: &'static str,
    pub rules_file: String,
    pub rule_count: usize,
    pub suffixes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    pub rules: Vec<Rule>,
}

pub fn run(args: CheckArgs, _global: &super::GlobalArgs) -> CmdResult<CheckOutput> {
    let expanded = shellexpand::tilde(&args.rules).to_string();
    let set = rules::load(std::path::Path::new(&expanded))?;

    Ok((
        CheckOutput {
            command: "check",
            rules_file: expanded,
            rule_count: set.rules.len(),
            suffixes: set.suffixes.clone(),
            exclude: set.exclude.clone(),
            rules: set.rules,
        },
        0,
    ))
}
