pub type CmdResult<T> = regraft::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod check;
pub mod rewrite;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (regraft::Result<serde_json::Value>, i32) {
    crate::tty::status("regraft is working...");

    match command {
        crate::Commands::Rewrite(args) => dispatch!(args, global, rewrite),
        crate::Commands::Check(args) => dispatch!(args, global, check),
    }
}
