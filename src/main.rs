//! assignmentctl - build LaTeX assignments and bundle them for submission.

use assignmentctl::{Error, cli};
use std::process;

fn main() {
    let args = cli::Args::parse_args();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli::log_filter(args.verbose)),
    )
    .format_timestamp(None)
    .init();

    if let Err(e) = cli::run(&args) {
        eprintln!("Error: {e:#}");
        if let Some(err) = e.chain().find_map(|c| c.downcast_ref::<Error>()) {
            if let Error::CommandFailed {
                stdout: Some(stdout),
                ..
            } = err.root_cause()
            {
                eprintln!("{stdout}");
            }
            for suggestion in err.recovery_suggestions() {
                eprintln!("  hint: {suggestion}");
            }
        }
        process::exit(1);
    }
}
