use anyhow::{Context, Result};
use tracing::debug;

use sarif_convert::convert_file;

use crate::args::{ConvertArgs, GlobalArgs};

pub fn run(_global_args: &GlobalArgs, args: &ConvertArgs) -> Result<()> {
    let destination = args.output_args.destination();
    debug!("Converting {} report {} to {destination}", args.tool, args.report.display());

    let result = convert_file(
        &args.tool,
        args.tool_args.as_deref(),
        &args.report,
        Some(&destination),
    );
    match result {
        Ok(_serialized) => Ok(()),
        Err(e) => match e.downcast_ref::<std::io::Error>() {
            // Ignore SIGPIPE errors, like those that can come from piping to `head`
            Some(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
            _ => Err(e).with_context(|| format!("Failed to convert {}", args.report.display())),
        },
    }
}
