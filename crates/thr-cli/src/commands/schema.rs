use anyhow::bail;
use thr_core::entities::{ClientRecord, Destination, Hint, PublicForm};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `thr schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name.as_str() {
        "destination" => schemars::schema_for!(Destination),
        "hint" => schemars::schema_for!(Hint),
        "public-form" => schemars::schema_for!(PublicForm),
        "client-record" => schemars::schema_for!(ClientRecord),
        other => bail!(
            "unknown schema type '{other}' (expected destination, hint, public-form, client-record)"
        ),
    };
    output(&schema, flags.format)
}
