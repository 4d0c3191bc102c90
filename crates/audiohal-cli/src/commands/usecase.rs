//! Open a named stream and apply one of its declared use-case cases.

use clap::Args;

use super::common::{ConfigArgs, load_engine};

#[derive(Args)]
pub struct UseCaseArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Stream name as declared in the configuration.
    name: String,

    /// Use-case name (`<usecase name="…">`).
    usecase: String,

    /// Case name within the use-case (`<case name="…">`).
    case: String,
}

pub fn run(args: UseCaseArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.config)?;
    let mut stream = engine.open_named_stream(&args.name)?;

    stream.apply_use_case(&args.usecase, &args.case)?;
    println!("Applied use-case '{}.{}' to '{}'", args.usecase, args.case, args.name);

    stream.release()?;
    Ok(())
}
