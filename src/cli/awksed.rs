use std::path::PathBuf;

use clap::Parser;

use super::{Tool, Verbosity};
use crate::insert::{insert_into_file, substitute_env, InsertRequest};

/// Insert a line relative to the n-th line containing a search string.
#[derive(Parser, Debug)]
#[command(name = "awksed", version)]
pub struct AwksedArgs {
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write the result (default: edit the input in place)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Literal text identifying the anchor line
    #[arg(short, long)]
    pub search: String,

    /// Matching lines to pass over before the anchor
    #[arg(short = 'c', long, default_value_t = 0, allow_negative_numbers = true)]
    pub skip: i64,

    /// Offset of the new line from the anchor: 1 inserts right after it,
    /// -1 right before
    #[arg(short, long, allow_negative_numbers = true)]
    pub placement: i64,

    /// Line to insert
    #[arg(short = 'l', long)]
    pub pattern: String,

    /// Placeholder in the pattern replaced by the environment variable of
    /// the same name, e.g. "$ANGLE"
    #[arg(short, long, value_name = "PLACEHOLDER")]
    pub env: Vec<String>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for AwksedArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let mut request = InsertRequest {
            search: self.search,
            skip: self.skip,
            placement: self.placement,
            pattern: self.pattern,
        };
        request.validate()?;
        request.pattern = self
            .env
            .iter()
            .try_fold(request.pattern, |pattern, placeholder| substitute_env(&pattern, placeholder))?;
        let output = self.output.as_deref().unwrap_or(&self.input);
        let line = insert_into_file(&self.input, output, &request)?;
        log::info!("Wrote {} with the new line at index {line}", output.display());
        Ok(())
    }
}
