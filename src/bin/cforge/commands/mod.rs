mod catalogue;
mod embed;
mod run;

use catalogue::run_catalogue;
use embed::run_embed;
use run::run_pipeline;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Run(args) => run_pipeline(args, ctx),
        Command::Embed(args) => run_embed(args, ctx),
        Command::Descriptors(args) => run_catalogue(args),
    }
}
