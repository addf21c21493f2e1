use clap::Parser;

use ippvm_cli::commands::Command;
use ippvm_cli::common::InputArgs;

#[derive(Debug, Parser)]
#[clap(name = "ippvm", version, about = "An interpreter for the IPPcode19 instruction set")]
pub struct App {
  #[clap(subcommand)]
  command: Option<Command>,

  // Flags for the default `run` command.
  #[clap(flatten)]
  input: InputArgs,
}

/// `clap`'s own parse failures (unknown flag, bad value) print usage and
/// exit `2` by default; §6 reserves that for the whole taxonomy and wants
/// CLI parameter errors at `1`, so parsing is driven manually here instead
/// of through `Parser::parse`.
fn main() {
  let app = match App::try_parse() {
    Ok(app) => app,
    Err(e) => {
      e.print().ok();
      // `--help`/`--version` are clap's own "successful" exits (code 0);
      // any genuine parse failure is a CLI parameter error (§6, code 1).
      std::process::exit(if e.exit_code() == 0 { 0 } else { 1 });
    }
  };

  let command = app.command.unwrap_or_else(|| Command::run(app.input));
  std::process::exit(command.execute());
}
