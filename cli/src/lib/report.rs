//! Prints an [`ippvm::Error`] to stderr as the host's final diagnostic
//! step, gating color on `supports-color` rather than pulling in a
//! logging framework for what is a single formatted line.

use owo_colors::OwoColorize;

use ippvm::Error;

fn color_enabled() -> bool {
  supports_color::on(supports_color::Stream::Stderr)
    .map(|c| c.has_basic)
    .unwrap_or(false)
}

/// Prints `error[<code>]: <message>` to stderr, colored red when the
/// terminal supports it. Used for every error this binary can produce:
/// load errors from the XML/text loaders and runtime errors from the
/// engine alike. Engine errors have no source text to attach a snippet to
/// (see [`ippvm_diag::Report`] for the one loader path that does), so this
/// is deliberately a plain one-line report rather than a [`ippvm_diag::Report`].
pub fn print_error(e: &Error) {
  let header = format!("error[{}]", e.code.exit_code());
  if color_enabled() {
    eprintln!("{}: {}", header.red().bold(), e.message);
  } else {
    eprintln!("{header}: {}", e.message);
  }
}
