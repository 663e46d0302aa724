use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::ErrorRecord, operation::Emitted};

#[derive(Copy, Clone, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
  #[default]
  Json,
  Yaml,
}

/// Writes projected output to one stream and notes plus error records to another
pub struct Printer<O, E> {
  format: OutputFormat,
  out: O,
  err: E,
}

impl Printer<io::Stdout, io::Stderr> {
  pub fn stdio(format: OutputFormat) -> Self {
    Self::new(format, io::stdout(), io::stderr())
  }
}

impl<O: Write, E: Write> Printer<O, E> {
  pub fn new(format: OutputFormat, out: O, err: E) -> Self {
    Self { format, out, err }
  }

  fn document<W: Write>(format: OutputFormat, writer: &mut W, value: &impl Serialize) -> io::Result<()> {
    match format {
      OutputFormat::Json => {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)
      }
      // An explicit separator keeps a stream of documents parseable
      OutputFormat::Yaml => {
        writeln!(writer, "---")?;
        serde_yaml::to_writer(&mut *writer, value).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
      }
    }
  }

  /// Write the primary value, then any notes on the side channel
  pub fn emit(&mut self, emitted: Emitted) -> io::Result<()> {
    if !matches!(emitted.value, Value::Null) {
      Self::document(self.format, &mut self.out, &emitted.value)?;
      self.out.flush()?;
    }

    for (key, value) in &emitted.notes {
      writeln!(self.err, "{key}: {value}")?;
    }

    Ok(())
  }

  pub fn error(&mut self, record: &ErrorRecord) -> io::Result<()> {
    serde_json::to_writer(&mut self.err, record)?;
    writeln!(self.err)
  }

  #[cfg(test)]
  pub fn into_inner(self) -> (O, E) {
    (self.out, self.err)
  }
}
