//! Printer Block
//!
//! A sink that renders every write as one line of text. All values of a write
//! are concatenated into a single flat numeric sequence, rendered with 12
//! digits of precision, and written to the output stream followed by the
//! configured line terminator.
//!
//! ## Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `endln` | `"\n"` | Terminator written after each line |
//! | `frmt` | `"{: 12.4f}"` | Per-value format; stored, not applied to output |
//! | `sep` | `" "` | Value separator; stored, not applied to output |
//! | `enabled` | `true` | Disabled printers drop writes silently |

use std::io::{self, Write};

use crate::core::attributes::Attributes;
use crate::core::block::{Block, BlockBase, BlockConfig, BlockError, Writable};
use crate::core::options::{Args, Options};
use crate::core::render::{render, RenderOptions};
use crate::core::value::Value;

pub const ENDLN: &str = "endln";
pub const FRMT: &str = "frmt";
pub const SEP: &str = "sep";

/// Fractional digits used when printing
const PRECISION: usize = 12;

/// Text options owned by the printer
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterFormat {
    pub endln: String,
    pub frmt: String,
    pub sep: String,
}

impl PrinterFormat {
    /// Take `endln`, `frmt` and `sep`, returning what is left
    ///
    /// Nothing is assigned unless all three (when present) are strings.
    pub fn apply(&mut self, mut options: Options) -> Result<Options, BlockError> {
        let endln = options.take_string(ENDLN)?;
        let frmt = options.take_string(FRMT)?;
        let sep = options.take_string(SEP)?;

        if let Some(endln) = endln {
            self.endln = endln;
        }
        if let Some(frmt) = frmt {
            self.frmt = frmt;
        }
        if let Some(sep) = sep {
            self.sep = sep;
        }
        Ok(options)
    }
}

impl Default for PrinterFormat {
    fn default() -> Self {
        Self {
            endln: "\n".into(),
            frmt: "{: 12.4f}".into(),
            sep: " ".into(),
        }
    }
}

/// Construction options for [`Printer`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrinterConfig {
    pub format: PrinterFormat,
    pub block: BlockConfig,
}

impl PrinterConfig {
    pub fn from_args(args: Args) -> Result<Self, BlockError> {
        let Args { positional, named } = args;
        let mut format = PrinterFormat::default();
        let rest = format.apply(named)?;
        let block = BlockConfig::from_args(Args {
            positional,
            named: rest,
        })?;
        Ok(Self { format, block })
    }
}

/// Sink that prints values as text
#[derive(Debug)]
pub struct Printer<W = io::Stdout> {
    base: BlockBase,
    format: PrinterFormat,
    writer: W,
}

impl Printer<io::Stdout> {
    /// Printer writing to standard output with default options
    pub fn new() -> Self {
        Self::with_config(PrinterConfig::default())
    }

    pub fn with_config(config: PrinterConfig) -> Self {
        Self {
            base: BlockBase::with_config(config.block),
            format: config.format,
            writer: io::stdout(),
        }
    }

    /// Construct from positional and named arguments
    ///
    /// # Example
    /// ```
    /// use ctrl_block::categories::Printer;
    /// use ctrl_block::core::options::Args;
    ///
    /// let printer = Printer::from_args(Args::new().opt("endln", ";")).unwrap();
    /// assert_eq!(printer.format().endln, ";");
    ///
    /// assert!(Printer::from_args(Args::new().opt("width", 10i64)).is_err());
    /// ```
    pub fn from_args(args: Args) -> Result<Self, BlockError> {
        let printer = Self::with_config(PrinterConfig::from_args(args)?);
        tracing::debug!(
            kind = "Printer",
            enabled = printer.base.is_enabled(),
            endln = ?printer.format.endln,
            "constructed"
        );
        Ok(printer)
    }

    pub fn from_options(options: Options) -> Result<Self, BlockError> {
        Self::from_args(options.into())
    }

    pub fn from_json(text: &str) -> Result<Self, BlockError> {
        Self::from_options(Options::from_json(text)?)
    }
}

impl Default for Printer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Printer<W> {
    /// Swap the output stream, keeping all options
    pub fn with_writer<V>(self, writer: V) -> Printer<V> {
        Printer {
            base: self.base,
            format: self.format,
            writer,
        }
    }

    pub fn format(&self) -> &PrinterFormat {
        &self.format
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> Printer<W> {
    fn emit(&mut self, values: &[Value]) -> Result<(), BlockError> {
        if !self.base.is_enabled() {
            tracing::trace!(count = values.len(), "printer disabled, dropping values");
            return Ok(());
        }

        let options = RenderOptions::default().with_precision(PRECISION);
        let line = render(values, &options)?;

        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(self.format.endln.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send + Sync> Writable for Printer<W> {
    fn consume(&mut self, values: &[Value]) -> Result<(), BlockError> {
        self.emit(values)
    }
}

impl<W: Write + Send + Sync> Block for Printer<W> {
    fn kind(&self) -> &'static str {
        "Printer"
    }

    fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    fn attributes(&self) -> Attributes {
        let mut attributes = self.base.attributes();
        attributes.insert(ENDLN.into(), Value::from(self.format.endln.as_str()));
        attributes.insert(FRMT.into(), Value::from(self.format.frmt.as_str()));
        attributes.insert(SEP.into(), Value::from(self.format.sep.as_str()));
        attributes
    }

    fn apply(&mut self, options: Options) -> Result<Options, BlockError> {
        self.format.apply(options)
    }

    fn as_writable(&self) -> Option<&dyn Writable> {
        Some(self)
    }

    fn as_writable_mut(&mut self) -> Option<&mut dyn Writable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Capability;
    use crate::core::attributes::Keys;

    fn captured(options: Options) -> Printer<Vec<u8>> {
        Printer::from_options(options).unwrap().with_writer(Vec::new())
    }

    fn output(printer: &Printer<Vec<u8>>) -> &str {
        std::str::from_utf8(printer.writer()).unwrap()
    }

    #[test]
    fn defaults_are_introspectable() {
        let printer = captured(Options::new());
        let all = printer.get_all();
        assert_eq!(all["enabled"], Value::Boolean(true));
        assert_eq!(all["endln"], Value::from("\n"));
        assert_eq!(all["frmt"], Value::from("{: 12.4f}"));
        assert_eq!(all["sep"], Value::from(" "));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn writes_concatenated_values_with_terminator() {
        let mut printer = captured(Options::new());
        printer
            .write(&[1.into(), Value::from(vec![2i64, 3])])
            .unwrap();
        printer.write(&[Value::from(vec![1.0, 2.5, 3.0])]).unwrap();
        assert_eq!(output(&printer), "1 2 3\n1.  2.5 3. \n");
    }

    #[test]
    fn custom_terminator_replaces_newline() {
        let mut printer = captured(Options::new().with("endln", " | "));
        printer.write(&[Value::Number(0.5)]).unwrap();
        printer.write(&[Value::Number(1.0 / 3.0)]).unwrap();
        assert_eq!(output(&printer), "0.5 | 0.333333333333 | ");

        let bytes = printer.into_writer();
        assert_eq!(bytes, b"0.5 | 0.333333333333 | ".to_vec());
    }

    #[test]
    fn disabled_printer_writes_nothing() {
        let mut printer = captured(Options::new().with("enabled", false));
        printer.write(&[1.into(), 2.into(), 3.into()]).unwrap();
        assert!(printer.writer().is_empty());
    }

    #[test]
    fn frmt_and_sep_do_not_change_output() {
        let mut printer = captured(Options::new().with("frmt", "{:.1f}").with("sep", ","));
        printer.write(&[1.into(), 2.into()]).unwrap();
        assert_eq!(output(&printer), "1 2\n");
    }

    #[test]
    fn set_updates_format_then_delegates() {
        let mut printer = captured(Options::new());
        printer
            .set(Options::new().with("endln", "").with("sep", ";").with("enabled", false))
            .unwrap();
        assert_eq!(printer.format().endln, "");
        assert_eq!(printer.format().sep, ";");
        assert!(!printer.is_enabled());

        let err = printer.set(Options::new().with("width", 3i64)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn non_string_format_option_is_rejected() {
        let err = Printer::from_options(Options::new().with("endln", 1i64)).unwrap_err();
        assert!(matches!(err, BlockError::InvalidValue { ref key, .. } if key == "endln"));
    }

    #[test]
    fn invalid_enabled_leaves_format_unchanged() {
        let mut printer = captured(Options::new());
        let err = printer
            .set(Options::new().with("endln", ";").with("enabled", 1i64))
            .unwrap_err();
        assert!(matches!(err, BlockError::InvalidValue { ref key, .. } if key == "enabled"));
        assert_eq!(printer.format().endln, "\n");
        assert!(printer.is_enabled());
    }

    #[test]
    fn invalid_format_option_leaves_enabled_unchanged() {
        let mut printer = captured(Options::new());
        let err = printer
            .set(Options::new().with("enabled", false).with("sep", ",").with("frmt", 3i64))
            .unwrap_err();
        assert!(matches!(err, BlockError::InvalidValue { ref key, .. } if key == "frmt"));
        assert!(printer.is_enabled());
        assert_eq!(printer.format(), &PrinterFormat::default());
    }

    #[test]
    fn unknown_construction_option_is_rejected() {
        let err = Printer::from_options(Options::new().with("precision", 4i64)).unwrap_err();
        assert_eq!(err, BlockError::Config("Unknown parameter(s) 'precision'".into()));
    }

    #[test]
    fn printer_is_a_sink_only() {
        let printer = captured(Options::new());
        assert_eq!(printer.capability(), Capability::Sink);
        assert!(printer.read().unwrap_err().is_unsupported());
        assert!(printer.get(&Keys::one("endln"), &[]).is_ok());
    }

    #[test]
    fn non_numeric_write_fails_without_output() {
        let mut printer = captured(Options::new());
        assert!(printer.write(&[Value::from("text")]).is_err());
        assert!(printer.write(&[]).is_err());
        assert!(printer.writer().is_empty());
    }
}
