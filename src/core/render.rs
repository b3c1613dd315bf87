//! Text rendering of flat numeric sequences
//!
//! Output follows numpy's `str()` of a 1-D array without the enclosing
//! brackets: integers are right-aligned to a common width, floats are printed
//! in the shortest form up to `precision` fractional digits with their decimal
//! points aligned, booleans print as ` True`/`False`, and long sequences wrap
//! and summarize.
//!
//! All settings travel in a [`RenderOptions`] value; nothing here reads or
//! writes process-wide state.

use super::block::BlockError;
use super::value::Value;

/// Formatting context for [`render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum fractional digits for floats
    pub precision: usize,
    /// Line width before wrapping
    pub linewidth: usize,
    /// Sequences longer than this are summarized
    pub threshold: usize,
    /// Items kept at each end of a summarized sequence
    pub edgeitems: usize,
}

impl RenderOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            precision: 8,
            linewidth: 75,
            threshold: 1000,
            edgeitems: 3,
        }
    }
}

/// A flattened sequence with a single element type
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Booleans(Vec<bool>),
    Integers(Vec<i64>),
    Floats(Vec<f64>),
}

impl Numeric {
    pub fn len(&self) -> usize {
        match self {
            Numeric::Booleans(v) => v.len(),
            Numeric::Integers(v) => v.len(),
            Numeric::Floats(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Concatenate scalars and (nested) arrays into one numeric sequence
///
/// A sequence of only booleans stays boolean; mixed with numbers they count
/// as integers. A single float promotes the whole sequence to floats. Strings
/// and nulls are rejected, as is an empty argument list.
pub fn flatten(values: &[Value]) -> Result<Numeric, BlockError> {
    if values.is_empty() {
        return Err(BlockError::InvalidValue {
            key: "values".into(),
            expected: "at least one value",
            found: "nothing".into(),
        });
    }

    let mut acc = Flattened::default();
    for value in values {
        acc.collect(value)?;
    }

    if acc.floating {
        Ok(Numeric::Floats(acc.floats))
    } else if acc.numeric || acc.bools.is_empty() {
        Ok(Numeric::Integers(acc.ints))
    } else {
        Ok(Numeric::Booleans(acc.bools))
    }
}

/// Every flattened element in each representation it could end up in
#[derive(Default)]
struct Flattened {
    bools: Vec<bool>,
    ints: Vec<i64>,
    floats: Vec<f64>,
    /// an integer or float was seen
    numeric: bool,
    /// a float was seen
    floating: bool,
}

impl Flattened {
    fn collect(&mut self, value: &Value) -> Result<(), BlockError> {
        match value {
            Value::Boolean(b) => {
                self.bools.push(*b);
                self.ints.push(i64::from(*b));
                self.floats.push(if *b { 1.0 } else { 0.0 });
            }
            Value::Integer(i) => {
                self.numeric = true;
                self.ints.push(*i);
                self.floats.push(*i as f64);
            }
            Value::Number(n) => {
                self.numeric = true;
                self.floating = true;
                self.floats.push(*n);
            }
            Value::Array(items) => {
                for item in items {
                    self.collect(item)?;
                }
            }
            other => return Err(BlockError::invalid_value("values", "numeric", other)),
        }
        Ok(())
    }
}

/// Flatten `values` and render them as text
pub fn render(values: &[Value], options: &RenderOptions) -> Result<String, BlockError> {
    Ok(render_numeric(&flatten(values)?, options))
}

/// Render an already flattened sequence
pub fn render_numeric(numeric: &Numeric, options: &RenderOptions) -> String {
    let len = numeric.len();
    if len == 0 {
        return String::new();
    }

    let summarize = len > options.threshold;
    let edge = options.edgeitems.min(len);
    let shown: Vec<usize> = if summarize {
        (0..edge).chain(len - edge..len).collect()
    } else {
        (0..len).collect()
    };

    let words = match numeric {
        Numeric::Booleans(data) => shown.iter().map(|&i| format_bool(data[i])).collect(),
        Numeric::Integers(data) => {
            let picked: Vec<i64> = shown.iter().map(|&i| data[i]).collect();
            format_integers(&picked)
        }
        Numeric::Floats(data) => {
            let picked: Vec<f64> = shown.iter().map(|&i| data[i]).collect();
            FloatFormat::new(&picked, options.precision).format_all(&picked)
        }
    };

    layout(&words, summarize.then_some(edge), options.linewidth)
}

fn format_bool(b: bool) -> String {
    let text = if b { " True" } else { "False" };
    text.to_string()
}

fn format_integers(data: &[i64]) -> Vec<String> {
    let width = data.iter().map(|i| i.to_string().len()).max().unwrap_or(0);
    data.iter().map(|i| format!("{:>width$}", i, width = width)).collect()
}

/// Digits of one float: sign and integer part, fractional part, exponent
struct Parts {
    int: String,
    frac: String,
    exp: Option<i32>,
}

struct FloatFormat {
    scientific: bool,
    pad_left: usize,
    pad_right: usize,
    /// Fixed fractional digits in scientific mode
    frac_digits: usize,
    exp_digits: usize,
    precision: usize,
}

impl FloatFormat {
    fn new(data: &[f64], precision: usize) -> Self {
        let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();

        let magnitudes: Vec<f64> = finite.iter().map(|x| x.abs()).filter(|&x| x != 0.0).collect();
        let scientific = match (
            magnitudes.iter().copied().reduce(f64::max),
            magnitudes.iter().copied().reduce(f64::min),
        ) {
            (Some(max), Some(min)) => max >= 1e8 || min < 1e-4 || max / min > 1e3,
            _ => false,
        };

        let mut format = Self {
            scientific,
            pad_left: 0,
            pad_right: 0,
            frac_digits: 0,
            exp_digits: 0,
            precision,
        };

        if !finite.is_empty() {
            let parts: Vec<Parts> = finite
                .iter()
                .map(|&x| {
                    if scientific {
                        scientific_parts(x, precision)
                    } else {
                        positional_parts(x, precision)
                    }
                })
                .collect();

            format.pad_left = parts.iter().map(|p| p.int.len()).max().unwrap_or(0);
            let frac_len = parts.iter().map(|p| p.frac.len()).max().unwrap_or(0);
            if scientific {
                format.frac_digits = frac_len;
                format.exp_digits = parts
                    .iter()
                    .filter_map(|p| p.exp)
                    .map(|e| e.unsigned_abs().to_string().len())
                    .max()
                    .unwrap_or(0)
                    .max(2);
                format.pad_right = format.exp_digits + 2 + frac_len;
            } else {
                format.pad_right = frac_len;
            }
        }

        if finite.len() != data.len() {
            let neg_inf = data.iter().any(|&x| x == f64::NEG_INFINITY);
            let offset = format.pad_right + 1;
            let nan_len = 3usize;
            let inf_len = 3 + usize::from(neg_inf);
            format.pad_left = format
                .pad_left
                .max(nan_len.saturating_sub(offset))
                .max(inf_len.saturating_sub(offset));
        }

        format
    }

    fn format_all(&self, data: &[f64]) -> Vec<String> {
        data.iter().map(|&x| self.format(x)).collect()
    }

    fn format(&self, x: f64) -> String {
        if !x.is_finite() {
            let text = if x.is_nan() {
                "nan"
            } else if x < 0.0 {
                "-inf"
            } else {
                "inf"
            };
            let width = self.pad_left + self.pad_right + 1;
            return format!("{:>width$}", text, width = width);
        }

        if self.scientific {
            let parts = scientific_parts(x, self.precision);
            let exp = parts.exp.unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!(
                "{:>left$}.{:0<frac$}e{}{:0>digits$}",
                parts.int,
                parts.frac,
                sign,
                exp.unsigned_abs(),
                left = self.pad_left,
                frac = self.frac_digits,
                digits = self.exp_digits,
            )
        } else {
            let parts = positional_parts(x, self.precision);
            format!(
                "{:>left$}.{:<right$}",
                parts.int,
                parts.frac,
                left = self.pad_left,
                right = self.pad_right,
            )
        }
    }
}

fn sign_prefix(x: f64) -> &'static str {
    if x.is_sign_negative() {
        "-"
    } else {
        ""
    }
}

/// Shortest round-trip digits, rounded to `precision` fractional digits
fn positional_parts(x: f64, precision: usize) -> Parts {
    let magnitude = x.abs();
    let mut text = format!("{}", magnitude);
    if fraction_len(&text) > precision {
        text = format!("{:.*}", precision, magnitude);
    }
    let (int, frac) = split_fraction(&text);
    Parts {
        int: format!("{}{}", sign_prefix(x), int),
        frac: frac.trim_end_matches('0').to_string(),
        exp: None,
    }
}

/// Shortest round-trip mantissa, rounded to `precision` fractional digits
fn scientific_parts(x: f64, precision: usize) -> Parts {
    let magnitude = x.abs();
    let mut text = format!("{:e}", magnitude);
    if fraction_len(mantissa(&text)) > precision {
        text = format!("{:.*e}", precision, magnitude);
    }
    let (mant, exp) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let (int, frac) = split_fraction(mant);
    Parts {
        int: format!("{}{}", sign_prefix(x), int),
        frac: frac.trim_end_matches('0').to_string(),
        exp: Some(exp.parse().unwrap_or(0)),
    }
}

fn mantissa(text: &str) -> &str {
    text.split_once('e').map_or(text, |(m, _)| m)
}

fn fraction_len(text: &str) -> usize {
    text.split_once('.').map_or(0, |(_, f)| f.len())
}

fn split_fraction(text: &str) -> (&str, &str) {
    text.split_once('.').unwrap_or((text, ""))
}

/// Join words with single spaces, wrapping at `linewidth`
///
/// Continuation lines carry a one-space hanging indent. `summary_at` marks
/// the index before which `...` is inserted.
fn layout(words: &[String], summary_at: Option<usize>, linewidth: usize) -> String {
    const HANGING: &str = " ";
    // room for the closing bracket of the array form
    let width = linewidth.saturating_sub(1);

    let mut out = String::new();
    let mut line = String::from(HANGING);
    for (i, word) in words.iter().enumerate() {
        if summary_at == Some(i) {
            extend_line(&mut out, &mut line, "...", width, HANGING);
            line.push(' ');
        }
        extend_line(&mut out, &mut line, word, width, HANGING);
        if i + 1 < words.len() {
            line.push(' ');
        }
    }
    out.push_str(&line);
    out.split_off(HANGING.len())
}

fn extend_line(out: &mut String, line: &mut String, word: &str, width: usize, prefix: &str) {
    let needs_wrap = line.len() + word.len() > width && line.len() > prefix.len();
    if needs_wrap {
        out.push_str(line.trim_end());
        out.push('\n');
        line.clear();
        line.push_str(prefix);
    }
    line.push_str(word);
}
