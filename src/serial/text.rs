//! Semicolon-delimited text format for trained networks.
//!
//! ```text
//! num_layers;
//! layer_sizes[0];layer_sizes[1];...;
//! biases[0][*];            one line per layer transition
//! ...
//! weights[0][*];           row-major, one line per layer transition
//! ...
//! output_labels[*];        only when the network is labelled
//! ```
//!
//! Floats are written with six decimals.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, error, warn};

use crate::error::{NetworkError, Result};
use crate::network::Network;

const SEP: char = ';';

/// Position of the loader within the expected file structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    NumLayers,
    LayerSizes,
    /// Bias line of the given layer transition.
    Biases(usize),
    /// Weight line of the given layer transition.
    Weights(usize),
    OutputLabels,
    /// Everything expected has been read; further lines are ignored.
    Done,
}

/// Parameters collected so far; dropped wholesale on any error.
#[derive(Default)]
struct Partial {
    num_layers: usize,
    layer_sizes: Vec<usize>,
    biases: Vec<Vec<f64>>,
    weights: Vec<Vec<f64>>,
    output_labels: Option<Vec<String>>,
}

fn numeric_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(SEP).map(str::trim).filter(|t| !t.is_empty())
}

fn parse_error(line: usize, reason: impl Into<String>) -> NetworkError {
    NetworkError::Parse {
        line,
        reason: reason.into(),
    }
}

fn parse_floats(line: &str, line_no: usize, expected: usize, what: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for token in numeric_tokens(line) {
        let v: f64 = token
            .parse()
            .map_err(|_| parse_error(line_no, format!("wrong {what} format: {token:?}")))?;
        values.push(v);
    }
    if values.len() != expected {
        return Err(parse_error(
            line_no,
            format!("wrong number of {what}, expected {expected} got {}", values.len()),
        ));
    }
    Ok(values)
}

impl Partial {
    /// Consumes one line and returns the next state.
    fn feed(&mut self, state: ParseState, line: &str, line_no: usize) -> Result<ParseState> {
        match state {
            ParseState::NumLayers => {
                let token = numeric_tokens(line)
                    .next()
                    .ok_or_else(|| parse_error(line_no, "missing number of layers"))?;
                self.num_layers = token
                    .parse()
                    .map_err(|_| parse_error(line_no, format!("wrong number of layers: {token:?}")))?;
                if self.num_layers < 2 {
                    return Err(NetworkError::TooFewLayers(self.num_layers));
                }
                Ok(ParseState::LayerSizes)
            }
            ParseState::LayerSizes => {
                for token in numeric_tokens(line) {
                    let size: usize = token
                        .parse()
                        .map_err(|_| parse_error(line_no, format!("wrong layer size format: {token:?}")))?;
                    self.layer_sizes.push(size);
                }
                if self.layer_sizes.len() != self.num_layers {
                    return Err(parse_error(
                        line_no,
                        format!(
                            "wrong number of sizes, expected {} got {}",
                            self.num_layers,
                            self.layer_sizes.len()
                        ),
                    ));
                }
                Ok(ParseState::Biases(0))
            }
            ParseState::Biases(l) => {
                let n = self.layer_sizes[l + 1];
                self.biases.push(parse_floats(line, line_no, n, "biases")?);
                if l + 1 == self.num_layers - 1 {
                    Ok(ParseState::Weights(0))
                } else {
                    Ok(ParseState::Biases(l + 1))
                }
            }
            ParseState::Weights(l) => {
                let len = self.layer_sizes[l]
                    .checked_mul(self.layer_sizes[l + 1])
                    .ok_or_else(|| parse_error(line_no, format!("weight matrix {l} is too large")))?;
                self.weights.push(parse_floats(line, line_no, len, "weights")?);
                if l + 1 == self.num_layers - 1 {
                    Ok(ParseState::OutputLabels)
                } else {
                    Ok(ParseState::Weights(l + 1))
                }
            }
            ParseState::OutputLabels => {
                if line.trim().is_empty() {
                    return Ok(ParseState::OutputLabels);
                }
                let expected = self.layer_sizes[self.num_layers - 1];
                let labels: Vec<String> = line
                    .split(SEP)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect();
                if labels.len() != expected {
                    return Err(parse_error(
                        line_no,
                        format!(
                            "wrong number of output labels, expected {expected} got {}",
                            labels.len()
                        ),
                    ));
                }
                self.output_labels = Some(labels);
                Ok(ParseState::Done)
            }
            ParseState::Done => {
                if !line.trim().is_empty() {
                    warn!("Too many lines in file. Ignoring line {line_no}...");
                }
                Ok(ParseState::Done)
            }
        }
    }

    fn finish(self, state: ParseState, last_line: usize) -> Result<Network> {
        match state {
            ParseState::OutputLabels | ParseState::Done => Network::from_owned(
                self.weights,
                self.biases,
                self.layer_sizes,
                self.output_labels,
            ),
            _ => Err(parse_error(
                last_line + 1,
                format!("unexpected end of file while reading {state:?}"),
            )),
        }
    }
}

impl Network {
    /// Writes the text format to `writer`.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}{SEP}", self.num_layers())?;
        for size in self.layer_sizes() {
            write!(writer, "{size}{SEP}")?;
        }
        writeln!(writer)?;

        for b in self.biases() {
            for v in b {
                write!(writer, "{v:.6}{SEP}")?;
            }
            writeln!(writer)?;
        }
        for w in self.weights() {
            for v in w.as_slice() {
                write!(writer, "{v:.6}{SEP}")?;
            }
            writeln!(writer)?;
        }

        if let Some(labels) = self.output_labels() {
            for label in labels.iter() {
                write!(writer, "{label}{SEP}")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Parses the text format from `reader`.
    ///
    /// `source` only labels I/O errors.
    pub fn read_text<R: BufRead>(reader: R, source: &Path) -> Result<Network> {
        let mut partial = Partial::default();
        let mut state = ParseState::NumLayers;
        let mut line_no = 0;

        for line in reader.lines() {
            line_no += 1;
            let line = line.map_err(|e| NetworkError::io(source, e))?;
            let line = line.trim_end_matches('\r');
            state = partial.feed(state, line, line_no)?;
        }

        partial.finish(state, line_no)
    }

    /// Saves the network to `path` in the text format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let result = File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            self.write_text(&mut writer)?;
            writer.flush()
        });

        match result {
            Ok(()) => {
                debug!("Saved network to \"{}\"", path.display());
                Ok(())
            }
            Err(e) => {
                error!("Could not save network to \"{}\": {e}", path.display());
                Err(NetworkError::io(path, e))
            }
        }
    }

    /// Loads a network previously written by [`Network::save`].
    ///
    /// Any malformed line aborts the load; nothing partially built escapes.
    pub fn load(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!("Could not open file \"{}\": {e}", path.display());
            NetworkError::io(path, e)
        })?;

        Network::read_text(BufReader::new(file), path).map_err(|e| {
            error!("Could not load network from \"{}\": {e}", path.display());
            e
        })
    }
}
