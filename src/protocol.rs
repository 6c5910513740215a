//! Wire Protocol
//!
//! The instruction stream is UTF-8 text, one token per line. Control tokens
//! and tagged commands all begin with the two-character prefix `!!`; tagged
//! commands carry comma-separated payloads inside angle brackets, e.g.
//! `!!Pt<1.0,2.5>`. Anything else is free text and carries no meaning.
//!
//! Internally each line is classified into a [`Token`] variant so the
//! interpreter never has to re-match strings. The external format is fixed:
//! clients in any language write these lines to the socket as-is.

use thiserror::Error;

/// Prefix shared by every control and tagged token. Lines that do not start
/// with it are free text (or the continuation of a split token, see the
/// reassembler in [`crate::framing`]).
pub const CONTROL_PREFIX: &str = "!!";

// Frame and list sentinels (exact match).
pub const START_BUFFER: &str = "!!StartIBuf";
pub const END_BUFFER: &str = "!!EndIBuf";
pub const NEW_PLOT: &str = "!!New2D";
pub const START_POINTS: &str = "!!StartPts";
pub const END_POINTS: &str = "!!EndPts";
pub const COLORBAR: &str = "!!Colorbar";
pub const IMAGE_MODE: &str = "!!ImShow";

// Tagged command prefixes, including the opening bracket.
pub const POINT_TAG: &str = "!!Pt<";
pub const DIMENSION_TAG: &str = "!!Dimension<";
const VALUE_TAG: &str = "!!Value<";
const SCALE_TAG: &str = "!!Plot<";
const LINE_TAG: &str = "!!Line<";
const TITLE_TAG: &str = "!!Title<";
const X_TITLE_TAG: &str = "!!XTitle<";
const Y_TITLE_TAG: &str = "!!YTitle<";
const SUP_TITLE_TAG: &str = "!!SupTitle<";
const LABEL_TAG: &str = "!!Label<";
const LEGEND_TAG: &str = "!!Legend<";
const PRINT_TAG: &str = "!!Print<";
const X_RANGE_TAG: &str = "!!XRange<";
const Y_RANGE_TAG: &str = "!!YRange<";
const COLORMAP_TAG: &str = "!!Colormap<";
const DPI_TAG: &str = "!!Dpi<";
const FIG_SIZE_TAG: &str = "!!FigSize<";

/// Errors produced while classifying a single protocol line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A line started with a known tag but its payload did not parse:
    /// missing closing bracket, wrong field count, or non-numeric fields.
    #[error("malformed token {line:?} (expected {tag}...>)")]
    Payload { tag: &'static str, line: String },

    /// `!!Plot<...>` named a scale kind the protocol does not define.
    #[error("unknown plot scale {0:?}")]
    UnknownScale(String),
}

/// Axis scale for a subplot, set with `!!Plot<...>` or `!!ImShow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleKind {
    /// Linear on both axes (`linlin`, the default).
    #[default]
    Linear,
    /// Logarithmic x, linear y (`semilogx`).
    SemilogX,
    /// Linear x, logarithmic y (`semilogy`).
    SemilogY,
    /// Logarithmic on both axes (`loglog`).
    LogLog,
    /// 2D image mode (`imshow`); point lists are dimensioned value grids.
    Image,
}

/// One classified line of the wire protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartBuffer,
    EndBuffer,
    NewPlot,
    StartPoints,
    EndPoints,
    Colorbar,
    ImageMode,
    Point { x: f64, y: f64 },
    Value(f64),
    Dimension { width: usize, height: usize },
    Scale(ScaleKind),
    LineStyle(String),
    Title(String),
    XTitle(String),
    YTitle(String),
    SupTitle(String),
    Label(String),
    Legend(String),
    Print(String),
    XRange { min: f64, max: f64 },
    YRange { min: f64, max: f64 },
    Colormap(String),
    Dpi(u32),
    FigSize { width: f64, height: f64 },
    /// Free text, or a `!!`-prefixed tag this version does not know.
    /// The interpreter ignores these.
    Text(String),
}

impl Token {
    /// Classify one line of the instruction stream.
    ///
    /// Unknown tags and plain text map to [`Token::Text`]; a known tag with
    /// a payload that does not parse is an error, which the interpreter
    /// treats as fatal for the current frame.
    pub fn parse(line: &str) -> Result<Token, ProtocolError> {
        match line {
            START_BUFFER => return Ok(Token::StartBuffer),
            END_BUFFER => return Ok(Token::EndBuffer),
            NEW_PLOT => return Ok(Token::NewPlot),
            START_POINTS => return Ok(Token::StartPoints),
            END_POINTS => return Ok(Token::EndPoints),
            COLORBAR => return Ok(Token::Colorbar),
            IMAGE_MODE => return Ok(Token::ImageMode),
            _ => {}
        }

        if let Some(p) = payload(line, POINT_TAG)? {
            let (x, y) = two_floats(p, POINT_TAG, line)?;
            return Ok(Token::Point { x, y });
        }
        if let Some(p) = payload(line, VALUE_TAG)? {
            let v = one_float(p, VALUE_TAG, line)?;
            return Ok(Token::Value(v));
        }
        if let Some(p) = payload(line, DIMENSION_TAG)? {
            let (width, height) = two_ints(p, DIMENSION_TAG, line)?;
            return Ok(Token::Dimension { width, height });
        }
        if let Some(p) = payload(line, SCALE_TAG)? {
            return Ok(Token::Scale(parse_scale(p)?));
        }
        if let Some(p) = payload(line, LINE_TAG)? {
            return Ok(Token::LineStyle(p.to_string()));
        }
        if let Some(p) = payload(line, TITLE_TAG)? {
            return Ok(Token::Title(p.to_string()));
        }
        if let Some(p) = payload(line, X_TITLE_TAG)? {
            return Ok(Token::XTitle(p.to_string()));
        }
        if let Some(p) = payload(line, Y_TITLE_TAG)? {
            return Ok(Token::YTitle(p.to_string()));
        }
        if let Some(p) = payload(line, SUP_TITLE_TAG)? {
            return Ok(Token::SupTitle(p.to_string()));
        }
        if let Some(p) = payload(line, LABEL_TAG)? {
            return Ok(Token::Label(p.to_string()));
        }
        if let Some(p) = payload(line, LEGEND_TAG)? {
            return Ok(Token::Legend(p.to_string()));
        }
        if let Some(p) = payload(line, PRINT_TAG)? {
            return Ok(Token::Print(p.to_string()));
        }
        if let Some(p) = payload(line, X_RANGE_TAG)? {
            let (min, max) = two_floats(p, X_RANGE_TAG, line)?;
            return Ok(Token::XRange { min, max });
        }
        if let Some(p) = payload(line, Y_RANGE_TAG)? {
            let (min, max) = two_floats(p, Y_RANGE_TAG, line)?;
            return Ok(Token::YRange { min, max });
        }
        if let Some(p) = payload(line, COLORMAP_TAG)? {
            return Ok(Token::Colormap(p.to_string()));
        }
        if let Some(p) = payload(line, DPI_TAG)? {
            let dpi = p.trim().parse().map_err(|_| ProtocolError::Payload {
                tag: DPI_TAG,
                line: line.to_string(),
            })?;
            return Ok(Token::Dpi(dpi));
        }
        if let Some(p) = payload(line, FIG_SIZE_TAG)? {
            let (width, height) = two_floats(p, FIG_SIZE_TAG, line)?;
            return Ok(Token::FigSize { width, height });
        }

        Ok(Token::Text(line.to_string()))
    }
}

/// Extract the bracketed payload of a tagged token.
///
/// Returns `Ok(None)` when the line does not carry `tag` at all, and an
/// error when the tag matches but the closing bracket is missing or the
/// payload contains a stray `>`.
fn payload<'a>(line: &'a str, tag: &'static str) -> Result<Option<&'a str>, ProtocolError> {
    let Some(rest) = line.strip_prefix(tag) else {
        return Ok(None);
    };
    rest.strip_suffix('>')
        .filter(|p| !p.contains('>'))
        .map(Some)
        .ok_or_else(|| ProtocolError::Payload { tag, line: line.to_string() })
}

fn parse_scale(name: &str) -> Result<ScaleKind, ProtocolError> {
    match name {
        "linlin" => Ok(ScaleKind::Linear),
        "semilogx" => Ok(ScaleKind::SemilogX),
        "semilogy" => Ok(ScaleKind::SemilogY),
        "loglog" => Ok(ScaleKind::LogLog),
        "imshow" => Ok(ScaleKind::Image),
        other => Err(ProtocolError::UnknownScale(other.to_string())),
    }
}

fn one_float(p: &str, tag: &'static str, line: &str) -> Result<f64, ProtocolError> {
    p.trim()
        .parse()
        .map_err(|_| ProtocolError::Payload { tag, line: line.to_string() })
}

fn two_floats(p: &str, tag: &'static str, line: &str) -> Result<(f64, f64), ProtocolError> {
    let bad = || ProtocolError::Payload { tag, line: line.to_string() };
    let mut fields = p.split(',');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(a), Some(b), None) => {
            let a = a.trim().parse().map_err(|_| bad())?;
            let b = b.trim().parse().map_err(|_| bad())?;
            Ok((a, b))
        }
        _ => Err(bad()),
    }
}

fn two_ints(p: &str, tag: &'static str, line: &str) -> Result<(usize, usize), ProtocolError> {
    let bad = || ProtocolError::Payload { tag, line: line.to_string() };
    let mut fields = p.split(',');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(a), Some(b), None) => {
            let a = a.trim().parse().map_err(|_| bad())?;
            let b = b.trim().parse().map_err(|_| bad())?;
            Ok((a, b))
        }
        _ => Err(bad()),
    }
}
