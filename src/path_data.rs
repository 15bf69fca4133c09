//! # Path Data Module
//!
//! Parses the SVG path mini-language (`d` attribute) into contours of
//! vertices with relative in/out tangents, the representation Lottie `sh`
//! items store.
//!
//! ## Leniency
//! Parsing is lenient by default: stray characters, unknown command letters
//! and incomplete argument groups are dropped and parsing carries on with what
//! is left. [`ParseMode::Strict`] reports the first such problem instead.
//!
//! All parser state is local to a single call.

use crate::curves::{arc_to_cubic_with, quad_to_cubic, ArcHandles};
use crate::errors::PathDataError;
use kurbo::{Point, Vec2};
use lottie_data::model::BezierPath;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HLineTo,
    VLineTo,
    CubicTo,
    SmoothCubicTo,
    QuadTo,
    SmoothQuadTo,
    ArcTo,
    Close,
}

impl CommandKind {
    fn from_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => CommandKind::MoveTo,
            'L' => CommandKind::LineTo,
            'H' => CommandKind::HLineTo,
            'V' => CommandKind::VLineTo,
            'C' => CommandKind::CubicTo,
            'S' => CommandKind::SmoothCubicTo,
            'Q' => CommandKind::QuadTo,
            'T' => CommandKind::SmoothQuadTo,
            'A' => CommandKind::ArcTo,
            'Z' => CommandKind::Close,
            _ => return None,
        };
        Some(kind)
    }

    /// Numbers consumed per segment.
    pub fn arity(self) -> usize {
        match self {
            CommandKind::Close => 0,
            CommandKind::HLineTo | CommandKind::VLineTo => 1,
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::SmoothQuadTo => 2,
            CommandKind::SmoothCubicTo | CommandKind::QuadTo => 4,
            CommandKind::CubicTo => 6,
            CommandKind::ArcTo => 7,
        }
    }
}

/// One command letter with its raw arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub kind: CommandKind,
    pub relative: bool,
    pub args: Vec<f64>,
    /// Byte offset of the command letter.
    pub offset: usize,
}

impl PathCommand {
    pub fn letter(&self) -> char {
        let upper = match self.kind {
            CommandKind::MoveTo => 'M',
            CommandKind::LineTo => 'L',
            CommandKind::HLineTo => 'H',
            CommandKind::VLineTo => 'V',
            CommandKind::CubicTo => 'C',
            CommandKind::SmoothCubicTo => 'S',
            CommandKind::QuadTo => 'Q',
            CommandKind::SmoothQuadTo => 'T',
            CommandKind::ArcTo => 'A',
            CommandKind::Close => 'Z',
        };
        if self.relative {
            upper.to_ascii_lowercase()
        } else {
            upper
        }
    }
}

/// A path vertex. Tangents are offsets from `point` to the neighbouring
/// control points, never absolute positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub point: Point,
    pub in_tangent: Vec2,
    pub out_tangent: Vec2,
}

impl Vertex {
    pub fn corner(point: Point) -> Self {
        Vertex {
            point,
            in_tangent: Vec2::ZERO,
            out_tangent: Vec2::ZERO,
        }
    }
}

/// One contour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubPath {
    pub vertices: Vec<Vertex>,
    pub closed: bool,
}

impl SubPath {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn to_bezier(&self) -> BezierPath {
        BezierPath {
            c: self.closed,
            v: self.vertices.iter().map(|v| [v.point.x, v.point.y]).collect(),
            i: self.vertices.iter().map(|v| [v.in_tangent.x, v.in_tangent.y]).collect(),
            o: self.vertices.iter().map(|v| [v.out_tangent.x, v.out_tangent.y]).collect(),
        }
    }
}

/// Splits `d` into commands.
pub fn parse_commands(d: &str, mode: ParseMode) -> Result<Vec<PathCommand>, PathDataError> {
    let mut commands = Vec::new();
    let mut pending: Option<(usize, char)> = None;
    let mut body_start = 0;

    for (offset, ch) in d.char_indices() {
        if !ch.is_ascii_alphabetic() || ch == 'e' || ch == 'E' {
            continue;
        }
        finish_command(d, pending, body_start, offset, mode, &mut commands)?;
        pending = Some((offset, ch));
        body_start = offset + 1;
    }
    finish_command(d, pending, body_start, d.len(), mode, &mut commands)?;
    Ok(commands)
}

fn finish_command(
    d: &str,
    pending: Option<(usize, char)>,
    body_start: usize,
    body_end: usize,
    mode: ParseMode,
    commands: &mut Vec<PathCommand>,
) -> Result<(), PathDataError> {
    let body = &d[body_start..body_end];
    let Some((offset, letter)) = pending else {
        // Text before the first command letter.
        if mode == ParseMode::Strict {
            if let Some((at, found)) = body.char_indices().find(|(_, c)| !is_separator(*c)) {
                return Err(PathDataError::UnexpectedCharacter { offset: at, found });
            }
        }
        return Ok(());
    };

    let args = scan_numbers(body, body_start, mode)?;
    let Some(kind) = CommandKind::from_letter(letter) else {
        if mode == ParseMode::Strict {
            return Err(PathDataError::UnknownCommand { offset, letter });
        }
        trace!(offset, %letter, "dropping unknown path command");
        return Ok(());
    };

    let arity = kind.arity();
    if arity > 0 && (args.is_empty() || args.len() % arity != 0) && mode == ParseMode::Strict {
        return Err(PathDataError::IncompleteArguments {
            offset,
            command: letter,
            expected: arity,
            found: args.len(),
        });
    }

    commands.push(PathCommand {
        kind,
        relative: letter.is_ascii_lowercase(),
        args,
        offset,
    });
    Ok(())
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Extracts numbers matching `[+-]?[0-9]*\.?[0-9]+([eE][+-]?[0-9]+)?`, so
/// `10-5` reads as `10, -5` and `1.5.5` as `1.5, .5`.
fn scan_numbers(text: &str, base: usize, mode: ParseMode) -> Result<Vec<f64>, PathDataError> {
    let bytes = text.as_bytes();
    let mut numbers = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if let Some(end) = match_number(bytes, pos) {
            if let Ok(value) = text[pos..end].parse::<f64>() {
                numbers.push(value);
            }
            pos = end;
            continue;
        }

        let found = text[pos..].chars().next().unwrap_or_default();
        if !is_separator(found) {
            if mode == ParseMode::Strict {
                return Err(PathDataError::UnexpectedCharacter {
                    offset: base + pos,
                    found,
                });
            }
            trace!(offset = base + pos, %found, "dropping malformed path token");
        }
        pos += found.len_utf8().max(1);
    }
    Ok(numbers)
}

fn match_number(bytes: &[u8], start: usize) -> Option<usize> {
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = start;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let int_end = digits(i);
    let has_int = int_end > i;
    i = int_end;

    if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
        i = digits(i + 1);
    } else if !has_int {
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'-' || bytes[j] == b'+') {
            j += 1;
        }
        let exp_end = digits(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    Some(i)
}

/// Accumulates contours while interpreting commands.
#[derive(Debug, Default)]
struct PathBuilder {
    current: Point,
    start: Point,
    /// Second control point of the previous `C`/`S` segment.
    last_cubic: Option<Point>,
    /// Control point of the previous `Q`/`T` segment.
    last_quad: Option<Point>,
    active: SubPath,
    contours: Vec<SubPath>,
    arc_handles: ArcHandles,
}

impl PathBuilder {
    fn flush(&mut self) {
        if !self.active.is_empty() {
            self.contours.push(std::mem::take(&mut self.active));
        }
    }

    fn move_to(&mut self, p: Point) {
        self.flush();
        self.current = p;
        self.start = p;
        self.active.vertices.push(Vertex::corner(p));
    }

    fn cubic_to(&mut self, cp1: Point, cp2: Point, p: Point) {
        if self.active.is_empty() {
            self.active.vertices.push(Vertex::corner(self.current));
        }
        if let Some(last) = self.active.vertices.last_mut() {
            last.out_tangent = cp1 - self.current;
        }
        self.active.vertices.push(Vertex {
            point: p,
            in_tangent: cp2 - p,
            out_tangent: Vec2::ZERO,
        });
        self.current = p;
    }

    fn line_to(&mut self, p: Point) {
        self.cubic_to(self.current, p, p);
    }

    fn close(&mut self) {
        if !self.active.is_empty() {
            self.active.closed = true;
        }
        self.flush();
        self.current = self.start;
    }

    fn resolve(&self, relative: bool, x: f64, y: f64) -> Point {
        if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        }
    }

    fn apply(&mut self, command: &PathCommand) {
        let rel = command.relative;
        let arity = command.kind.arity();
        if arity == 0 {
            self.close();
            self.last_cubic = None;
            self.last_quad = None;
            return;
        }

        for (index, a) in command.args.chunks_exact(arity).enumerate() {
            let mut cubic_ctrl = None;
            let mut quad_ctrl = None;
            match command.kind {
                CommandKind::MoveTo if index == 0 => {
                    let p = self.resolve(rel, a[0], a[1]);
                    self.move_to(p);
                }
                // Extra pairs after a move are implicit line segments.
                CommandKind::MoveTo | CommandKind::LineTo => {
                    let p = self.resolve(rel, a[0], a[1]);
                    self.line_to(p);
                }
                CommandKind::HLineTo => {
                    let x = if rel { self.current.x + a[0] } else { a[0] };
                    self.line_to(Point::new(x, self.current.y));
                }
                CommandKind::VLineTo => {
                    let y = if rel { self.current.y + a[0] } else { a[0] };
                    self.line_to(Point::new(self.current.x, y));
                }
                CommandKind::CubicTo => {
                    let cp1 = self.resolve(rel, a[0], a[1]);
                    let cp2 = self.resolve(rel, a[2], a[3]);
                    let p = self.resolve(rel, a[4], a[5]);
                    self.cubic_to(cp1, cp2, p);
                    cubic_ctrl = Some(cp2);
                }
                CommandKind::SmoothCubicTo => {
                    let cp1 = self.reflect(self.last_cubic);
                    let cp2 = self.resolve(rel, a[0], a[1]);
                    let p = self.resolve(rel, a[2], a[3]);
                    self.cubic_to(cp1, cp2, p);
                    cubic_ctrl = Some(cp2);
                }
                CommandKind::QuadTo => {
                    let cp = self.resolve(rel, a[0], a[1]);
                    let p = self.resolve(rel, a[2], a[3]);
                    self.quad_to(cp, p);
                    quad_ctrl = Some(cp);
                }
                CommandKind::SmoothQuadTo => {
                    let cp = self.reflect(self.last_quad);
                    let p = self.resolve(rel, a[0], a[1]);
                    self.quad_to(cp, p);
                    quad_ctrl = Some(cp);
                }
                CommandKind::ArcTo => {
                    let p = self.resolve(rel, a[5], a[6]);
                    let from = self.current;
                    let large_arc = a[3] != 0.0;
                    let sweep = a[4] != 0.0;
                    for seg in arc_to_cubic_with(from, a[0], a[1], a[2], large_arc, sweep, p, self.arc_handles) {
                        self.cubic_to(seg.p1, seg.p2, seg.p3);
                    }
                    self.current = p;
                }
                CommandKind::Close => self.close(),
            }
            self.last_cubic = cubic_ctrl;
            self.last_quad = quad_ctrl;
        }
    }

    fn quad_to(&mut self, cp: Point, p: Point) {
        let cubic = quad_to_cubic(self.current, cp, p);
        self.cubic_to(cubic.p1, cubic.p2, cubic.p3);
    }

    /// Mirror of `control` through the current point, or the current point
    /// itself when the previous segment was not of the same curve family.
    fn reflect(&self, control: Option<Point>) -> Point {
        match control {
            Some(c) => Point::new(2.0 * self.current.x - c.x, 2.0 * self.current.y - c.y),
            None => self.current,
        }
    }

    fn finish(mut self) -> Vec<SubPath> {
        self.flush();
        self.contours
    }
}

/// Interprets `d` into all of its contours.
pub fn parse_subpaths(d: &str, mode: ParseMode) -> Result<Vec<SubPath>, PathDataError> {
    parse_subpaths_with(d, mode, ArcHandles::default())
}

/// [`parse_subpaths`] with a choice of arc approximation.
pub fn parse_subpaths_with(d: &str, mode: ParseMode, arc_handles: ArcHandles) -> Result<Vec<SubPath>, PathDataError> {
    let commands = parse_commands(d, mode)?;
    let mut builder = PathBuilder {
        arc_handles,
        ..PathBuilder::default()
    };
    for command in &commands {
        builder.apply(command);
    }
    Ok(builder.finish())
}

/// Lenient parse keeping only the first contour.
pub fn parse_path_data(d: &str) -> SubPath {
    parse_subpaths(d, ParseMode::Lenient)
        .ok()
        .and_then(|contours| contours.into_iter().next())
        .unwrap_or_default()
}

/// Strict parse keeping only the first contour.
pub fn parse_path_data_strict(d: &str) -> Result<SubPath, PathDataError> {
    Ok(parse_subpaths(d, ParseMode::Strict)?
        .into_iter()
        .next()
        .unwrap_or_default())
}
