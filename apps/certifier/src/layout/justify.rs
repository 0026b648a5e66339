//! Justified rich-text paragraph layout.
//!
//! # Architecture
//! Layout runs in three passes so measurement stays separate from drawing:
//! 1. `tokenize` splits styled runs into word and space tokens and measures
//!    each one in its own weight.
//! 2. `break_lines` greedily packs tokens into lines no wider than the column.
//! 3. `render_lines` places every word on the canvas, stretching inter-word
//!    gaps so each line but the last spans the full column.
//!
//! `layout_paragraph` chains the three. The engine holds no state between
//! calls; the same runs, geometry and canvas metrics always produce the same
//! sequence of draw calls.
//!
//! A column width of zero or less is a caller error. It is not rejected: every
//! word simply lands on its own line.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Capabilities
// ────────────────────────────────────────────────────────────────────────────

/// Rendered width of text in the canvas's current font family and size.
pub trait TextMeasurer {
    fn measure(&self, text: &str, bold: bool) -> f32;
}

/// A surface the paragraph is drawn onto.
///
/// Errors raised by the canvas are returned to the caller of
/// `layout_paragraph` unchanged.
pub trait TextCanvas: TextMeasurer {
    type Error;

    /// Places `text` with its baseline origin at `(x, y)` in the given weight.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, bold: bool) -> Result<(), Self::Error>;
}

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// A span of text sharing one weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
}

impl StyledRun {
    pub fn normal(text: impl Into<String>) -> Self {
        StyledRun {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        StyledRun {
            text: text.into(),
            bold: true,
        }
    }
}

/// A word or a collapsed whitespace unit, measured in its run's weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub bold: bool,
    pub is_space: bool,
    pub width: f32,
}

/// Tokens assigned to one output row.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub tokens: Vec<Token>,
    /// False only for the last line of the paragraph.
    pub justify: bool,
}

impl Line {
    /// Tokens left after dropping trailing spaces.
    pub fn visible_tokens(&self) -> &[Token] {
        let end = self
            .tokens
            .iter()
            .rposition(|t| !t.is_space)
            .map_or(0, |i| i + 1);
        &self.tokens[..end]
    }

    /// Sum of widths of the visible tokens, interior spaces included.
    pub fn visible_width(&self) -> f32 {
        self.visible_tokens().iter().map(|t| t.width).sum()
    }

    /// Number of interior gaps that justification can stretch.
    pub fn gap_count(&self) -> usize {
        self.visible_tokens().iter().filter(|t| t.is_space).count()
    }
}

/// Where a rendered paragraph ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphLayout {
    pub line_count: usize,
    /// Baseline the next line would have used.
    pub end_y: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 1: tokenize
// ────────────────────────────────────────────────────────────────────────────

/// Splits runs into word and space tokens.
///
/// Each whitespace sequence inside a run collapses into a single `" "` token.
/// Runs are never joined or separated: `[bold "Maria", normal ", inscrita"]`
/// yields `Maria` `,` ` ` `inscrita` with nothing between the first two.
pub fn tokenize<M: TextMeasurer + ?Sized>(runs: &[StyledRun], measurer: &M) -> Vec<Token> {
    let mut tokens = Vec::new();

    for run in runs {
        let mut word = String::new();
        let mut in_space = false;

        for c in run.text.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(word_token(std::mem::take(&mut word), run.bold, measurer));
                }
                if !in_space {
                    tokens.push(space_token(run.bold, measurer));
                    in_space = true;
                }
            } else {
                word.push(c);
                in_space = false;
            }
        }
        if !word.is_empty() {
            tokens.push(word_token(word, run.bold, measurer));
        }
    }

    tokens
}

fn word_token<M: TextMeasurer + ?Sized>(text: String, bold: bool, measurer: &M) -> Token {
    let width = measurer.measure(&text, bold);
    Token {
        text,
        bold,
        is_space: false,
        width,
    }
}

fn space_token<M: TextMeasurer + ?Sized>(bold: bool, measurer: &M) -> Token {
    Token {
        text: " ".to_string(),
        bold,
        is_space: true,
        width: measurer.measure(" ", bold),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 2: greedy line breaking
// ────────────────────────────────────────────────────────────────────────────

/// Greedily packs tokens into lines whose running width stays `<= max_width`.
///
/// - A space that would overflow is dropped and the line is flushed.
/// - A word that would overflow starts the next line, even when it alone is
///   wider than `max_width`. Words are never split.
/// - A space arriving on an empty line is dropped, so no line starts with one.
pub fn break_lines(tokens: Vec<Token>, max_width: f32) -> Vec<Line> {
    let mut rows: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut current_width = 0.0_f32;

    for token in tokens {
        if current.is_empty() {
            if token.is_space {
                continue;
            }
            current_width = token.width;
            current.push(token);
            continue;
        }

        if current_width + token.width > max_width {
            rows.push(std::mem::take(&mut current));
            if token.is_space {
                current_width = 0.0;
                continue;
            }
            current_width = token.width;
            current.push(token);
        } else {
            current_width += token.width;
            current.push(token);
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }

    let last = rows.len().saturating_sub(1);
    rows.into_iter()
        .enumerate()
        .map(|(i, tokens)| Line {
            tokens,
            justify: i != last,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 3: render
// ────────────────────────────────────────────────────────────────────────────

/// Draws `lines` starting with the first baseline at `(x, y)`.
///
/// Justified lines spread `max_width - visible_width` evenly over their own
/// gaps; the last line, lines without gaps and lines that already fill the
/// column keep natural spacing.
pub fn render_lines<C: TextCanvas + ?Sized>(
    lines: &[Line],
    x: f32,
    y: f32,
    max_width: f32,
    line_height: f32,
    canvas: &mut C,
) -> Result<ParagraphLayout, C::Error> {
    let mut cursor_y = y;

    for line in lines {
        let visible = line.visible_tokens();
        let gaps = line.gap_count();
        let slack = max_width - line.visible_width();
        let extra_per_gap = if line.justify && gaps > 0 && slack > 0.0 {
            slack / gaps as f32
        } else {
            0.0
        };

        let mut cursor_x = x;
        for token in visible {
            if token.is_space {
                cursor_x += token.width + extra_per_gap;
            } else {
                canvas.draw_text(&token.text, cursor_x, cursor_y, token.bold)?;
                cursor_x += token.width;
            }
        }
        cursor_y += line_height;
    }

    Ok(ParagraphLayout {
        line_count: lines.len(),
        end_y: cursor_y,
    })
}

/// Lays out and draws one paragraph of styled runs inside a column.
pub fn layout_paragraph<C: TextCanvas + ?Sized>(
    runs: &[StyledRun],
    x: f32,
    y: f32,
    max_width: f32,
    line_height: f32,
    canvas: &mut C,
) -> Result<ParagraphLayout, C::Error> {
    let tokens = tokenize(runs, &*canvas);
    let lines = break_lines(tokens, max_width);
    render_lines(&lines, x, y, max_width, line_height, canvas)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
