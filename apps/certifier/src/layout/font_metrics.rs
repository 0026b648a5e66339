//! Static font-metric tables for the certificate body font.
//!
//! Character widths are in em units (relative to font size) and follow the
//! standard Helvetica / Helvetica-Bold advance widths that PDF viewers use
//! for the base-14 fonts, so measurements match what the PDF collaborator
//! will actually draw.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32. Accented Latin-1 letters share the width of
//! their base letter.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font variant enum
// ────────────────────────────────────────────────────────────────────────────

/// The two weights a certificate paragraph can mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontVariant {
    Helvetica,
    HelveticaBold,
}

impl FontVariant {
    pub fn from_bold(bold: bool) -> Self {
        if bold {
            FontVariant::HelveticaBold
        } else {
            FontVariant::Helvetica
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Converts a typographic point length to millimetres.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

/// Placement of every element on a certificate page. All lengths in millimetres
/// unless the field name says otherwise.
///
/// The text box sits in the left column of the page so a template artwork can
/// occupy the right-hand side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub text_x: f32,
    pub text_y: f32,
    /// Column width the paragraph is justified against.
    pub text_width: f32,
    pub body_font_size_pt: f32,
    /// Baseline-to-baseline distance as a multiple of the body font size.
    pub line_height_factor: f32,
    pub qr_x: f32,
    pub qr_y: f32,
    pub qr_size: f32,
    /// Quiet-zone modules around the QR symbol.
    pub qr_margin: u8,
    pub caption_font_size_pt: f32,
    /// Gap between the bottom of the QR code and the caption baseline.
    pub caption_gap: f32,
    /// Inset of the plain border drawn when the event has no template artwork.
    pub border_inset: f32,
}

impl CertificateGeometry {
    /// Baseline-to-baseline distance of the body paragraph, in millimetres.
    pub fn line_height(&self) -> f32 {
        pt_to_mm(self.body_font_size_pt * self.line_height_factor)
    }
}

/// Returns the default geometry: A4 landscape, 14pt body in a 130mm column.
pub fn default_certificate_geometry() -> CertificateGeometry {
    CertificateGeometry {
        page_width: 297.0,
        page_height: 210.0,
        text_x: 15.0,
        text_y: 70.0,
        text_width: 130.0,
        body_font_size_pt: 14.0,
        line_height_factor: 1.5,
        qr_x: 25.0,
        qr_y: 145.0,
        qr_size: 30.0,
        qr_margin: 1,
        caption_font_size_pt: 9.0,
        caption_gap: 5.0,
        border_inset: 5.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one font variant.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: FontVariant,
    widths: [f32; 95],
    /// Width of the ordinal indicators `º` and `ª`.
    ordinal_width: f32,
    /// Fallback width for characters outside the table.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Measures `s` at `font_size_pt`, returning millimetres.
    pub fn measure_mm(&self, s: &str, font_size_pt: f32) -> f32 {
        pt_to_mm(self.measure_str(s) * font_size_pt)
    }

    fn char_width(&self, c: char) -> f32 {
        let c = fold_accent(c);
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == 'º' || c == 'ª' {
            self.ordinal_width
        } else if c.is_whitespace() {
            self.space_width
        } else {
            self.average_char_width
        }
    }
}

/// Maps accented Latin-1 letters to their unaccented base letter.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    font: FontVariant::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    ordinal_width: 0.365,
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: FontVariant::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    ordinal_width: 0.365,
    average_char_width: 0.611,
    space_width: 0.278,
};

/// Returns the static metric table for a given font variant.
pub fn get_metrics(font: FontVariant) -> &'static FontMetricTable {
    match font {
        FontVariant::Helvetica => &HELVETICA_TABLE,
        FontVariant::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
