//! Static font-metric tables for the six core faces both renderers draw with.
//!
//! Widths are the standard PDF core-font advance widths in 1/1000 em, the unit the
//! document engine itself uses. The preview canvas resolves to metric-compatible system
//! faces (Arial for Helvetica, Times New Roman for Times, Courier New for Courier), so the
//! same tables describe both sides.
//!
//! Tables cover ASCII 0x20..=0x7E (95 printable characters). Index = code - 32.
//! The remaining WinAnsi codes fall back to `average_char_width`.

use crate::layout::fonts::{FontFamily, FontWeight, ResolvedFont};

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Advance widths and vertical metrics for one face, in 1/1000 em.
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
#[derive(Debug)]
pub struct FontMetricTable {
    pub font: ResolvedFont,
    widths: [u16; 95],
    /// Fallback width for WinAnsi codes outside the ASCII range.
    pub average_char_width: u16,
    pub ascender: i16,
    /// Negative: distance below the baseline.
    pub descender: i16,
}

impl FontMetricTable {
    /// Advance width of one WinAnsi code.
    pub fn advance(&self, code: u8) -> u16 {
        match code {
            32..=126 => self.widths[(code - 32) as usize],
            _ => self.average_char_width,
        }
    }

    /// Total advance of an encoded string, in 1/1000 em.
    pub fn measure_codes(&self, codes: &[u8]) -> u32 {
        codes.iter().map(|&c| u32::from(self.advance(c))).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// WinAnsi encoding
// ────────────────────────────────────────────────────────────────────────────

/// Byte written for characters the core fonts cannot draw.
pub const REPLACEMENT_CODE: u8 = b'?';

/// Maps a character to its WinAnsiEncoding code, if it has one.
pub fn win_ansi_code(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}

/// Encodes text for a core-font `Tj` operator. Unencodable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_code(c).unwrap_or(REPLACEMENT_CODE))
        .collect()
}

/// Replaces characters the core fonts cannot draw with `?`, leaving whitespace intact.
///
/// Both renderers lay out this form of the text, so the preview never shows a glyph
/// the document cannot contain.
pub fn printable_text(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_whitespace() || win_ansi_code(c).is_some() {
                c
            } else {
                REPLACEMENT_CODE as char
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    font: ResolvedFont {
        family: FontFamily::Sans,
        weight: FontWeight::Normal,
    },
    #[rustfmt::skip]
    widths: [
        // sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
    ascender: 718,
    descender: -207,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: ResolvedFont {
        family: FontFamily::Sans,
        weight: FontWeight::Bold,
    },
    #[rustfmt::skip]
    widths: [
        // sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
    ascender: 718,
    descender: -207,
};

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    font: ResolvedFont {
        family: FontFamily::Serif,
        weight: FontWeight::Normal,
    },
    #[rustfmt::skip]
    widths: [
        // sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        278, 278, 564, 564, 564, 444, 921,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 469, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        // {    |    }    ~
        480, 200, 480, 541,
    ],
    average_char_width: 500,
    ascender: 683,
    descender: -217,
};

static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: ResolvedFont {
        family: FontFamily::Serif,
        weight: FontWeight::Bold,
    },
    #[rustfmt::skip]
    widths: [
        // sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        333, 333, 570, 570, 570, 500, 930,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        // [    \    ]    ^    _    `
        333, 278, 333, 581, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        // {    |    }    ~
        394, 220, 394, 520,
    ],
    average_char_width: 556,
    ascender: 676,
    descender: -205,
};

/// Courier is monospaced: every glyph advances 600/1000 em.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    font: ResolvedFont {
        family: FontFamily::Mono,
        weight: FontWeight::Normal,
    },
    widths: [600; 95],
    average_char_width: 600,
    ascender: 629,
    descender: -157,
};

static COURIER_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: ResolvedFont {
        family: FontFamily::Mono,
        weight: FontWeight::Bold,
    },
    widths: [600; 95],
    average_char_width: 600,
    ascender: 626,
    descender: -142,
};

/// Returns the static metric table for a resolved face.
pub fn get_metrics(font: ResolvedFont) -> &'static FontMetricTable {
    match (font.family, font.weight) {
        (FontFamily::Sans, FontWeight::Normal) => &HELVETICA_TABLE,
        (FontFamily::Sans, FontWeight::Bold) => &HELVETICA_BOLD_TABLE,
        (FontFamily::Serif, FontWeight::Normal) => &TIMES_ROMAN_TABLE,
        (FontFamily::Serif, FontWeight::Bold) => &TIMES_BOLD_TABLE,
        (FontFamily::Mono, FontWeight::Normal) => &COURIER_TABLE,
        (FontFamily::Mono, FontWeight::Bold) => &COURIER_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn face(family: FontFamily, weight: FontWeight) -> ResolvedFont {
        ResolvedFont { family, weight }
    }

    #[test]
    fn test_every_face_has_a_table_for_itself() {
        for family in [FontFamily::Sans, FontFamily::Serif, FontFamily::Mono] {
            for weight in [FontWeight::Normal, FontWeight::Bold] {
                let font = face(family, weight);
                assert_eq!(get_metrics(font).font, font);
            }
        }
    }

    #[test]
    fn test_measure_empty_is_zero() {
        let metrics = get_metrics(face(FontFamily::Sans, FontWeight::Normal));
        assert_eq!(metrics.measure_codes(&[]), 0);
    }

    #[test]
    fn test_measure_ascii_word() {
        let metrics = get_metrics(face(FontFamily::Sans, FontWeight::Normal));
        // J(500) o(556) h(556) n(556) = 2168
        assert_eq!(metrics.measure_codes(b"John"), 2168);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = encode_win_ansi("Participant of the Year");
        let regular = get_metrics(face(FontFamily::Sans, FontWeight::Normal));
        let bold = get_metrics(face(FontFamily::Sans, FontWeight::Bold));
        assert!(bold.measure_codes(&text) > regular.measure_codes(&text));
    }

    #[test]
    fn test_courier_is_monospaced() {
        let metrics = get_metrics(face(FontFamily::Mono, FontWeight::Normal));
        assert_eq!(metrics.measure_codes(b"iiii"), metrics.measure_codes(b"WWWW"));
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = get_metrics(face(FontFamily::Serif, FontWeight::Normal));
        let codes = encode_win_ansi("é");
        assert_eq!(codes, vec![0xE9]);
        assert_eq!(metrics.measure_codes(&codes), u32::from(metrics.average_char_width));
    }

    #[test]
    fn test_win_ansi_specials_and_replacement() {
        assert_eq!(win_ansi_code('€'), Some(0x80));
        assert_eq!(win_ansi_code('—'), Some(0x97));
        assert_eq!(win_ansi_code('Ł'), None);
        assert_eq!(encode_win_ansi("Zoë 李"), vec![b'Z', b'o', 0xEB, b' ', b'?']);
    }

    #[test]
    fn test_printable_text_keeps_whitespace() {
        assert_eq!(printable_text("Anna\tŁukasz"), "Anna\t?ukasz");
        assert_eq!(printable_text("José María"), "José María");
    }
}
