//! Paginated PDF rendering of a story.
//!
//! The story is laid out one line per fixed-size text cell, top to bottom,
//! starting a new page whenever the next cell would cross the bottom margin.
//! Layout happens in millimetres with the origin at the top-left corner of the
//! page; serialization converts to PDF points.
//!
//! The writer emits a self-contained PDF 1.4 file using the standard Helvetica
//! font, so no font data is embedded:
//!
//! ```text
//! 1 Catalog -> 2 Pages -> [Page, Content]*
//!              3 Font (Helvetica, WinAnsiEncoding)
//!              4 Info
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Horizontal padding between the cell edge and its text.
const CELL_PADDING: f32 = 1.0;

/// What happens to a line wider than its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineOverflow {
    /// Keep the line in one cell and clip it to the cell bounds.
    #[default]
    Clip,
    /// Break the line at word boundaries into several cells.
    Wrap,
}

impl fmt::Display for LineOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineOverflow::Clip => f.write_str("clip"),
            LineOverflow::Wrap => f.write_str("wrap"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown overflow mode '{0}' (expected clip or wrap)")]
pub struct UnknownOverflow(String);

impl FromStr for LineOverflow {
    type Err = UnknownOverflow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clip" | "truncate" => Ok(LineOverflow::Clip),
            "wrap" => Ok(LineOverflow::Wrap),
            _ => Err(UnknownOverflow(s.to_string())),
        }
    }
}

/// Page geometry and typography, in millimetres unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
    /// Content may not extend below `page_height - bottom_margin`.
    pub bottom_margin: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Font size in points.
    pub font_size: f32,
    pub overflow: LineOverflow,
}

impl Default for PdfLayout {
    /// A4 portrait, 200 x 10 cells, Helvetica 12pt, 15mm bottom margin.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            left_margin: 10.0,
            top_margin: 10.0,
            bottom_margin: 15.0,
            cell_width: 200.0,
            cell_height: 10.0,
            font_size: 12.0,
            overflow: LineOverflow::Clip,
        }
    }
}

impl PdfLayout {
    pub fn with_overflow(mut self, overflow: LineOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    fn page_break_trigger(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Width available to text inside a cell.
    fn text_width(&self) -> f32 {
        (self.cell_width - 2.0 * CELL_PADDING).max(0.0)
    }

    /// Font size converted to millimetres.
    fn font_size_mm(&self) -> f32 {
        self.font_size / PT_PER_MM
    }
}

/// One line of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCell {
    /// Left edge of the cell.
    pub x: f32,
    /// Top edge of the cell, measured from the top of the page.
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub cells: Vec<TextCell>,
}

/// A laid-out story, ready to serialize.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    layout: PdfLayout,
    pages: Vec<Page>,
}

impl PdfDocument {
    /// Lay out `story` one line per cell.
    pub fn layout_story(story: &str, layout: &PdfLayout) -> Self {
        let mut pages = vec![Page::default()];
        let mut y = layout.top_margin;

        for raw_line in story.split('\n') {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            let fragments = match layout.overflow {
                LineOverflow::Clip => vec![line.to_string()],
                LineOverflow::Wrap => {
                    wrap_line(line, layout.text_width(), layout.font_size_mm())
                }
            };

            for text in fragments {
                let page_has_cells = pages.last().is_some_and(|p| !p.cells.is_empty());
                if y + layout.cell_height > layout.page_break_trigger() && page_has_cells {
                    pages.push(Page::default());
                    y = layout.top_margin;
                }
                if let Some(page) = pages.last_mut() {
                    page.cells.push(TextCell {
                        x: layout.left_margin,
                        y,
                        text,
                    });
                }
                y += layout.cell_height;
            }
        }

        Self {
            layout: layout.clone(),
            pages,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All cells in reading order.
    pub fn cells(&self) -> impl Iterator<Item = &TextCell> {
        self.pages.iter().flat_map(|p| p.cells.iter())
    }

    /// Serialize to PDF bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        const CATALOG: usize = 1;
        const PAGES: usize = 2;
        const FONT: usize = 3;
        const INFO: usize = 4;
        const FIRST_PAGE: usize = 5;

        let page_obj = |i: usize| FIRST_PAGE + 2 * i;
        let content_obj = |i: usize| FIRST_PAGE + 2 * i + 1;
        let object_count = INFO + 2 * self.pages.len();

        let mut out = ObjectWriter::new(object_count);

        out.begin(CATALOG);
        out.push_str(&format!("<< /Type /Catalog /Pages {PAGES} 0 R >>\n"));
        out.end();

        let kids = (0..self.pages.len())
            .map(|i| format!("{} 0 R", page_obj(i)))
            .collect::<Vec<_>>()
            .join(" ");
        out.begin(PAGES);
        out.push_str(&format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} >>\n",
            self.pages.len()
        ));
        out.end();

        out.begin(FONT);
        out.push_str(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>\n",
        );
        out.end();

        out.begin(INFO);
        out.push_str(&format!(
            "<< /Title (Story) /Producer (story-writer) /CreationDate (D:{}Z) >>\n",
            chrono::Utc::now().format("%Y%m%d%H%M%S")
        ));
        out.end();

        let media_box = format!(
            "[0 0 {:.2} {:.2}]",
            self.layout.page_width * PT_PER_MM,
            self.layout.page_height * PT_PER_MM
        );

        for (i, page) in self.pages.iter().enumerate() {
            out.begin(page_obj(i));
            out.push_str(&format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox {media_box} \
                 /Resources << /Font << /F1 {FONT} 0 R >> >> /Contents {} 0 R >>\n",
                content_obj(i)
            ));
            out.end();

            let stream = self.content_stream(page);
            out.begin(content_obj(i));
            out.push_str(&format!("<< /Length {} >>\nstream\n", stream.len()));
            out.push_bytes(&stream);
            out.push_str("\nendstream\n");
            out.end();
        }

        out.finish(CATALOG, INFO)
    }

    fn content_stream(&self, page: &Page) -> Vec<u8> {
        let layout = &self.layout;
        let k = PT_PER_MM;
        let mut stream = Vec::new();
        push_str(&mut stream, &format!("BT /F1 {:.2} Tf ET\n", layout.font_size));

        for cell in &page.cells {
            if cell.text.is_empty() {
                continue;
            }
            let tx = (cell.x + CELL_PADDING) * k;
            let baseline = cell.y + 0.5 * layout.cell_height + 0.3 * layout.font_size_mm();
            let ty = (layout.page_height - baseline) * k;

            let clip = layout.overflow == LineOverflow::Clip;
            if clip {
                push_str(
                    &mut stream,
                    &format!(
                        "q {:.2} {:.2} {:.2} {:.2} re W n ",
                        cell.x * k,
                        (layout.page_height - cell.y - layout.cell_height) * k,
                        layout.cell_width * k,
                        layout.cell_height * k
                    ),
                );
            }
            push_str(&mut stream, &format!("BT {tx:.2} {ty:.2} Td ("));
            stream.extend_from_slice(&encode_text(&cell.text));
            push_str(&mut stream, ") Tj ET");
            if clip {
                push_str(&mut stream, " Q");
            }
            stream.push(b'\n');
        }

        stream
    }
}

/// Accumulates objects and remembers where each one starts.
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new(object_count: usize) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: vec![0; object_count],
        }
    }

    fn begin(&mut self, number: usize) {
        self.offsets[number - 1] = self.buf.len();
        push_str(&mut self.buf, &format!("{number} 0 obj\n"));
    }

    fn end(&mut self) {
        self.buf.extend_from_slice(b"endobj\n");
    }

    fn push_str(&mut self, s: &str) {
        push_str(&mut self.buf, s);
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;

        push_str(&mut self.buf, &format!("xref\n0 {size}\n0000000000 65535 f \n"));
        for offset in &self.offsets {
            push_str(&mut self.buf, &format!("{offset:010} 00000 n \n"));
        }
        push_str(
            &mut self.buf,
            &format!(
                "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
            ),
        );
        self.buf
    }
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
}

/// Encode `text` as an escaped WinAnsi string body (without the parentheses).
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = win_ansi_byte(c);
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

/// Map a character to its WinAnsiEncoding byte; unmappable characters become `?`.
fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        c if c.is_control() => b' ',
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

/// Helvetica advance width in thousandths of an em.
fn helvetica_width(c: char) -> u16 {
    const ASCII: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        278, 278, 278, 469, 556, 333, // '['..'`'
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
        334, 260, 334, 584, // '{'..'~'
    ];
    match win_ansi_byte(c) {
        b @ 0x20..=0x7E => ASCII[(b - 0x20) as usize],
        0x85 | 0x97 => 1000,
        0x91 | 0x92 | 0x82 => 222,
        0x93 | 0x94 | 0x84 => 333,
        0x95 => 350,
        _ => 556,
    }
}

fn text_width_mm(text: &str, font_size_mm: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(helvetica_width(c))).sum();
    units as f32 * font_size_mm / 1000.0
}

/// Greedy word wrap; words wider than a whole line are broken between characters.
///
/// Leading indentation and runs of spaces are kept. A single space at a break
/// is dropped.
fn wrap_line(line: &str, max_width: f32, font_size_mm: f32) -> Vec<String> {
    if text_width_mm(line, font_size_mm) <= max_width {
        return vec![line.to_string()];
    }

    let mut fragments = Vec::new();
    let mut current = String::new();
    // Whether `current` has taken a word, possibly an empty one from a space run
    let mut open = false;

    for word in line.split(' ') {
        let candidate = if open {
            format!("{current} {word}")
        } else {
            word.to_string()
        };
        if text_width_mm(&candidate, font_size_mm) <= max_width {
            current = candidate;
            open = true;
            continue;
        }

        if !current.is_empty() {
            fragments.push(std::mem::take(&mut current));
        }
        current.clear();
        open = !word.is_empty();
        if text_width_mm(word, font_size_mm) <= max_width {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            if text_width_mm(&current, font_size_mm) > max_width && current.chars().count() > 1 {
                current.pop();
                fragments.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() || fragments.is_empty() {
        fragments.push(current);
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_empty_story_is_single_blank_page() {
        let doc = PdfDocument::layout_story("", &PdfLayout::default());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.cells().count(), 1);
        assert_eq!(doc.cells().next().unwrap().text, "");

        let bytes = doc.to_bytes();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert_eq!(count(&bytes, b"/Count 1"), 1);
        assert_eq!(count(&bytes, b") Tj"), 0);
    }

    #[test]
    fn test_lines_become_cells_in_order() {
        let doc = PdfDocument::layout_story("first\nsecond\nthird", &PdfLayout::default());
        let cells: Vec<_> = doc.cells().collect();
        assert_eq!(cells.len(), 3);
        assert_eq!(
            cells.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
        assert_eq!(cells.iter().map(|c| c.y).collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);
        assert!(cells.iter().all(|c| c.x == 10.0));

        let bytes = doc.to_bytes();
        assert_eq!(count(&bytes, b") Tj"), 3);
        let a = find(&bytes, b"(first) Tj").unwrap();
        let b = find(&bytes, b"(second) Tj").unwrap();
        let c = find(&bytes, b"(third) Tj").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_blank_lines_take_space_but_draw_nothing() {
        let doc = PdfDocument::layout_story("a\n\nb", &PdfLayout::default());
        let ys: Vec<f32> = doc.cells().map(|c| c.y).collect();
        assert_eq!(ys, vec![10.0, 20.0, 30.0]);
        assert_eq!(count(&doc.to_bytes(), b") Tj"), 2);
    }

    #[test]
    fn test_page_break_after_bottom_margin() {
        let story = (1..=28).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let doc = PdfDocument::layout_story(&story, &PdfLayout::default());

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[0].cells.len(), 27);
        assert_eq!(doc.pages()[0].cells.last().unwrap().y, 270.0);
        assert_eq!(doc.pages()[1].cells.len(), 1);
        assert_eq!(doc.pages()[1].cells[0].y, 10.0);
        assert_eq!(doc.pages()[1].cells[0].text, "line 28");

        let bytes = doc.to_bytes();
        assert_eq!(count(&bytes, b"/Type /Page "), 2);
        assert_eq!(count(&bytes, b"/Count 2"), 1);
    }

    #[test]
    fn test_many_pages() {
        let story = vec!["x"; 60].join("\n");
        let doc = PdfDocument::layout_story(&story, &PdfLayout::default());
        let sizes: Vec<usize> = doc.pages().iter().map(|p| p.cells.len()).collect();
        assert_eq!(sizes, vec![27, 27, 6]);
    }

    #[test]
    fn test_carriage_returns_are_dropped() {
        let doc = PdfDocument::layout_story("one\r\ntwo\r\n", &PdfLayout::default());
        let texts: Vec<_> = doc.cells().map(|c| c.text.clone()).collect();
        assert_eq!(texts, vec!["one", "two", ""]);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let story = vec!["text"; 40].join("\n");
        let bytes = PdfDocument::layout_story(&story, &PdfLayout::default()).to_bytes();

        let startxref = find(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let end = startxref + bytes[startxref..].iter().position(|b| *b == b'\n').unwrap();
        let xref_offset: usize = std::str::from_utf8(&bytes[startxref..end])
            .unwrap()
            .parse()
            .unwrap();
        assert!(bytes[xref_offset..].starts_with(b"xref\n0 9\n"));

        let table = &bytes[xref_offset..];
        let entries_start = find(table, b"65535 f \n").unwrap() + b"65535 f \n".len();
        for (i, entry) in table[entries_start..].chunks(20).take(8).enumerate() {
            let offset: usize = std::str::from_utf8(&entry[..10]).unwrap().parse().unwrap();
            let expected = format!("{} 0 obj\n", i + 1);
            assert!(
                bytes[offset..].starts_with(expected.as_bytes()),
                "object {} not at offset {offset}",
                i + 1
            );
        }
    }

    #[test]
    fn test_stream_length_matches() {
        let bytes = PdfDocument::layout_story("hello", &PdfLayout::default()).to_bytes();
        let len_at = find(&bytes, b"/Length ").unwrap() + b"/Length ".len();
        let len_end = len_at + bytes[len_at..].iter().position(|b| *b == b' ').unwrap();
        let length: usize = std::str::from_utf8(&bytes[len_at..len_end]).unwrap().parse().unwrap();

        let data_start = find(&bytes, b"stream\n").unwrap() + b"stream\n".len();
        let data_end = find(&bytes, b"\nendstream").unwrap();
        assert_eq!(data_end - data_start, length);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let bytes = PdfDocument::layout_story("f(x) \\ y", &PdfLayout::default()).to_bytes();
        assert!(find(&bytes, b"(f\\(x\\) \\\\ y) Tj").is_some());
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_text("café"), b"caf\xE9".to_vec());
        assert_eq!(encode_text("“a” — b…"), b"\x93a\x94 \x97 b\x85".to_vec());
        assert_eq!(encode_text("日本"), b"??".to_vec());
        assert_eq!(encode_text("a\tb"), b"a b".to_vec());
    }

    #[test]
    fn test_clip_keeps_long_line_whole() {
        let long = "word ".repeat(80);
        let doc = PdfDocument::layout_story(&long, &PdfLayout::default());
        assert_eq!(doc.cells().count(), 1);
        let bytes = doc.to_bytes();
        assert_eq!(count(&bytes, b" re W n "), 1);
        assert!(find(&bytes, long.as_bytes()).is_some());
    }

    #[test]
    fn test_wrap_splits_long_line() {
        let layout = PdfLayout::default().with_overflow(LineOverflow::Wrap);
        let long = "The quick brown fox jumps over the lazy dog. ".repeat(6);
        let long = long.trim_end();
        let doc = PdfDocument::layout_story(long, &layout);

        let cells: Vec<_> = doc.cells().collect();
        assert!(cells.len() > 1);
        for cell in &cells {
            assert!(text_width_mm(&cell.text, layout.font_size_mm()) <= layout.text_width());
        }
        let rejoined = cells.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, long);
        assert_eq!(count(&doc.to_bytes(), b" re W n "), 0);
    }

    #[test]
    fn test_wrap_breaks_unspaced_runs() {
        let layout = PdfLayout::default().with_overflow(LineOverflow::Wrap);
        let run = "W".repeat(200);
        let doc = PdfDocument::layout_story(&run, &layout);
        let cells: Vec<_> = doc.cells().collect();
        assert!(cells.len() > 1);
        assert_eq!(cells.iter().map(|c| c.text.len()).sum::<usize>(), 200);
    }

    #[test]
    fn test_wrap_keeps_short_and_empty_lines() {
        assert_eq!(wrap_line("", 198.0, 4.2), vec![String::new()]);
        assert_eq!(wrap_line("short", 198.0, 4.2), vec!["short".to_string()]);
    }

    #[test]
    fn test_wrap_keeps_indentation_and_space_runs() {
        let line = format!("    first  second {}", "filler ".repeat(30));
        let line = line.trim_end();
        let fragments = wrap_line(line, 50.0, 4.2);

        assert!(fragments.len() > 1);
        assert!(fragments[0].starts_with("    first  second filler"));
        assert_eq!(fragments.join(" "), line);
    }

    #[test]
    fn test_overflow_parse() {
        assert_eq!("wrap".parse::<LineOverflow>(), Ok(LineOverflow::Wrap));
        assert_eq!(" Clip ".parse::<LineOverflow>(), Ok(LineOverflow::Clip));
        assert!("reflow".parse::<LineOverflow>().is_err());
    }
}
