use cinefetch_application::ports::PlaceholderRenderer;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

const WIDTH: u32 = 300;
const HEIGHT: u32 = 450;
const MAX_LINES: usize = 4;
const MAX_LINE_CHARS: usize = 18;

/// Poster-sized SVG with the title centred on a colour derived from it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgPlaceholderRenderer;

impl SvgPlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }

    fn background(title: &str) -> String {
        let digest = Sha256::digest(title.as_bytes());
        // Keep channels in the darker half so white text stays readable.
        let (r, g, b) = (digest[0] / 2, digest[1] / 2, digest[2] / 2);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    fn wrap(title: &str) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in title.split_whitespace() {
            let word: String = word.chars().take(MAX_LINE_CHARS).collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };

            if needed > MAX_LINE_CHARS && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }

        if lines.len() > MAX_LINES {
            lines.truncate(MAX_LINES);
            if let Some(last) = lines.last_mut() {
                let kept: String = last.chars().take(MAX_LINE_CHARS - 1).collect();
                *last = format!("{}…", kept);
            }
        }
        lines
    }
}

pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

impl PlaceholderRenderer for SvgPlaceholderRenderer {
    fn render(&self, title: &str) -> String {
        let lines = Self::wrap(title);
        let line_height = 34;
        let first_y = HEIGHT as i32 / 2 - ((lines.len() as i32 - 1) * line_height) / 2;

        let mut svg = String::with_capacity(512);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = WIDTH,
            h = HEIGHT
        );
        let _ = write!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            Self::background(title)
        );
        let _ = write!(
            svg,
            r##"<text x="50%" font-family="sans-serif" font-size="26" fill="#ffffff" text-anchor="middle">"##
        );
        for (i, line) in lines.iter().enumerate() {
            let _ = write!(
                svg,
                r#"<tspan x="50%" y="{}">{}</tspan>"#,
                first_y + i as i32 * line_height,
                escape_xml(line)
            );
        }
        svg.push_str("</text></svg>");
        svg
    }
}
