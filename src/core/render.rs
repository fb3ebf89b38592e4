//! Renderer module
//!
//! Turns display lines into output: a styled text tree, a JSON array, or
//! JSON Lines.

use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::core::model::{Connector, DisplayLine, LineStyle, Segment};
use crate::core::style::Styler;

/// Glyph set used to draw the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub mid: &'static str,
    pub last: &'static str,
    pub pass_through: &'static str,
    pub blank: &'static str,
    pub dir_marker: Option<&'static str>,
    pub file_marker: Option<&'static str>,
}

impl Glyphs {
    pub const UNICODE: Glyphs = Glyphs {
        mid: "├── ",
        last: "└── ",
        pass_through: "│   ",
        blank: "    ",
        dir_marker: Some("📁"),
        file_marker: Some("📄"),
    };

    pub const ASCII: Glyphs = Glyphs {
        mid: "|-- ",
        last: "`-- ",
        pass_through: "|   ",
        blank: "    ",
        dir_marker: None,
        file_marker: None,
    };

    pub fn for_ascii(ascii: bool) -> Self {
        if ascii {
            Self::ASCII
        } else {
            Self::UNICODE
        }
    }

    fn segment(&self, segment: Segment) -> &'static str {
        match segment {
            Segment::PassThrough => self.pass_through,
            Segment::Blank => self.blank,
        }
    }

    fn connector(&self, connector: Connector) -> &'static str {
        match connector {
            Connector::Mid => self.mid,
            Connector::Last => self.last,
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::UNICODE
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "tree" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub glyphs: Glyphs,
    pub styler: Styler,
    pub pretty: bool,
}

/// Counts gathered while writing a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub directories: usize,
    pub files: usize,
    pub errors: usize,
}

impl TreeStats {
    fn record(&mut self, line: &DisplayLine) {
        match line.style {
            LineStyle::Directory => self.directories += 1,
            LineStyle::File => self.files += 1,
            LineStyle::Error => self.errors += 1,
        }
    }
}

#[derive(Serialize)]
struct LineRecord<'a> {
    depth: usize,
    #[serde(flatten)]
    line: &'a DisplayLine,
}

/// Writes display lines to an output sink
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Format one line of the text tree
    pub fn format_line(&self, line: &DisplayLine) -> String {
        let glyphs = &self.config.glyphs;
        let styler = &self.config.styler;

        let mut out: String = line
            .indent
            .segments()
            .iter()
            .map(|s| glyphs.segment(*s))
            .collect();
        if let Some(connector) = line.connector {
            out.push_str(glyphs.connector(connector));
        }

        let marker = match line.style {
            LineStyle::Directory => glyphs.dir_marker,
            LineStyle::File => glyphs.file_marker,
            LineStyle::Error => None,
        };
        let text = match marker {
            Some(marker) => format!("{} {}", marker, line.label),
            None => line.label.clone(),
        };
        out.push_str(&styler.apply(line.style, &text));
        if line.style == LineStyle::Directory {
            out.push('/');
        }
        out
    }

    /// Text header announcing the root
    pub fn format_header(&self, root: &Path) -> String {
        self.config
            .styler
            .header(&format!("Directory structure of: {}", root.display()))
    }

    /// Stream the lines of `root`'s tree to `writer`
    pub fn write_tree<W, I>(&self, root: &Path, lines: I, mut writer: W) -> io::Result<TreeStats>
    where
        W: Write,
        I: IntoIterator<Item = DisplayLine>,
    {
        let mut stats = TreeStats::default();
        match self.config.format {
            OutputFormat::Text => {
                writeln!(writer, "{}", self.format_header(root))?;
                writeln!(writer)?;
                for line in lines {
                    stats.record(&line);
                    writeln!(writer, "{}", self.format_line(&line))?;
                }
            }
            OutputFormat::Jsonl => {
                for line in lines {
                    stats.record(&line);
                    let record = LineRecord {
                        depth: line.depth(),
                        line: &line,
                    };
                    // One object per line, even with `pretty`
                    serde_json::to_writer(&mut writer, &record)?;
                    writeln!(writer)?;
                }
            }
            OutputFormat::Json => {
                let lines: Vec<DisplayLine> = lines.into_iter().collect();
                let records: Vec<LineRecord<'_>> = lines
                    .iter()
                    .map(|line| {
                        stats.record(line);
                        LineRecord {
                            depth: line.depth(),
                            line,
                        }
                    })
                    .collect();
                if self.config.pretty {
                    serde_json::to_writer_pretty(&mut writer, &records)?;
                } else {
                    serde_json::to_writer(&mut writer, &records)?;
                }
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(stats)
    }
}
