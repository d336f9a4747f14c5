//! Plan text to PDF
//!
//! Markup is stripped with one regex pass, every non-blank line becomes a
//! paragraph, and paragraphs are word-wrapped onto A4 pages in Helvetica.
//! Each export gets its own file under `<export_dir>/<session_id>/`, and
//! earlier exports of that session are removed once it is written.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use regex::Regex;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

pub const DOWNLOAD_NAME: &str = "PLANOVA_AI_Travel_Plan.pdf";

const DOCUMENT_TITLE: &str = "PLANOVA AI Travel Plan";

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_MM: f32 = 20.0;
const FONT_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 5.5;
/// 0.2 inch
const PARAGRAPH_SPACING_MM: f32 = 5.08;
/// Helvetica at 11pt over the 170mm text column
const MAX_CHARS_PER_LINE: usize = 90;

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("markup pattern is valid"));

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Render(String),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Remove anything that looks like a tag. Unterminated `<` is left alone.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    MARKUP.replace_all(text, "")
}

/// Non-blank lines of the cleaned text, trimmed.
pub fn paragraphs(plan: &str) -> Vec<String> {
    strip_markup(plan)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let mut word = word;
        loop {
            let word_len = word.chars().count();
            let needed = if current_len == 0 {
                word_len
            } else {
                current_len + 1 + word_len
            };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                }
                current.push_str(word);
                current_len = needed;
                break;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            // Word alone exceeds the width
            let split_at = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(i, _)| i);
            let (head, tail) = word.split_at(split_at);
            lines.push(head.to_string());
            word = tail;
            if word.is_empty() {
                break;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// One line of text at a vertical position (mm from the page bottom)
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    y: f32,
    text: String,
}

/// Assign wrapped lines to pages, top to bottom.
fn layout(paragraphs: &[String]) -> Vec<Vec<PlacedLine>> {
    let top = PAGE_HEIGHT.0 - MARGIN_MM;
    let mut pages = vec![Vec::new()];
    let mut y = top;

    for paragraph in paragraphs {
        for line in wrap(paragraph, MAX_CHARS_PER_LINE) {
            if y - LINE_HEIGHT_MM < MARGIN_MM {
                pages.push(Vec::new());
                y = top;
            }
            y -= LINE_HEIGHT_MM;
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine { y, text: line });
            }
        }
        y -= PARAGRAPH_SPACING_MM;
    }
    pages
}

/// Render the plan to PDF bytes.
pub fn render_pdf(plan: &str) -> Result<Vec<u8>, ExportError> {
    let pages = layout(&paragraphs(plan));

    let (doc, first_page, first_layer) =
        PdfDocument::new(DOCUMENT_TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render(e.to_string()))?;

    for (index, lines) in pages.into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);
        for line in lines {
            layer.use_text(line.text, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(line.y), &font);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Render(e.to_string()))
}

/// A written export
#[derive(Debug)]
pub struct ExportedPlan {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Writes per-request PDF files under a root directory
pub struct Exporter {
    root: PathBuf,
}

impl Exporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Render `plan` and write it to a fresh file for `session`.
    pub async fn export(&self, session: Uuid, plan: &str) -> Result<ExportedPlan, ExportError> {
        let plan = plan.to_string();
        let bytes = tokio::task::spawn_blocking(move || render_pdf(&plan))
            .await
            .map_err(|e| ExportError::Render(format!("render task failed: {e}")))??;

        let dir = self.root.join(session.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;
        let pruned = prune_except(&dir, &path).await?;

        tracing::info!(path = %path.display(), size = bytes.len(), pruned, "Exported plan");
        Ok(ExportedPlan { path, bytes })
    }
}

/// Remove every earlier export in `dir`, keeping `keep`. Returns how many
/// files were removed. A file already gone counts as removed by someone else.
async fn prune_except(dir: &Path, keep: &Path) -> Result<usize, ExportError> {
    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path == keep || path.extension() != Some(OsStr::new("pdf")) {
            continue;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(removed)
}
