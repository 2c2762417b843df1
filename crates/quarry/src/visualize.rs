//! Standalone HTML visualization of annotated documents.
//!
//! Produces a single self-contained page: the source text with aligned
//! extractions highlighted, a per-class legend, and controls for stepping
//! through extractions. No external assets, so the file can be opened
//! directly or attached to a report.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::data::{AnnotatedDocument, CharInterval, Extraction};
use crate::error::{QuarryError, Result};
use crate::io;

/// Highlight palette, assigned to classes in order of first appearance.
const PALETTE: [&str; 10] = [
    "#a8dadc", "#f4a261", "#bde0bd", "#e9c46a", "#d8b4de", "#ffb4a2", "#90caf9", "#f6e2a9",
    "#c5e1a5", "#f1b6c1",
];

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Extractions - __DOC_ID__</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #fafafa; color: #222; }
  .qx-wrap { max-width: 900px; margin: 2rem auto; padding: 0 1rem; }
  .qx-legend { margin-bottom: 1rem; }
  .qx-chip { display: inline-block; padding: 0.15rem 0.6rem; margin: 0 0.4rem 0.4rem 0;
             border-radius: 1rem; font-size: 0.85rem; }
  .qx-text { background: #fff; border: 1px solid #ddd; border-radius: 6px; padding: 1.25rem;
             white-space: pre-wrap; line-height: 1.6; }
  .qx-mark { border-radius: 3px; padding: 0 1px; cursor: pointer; }
  .qx-mark.qx-current { outline: 2px solid #1d3557; }
  .qx-controls { margin: 1rem 0; display: flex; gap: 0.5rem; align-items: center; }
  .qx-controls button { padding: 0.35rem 0.9rem; border: 1px solid #bbb; border-radius: 4px;
                        background: #fff; cursor: pointer; }
  .qx-detail { background: #fff; border: 1px solid #ddd; border-radius: 6px; padding: 1rem;
               margin-top: 1rem; min-height: 3rem; font-size: 0.9rem; }
  .qx-detail table { border-collapse: collapse; }
  .qx-detail td { padding: 0.1rem 0.75rem 0.1rem 0; vertical-align: top; }
  .qx-unaligned { color: #999; font-style: italic; }
</style>
</head>
<body>
<div class="qx-wrap">
  <h2>Extractions <small>__DOC_ID__</small></h2>
  <div class="qx-legend">__LEGEND__</div>
  <div class="qx-controls">
    <button id="qx-prev">&#8592; Prev</button>
    <button id="qx-play">&#9654; Play</button>
    <button id="qx-next">Next &#8594;</button>
    <span id="qx-pos"></span>
  </div>
  <div class="qx-text">__BODY__</div>
  <div class="qx-detail" id="qx-detail">Select an extraction to see its details.</div>
</div>
<script>
const extractions = __DATA__;
let current = -1;
let timer = null;

function show(i) {
  if (!extractions.length) return;
  current = (i + extractions.length) % extractions.length;
  document.querySelectorAll('.qx-mark').forEach(el => el.classList.remove('qx-current'));
  const e = extractions[current];
  const mark = document.getElementById('qx-ext-' + e.index);
  if (mark) {
    mark.classList.add('qx-current');
    mark.scrollIntoView({ block: 'center', behavior: 'smooth' });
  }
  let html = '<table>';
  html += '<tr><td><b>Class</b></td><td>' + e.extraction_class + '</td></tr>';
  html += '<tr><td><b>Text</b></td><td>' + e.extraction_text + '</td></tr>';
  for (const [k, v] of Object.entries(e.attributes)) {
    html += '<tr><td>' + k + '</td><td>' + v + '</td></tr>';
  }
  if (!e.aligned) {
    html += '<tr><td colspan="2" class="qx-unaligned">not aligned to the source text</td></tr>';
  }
  html += '</table>';
  document.getElementById('qx-detail').innerHTML = html;
  document.getElementById('qx-pos').textContent = (current + 1) + ' / ' + extractions.length;
}

document.getElementById('qx-prev').addEventListener('click', () => show(current - 1));
document.getElementById('qx-next').addEventListener('click', () => show(current + 1));
document.getElementById('qx-play').addEventListener('click', function () {
  if (timer) {
    clearInterval(timer);
    timer = null;
    this.innerHTML = '&#9654; Play';
  } else {
    timer = setInterval(() => show(current + 1), 1500);
    this.innerHTML = '&#9632; Stop';
  }
});
document.querySelectorAll('.qx-mark').forEach(el => {
  el.addEventListener('click', () => {
    const idx = Number(el.id.replace('qx-ext-', ''));
    show(extractions.findIndex(e => e.index === idx));
  });
});
if (extractions.length) show(0);
</script>
</body>
</html>
"#;

/// Extraction metadata embedded in the page for the controls.
#[derive(Serialize)]
struct VizExtraction<'a> {
    index: usize,
    extraction_class: &'a str,
    extraction_text: &'a str,
    attributes: IndexMap<&'a str, &'a str>,
    aligned: bool,
}

/// Render an annotated document as a self-contained HTML page.
pub fn visualize(document: &AnnotatedDocument) -> Result<String> {
    let colors = assign_colors(&document.extractions);
    let spans = highlightable_spans(&document.extractions);
    let body = render_body(&document.text, &spans, &document.extractions, &colors);
    let legend = render_legend(&colors);
    let data = render_data(&document.extractions)?;

    Ok(TEMPLATE
        .replace("__DOC_ID__", &escape_html(&document.document_id))
        .replace("__LEGEND__", &legend)
        .replace("__BODY__", &body)
        .replace("__DATA__", &data))
}

/// Render the first document of a JSONL results file.
///
/// Mirrors the common workflow of visualizing straight from saved output.
pub fn visualize_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let documents = io::load_annotated_documents(path)?;
    let document = documents.first().ok_or_else(|| {
        QuarryError::Persistence(format!("No documents in '{}'", path.display()))
    })?;
    visualize(document)
}

/// Assign palette colors to classes in order of first appearance.
fn assign_colors(extractions: &[Extraction]) -> IndexMap<String, &'static str> {
    let mut colors = IndexMap::new();
    for extraction in extractions {
        let next = colors.len();
        colors
            .entry(extraction.extraction_class.clone())
            .or_insert(PALETTE[next % PALETTE.len()]);
    }
    colors
}

/// Aligned spans that can be highlighted without overlapping.
///
/// Spans are taken in source order; a span starting inside an already
/// accepted one is dropped from highlighting (it stays in the browser list).
fn highlightable_spans(extractions: &[Extraction]) -> Vec<(usize, CharInterval)> {
    let mut spans: Vec<(usize, CharInterval)> = extractions
        .iter()
        .filter_map(|e| e.char_interval.map(|ci| (e.extraction_index, ci)))
        .collect();
    spans.sort_by_key(|(_, ci)| (ci.start_pos, std::cmp::Reverse(ci.end_pos)));

    let mut kept: Vec<(usize, CharInterval)> = Vec::with_capacity(spans.len());
    let mut covered_until = 0usize;
    for (index, interval) in spans {
        if interval.start_pos >= covered_until && !interval.is_empty() {
            covered_until = interval.end_pos;
            kept.push((index, interval));
        }
    }
    kept
}

/// Interleave escaped text segments with highlight spans.
fn render_body(
    text: &str,
    spans: &[(usize, CharInterval)],
    extractions: &[Extraction],
    colors: &IndexMap<String, &'static str>,
) -> String {
    let mut body = String::with_capacity(text.len() * 2);
    let mut pos = 0usize;

    for (index, interval) in spans {
        body.push_str(&escape_html(&text[pos..interval.start_pos]));

        let class = extractions
            .iter()
            .find(|e| e.extraction_index == *index)
            .map(|e| e.extraction_class.as_str())
            .unwrap_or_default();
        let color = colors.get(class).copied().unwrap_or("#dddddd");

        body.push_str(&format!(
            r#"<span class="qx-mark" id="qx-ext-{}" style="background: {}" title="{}">"#,
            index,
            color,
            escape_html(class)
        ));
        body.push_str(&escape_html(&text[interval.start_pos..interval.end_pos]));
        body.push_str("</span>");

        pos = interval.end_pos;
    }
    body.push_str(&escape_html(&text[pos..]));
    body
}

fn render_legend(colors: &IndexMap<String, &'static str>) -> String {
    colors
        .iter()
        .map(|(class, color)| {
            format!(
                r#"<span class="qx-chip" style="background: {}">{}</span>"#,
                color,
                escape_html(class)
            )
        })
        .collect()
}

fn render_data(extractions: &[Extraction]) -> Result<String> {
    let viz: Vec<VizExtraction> = extractions
        .iter()
        .map(|e| VizExtraction {
            index: e.extraction_index,
            extraction_class: &e.extraction_class,
            extraction_text: &e.extraction_text,
            attributes: e
                .attributes
                .iter()
                .flatten()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            aligned: e.is_aligned(),
        })
        .collect();

    // Guard against "</script>" sequences inside extracted text.
    Ok(serde_json::to_string(&viz)?.replace("</", "<\\/"))
}

/// Escape text for safe embedding in HTML.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
