use std::sync::Arc;

use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use orchestrate_core::batch::ProgressCallback;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn batch_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} [{pos}/{len}] {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

/// A span that renders as a progress spinner while a batch runs inside it.
pub fn batch_span(label: &str) -> Span {
    let span = info_span!("batch", indicatif.pb_show = true);
    span.pb_set_style(&batch_style());
    span.pb_set_message(label);
    span
}

pub fn set_batch_total(span: &Span, total: usize) {
    span.pb_set_length(total as u64);
}

/// Advances `span` by one each time a target finishes.
pub fn report_batch_progress(span: &Span) -> ProgressCallback {
    let span = span.clone();
    Arc::new(move |_finished: usize| span.pb_inc(1))
}
