use tracing::{Span, field};

use super::TraceId;

/// Root span for a whole run (one per process / monitor).
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id,
        member = field::Empty,
    )
}

/// Child span; inherits the trace id from whatever span is current.
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name, member = field::Empty)
}

/// Records the crew member a span is working on.
pub fn annotate_span(span: &Span, member: &str) {
    span.record("member", field::display(member));
}
