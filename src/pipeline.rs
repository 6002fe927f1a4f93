use crate::{
    document::BenchmarkRecord,
    labeler::{SizeTable, label_each},
    plan::{Generator, build_requests},
    render::{Renderer, render_request},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rendered: usize,
    pub failed: usize,
    pub unidentified: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.unidentified > 0
    }
}

/// Labels `records`, builds the generator's requests and renders each one.
/// A failing record or request is counted and skipped.
pub fn run<R: Renderer>(
    records: Vec<BenchmarkRecord>,
    generator: Generator,
    sizes: &SizeTable,
    renderer: &mut R,
) -> RunSummary {
    let (labeled, rejected) = label_each(records, sizes);
    let mut summary = RunSummary {
        unidentified: rejected.len(),
        ..RunSummary::default()
    };
    for request in build_requests(generator, &labeled, sizes) {
        let outcome = request.and_then(|request| render_request(&mut *renderer, &request));
        match outcome {
            Ok(()) => summary.rendered += 1,
            Err(err) => {
                tracing::warn!(generator = %generator, error = %err, "request skipped");
                summary.failed += 1;
            }
        }
    }
    tracing::info!(
        generator = %generator,
        rendered = summary.rendered,
        failed = summary.failed,
        unidentified = summary.unidentified,
        "run finished"
    );
    summary
}
