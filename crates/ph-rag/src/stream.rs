//! Event sequence for a streamed answer

use std::iter::FusedIterator;

use ph_core::{AskEvent, Fragments, StreamMetadata};

use crate::metrics::MetricsTracker;

/// Lazy, ordered events of one streamed answer:
/// one `Metadata`, then one `Chunk` per fragment, then one `Metrics`.
///
/// The metrics event is computed when it is reached, so it reflects the
/// generation sample recorded for this answer. Dropping the stream early has
/// no effect on the engine.
#[derive(Debug)]
pub struct AskStream<'a> {
    metadata: Option<StreamMetadata>,
    fragments: Fragments,
    metrics: Option<&'a MetricsTracker>,
}

impl<'a> AskStream<'a> {
    pub(crate) fn new(
        metadata: StreamMetadata,
        fragments: Fragments,
        metrics: &'a MetricsTracker,
    ) -> Self {
        Self {
            metadata: Some(metadata),
            fragments,
            metrics: Some(metrics),
        }
    }
}

impl Iterator for AskStream<'_> {
    type Item = AskEvent;

    fn next(&mut self) -> Option<AskEvent> {
        if let Some(metadata) = self.metadata.take() {
            return Some(AskEvent::Metadata(metadata));
        }
        if let Some(fragment) = self.fragments.next() {
            return Some(AskEvent::Chunk(fragment));
        }
        self.metrics
            .take()
            .map(|tracker| AskEvent::Metrics(tracker.snapshot().into()))
    }
}

impl FusedIterator for AskStream<'_> {}
