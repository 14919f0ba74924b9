//! Scenario and snapshot tests for the engine

#[cfg(test)]
mod scenario_tests {
    use crate::{
        AskEvent, Chunk, Document, EngineConfig, Generator, IngestReport, RagEngine, StubGenerator,
    };
    use insta::assert_yaml_snapshot;
    use std::sync::Arc;
    use std::thread;

    fn policy_docs() -> Vec<Document> {
        vec![
            Document::new("Warranty_Policy.md", "Warranty covers defects for 1 year")
                .with_section("Coverage"),
            Document::new("Returns_Policy.md", "Returns accepted within 30 days")
                .with_section("Timeline"),
        ]
    }

    fn engine_with_policies() -> RagEngine {
        let engine = RagEngine::new(EngineConfig::default()).unwrap();
        engine.ingest(&policy_docs()).unwrap();
        engine
    }

    #[test]
    fn test_ingest_then_reingest() {
        let engine = RagEngine::new(EngineConfig::default()).unwrap();

        let first = engine.ingest(&policy_docs()).unwrap();
        assert_yaml_snapshot!(first, @r###"
        indexed_docs: 2
        indexed_chunks: 2
        "###);

        let second = engine.ingest(&policy_docs()).unwrap();
        assert_eq!(second, IngestReport { indexed_docs: 0, indexed_chunks: 0 });
        assert_eq!(engine.index_size().unwrap(), 2);
    }

    #[test]
    fn test_retrieve_warranty() {
        let engine = engine_with_policies();
        let contexts = engine.retrieve("warranty", 1).unwrap();

        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].title(), "Warranty_Policy.md");
        assert_eq!(contexts[0].section(), "Coverage");
    }

    #[test]
    fn test_retrieve_is_bounded_by_store_size() {
        let engine = engine_with_policies();
        assert_eq!(engine.retrieve("policy", 10).unwrap().len(), 2);
        assert_eq!(engine.retrieve("policy", 2).unwrap().len(), 2);
        assert_eq!(engine.retrieve("policy", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_retrieve_on_empty_engine() {
        let engine = RagEngine::new(EngineConfig::default()).unwrap();
        assert!(engine.retrieve("warranty", 3).unwrap().is_empty());
        assert_eq!(engine.stats().retrieval_count, 1);
    }

    #[test]
    fn test_exact_text_scores_one() {
        let engine = engine_with_policies();
        let contexts = engine.retrieve("Returns accepted within 30 days", 1).unwrap();
        assert_eq!(contexts[0].title(), "Returns_Policy.md");
        assert!((contexts[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stats_fresh_then_after_calls() {
        let engine = engine_with_policies();
        let fresh = engine.stats();
        assert_eq!(fresh.avg_retrieval_latency_ms, 0.0);
        assert_eq!(fresh.avg_generation_latency_ms, 0.0);

        let contexts = engine.retrieve("warranty", 2).unwrap();
        let chunks: Vec<Chunk> = contexts.into_iter().map(|c| c.into_chunk()).collect();
        engine.generate("warranty", &chunks);

        let stats = engine.stats();
        assert_eq!(stats.retrieval_count, 1);
        assert_eq!(stats.generation_count, 1);
        assert!(stats.avg_retrieval_latency_ms > 0.0);
        assert!(stats.avg_generation_latency_ms > 0.0);
    }

    #[test]
    fn test_engine_stream_matches_batch() {
        let engine = engine_with_policies();
        let contexts: Vec<Chunk> = engine
            .retrieve("How long is the warranty?", 2)
            .unwrap()
            .into_iter()
            .map(|c| c.into_chunk())
            .collect();

        let batch = engine.generate("How long is the warranty?", &contexts);
        let streamed: String = engine
            .generate_stream("How long is the warranty?", &contexts)
            .collect();

        assert_eq!(streamed, batch);
        assert!(batch.contains("Warranty_Policy.md"));
        assert_eq!(engine.stats().generation_count, 2);
    }

    #[test]
    fn test_ask_carries_citations() {
        let engine = engine_with_policies();
        let answer = engine.ask("What is the refund window?", 4).unwrap();

        assert_eq!(answer.query, "What is the refund window?");
        assert_eq!(answer.citations.len(), 2);
        assert_eq!(answer.chunks.len(), 2);
        assert!(answer.answer.contains("Returns_Policy.md"));
        assert!(answer.metrics.retrieval_ms > 0.0);
    }

    #[test]
    fn test_ask_stream_event_order() {
        let engine = engine_with_policies();
        let events: Vec<AskEvent> = engine.ask_stream("warranty", 1).unwrap().collect();

        let metadata = match events.first() {
            Some(AskEvent::Metadata(metadata)) => metadata,
            other => panic!("expected metadata first, got {:?}", other),
        };
        assert_eq!(metadata.citations[0].title, "Warranty_Policy.md");
        assert!(matches!(events.last(), Some(AskEvent::Metrics(_))));

        let text: String = events[1..events.len() - 1]
            .iter()
            .map(|event| match event {
                AskEvent::Chunk(fragment) => fragment.as_str(),
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        let chunks: Vec<Chunk> = metadata.chunks.iter().map(|c| c.chunk.clone()).collect();
        assert_eq!(text, StubGenerator::new().generate("warranty", &chunks));
    }

    #[test]
    fn test_ask_stream_serializes_like_sse_payloads() {
        let engine = engine_with_policies();
        let mut events = engine.ask_stream("warranty", 1).unwrap();

        let metadata = serde_json::to_value(events.next().unwrap()).unwrap();
        assert_eq!(metadata["type"], "metadata");
        assert_eq!(metadata["data"]["citations"][0]["section"], "Coverage");

        let fragment = serde_json::to_value(events.next().unwrap()).unwrap();
        assert_eq!(fragment["type"], "chunk");
        assert_eq!(fragment["data"], "Based ");
    }

    #[test]
    fn test_empty_store_answer_falls_back() {
        let engine = RagEngine::new(EngineConfig::default()).unwrap();
        let answer = engine.ask("anything at all", 3).unwrap();
        assert!(answer.citations.is_empty());
        assert!(answer.answer.starts_with("I could not find relevant context"));
    }

    #[test]
    fn test_concurrent_ingest_and_search() {
        let engine = Arc::new(RagEngine::new(EngineConfig::default()).unwrap());

        thread::scope(|scope| {
            for writer in 0..4 {
                let engine = Arc::clone(&engine);
                scope.spawn(move || {
                    for i in 0..25 {
                        let doc = Document::new(
                            format!("Doc_{}.md", writer),
                            format!("writer {} paragraph {}", writer, i),
                        );
                        engine.ingest(&[doc]).unwrap();
                    }
                });
            }
            for _ in 0..4 {
                let engine = Arc::clone(&engine);
                scope.spawn(move || {
                    for _ in 0..25 {
                        let hits = engine.retrieve("paragraph", 5).unwrap();
                        assert!(hits.len() <= 5);
                    }
                });
            }
        });

        assert_eq!(engine.index_size().unwrap(), 100);
        assert_eq!(engine.stats().retrieval_count, 100);
    }

    #[test]
    fn test_separate_engines_are_isolated() {
        let a = engine_with_policies();
        let b = RagEngine::new(EngineConfig::default()).unwrap();
        a.retrieve("warranty", 1).unwrap();

        assert_eq!(b.index_size().unwrap(), 0);
        assert_eq!(b.stats().retrieval_count, 0);
    }

    #[test]
    fn test_long_documents_are_chunked() {
        let engine = RagEngine::new(EngineConfig::default().with_chunking(40, 10)).unwrap();
        let text = "Shipping is free for orders above fifty dollars. Express delivery costs extra. \
                    International orders may take up to three weeks to arrive.";
        let report = engine
            .ingest(&[Document::new("Shipping.md", text).with_section("Rates")])
            .unwrap();

        assert_eq!(report.indexed_docs, 1);
        assert!(report.indexed_chunks > 1);
        assert_eq!(engine.index_size().unwrap(), report.indexed_chunks);
    }
}
