use coercion_cases::{Case, SuiteDefinition};
use futures::{stream, StreamExt, TryStreamExt};

use crate::engine::{EngineError, EngineRequest, ExecutionOutcome, QueryEngine};

#[derive(Debug)]
pub(crate) struct ExecutedCase {
    /// 1-based position of the case in its suite.
    pub index: usize,
    pub case: Case,
    pub outcome: ExecutionOutcome,
}

/// Executes every case of the suite with at most `concurrency` requests in
/// flight. Results come back in enumeration order.
pub(crate) async fn run_suite(
    engine: &dyn QueryEngine,
    suite: &SuiteDefinition,
    concurrency: usize,
) -> Result<Vec<ExecutedCase>, EngineError> {
    stream::iter(suite.cases().enumerate())
        .map(|(position, case)| async move {
            let index = position + 1;
            let request = EngineRequest::from_case(&case);

            tracing::debug!(suite = %suite.name, index, query = %request.query, "executing case");

            let outcome = engine.execute(request).await?;

            Ok(ExecutedCase { index, case, outcome })
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Executes free-form requests, keeping their order.
pub(crate) async fn run_requests(
    engine: &dyn QueryEngine,
    requests: Vec<EngineRequest>,
    concurrency: usize,
) -> Result<Vec<ExecutionOutcome>, EngineError> {
    stream::iter(requests)
        .map(|request| engine.execute(request))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use coercion_cases::{Nullability, ProbeValue, ScalarKind};
    use serde_json::json;

    use super::*;

    /// Answers with the query it received, the first requests being the
    /// slowest to finish.
    struct ReversedLatencyEngine {
        received: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl QueryEngine for ReversedLatencyEngine {
        async fn execute(&self, request: EngineRequest) -> Result<ExecutionOutcome, EngineError> {
            let position = self.received.fetch_add(1, Ordering::SeqCst);
            let delay = 50u64.saturating_sub(position as u64 * 10);

            tokio::time::sleep(Duration::from_millis(delay)).await;

            Ok(ExecutionOutcome {
                data: Some(json!(request.query)),
                errors: Vec::new(),
            })
        }
    }

    fn suite() -> SuiteDefinition {
        SuiteDefinition {
            name: "ordering".to_owned(),
            scalar: ScalarKind::Int,
            list: false,
            argument_nullabilities: Nullability::ALL.to_vec(),
            argument_inner_nullabilities: Vec::new(),
            argument_values: vec![ProbeValue::Null, ProbeValue::Literal(json!(1)), ProbeValue::Literal(json!(2))],
            variable: None,
        }
    }

    #[tokio::test]
    async fn output_follows_enumeration_order() {
        let engine = ReversedLatencyEngine {
            received: AtomicUsize::new(0),
        };
        let suite = suite();

        let executed = run_suite(&engine, &suite, 4).await.unwrap();

        let indices = executed.iter().map(|executed| executed.index).collect::<Vec<_>>();
        assert_eq!(indices, [1, 2, 3, 4, 5, 6]);

        for (executed, case) in executed.iter().zip(suite.cases()) {
            assert_eq!(executed.case, case);
            assert_eq!(executed.outcome.data, Some(json!(case.query())));
        }
    }

    #[tokio::test]
    async fn requests_keep_their_order() {
        let engine = ReversedLatencyEngine {
            received: AtomicUsize::new(0),
        };
        let requests = (0..3)
            .map(|index| EngineRequest {
                schema_sdl: String::new(),
                query: format!("query Q{index} {{ test }}"),
                variables: Default::default(),
            })
            .collect();

        let outcomes = run_requests(&engine, requests, 3).await.unwrap();

        assert_eq!(
            outcomes.into_iter().map(|outcome| outcome.data.unwrap()).collect::<Vec<_>>(),
            [json!("query Q0 { test }"), json!("query Q1 { test }"), json!("query Q2 { test }")]
        );
    }
}
