//! Retrieval evaluation over labeled queries.
//!
//! A query file holds one JSON object per line:
//!
//! ```text
//! {"id": 12, "query": "waterproof tent for four", "answer_ids": [0, 17]}
//! ```
//!
//! Each query is scored against its ranked retrieval with hit@1, hit@5, recall@20 and
//! reciprocal rank; the report averages them over the queries that have answers.

use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::IndexError;

/// Cutoff for recall.
pub const RECALL_CUTOFF: usize = 20;

/// Default number of hits retrieved per query during evaluation.
pub const DEFAULT_EVAL_LIMIT: usize = 100;

/// One labeled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalQuery {
    /// Query id.
    pub id: i64,
    /// Natural-language query text.
    pub query: String,
    /// Relevant node ids.
    pub answer_ids: Vec<u64>,
}

/// Scores of one query, or means over many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    /// Whether the top hit is relevant.
    #[serde(rename = "hit@1")]
    pub hit_at_1: f64,
    /// Whether any of the top five hits is relevant.
    #[serde(rename = "hit@5")]
    pub hit_at_5: f64,
    /// Fraction of relevant ids among the top twenty hits.
    #[serde(rename = "recall@20")]
    pub recall_at_20: f64,
    /// Reciprocal rank of the first relevant hit, 0 when none was retrieved.
    pub mrr: f64,
}

impl Metrics {
    /// Scores `ranked` node ids against the relevant `answers`.
    ///
    /// `answers` must not be empty.
    pub fn score(ranked: &[u64], answers: &HashSet<u64>) -> Self {
        let hit_within = |k: usize| {
            if ranked.iter().take(k).any(|id| answers.contains(id)) {
                1.0
            } else {
                0.0
            }
        };
        let recalled: HashSet<&u64> = ranked
            .iter()
            .take(RECALL_CUTOFF)
            .filter(|id| answers.contains(*id))
            .collect();
        let mrr = ranked
            .iter()
            .position(|id| answers.contains(id))
            .map_or(0.0, |rank| 1.0 / (rank + 1) as f64);

        Self {
            hit_at_1: hit_within(1),
            hit_at_5: hit_within(5),
            recall_at_20: recalled.len() as f64 / answers.len() as f64,
            mrr,
        }
    }

    /// Adds `other` into `self`.
    fn accumulate(&mut self, other: &Self) {
        self.hit_at_1 += other.hit_at_1;
        self.hit_at_5 += other.hit_at_5;
        self.recall_at_20 += other.recall_at_20;
        self.mrr += other.mrr;
    }

    /// Divides every metric by `n`.
    fn divided_by(self, n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }
        let n = n as f64;
        Self {
            hit_at_1: self.hit_at_1 / n,
            hit_at_5: self.hit_at_5 / n,
            recall_at_20: self.recall_at_20 / n,
            mrr: self.mrr / n,
        }
    }
}

/// Scores of one evaluated query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    /// Query id.
    pub id: i64,
    /// Scores for this query.
    pub metrics: Metrics,
}

/// Aggregate evaluation results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    /// Number of queries scored.
    pub evaluated: usize,
    /// Number of queries skipped because they have no answers.
    pub skipped: usize,
    /// Mean scores over evaluated queries.
    pub mean: Metrics,
    /// Per-query scores, in file order.
    pub queries: Vec<QueryOutcome>,
}

/// Reads a JSON-lines query file. Blank lines are skipped.
pub fn read_queries(path: &Path) -> Result<Vec<EvalQuery>, IndexError> {
    let read_error = |source: io::Error| IndexError::ReadQueries {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(read_error)?);

    let mut queries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(read_error)?;
        if line.trim().is_empty() {
            continue;
        }
        let query = serde_json::from_str(&line).map_err(|source| IndexError::InvalidQuery {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        queries.push(query);
    }
    debug!(path = %path.display(), count = queries.len(), "read queries");
    Ok(queries)
}

/// Evaluates `queries` with `retrieve`, which returns ranked node ids for a query text.
pub fn evaluate<F>(queries: &[EvalQuery], mut retrieve: F) -> Result<EvalReport, IndexError>
where
    F: FnMut(&str) -> Result<Vec<u64>, IndexError>,
{
    let mut total = Metrics::default();
    let mut outcomes = Vec::with_capacity(queries.len());
    let mut skipped = 0;

    for query in queries {
        let answers: HashSet<u64> = query.answer_ids.iter().copied().collect();
        if answers.is_empty() {
            skipped += 1;
            continue;
        }
        let ranked = retrieve(&query.query)?;
        let metrics = Metrics::score(&ranked, &answers);
        total.accumulate(&metrics);
        outcomes.push(QueryOutcome {
            id: query.id,
            metrics,
        });
    }

    let report = EvalReport {
        evaluated: outcomes.len(),
        skipped,
        mean: total.divided_by(outcomes.len()),
        queries: outcomes,
    };
    info!(
        evaluated = report.evaluated,
        skipped = report.skipped,
        mrr = report.mean.mrr,
        "evaluation finished"
    );
    Ok(report)
}
