//! Similarity index over the fixed context-tip catalog
//!
//! A small retrieval layer for prompt enrichment: five fixed German tip
//! snippets, embedded once via the configured backend, queried with a
//! classification-specific template and ranked by cosine similarity.
//!
//! The catalog embeddings are built lazily behind a `tokio::sync::OnceCell`
//! so concurrent first requests cannot trigger duplicate embedding calls.

use tokio::sync::OnceCell;
use tracing::debug;

use crate::ai::{AiBackend, AiClient};
use crate::classify::ConsumptionClass;
use crate::error::Result;

/// Fixed catalog of context snippets (German)
pub const CONTEXT_TIPS: [&str; 5] = [
    "Ein Kühlschrank arbeitet am effizientesten bei 7 Grad und voller, aber nicht überfüllter Beladung.",
    "Wäsche bei 30 Grad statt 60 Grad waschen senkt den Stromverbrauch des Waschgangs deutlich.",
    "Elektrische Durchlauferhitzer gehören zu den größten Stromverbrauchern im Haushalt.",
    "Alte Heizungspumpen laufen oft dauerhaft und lohnen einen Austausch gegen geregelte Modelle.",
    "Ein Wasserkocher erhitzt kleine Wassermengen sparsamer als der Elektroherd.",
];

/// At most this many snippets are added to a prompt
pub const MAX_CONTEXT_SNIPPETS: usize = 2;

/// Query template for a classification (three templates, normal and
/// unknown share one).
fn query_for(class: ConsumptionClass) -> &'static str {
    match class {
        ConsumptionClass::High => "Tipps zur Senkung eines hohen Stromverbrauchs im Haushalt",
        ConsumptionClass::Low => "Stromverbrauch niedrig halten und Geräte korrekt warten",
        ConsumptionClass::Normal | ConsumptionClass::Unknown => {
            "Alltägliche Energiespartipps für einen durchschnittlichen Haushalt"
        }
    }
}

fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Dot product; cosine similarity once both sides are L2-normalized.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Lazily-initialized similarity index over [`CONTEXT_TIPS`]
pub struct SimilarityIndex {
    embeddings: OnceCell<Vec<Vec<f32>>>,
}

impl Default for SimilarityIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self {
            embeddings: OnceCell::new(),
        }
    }

    /// Whether the catalog embeddings have been built
    pub fn initialized(&self) -> bool {
        self.embeddings.initialized()
    }

    async fn catalog(&self, backend: &AiClient) -> Result<&Vec<Vec<f32>>> {
        self.embeddings
            .get_or_try_init(|| async {
                debug!("building context-tip embeddings");
                let mut vectors = Vec::with_capacity(CONTEXT_TIPS.len());
                for tip in CONTEXT_TIPS {
                    vectors.push(l2_normalize(backend.embed(tip).await?));
                }
                Ok(vectors)
            })
            .await
    }

    /// Retrieve up to [`MAX_CONTEXT_SNIPPETS`] catalog entries nearest to
    /// the classification's query template.
    pub async fn retrieve(
        &self,
        backend: &AiClient,
        class: ConsumptionClass,
    ) -> Result<Vec<String>> {
        let catalog = self.catalog(backend).await?;
        let query = l2_normalize(backend.embed(query_for(class)).await?);

        let mut scored: Vec<(usize, f32)> = catalog
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(&query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(MAX_CONTEXT_SNIPPETS)
            .map(|(i, _)| CONTEXT_TIPS[i].to_string())
            .collect())
    }
}
