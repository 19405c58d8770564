use crate::error::Result;

/// Label for scores that fall in no retained cluster.
pub const NOISE: usize = usize::MAX;

/// Common interface for clusterers that return groups of indices.
pub trait Clustering {
    /// Cluster `scores`, returning index sets ordered by cluster position.
    fn cluster_indices(&self, scores: &[f64]) -> Result<Vec<Vec<usize>>>;

    /// One label per score: the first cluster containing it, or [`NOISE`].
    fn labels(&self, scores: &[f64]) -> Result<Vec<usize>> {
        let clusters = self.cluster_indices(scores)?;
        let mut labels = vec![NOISE; scores.len()];
        for (label, indices) in clusters.iter().enumerate() {
            for &i in indices {
                if labels[i] == NOISE {
                    labels[i] = label;
                }
            }
        }
        Ok(labels)
    }
}
