//! Classifier seam
//!
//! The partitioner scores candidate clusters through the [`Classifier`]
//! trait; [`NetClassifier`] is the production implementation backed by
//! the neural cascade in `scrawl-net`, and tests substitute geometric
//! stubs (any `FnMut` closure with the right shape works).

use scrawl_core::TraceGroup;
use scrawl_net::{CascadeClassifier, Network, TraceNetwork};

use crate::error::EngineResult;
use crate::symbols::Label;

/// Result of classifying one candidate cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Concrete glyph identity
    pub label: Label,
    /// Confidence in [0, 1]; the partitioner treats values below its
    /// garbage threshold as noise
    pub confidence: f64,
}

/// Maps an ink cluster (and optionally its surrounding strokes) to a
/// label with a confidence.
pub trait Classifier {
    /// Classify a cluster. `context` carries the strokes adjacent to
    /// the cluster on the expression's spanning tree; implementations
    /// may ignore it.
    fn classify(
        &mut self,
        cluster: &TraceGroup,
        context: Option<&TraceGroup>,
    ) -> EngineResult<Classification>;
}

/// Closures with the right shape are classifiers; used for stubs.
impl<F> Classifier for F
where
    F: FnMut(&TraceGroup, Option<&TraceGroup>) -> EngineResult<Classification>,
{
    fn classify(
        &mut self,
        cluster: &TraceGroup,
        context: Option<&TraceGroup>,
    ) -> EngineResult<Classification> {
        self(cluster, context)
    }
}

/// Neural cascade classifier bound to the engine's label alphabet.
#[derive(Debug)]
pub struct NetClassifier {
    cascade: CascadeClassifier<Label>,
}

impl NetClassifier {
    /// Wrap an assembled cascade.
    pub fn new(cascade: CascadeClassifier<Label>) -> Self {
        Self { cascade }
    }

    /// Assemble from raw networks and per-bucket label tables.
    ///
    /// `labels[bucket][index]` names the label for output `index` of
    /// bucket network `bucket`.
    ///
    /// # Errors
    ///
    /// Propagates network wrapping errors (non-square input layers).
    pub fn from_networks(
        cascade: Network,
        buckets: Vec<Network>,
        labels: Vec<Vec<Label>>,
    ) -> EngineResult<Self> {
        let cascade = TraceNetwork::new(cascade)?;
        let buckets = buckets
            .into_iter()
            .map(TraceNetwork::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(CascadeClassifier::new(cascade, buckets, labels)))
    }

    /// Set the distortion-averaging repeats used per evaluation.
    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.cascade = self.cascade.with_repeats(repeats);
        self
    }
}

impl Classifier for NetClassifier {
    fn classify(
        &mut self,
        cluster: &TraceGroup,
        _context: Option<&TraceGroup>,
    ) -> EngineResult<Classification> {
        let outcome = self.cascade.classify(cluster)?;
        Ok(Classification {
            label: outcome.label,
            confidence: outcome.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_core::{Point, Trace};
    use scrawl_net::Activation;

    fn constant_network(biases: &[f64]) -> Network {
        let mut parameters = Vec::new();
        for &bias in biases {
            parameters.push(bias);
            parameters.extend_from_slice(&[0.0; 16]);
        }
        Network::from_parameters(&[16, biases.len()], &parameters, Activation::Relu).unwrap()
    }

    #[test]
    fn test_net_classifier_maps_labels() {
        let mut classifier = NetClassifier::from_networks(
            constant_network(&[0.3, 0.7]),
            vec![
                constant_network(&[1.0]),
                constant_network(&[0.2, 0.8]),
            ],
            vec![vec![Label::Plus], vec![Label::Two, Label::Three]],
        )
        .unwrap();

        let mut trace = Trace::new();
        trace.push(Point::new(0.0, 0.0));
        trace.push(Point::new(4.0, 7.0));
        let group = TraceGroup::from_traces(vec![trace]);

        let result = classifier.classify(&group, None).unwrap();
        assert_eq!(result.label, Label::Three);
        assert!((result.confidence - (0.6 * 0.7 + 0.4 * 0.8)).abs() < 1e-9);
    }

    #[test]
    fn test_closure_classifier() {
        let mut stub = |_: &TraceGroup, _: Option<&TraceGroup>| {
            Ok(Classification {
                label: Label::Five,
                confidence: 0.9,
            })
        };
        let group = TraceGroup::from_traces(vec![
            [Point::new(0.0, 0.0)].into_iter().collect::<Trace>(),
        ]);
        let result = Classifier::classify(&mut stub, &group, None).unwrap();
        assert_eq!(result.label, Label::Five);
    }
}
