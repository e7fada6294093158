//! Trace evaluation and cascade classification
//!
//! [`TraceNetwork`] connects a [`Network`] to ink: it rasterizes a
//! trace group at the network's input resolution and runs the forward
//! pass, optionally averaging over randomized distortions of the same
//! raster. [`CascadeClassifier`] stacks two stages: a coarse network
//! picks a symbol bucket, a bucket-specific network picks the concrete
//! label within it.

use scrawl_core::TraceGroup;
use scrawl_raster::{ImageDistorter, RenderOptions, render};

use crate::error::{NetError, NetResult};
use crate::network::Network;

/// Fixed total that normalized network outputs sum to.
///
/// Outputs are relative confidences comparable across calls, not
/// probabilities; a total of 1 keeps top scores in [0, 1].
pub const NORMALIZED_TOTAL: f64 = 1.0;

/// Weight of the cascade (bucket) stage in the blended confidence.
pub const CASCADE_WEIGHT: f64 = 0.6;

/// Weight of the bucket-specific stage in the blended confidence.
pub const BUCKET_WEIGHT: f64 = 0.4;

/// Index of the largest value, `None` for an empty slice.
pub fn index_of_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, &value) in values.iter().enumerate() {
        if best.is_none_or(|b| value > values[b]) {
            best = Some(index);
        }
    }
    best
}

/// Scale values so they sum to [`NORMALIZED_TOTAL`].
///
/// A vector without positive mass (all outputs zero) becomes uniform so
/// downstream argmax and confidence math stay defined.
pub fn normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        for value in values.iter_mut() {
            *value *= NORMALIZED_TOTAL / sum;
        }
    } else if !values.is_empty() {
        let uniform = NORMALIZED_TOTAL / values.len() as f64;
        values.fill(uniform);
    }
}

/// A network evaluated on rasterized ink.
#[derive(Debug)]
pub struct TraceNetwork {
    network: Network,
    distorter: ImageDistorter,
    side: u32,
}

impl TraceNetwork {
    /// Wrap a network whose input layer is a square raster.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::NonSquareInput`] if the input layer size is
    /// not a perfect square.
    pub fn new(network: Network) -> NetResult<Self> {
        Self::with_distorter(network, ImageDistorter::new())
    }

    /// Wrap a network with an explicit (e.g. seeded) distorter.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TraceNetwork::new`].
    pub fn with_distorter(network: Network, distorter: ImageDistorter) -> NetResult<Self> {
        let input = network.input_len();
        let side = (input as f64).sqrt() as u32;
        if (side * side) as usize != input {
            return Err(NetError::NonSquareInput(input));
        }
        Ok(Self {
            network,
            distorter,
            side,
        })
    }

    /// Raster side length expected by the network.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Number of output labels.
    pub fn output_len(&self) -> usize {
        self.network.output_len()
    }

    /// Evaluate the network on a trace group.
    ///
    /// The group is rendered once; with `repeats > 0` the same raster
    /// is additionally evaluated under `repeats` independent random
    /// distortions and all `repeats + 1` outputs are averaged
    /// elementwise. The result is normalized to sum to
    /// [`NORMALIZED_TOTAL`]. With `repeats == 0` the evaluation is
    /// deterministic for fixed weights.
    ///
    /// # Errors
    ///
    /// Propagates rasterization errors (empty ink) and
    /// [`NetError::InputLength`] on a raster/network size mismatch.
    pub fn evaluate(&mut self, group: &TraceGroup, repeats: u32) -> NetResult<Vec<f64>> {
        let image = render(group, &RenderOptions::square(self.side))?;

        let mut output = self.network.feed_forward(&image.to_vector(-1.0, 1.0))?;
        for _ in 0..repeats {
            let distorted = self.distorter.distort(&image)?;
            let current = self.network.feed_forward(&distorted.to_vector(-1.0, 1.0))?;
            for (sum, value) in output.iter_mut().zip(&current) {
                *sum += value;
            }
        }
        if repeats > 0 {
            let count = (repeats + 1) as f64;
            for value in output.iter_mut() {
                *value /= count;
            }
        }

        normalize(&mut output);
        Ok(output)
    }
}

/// Result of a cascade classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeOutcome<L> {
    /// The resolved concrete label
    pub label: L,
    /// Blended confidence in [0, 1]
    pub confidence: f64,
    /// Coarse bucket chosen by the first stage
    pub bucket: usize,
}

/// Two-stage coarse-then-fine classifier.
///
/// Generic over the label type so callers bind their own symbol
/// alphabet through the per-bucket label tables.
#[derive(Debug)]
pub struct CascadeClassifier<L> {
    cascade: TraceNetwork,
    buckets: Vec<TraceNetwork>,
    labels: Vec<Vec<L>>,
    repeats: u32,
}

impl<L: Copy> CascadeClassifier<L> {
    /// Assemble a cascade from its stage networks and label tables.
    ///
    /// `labels[bucket][index]` is the concrete label for output `index`
    /// of bucket network `bucket`.
    pub fn new(cascade: TraceNetwork, buckets: Vec<TraceNetwork>, labels: Vec<Vec<L>>) -> Self {
        Self {
            cascade,
            buckets,
            labels,
            repeats: 0,
        }
    }

    /// Set the number of distortion-averaging repeats per evaluation.
    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }

    /// Classify a trace group.
    ///
    /// The cascade network's top output picks the bucket; the bucket
    /// network's top output picks the label within the bucket's table.
    /// Confidence blends the two stages as
    /// `0.6 * cascade top + 0.4 * bucket top`.
    ///
    /// # Errors
    ///
    /// An out-of-range bucket or a missing label-table entry is a
    /// classification error ([`NetError::BucketOutOfRange`],
    /// [`NetError::LabelTable`]), not a panic.
    pub fn classify(&mut self, group: &TraceGroup) -> NetResult<CascadeOutcome<L>> {
        let coarse = self.cascade.evaluate(group, self.repeats)?;
        let bucket = index_of_max(&coarse).ok_or(NetError::EmptyOutput)?;

        let bucket_count = self.buckets.len();
        let network = self
            .buckets
            .get_mut(bucket)
            .ok_or(NetError::BucketOutOfRange {
                bucket,
                count: bucket_count,
            })?;
        let fine = network.evaluate(group, self.repeats)?;
        let index = index_of_max(&fine).ok_or(NetError::EmptyOutput)?;

        let label = self
            .labels
            .get(bucket)
            .and_then(|table| table.get(index))
            .copied()
            .ok_or(NetError::LabelTable { bucket, index })?;

        Ok(CascadeOutcome {
            label,
            confidence: CASCADE_WEIGHT * coarse[bucket] + BUCKET_WEIGHT * fine[index],
            bucket,
        })
    }
}
