//! MST partitioner
//!
//! Segments the strokes of an expression into symbol-sized clusters.
//! A minimum spanning tree over inter-stroke distances proposes
//! connected candidate clusters; the classifier scores them; an exact
//! cover over the stroke set with maximal summed confidence picks the
//! winning segmentation.

use std::collections::BTreeSet;

use scrawl_core::{MinimumSpanningTree, Trace, TraceGroup};
use scrawl_raster::traces_overlap;

use crate::classifier::Classifier;
use crate::diagnostics::{Diagnostics, NullDiagnostics};
use crate::error::{EngineError, EngineResult};
use crate::symbols::{Label, Symbol};

/// Largest number of strokes one symbol may span.
pub const MAX_TRACES_PER_SYMBOL: usize = 3;

/// Candidates scoring below this confidence are discarded as garbage.
pub const GARBAGE_THRESHOLD: f64 = 0.5;

/// Confidence assigned to single-point dot strokes, which bypass the
/// classifier.
pub const DOT_CONFIDENCE: f64 = 1.0;

/// Tuning knobs of the partitioner.
#[derive(Debug, Clone)]
pub struct PartitionerOptions {
    /// Largest number of strokes one symbol may span
    pub max_traces_per_symbol: usize,
    /// Candidates scoring below this confidence are discarded
    pub garbage_threshold: f64,
}

impl Default for PartitionerOptions {
    fn default() -> Self {
        Self {
            max_traces_per_symbol: MAX_TRACES_PER_SYMBOL,
            garbage_threshold: GARBAGE_THRESHOLD,
        }
    }
}

/// A scored candidate cluster.
#[derive(Debug, Clone)]
struct Candidate {
    strokes: Vec<usize>,
    label: Label,
    confidence: f64,
}

/// Minimum-spanning-tree stroke partitioner.
pub struct MstPartitioner<C> {
    classifier: C,
    options: PartitionerOptions,
    diagnostics: Box<dyn Diagnostics>,
}

impl<C: Classifier> MstPartitioner<C> {
    /// A partitioner with default options and no diagnostics.
    pub fn new(classifier: C) -> Self {
        Self::with_options(classifier, PartitionerOptions::default())
    }

    /// A partitioner with explicit options.
    pub fn with_options(classifier: C, options: PartitionerOptions) -> Self {
        Self {
            classifier,
            options,
            diagnostics: Box::new(NullDiagnostics),
        }
    }

    /// Install a diagnostics sink.
    pub fn set_diagnostics(&mut self, sink: Box<dyn Diagnostics>) {
        self.diagnostics = sink;
    }

    /// Access the classifier (e.g. to reseed a stub in tests).
    pub fn classifier_mut(&mut self) -> &mut C {
        &mut self.classifier
    }

    /// Segment an expression into classified symbols.
    ///
    /// Single-point strokes are dots and never combine with other
    /// strokes. Overlapping stroke pairs and pairs forming an equals
    /// sign are constrained to land in the same cluster. Candidates
    /// below the garbage threshold are dropped; if that leaves no
    /// exact cover of the stroke set, single-stroke clusters are
    /// re-admitted so segmentation always succeeds.
    pub fn partition(&mut self, expression: &TraceGroup) -> EngineResult<Vec<Symbol>> {
        let stroke_count = expression.len();
        if stroke_count == 0 {
            return Ok(Vec::new());
        }

        let dots: BTreeSet<usize> = (0..stroke_count)
            .filter(|&i| expression.get(i).is_some_and(|t| t.is_dot()))
            .collect();

        if stroke_count == 1 {
            let symbol = if dots.contains(&0) {
                Symbol::new(Label::Dot, expression.clone(), DOT_CONFIDENCE)?
            } else {
                let result = self.classifier.classify(expression, None)?;
                Symbol::new(result.label, expression.clone(), result.confidence)?
            };
            return Ok(vec![symbol]);
        }

        let distances = trace_distances(expression)?;
        let tree = MinimumSpanningTree::kruskal(&distances, stroke_count)?;

        let mut paths =
            tree.unique_paths(self.options.max_traces_per_symbol.min(stroke_count));
        self.diagnostics
            .note(&format!("partition: {} candidate paths", paths.len()));

        // Dots stand alone.
        paths.retain(|path| path.len() == 1 || !path.iter().any(|i| dots.contains(i)));

        // Strokes that overlap, or that together draw an equals sign,
        // must travel together.
        let mut constraints = self.find_overlaps(expression)?;
        constraints.extend(self.find_equals_pairs(expression)?);
        paths.retain(|path| {
            constraints
                .iter()
                .all(|&(a, b)| path.contains(&a) == path.contains(&b))
        });
        self.diagnostics.note(&format!(
            "partition: {} paths after {} pairing constraints",
            paths.len(),
            constraints.len()
        ));

        let mut candidates = Vec::with_capacity(paths.len());
        let mut garbage = 0usize;
        for path in &paths {
            let candidate = self.classify_path(expression, &tree, path, &dots)?;
            if candidate.confidence < self.options.garbage_threshold
                && candidate.label != Label::Dot
            {
                garbage += 1;
                continue;
            }
            candidates.push(candidate);
        }
        self.diagnostics.note(&format!(
            "partition: {} candidates survive, {} garbage",
            candidates.len(),
            garbage
        ));

        let chosen = match best_cover(&candidates, stroke_count) {
            Some(chosen) => chosen,
            None => {
                // Garbage filtering can leave strokes uncoverable; fall
                // back to one-stroke clusters which always cover.
                self.diagnostics
                    .note("partition: no exact cover, re-admitting single strokes");
                for stroke in 0..stroke_count {
                    if candidates
                        .iter()
                        .any(|c| c.strokes.len() == 1 && c.strokes[0] == stroke)
                    {
                        continue;
                    }
                    let candidate =
                        self.classify_path(expression, &tree, &[stroke], &dots)?;
                    candidates.push(candidate);
                }
                best_cover(&candidates, stroke_count).unwrap_or_else(|| {
                    // Singles for every stroke exist, so a cover does too;
                    // degrade to one symbol per stroke regardless.
                    (0..candidates.len())
                        .filter(|&i| candidates[i].strokes.len() == 1)
                        .collect()
                })
            }
        };

        let mut clusters: Vec<&Candidate> = chosen.iter().map(|&i| &candidates[i]).collect();
        clusters.sort_by_key(|c| c.strokes.iter().copied().min());

        let mut symbols = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            symbols.push(Symbol::new(
                cluster.label,
                expression.sub_group(&cluster.strokes)?,
                cluster.confidence,
            )?);
        }
        Ok(symbols)
    }

    /// Merge new strokes into an existing symbol set and partition the
    /// rest.
    ///
    /// A new stroke joins an existing symbol when it overlaps that
    /// symbol's ink, or when it completes an equals sign over a minus,
    /// a lone horizontal bar, or a childless fraction line. Changed
    /// symbols are re-classified; remaining strokes are partitioned
    /// fresh; every returned symbol has cleared links.
    pub fn append(
        &mut self,
        symbols: Vec<Symbol>,
        new_traces: &TraceGroup,
    ) -> EngineResult<Vec<Symbol>> {
        if symbols.is_empty() {
            return self.partition(new_traces);
        }
        if new_traces.is_empty() {
            return Ok(symbols);
        }

        let mut symbols = symbols;
        let mut free = TraceGroup::new();
        let mut changed: BTreeSet<usize> = BTreeSet::new();

        for trace in new_traces {
            let mut target: Option<usize> = None;
            for index in 0..symbols.len() {
                if group_overlaps(symbols[index].trace_group(), trace)? {
                    target = Some(index);
                    break;
                }

                let mut combined = symbols[index].trace_group().clone();
                combined.push(trace.clone());
                let result = self.classifier.classify(&combined, None)?;
                let completes_equals = result.label == Label::Equals
                    && match symbols[index].label() {
                        Label::Minus | Label::HorizontalLine => true,
                        Label::FractionLine => !symbols[index].has_children(),
                        _ => false,
                    };
                if completes_equals {
                    target = Some(index);
                    break;
                }
            }

            match target {
                Some(index) => {
                    symbols[index].trace_group_mut().push(trace.clone());
                    changed.insert(index);
                }
                None => free.push(trace.clone()),
            }
        }

        for index in changed {
            let group = symbols[index].trace_group().clone();
            let result = self.classifier.classify(&group, None)?;
            symbols[index] = Symbol::new(result.label, group, result.confidence)?;
        }

        let new_symbols = self.partition(&free)?;
        symbols.extend(new_symbols);
        for symbol in &mut symbols {
            symbol.reset();
        }
        Ok(symbols)
    }

    /// Erase strokes from an existing symbol set.
    ///
    /// Symbols losing all their strokes disappear; symbols losing some
    /// are re-classified. Every returned symbol has cleared links.
    pub fn remove(
        &mut self,
        symbols: Vec<Symbol>,
        erased: &TraceGroup,
    ) -> EngineResult<Vec<Symbol>> {
        if symbols.is_empty() || erased.is_empty() {
            return Ok(symbols);
        }

        let mut symbols = symbols;
        for symbol in &mut symbols {
            symbol.reset();
        }

        let mut changed: BTreeSet<usize> = BTreeSet::new();
        for (index, symbol) in symbols.iter_mut().enumerate() {
            for trace in erased {
                if symbol.trace_group_mut().remove(trace) {
                    changed.insert(index);
                }
            }
        }

        let mut result = Vec::with_capacity(symbols.len());
        for (index, symbol) in symbols.into_iter().enumerate() {
            if !changed.contains(&index) {
                result.push(symbol);
                continue;
            }
            if symbol.trace_group().is_empty() {
                continue;
            }
            let group = symbol.trace_group().clone();
            let classified = self.classifier.classify(&group, None)?;
            result.push(Symbol::new(
                classified.label,
                group,
                classified.confidence,
            )?);
        }
        Ok(result)
    }

    fn classify_path(
        &mut self,
        expression: &TraceGroup,
        tree: &MinimumSpanningTree,
        path: &[usize],
        dots: &BTreeSet<usize>,
    ) -> EngineResult<Candidate> {
        if path.len() == 1 && dots.contains(&path[0]) {
            return Ok(Candidate {
                strokes: path.to_vec(),
                label: Label::Dot,
                confidence: DOT_CONFIDENCE,
            });
        }

        let cluster = expression.sub_group(path)?;
        let context_strokes = tree.context(path);
        let context = if context_strokes.is_empty() {
            None
        } else {
            Some(expression.sub_group(&context_strokes)?)
        };
        let result = self.classifier.classify(&cluster, context.as_ref())?;
        Ok(Candidate {
            strokes: path.to_vec(),
            label: result.label,
            confidence: result.confidence,
        })
    }

    fn find_overlaps(&mut self, expression: &TraceGroup) -> EngineResult<Vec<(usize, usize)>> {
        let mut pairs = Vec::new();
        for i in 0..expression.len() {
            for j in (i + 1)..expression.len() {
                let (Some(a), Some(b)) = (expression.get(i), expression.get(j)) else {
                    continue;
                };
                if traces_overlap(a, b)? {
                    pairs.push((i, j));
                }
            }
        }
        Ok(pairs)
    }

    fn find_equals_pairs(&mut self, expression: &TraceGroup) -> EngineResult<Vec<(usize, usize)>> {
        let mut pairs = Vec::new();
        for i in 0..expression.len() {
            for j in (i + 1)..expression.len() {
                if self.is_equals_pair(expression, i, j)? {
                    pairs.push((i, j));
                }
            }
        }
        Ok(pairs)
    }

    /// Whether strokes `i` and `j` together draw an equals sign: the
    /// classifier must agree, both strokes must be flat near-horizontal
    /// bars of similar length, close together, horizontally aligned,
    /// and no other stroke may run between them.
    fn is_equals_pair(
        &mut self,
        expression: &TraceGroup,
        i: usize,
        j: usize,
    ) -> EngineResult<bool> {
        let (Some(first), Some(second)) = (expression.get(i), expression.get(j)) else {
            return Ok(false);
        };
        if first.len() < 2 || second.len() < 2 {
            return Ok(false);
        }

        let pair = expression.sub_group(&[i, j])?;
        let verdict = self.classifier.classify(&pair, None)?;
        if verdict.label != Label::Equals || verdict.confidence <= 0.5 {
            return Ok(false);
        }

        let bounds_a = first.bounding_box().ok_or(EngineError::EmptyInk)?;
        let bounds_b = second.bounding_box().ok_or(EngineError::EmptyInk)?;

        // Horizontal projections intersect.
        if bounds_b.max_x < bounds_a.min_x || bounds_b.min_x > bounds_a.max_x {
            return Ok(false);
        }
        // Both strokes are flat bars.
        if bounds_a.height() > 0.40 * bounds_a.width()
            || bounds_b.height() > 0.40 * bounds_b.width()
        {
            return Ok(false);
        }
        // Slopes within 45 degrees of horizontal.
        if !slope_is_flat(first) || !slope_is_flat(second) {
            return Ok(false);
        }
        // Close together and of similar length.
        let min_width = bounds_a.width().min(bounds_b.width());
        if Trace::minimum_distance(first, second)? >= min_width {
            return Ok(false);
        }
        if (bounds_a.width() - bounds_b.width()).abs() >= min_width {
            return Ok(false);
        }

        // No other stroke runs between the two bars.
        let (smaller, bigger) = if bounds_a.width() > bounds_b.width() {
            (second, first)
        } else {
            (first, second)
        };
        for point in smaller.iter() {
            let Some(closest) = bigger.closest_point(*point) else {
                continue;
            };
            let connection = Trace::from_points(vec![*point, closest]);
            for (k, other) in expression.iter().enumerate() {
                if k == i || k == j {
                    continue;
                }
                if traces_overlap(&connection, other)? {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

fn slope_is_flat(trace: &Trace) -> bool {
    let (Some(left), Some(right)) = (trace.outer_left(), trace.outer_right()) else {
        return false;
    };
    let dx = right.x - left.x;
    if dx <= 0.0 {
        return false;
    }
    let slope = ((right.y - left.y) / dx).atan();
    (-std::f64::consts::FRAC_PI_4..=std::f64::consts::FRAC_PI_4).contains(&slope)
}

fn group_overlaps(group: &TraceGroup, trace: &Trace) -> EngineResult<bool> {
    for existing in group {
        if traces_overlap(existing, trace)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Minimum point-to-point distances between all stroke pairs, in
/// row-major upper-triangular order.
fn trace_distances(expression: &TraceGroup) -> EngineResult<Vec<f64>> {
    let count = expression.len();
    let mut distances = Vec::with_capacity(count * count.saturating_sub(1) / 2);
    for i in 0..count {
        for j in (i + 1)..count {
            let (Some(a), Some(b)) = (expression.get(i), expression.get(j)) else {
                continue;
            };
            distances.push(Trace::minimum_distance(a, b)?);
        }
    }
    Ok(distances)
}

/// Exhaustive exact-cover search: choose disjoint candidates covering
/// every stroke exactly once with maximal summed confidence. Branches
/// on the lowest uncovered stroke, so each partition is enumerated
/// once.
fn best_cover(candidates: &[Candidate], stroke_count: usize) -> Option<Vec<usize>> {
    let mut by_stroke: Vec<Vec<usize>> = vec![Vec::new(); stroke_count];
    for (index, candidate) in candidates.iter().enumerate() {
        for &stroke in &candidate.strokes {
            if stroke < stroke_count {
                by_stroke[stroke].push(index);
            }
        }
    }

    let mut covered = vec![false; stroke_count];
    let mut current = Vec::new();
    let mut best: Option<(f64, Vec<usize>)> = None;
    cover_search(
        candidates,
        &by_stroke,
        &mut covered,
        &mut current,
        0.0,
        &mut best,
    );
    best.map(|(_, chosen)| chosen)
}

fn cover_search(
    candidates: &[Candidate],
    by_stroke: &[Vec<usize>],
    covered: &mut [bool],
    current: &mut Vec<usize>,
    rate: f64,
    best: &mut Option<(f64, Vec<usize>)>,
) {
    let Some(next_stroke) = covered.iter().position(|&c| !c) else {
        if best.as_ref().is_none_or(|(best_rate, _)| rate > *best_rate) {
            *best = Some((rate, current.clone()));
        }
        return;
    };

    for &index in &by_stroke[next_stroke] {
        let candidate = &candidates[index];
        if candidate.strokes.iter().any(|&s| covered[s]) {
            continue;
        }
        for &stroke in &candidate.strokes {
            covered[stroke] = true;
        }
        current.push(index);
        cover_search(
            candidates,
            by_stroke,
            covered,
            current,
            rate + candidate.confidence,
            best,
        );
        current.pop();
        for &stroke in &candidate.strokes {
            covered[stroke] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use scrawl_core::Point;

    fn stroke(points: &[(f64, f64)]) -> Trace {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Digits stub: single strokes are digits by x position, anything
    /// larger is garbage.
    fn digit_stub()
    -> impl FnMut(&TraceGroup, Option<&TraceGroup>) -> EngineResult<Classification> {
        |cluster: &TraceGroup, _context: Option<&TraceGroup>| {
            if cluster.len() != 1 {
                return Ok(Classification {
                    label: Label::Plus,
                    confidence: 0.1,
                });
            }
            let bounds = cluster.bounding_box().ok_or(EngineError::EmptyInk)?;
            Ok(Classification {
                label: if bounds.min_x < 5.0 {
                    Label::Two
                } else {
                    Label::Three
                },
                confidence: 0.9,
            })
        }
    }

    #[test]
    fn test_partition_empty() {
        let mut partitioner = MstPartitioner::new(digit_stub());
        assert!(partitioner.partition(&TraceGroup::new()).unwrap().is_empty());
    }

    #[test]
    fn test_partition_single_stroke() {
        let mut partitioner = MstPartitioner::new(digit_stub());
        let expression =
            TraceGroup::from_traces(vec![stroke(&[(0.0, 0.0), (2.0, 4.0), (0.0, 8.0)])]);
        let symbols = partitioner.partition(&expression).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].label(), Label::Two);
        assert_eq!(symbols[0].trace_group().len(), 1);
    }

    #[test]
    fn test_partition_single_dot() {
        let mut partitioner = MstPartitioner::new(digit_stub());
        let expression = TraceGroup::from_traces(vec![stroke(&[(1.0, 1.0)])]);
        let symbols = partitioner.partition(&expression).unwrap();
        assert_eq!(symbols[0].label(), Label::Dot);
        assert_eq!(symbols[0].confidence(), DOT_CONFIDENCE);
    }

    #[test]
    fn test_partition_two_digits() {
        let mut partitioner = MstPartitioner::new(digit_stub());
        let expression = TraceGroup::from_traces(vec![
            stroke(&[(0.0, 0.0), (2.0, 8.0)]),
            stroke(&[(20.0, 0.0), (22.0, 8.0)]),
        ]);
        let symbols = partitioner.partition(&expression).unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].label(), Label::Two);
        assert_eq!(symbols[1].label(), Label::Three);
    }

    #[test]
    fn test_partition_prefers_high_rate_cluster() {
        // The pair scores far above the singles, and the singles score
        // below the garbage threshold.
        let mut classify = |cluster: &TraceGroup, _: Option<&TraceGroup>| {
            Ok(Classification {
                label: if cluster.len() == 2 {
                    Label::Equals
                } else {
                    Label::Minus
                },
                confidence: if cluster.len() == 2 { 0.95 } else { 0.4 },
            })
        };
        let mut partitioner = MstPartitioner::new(&mut classify);
        let expression = TraceGroup::from_traces(vec![
            stroke(&[(0.0, 4.0), (10.0, 4.0)]),
            stroke(&[(0.0, 0.0), (10.0, 0.0)]),
        ]);
        let symbols = partitioner.partition(&expression).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].label(), Label::Equals);
        assert_eq!(symbols[0].trace_group().len(), 2);
    }

    #[test]
    fn test_partition_fallback_to_singles() {
        // Everything is garbage: the fallback still produces one
        // symbol per stroke.
        let mut classify = |_: &TraceGroup, _: Option<&TraceGroup>| {
            Ok(Classification {
                label: Label::One,
                confidence: 0.1,
            })
        };
        let mut partitioner = MstPartitioner::new(&mut classify);
        let expression = TraceGroup::from_traces(vec![
            stroke(&[(0.0, 0.0), (0.0, 8.0)]),
            stroke(&[(20.0, 0.0), (20.0, 8.0)]),
            stroke(&[(40.0, 0.0), (40.0, 8.0)]),
        ]);
        let symbols = partitioner.partition(&expression).unwrap();
        assert_eq!(symbols.len(), 3);
        assert!(symbols.iter().all(|s| s.trace_group().len() == 1));
    }

    #[test]
    fn test_best_cover_maximizes_rate() {
        let candidates = vec![
            Candidate {
                strokes: vec![0],
                label: Label::One,
                confidence: 0.6,
            },
            Candidate {
                strokes: vec![1],
                label: Label::One,
                confidence: 0.6,
            },
            Candidate {
                strokes: vec![0, 1],
                label: Label::Equals,
                confidence: 0.9,
            },
        ];
        // Two singles sum to 1.2, beating the pair's 0.9.
        let chosen = best_cover(&candidates, 2).unwrap();
        assert_eq!(chosen, vec![0, 1]);
    }

    #[test]
    fn test_best_cover_requires_full_cover() {
        let candidates = vec![Candidate {
            strokes: vec![0],
            label: Label::One,
            confidence: 0.9,
        }];
        assert!(best_cover(&candidates, 2).is_none());
    }
}
