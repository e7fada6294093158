//! Trace, TraceGroup - Ink strokes and stroke collections
//!
//! A [`Trace`] is one continuous pen-down stroke: the ordered sequence of
//! points sampled while the pen touched the surface. A [`TraceGroup`]
//! collects traces into one geometric unit (a whole expression, or the
//! strokes of a single symbol).
//!
//! Derived attributes (bounding box, centroid, center of mass) are computed
//! on demand from the current points, never cached, so they are always
//! valid after mutation. Geometry accessors return `None` for empty traces
//! and groups; callers that require geometry turn that into
//! [`Error::EmptyTrace`] / [`Error::EmptyTraceGroup`].

use crate::error::{Error, Result};
use crate::point::Point;

/// Axis-aligned bounding box in ink coordinates (y grows upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Horizontal extent.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Covered area (width x height).
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    fn of_points<'a>(points: impl Iterator<Item = &'a Point>) -> Option<BoundingBox> {
        let mut bounds: Option<BoundingBox> = None;
        for point in points {
            bounds = Some(match bounds {
                None => BoundingBox {
                    min_x: point.x,
                    min_y: point.y,
                    max_x: point.x,
                    max_y: point.y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(point.x),
                    min_y: b.min_y.min(point.y),
                    max_x: b.max_x.max(point.x),
                    max_y: b.max_y.max(point.y),
                },
            });
        }
        bounds
    }
}

/// One continuous pen-down stroke.
///
/// A trace with a single point is a dot; a line stroke has at least two
/// points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trace {
    points: Vec<Point>,
}

impl Trace {
    /// Create a new empty trace.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a trace from a point sequence.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Append a point.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the trace has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this trace is a dot (a single sampled point).
    #[inline]
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    /// Get a point by index.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// All points as a slice.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Translate every point by `delta`.
    pub fn translate(&mut self, delta: Point) {
        for point in &mut self.points {
            *point = point.add(delta);
        }
    }

    /// Scale every point component-wise by `factors` (relative to origin).
    pub fn scale(&mut self, factors: Point) {
        for point in &mut self.points {
            *point = point.multiply_by_point(factors);
        }
    }

    /// Uniformly scale every point by `factor` (relative to origin).
    pub fn scale_uniform(&mut self, factor: f64) {
        self.scale(Point::new(factor, factor));
    }

    /// Bounding box, or `None` for an empty trace.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of_points(self.points.iter())
    }

    /// Center of the bounding box, or `None` for an empty trace.
    pub fn centroid(&self) -> Option<Point> {
        self.bounding_box().map(|b| b.center())
    }

    /// Average of all points, or `None` for an empty trace.
    pub fn center_of_mass(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Point::default(), |acc, p| acc.add(*p));
        Some(sum.divide_by(self.points.len() as f64))
    }

    /// The point with the minimum abscissa, or `None` for an empty trace.
    pub fn outer_left(&self) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.x < best.x { p } else { best })
    }

    /// The point with the maximum abscissa, or `None` for an empty trace.
    pub fn outer_right(&self) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.x > best.x { p } else { best })
    }

    /// The point of this trace closest to `target`, or `None` for an
    /// empty trace.
    pub fn closest_point(&self, target: Point) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .min_by(|a, b| a.distance(target).total_cmp(&b.distance(target)))
    }

    /// The pair of closest points between two traces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTrace`] if either trace has no points.
    pub fn closest_points(a: &Trace, b: &Trace) -> Result<(Point, Point)> {
        if a.is_empty() || b.is_empty() {
            return Err(Error::EmptyTrace);
        }

        let mut best = (a.points[0], b.points[0]);
        let mut best_distance = best.0.distance(best.1);
        for &p in &a.points {
            for &q in &b.points {
                let distance = p.distance(q);
                if distance < best_distance {
                    best_distance = distance;
                    best = (p, q);
                }
            }
        }
        Ok(best)
    }

    /// Minimum point-to-point distance between two traces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTrace`] if either trace has no points.
    pub fn minimum_distance(a: &Trace, b: &Trace) -> Result<f64> {
        let (p, q) = Trace::closest_points(a, b)?;
        Ok(p.distance(q))
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<Point> for Trace {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// A collection of traces treated as one geometric unit.
///
/// Insertion order is irrelevant to the geometry but preserved for
/// deterministic iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraceGroup {
    traces: Vec<Trace>,
}

impl TraceGroup {
    /// Create a new empty group.
    pub fn new() -> Self {
        Self { traces: Vec::new() }
    }

    /// Create a group from a trace list.
    pub fn from_traces(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    /// Add a trace.
    pub fn push(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// Add every trace of another group.
    pub fn extend(&mut self, other: &TraceGroup) {
        self.traces.extend(other.traces.iter().cloned());
    }

    /// Remove the first trace equal to `trace`. Returns true if removed.
    pub fn remove(&mut self, trace: &Trace) -> bool {
        match self.traces.iter().position(|t| t == trace) {
            Some(index) => {
                self.traces.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the group contains a trace equal to `trace`.
    pub fn contains(&self, trace: &Trace) -> bool {
        self.traces.iter().any(|t| t == trace)
    }

    /// Number of traces.
    #[inline]
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Check if the group has no traces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Get a trace by index.
    pub fn get(&self, index: usize) -> Option<&Trace> {
        self.traces.get(index)
    }

    /// All traces as a slice.
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Iterator over the traces.
    pub fn iter(&self) -> impl Iterator<Item = &Trace> {
        self.traces.iter()
    }

    /// A new group holding copies of the traces at the given indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if any index is out of range.
    pub fn sub_group(&self, indices: &[usize]) -> Result<TraceGroup> {
        let mut traces = Vec::with_capacity(indices.len());
        for &index in indices {
            let trace = self.traces.get(index).ok_or(Error::IndexOutOfBounds {
                index,
                len: self.traces.len(),
            })?;
            traces.push(trace.clone());
        }
        Ok(TraceGroup::from_traces(traces))
    }

    /// Translate every trace by `delta`.
    pub fn translate(&mut self, delta: Point) {
        for trace in &mut self.traces {
            trace.translate(delta);
        }
    }

    /// Scale every trace component-wise by `factors` (relative to origin).
    pub fn scale(&mut self, factors: Point) {
        for trace in &mut self.traces {
            trace.scale(factors);
        }
    }

    /// Uniformly scale every trace by `factor` (relative to origin).
    pub fn scale_uniform(&mut self, factor: f64) {
        self.scale(Point::new(factor, factor));
    }

    /// Bounding box of all points, or `None` for an empty group.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of_points(self.traces.iter().flat_map(|t| t.iter()))
    }

    /// Center of the bounding box, or `None` for an empty group.
    pub fn centroid(&self) -> Option<Point> {
        self.bounding_box().map(|b| b.center())
    }

    /// Covered area, or `None` for an empty group.
    pub fn area(&self) -> Option<f64> {
        self.bounding_box().map(|b| b.area())
    }

    /// Average of all points of all traces, weighted by point count,
    /// or `None` for an empty group.
    pub fn center_of_mass(&self) -> Option<Point> {
        let mut sum = Point::default();
        let mut count = 0usize;
        for trace in &self.traces {
            for point in trace {
                sum = sum.add(*point);
                count += 1;
            }
        }
        if count == 0 {
            None
        } else {
            Some(sum.divide_by(count as f64))
        }
    }

    /// The pair of closest points between two groups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTraceGroup`] if either group is empty and
    /// [`Error::EmptyTrace`] if a contained trace has no points.
    pub fn closest_points(a: &TraceGroup, b: &TraceGroup) -> Result<(Point, Point)> {
        if a.is_empty() || b.is_empty() {
            return Err(Error::EmptyTraceGroup);
        }

        let mut best: Option<(Point, Point, f64)> = None;
        for trace_a in &a.traces {
            for trace_b in &b.traces {
                let (p, q) = Trace::closest_points(trace_a, trace_b)?;
                let distance = p.distance(q);
                if best.is_none_or(|(_, _, d)| distance < d) {
                    best = Some((p, q, distance));
                }
            }
        }
        let (p, q, _) = best.ok_or(Error::EmptyTraceGroup)?;
        Ok((p, q))
    }

    /// Minimum point-to-point distance between two groups.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TraceGroup::closest_points`].
    pub fn minimum_distance(a: &TraceGroup, b: &TraceGroup) -> Result<f64> {
        let (p, q) = TraceGroup::closest_points(a, b)?;
        Ok(p.distance(q))
    }
}

impl<'a> IntoIterator for &'a TraceGroup {
    type Item = &'a Trace;
    type IntoIter = std::slice::Iter<'a, Trace>;

    fn into_iter(self) -> Self::IntoIter {
        self.traces.iter()
    }
}

impl FromIterator<Trace> for TraceGroup {
    fn from_iter<T: IntoIterator<Item = Trace>>(iter: T) -> Self {
        Self {
            traces: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> Trace {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_trace_bounding_box() {
        let trace = line(&[(10.0, 5.0), (30.0, 40.0), (15.0, 20.0)]);
        let bounds = trace.bounding_box().unwrap();
        assert_eq!(bounds.min_x, 10.0);
        assert_eq!(bounds.min_y, 5.0);
        assert_eq!(bounds.max_x, 30.0);
        assert_eq!(bounds.max_y, 40.0);
        assert_eq!(bounds.width(), 20.0);
        assert_eq!(bounds.height(), 35.0);
    }

    #[test]
    fn test_empty_trace_geometry() {
        let trace = Trace::new();
        assert!(trace.bounding_box().is_none());
        assert!(trace.centroid().is_none());
        assert!(trace.center_of_mass().is_none());
        assert!(matches!(
            Trace::minimum_distance(&trace, &line(&[(0.0, 0.0)])),
            Err(Error::EmptyTrace)
        ));
    }

    #[test]
    fn test_centroid_vs_center_of_mass() {
        // Three of four corner points; the box center and the point
        // average differ.
        let trace = line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(trace.centroid().unwrap(), Point::new(5.0, 5.0));
        let com = trace.center_of_mass().unwrap();
        assert!((com.x - 20.0 / 3.0).abs() < 1e-12);
        assert!((com.y - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_trace_translate_scale() {
        let mut trace = line(&[(1.0, 2.0), (3.0, 4.0)]);
        trace.translate(Point::new(-1.0, -2.0));
        assert_eq!(trace.get(0).unwrap(), Point::new(0.0, 0.0));
        trace.scale(Point::new(2.0, 3.0));
        assert_eq!(trace.get(1).unwrap(), Point::new(4.0, 6.0));
    }

    #[test]
    fn test_minimum_distance_between_traces() {
        let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = line(&[(4.0, 4.0), (1.0, 4.0)]);
        assert_eq!(Trace::minimum_distance(&a, &b).unwrap(), 4.0);
        let (p, q) = Trace::closest_points(&a, &b).unwrap();
        assert_eq!(p, Point::new(1.0, 0.0));
        assert_eq!(q, Point::new(1.0, 4.0));
    }

    #[test]
    fn test_group_sub_group() {
        let group = TraceGroup::from_traces(vec![
            line(&[(0.0, 0.0)]),
            line(&[(1.0, 1.0)]),
            line(&[(2.0, 2.0)]),
        ]);
        let sub = group.sub_group(&[2, 0]).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get(0).unwrap().get(0).unwrap(), Point::new(2.0, 2.0));

        assert!(matches!(
            group.sub_group(&[3]),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_group_remove() {
        let dot = line(&[(5.0, 5.0)]);
        let stroke = line(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut group = TraceGroup::from_traces(vec![dot.clone(), stroke.clone()]);

        assert!(group.remove(&dot));
        assert_eq!(group.len(), 1);
        assert!(!group.remove(&dot));
        assert!(group.contains(&stroke));
    }

    #[test]
    fn test_group_geometry() {
        let group = TraceGroup::from_traces(vec![
            line(&[(0.0, 0.0), (2.0, 0.0)]),
            line(&[(0.0, 4.0), (2.0, 4.0)]),
        ]);
        let bounds = group.bounding_box().unwrap();
        assert_eq!(bounds.width(), 2.0);
        assert_eq!(bounds.height(), 4.0);
        assert_eq!(group.area().unwrap(), 8.0);
        assert_eq!(group.centroid().unwrap(), Point::new(1.0, 2.0));
        assert_eq!(group.center_of_mass().unwrap(), Point::new(1.0, 2.0));
        assert_eq!(
            TraceGroup::minimum_distance(
                &group.sub_group(&[0]).unwrap(),
                &group.sub_group(&[1]).unwrap()
            )
            .unwrap(),
            4.0
        );
    }
}
