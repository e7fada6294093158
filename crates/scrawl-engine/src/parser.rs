//! Geometrical grammar parser
//!
//! Resolves the two-dimensional structure between classified symbols.
//! Symbols are sorted by abscissa and examined in adjacent pairs; each
//! pair resolves to a child attachment, a baseline link, or nothing,
//! walking up the parent chain when the direct relation is empty. The
//! pair pass repeats until the serialized expression stops changing,
//! then every populated child slot is parsed recursively as its own
//! little expression.

use std::collections::{BTreeSet, HashSet};

use scrawl_core::{Trace, TraceGroup};
use scrawl_raster::traces_overlap;

use crate::diagnostics::{Diagnostics, NullDiagnostics};
use crate::error::EngineResult;
use crate::symbols::{Relation, RenderShape, SymbolArena, SymbolId};

/// Safety bound on fixpoint passes; pathological ink that keeps
/// flip-flopping relations stops here instead of spinning.
const MAX_FIXPOINT_PASSES: usize = 32;

/// Structural parser over a symbol arena.
pub struct GrammarParser {
    diagnostics: Box<dyn Diagnostics>,
}

impl GrammarParser {
    /// A parser with no diagnostics.
    pub fn new() -> Self {
        Self {
            diagnostics: Box::new(NullDiagnostics),
        }
    }

    /// Install a diagnostics sink.
    pub fn set_diagnostics(&mut self, sink: Box<dyn Diagnostics>) {
        self.diagnostics = sink;
    }

    /// Resolve all structural relations in the arena.
    ///
    /// Existing links are cleared first; a parse always rebuilds the
    /// structure from scratch. Unresolved ambiguous symbols collapse to
    /// their preferred interpretation at the end.
    pub fn parse(&mut self, arena: &mut SymbolArena) -> EngineResult<()> {
        arena.reset_all();
        let ids = arena.ids();
        if ids.len() > 1 {
            self.parse_set(arena, ids)?;
        }
        arena.resolve_ambiguous();
        Ok(())
    }

    fn parse_set(&mut self, arena: &mut SymbolArena, mut ids: Vec<SymbolId>) -> EngineResult<()> {
        if ids.len() <= 1 {
            return Ok(());
        }

        ids.sort_by(|&a, &b| {
            arena
                .get(a)
                .bounds()
                .min_x
                .total_cmp(&arena.get(b).bounds().min_x)
        });

        let pairs = self.build_pairs(arena, &ids)?;
        self.diagnostics
            .note(&format!("parse: {} symbols, {} pairs", ids.len(), pairs.len()));

        // Re-run the pair pass until the serialized expression is
        // stable; later passes can correct earlier decisions once
        // structure has propagated.
        let mut previous = serialize_ids(arena, &ids);
        for _ in 0..MAX_FIXPOINT_PASSES {
            for &(primary, secondary) in &pairs {
                resolve_pair(arena, primary, secondary);
            }
            let current = serialize_ids(arena, &ids);
            if current == previous {
                break;
            }
            previous = current;
        }

        // Each populated slot is a little expression of its own;
        // nested resolution can reparent a child elsewhere, so keep
        // only those that still answer to this symbol.
        for &id in &ids {
            for slot in 0..arena.get(id).children().len() {
                let children = arena.get(id).children()[slot].clone();
                if children.len() > 1 {
                    self.parse_set(arena, children.clone())?;
                }
                let kept: Vec<SymbolId> = children
                    .into_iter()
                    .filter(|&child| arena.get(child).parent() == Some(id))
                    .collect();
                arena.set_slot_children(id, slot, kept);
            }
        }

        Ok(())
    }

    /// Adjacent sorted pairs, re-routed around a symbol lying on the
    /// straight line between a pair (the fraction-line case: the pairs
    /// for `\frac{2}{3}` become (frac, 2) and (frac, 3), not (2, 3)).
    fn build_pairs(
        &mut self,
        arena: &SymbolArena,
        ids: &[SymbolId],
    ) -> EngineResult<Vec<(SymbolId, SymbolId)>> {
        let mut positions: BTreeSet<(usize, usize)> = BTreeSet::new();
        for i in 0..ids.len() - 1 {
            for pair in self.process_pair(arena, ids, i, i + 1)? {
                positions.insert(pair);
            }
        }
        Ok(positions
            .into_iter()
            .map(|(i, j)| (ids[i], ids[j]))
            .collect())
    }

    fn process_pair(
        &self,
        arena: &SymbolArena,
        ids: &[SymbolId],
        first: usize,
        second: usize,
    ) -> EngineResult<Vec<(usize, usize)>> {
        let group_a = arena.get(ids[first]).trace_group();
        let group_b = arena.get(ids[second]).trace_group();
        let (p, q) = TraceGroup::closest_points(group_a, group_b)?;
        let connection = Trace::from_points(vec![p, q]);

        for (between, &id) in ids.iter().enumerate() {
            if between == first || between == second {
                continue;
            }
            for trace in arena.get(id).trace_group() {
                if traces_overlap(&connection, trace)? {
                    let x_between = arena.get(id).bounds().min_x;
                    let pair_a = if x_between < arena.get(ids[first]).bounds().min_x {
                        (between, first)
                    } else {
                        (first, between)
                    };
                    let pair_b = if x_between < arena.get(ids[second]).bounds().min_x {
                        (between, second)
                    } else {
                        (second, between)
                    };
                    return Ok(vec![pair_a, pair_b]);
                }
            }
        }

        Ok(vec![(first, second)])
    }
}

impl Default for GrammarParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve one ordered pair.
///
/// CHILD attaches the secondary under the primary. NEXT_SYMBOL re-tests
/// against the primary's parent: the pair might be siblings through the
/// parent instead, and only one of primary/parent may claim the
/// secondary as successor. NONE walks up the parent chain until a
/// relation is found or the chain runs out; an unresolved pair is
/// simply left unlinked.
fn resolve_pair(arena: &mut SymbolArena, primary: SymbolId, secondary: SymbolId) {
    let mut current = primary;
    // Parent chains are acyclic; the bound guards against pathological
    // reparenting.
    for _ in 0..=arena.len() {
        let position = arena.relative_position(current, secondary);
        match arena.set_argument(current, position, secondary) {
            Relation::Child => {
                arena.set_parent(secondary, Some(current));
                return;
            }
            Relation::NextSymbol => {
                if let Some(parent) = arena.get(current).parent() {
                    let parent_position = arena.relative_position(parent, secondary);
                    match arena.set_argument(parent, parent_position, secondary) {
                        Relation::Child => arena.set_parent(secondary, Some(parent)),
                        Relation::NextSymbol => arena.set_next(current, None),
                        Relation::None => {}
                    }
                }
                return;
            }
            Relation::None => match arena.get(current).parent() {
                Some(parent) => current = parent,
                None => return,
            },
        }
    }
}

/// Serialize the whole arena to TeX, sorted by abscissa.
///
/// Symbols without a parent start baselines; each baseline chains
/// through next links, skipping symbols that acquired a parent.
pub fn serialize(arena: &SymbolArena) -> String {
    let mut ids = arena.ids();
    ids.sort_by(|&a, &b| {
        arena
            .get(a)
            .bounds()
            .min_x
            .total_cmp(&arena.get(b).bounds().min_x)
    });
    serialize_ids(arena, &ids)
}

fn serialize_ids(arena: &SymbolArena, ids: &[SymbolId]) -> String {
    let mut printed: HashSet<SymbolId> = HashSet::new();
    let mut output = String::new();

    for &id in ids {
        if arena.get(id).parent().is_some() || printed.contains(&id) {
            continue;
        }
        let mut cursor = Some(id);
        let mut hops = 0;
        while let Some(current) = cursor {
            hops += 1;
            if hops > arena.len() + 1 {
                break;
            }
            if arena.get(current).parent().is_none() && printed.insert(current) {
                output.push_str(&expression_of(arena, current, 0));
            }
            cursor = arena.get(current).next();
        }
    }

    output
}

/// Recursive TeX rendering of one symbol with its child slots.
fn expression_of(arena: &SymbolArena, id: SymbolId, depth: usize) -> String {
    if depth > arena.len() {
        return String::new();
    }

    let symbol = arena.get(id);
    let glyph = symbol.label().glyph();
    match symbol.template().render {
        RenderShape::Plain => glyph.to_string(),
        RenderShape::Exponent => {
            let exponent = slot_text(arena, id, 0, depth);
            if exponent.is_empty() {
                glyph.to_string()
            } else {
                format!("{glyph}^{{{exponent}}}")
            }
        }
        RenderShape::ExponentIndex => {
            let mut text = glyph.to_string();
            let exponent = slot_text(arena, id, 0, depth);
            if !exponent.is_empty() {
                text.push_str(&format!("^{{{exponent}}}"));
            }
            let index = slot_text(arena, id, 1, depth);
            if !index.is_empty() {
                text.push_str(&format!("_{{{index}}}"));
            }
            text
        }
        RenderShape::Root => {
            let mut text = format!("\\sqrt{{{}}}", slot_text(arena, id, 0, depth));
            let exponent = slot_text(arena, id, 1, depth);
            if !exponent.is_empty() {
                text.push_str(&format!("^{{{exponent}}}"));
            }
            text
        }
        RenderShape::Fraction => format!(
            "\\frac{{{}}}{{{}}}",
            slot_text(arena, id, 0, depth),
            slot_text(arena, id, 1, depth)
        ),
    }
}

/// Render one child slot: the first child, then each successor through
/// the baseline chain, falling back to slot order where a chain link
/// is missing.
fn slot_text(arena: &SymbolArena, id: SymbolId, slot: usize, depth: usize) -> String {
    let Some(children) = arena.get(id).children().get(slot) else {
        return String::new();
    };
    let Some(&head) = children.first() else {
        return String::new();
    };

    let mut text = expression_of(arena, head, depth + 1);
    for position in 0..children.len() - 1 {
        match arena.get(children[position]).next() {
            Some(next) => text.push_str(&expression_of(arena, next, depth + 1)),
            None => text.push_str(&expression_of(arena, children[position + 1], depth + 1)),
        }
    }
    text
}
