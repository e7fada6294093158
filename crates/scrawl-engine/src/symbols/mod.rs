//! Symbol model
//!
//! A [`Symbol`] wraps one classified cluster of ink with its label,
//! confidence and structural links. Symbols live in a [`SymbolArena`]
//! and refer to each other by stable [`SymbolId`]s - parent, baseline
//! neighbours and slot children are ids, so there are no reference
//! cycles and a reset can never leave a dangling pointer.
//!
//! The grammar parser drives all link mutation through the arena:
//! [`SymbolArena::relative_position`] resolves the spatial relation of
//! a pair and [`SymbolArena::set_argument`] applies a symbol template
//! to decide between child attachment, baseline chaining, or nothing.

pub mod template;

use scrawl_core::{BoundingBox, Point, TraceGroup};

use crate::error::{EngineError, EngineResult};
pub use template::{
    AcceptanceRule, ArgumentPosition, Relation, RenderShape, SlotSpec, SymbolClass, SymbolTemplate,
};

/// Concrete glyph identity of a classified cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    // Numbers
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    // Letters
    LowerA,
    LowerC,
    LowerE,
    LowerG,
    LowerI,
    LowerL,
    LowerN,
    LowerO,
    LowerS,
    LowerT,
    // Variables
    LowerX,
    LowerY,
    // Operators
    Plus,
    Minus,
    Equals,
    SquareRoot,
    LeftParenthesis,
    RightParenthesis,
    FractionLine,
    GreaterThan,
    LessThan,
    Dot,
    // Ambiguous strokes
    SLike,
    GLike,
    CLike,
    Circle,
    HorizontalLine,
    VerticalLine,
}

impl Label {
    /// The template describing this symbol kind.
    pub fn template(self) -> &'static SymbolTemplate {
        use template::*;
        match self {
            Label::Zero
            | Label::One
            | Label::Two
            | Label::Three
            | Label::Four
            | Label::Five
            | Label::Six
            | Label::Seven
            | Label::Eight
            | Label::Nine => &NUMBER_TEMPLATE,

            Label::LowerA
            | Label::LowerC
            | Label::LowerE
            | Label::LowerG
            | Label::LowerI
            | Label::LowerL
            | Label::LowerN
            | Label::LowerO
            | Label::LowerS
            | Label::LowerT => &LETTER_TEMPLATE,

            Label::LowerX | Label::LowerY => &VARIABLE_TEMPLATE,

            Label::Plus
            | Label::Equals
            | Label::LeftParenthesis
            | Label::RightParenthesis
            | Label::GreaterThan
            | Label::LessThan
            | Label::Dot => &OPERATOR_TEMPLATE,
            Label::Minus => &MINUS_TEMPLATE,
            Label::SquareRoot => &SQUARE_ROOT_TEMPLATE,
            Label::FractionLine => &FRACTION_LINE_TEMPLATE,

            Label::SLike => &S_LIKE_TEMPLATE,
            Label::GLike => &G_LIKE_TEMPLATE,
            Label::CLike => &C_LIKE_TEMPLATE,
            Label::Circle => &CIRCLE_TEMPLATE,
            Label::HorizontalLine => &HORIZONTAL_LINE_TEMPLATE,
            Label::VerticalLine => &VERTICAL_LINE_TEMPLATE,
        }
    }

    /// The coarse class of this symbol kind.
    pub fn class(self) -> SymbolClass {
        self.template().class
    }

    /// The TeX glyph. Root and fraction shapes carry their notation in
    /// the render shape; ambiguous labels show their preferred
    /// alternative.
    pub fn glyph(self) -> &'static str {
        match self {
            Label::Zero => "0",
            Label::One => "1",
            Label::Two => "2",
            Label::Three => "3",
            Label::Four => "4",
            Label::Five => "5",
            Label::Six => "6",
            Label::Seven => "7",
            Label::Eight => "8",
            Label::Nine => "9",
            Label::LowerA => "a",
            Label::LowerC => "c",
            Label::LowerE => "e",
            Label::LowerG => "g",
            Label::LowerI => "i",
            Label::LowerL => "l",
            Label::LowerN => "n",
            Label::LowerO => "o",
            Label::LowerS => "s",
            Label::LowerT => "t",
            Label::LowerX => "x",
            Label::LowerY => "y",
            Label::Plus => "+",
            Label::Minus => "-",
            Label::Equals => "=",
            Label::SquareRoot => "",
            Label::LeftParenthesis => "(",
            Label::RightParenthesis => ")",
            Label::FractionLine => "",
            Label::GreaterThan => ">",
            Label::LessThan => "<",
            Label::Dot => ".",
            Label::SLike => "s",
            Label::GLike => "g",
            Label::CLike => "c",
            Label::Circle => "o",
            Label::HorizontalLine => "-",
            Label::VerticalLine => "1",
        }
    }
}

/// Stable identifier of a symbol within a [`SymbolArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

impl SymbolId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One classified symbol with its structural links.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Label assigned by the classifier; ambiguous symbols revert to
    /// this on reset
    base_label: Label,
    /// Effective label (rebound when an ambiguity resolves)
    label: Label,
    template: &'static SymbolTemplate,
    trace_group: TraceGroup,
    confidence: f64,
    bounds: BoundingBox,
    center_of_mass: Point,
    parent: Option<SymbolId>,
    previous: Option<SymbolId>,
    next: Option<SymbolId>,
    /// One child list per template slot
    children: Vec<Vec<SymbolId>>,
}

impl Symbol {
    /// Create a symbol from a classified cluster.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInk`] for a group without points or
    /// containing an empty trace.
    pub fn new(label: Label, trace_group: TraceGroup, confidence: f64) -> EngineResult<Self> {
        if trace_group.iter().any(|t| t.is_empty()) {
            return Err(EngineError::EmptyInk);
        }
        let bounds = trace_group.bounding_box().ok_or(EngineError::EmptyInk)?;
        let center_of_mass = trace_group.center_of_mass().ok_or(EngineError::EmptyInk)?;

        let template = label.template();
        Ok(Self {
            base_label: label,
            label,
            template,
            trace_group,
            confidence,
            bounds,
            center_of_mass,
            parent: None,
            previous: None,
            next: None,
            children: vec![Vec::new(); template.slots.len()],
        })
    }

    /// Effective label.
    pub fn label(&self) -> Label {
        self.label
    }

    /// Coarse class of the effective label.
    pub fn class(&self) -> SymbolClass {
        self.template.class
    }

    /// The effective template.
    pub fn template(&self) -> &'static SymbolTemplate {
        self.template
    }

    /// Classifier confidence in [0, 1].
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The underlying ink.
    pub fn trace_group(&self) -> &TraceGroup {
        &self.trace_group
    }

    /// Bounding box of the ink, computed at construction.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Center of mass of the ink, computed at construction.
    pub fn center_of_mass(&self) -> Point {
        self.center_of_mass
    }

    /// The structural parent, if attached.
    pub fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    /// The baseline predecessor.
    pub fn previous(&self) -> Option<SymbolId> {
        self.previous
    }

    /// The baseline successor.
    pub fn next(&self) -> Option<SymbolId> {
        self.next
    }

    /// Children per slot, in template slot order.
    pub fn children(&self) -> &[Vec<SymbolId>] {
        &self.children
    }

    /// Whether any slot holds a child.
    pub fn has_children(&self) -> bool {
        self.children.iter().any(|slot| !slot.is_empty())
    }

    /// Whether this symbol still carries unresolved alternative
    /// interpretations.
    pub fn is_ambiguous(&self) -> bool {
        !self.template.alternatives.is_empty()
    }

    /// Mutable access to the ink for stroke-level edits.
    ///
    /// Cached geometry is not updated; callers rebuild the symbol (or
    /// re-classify it) after editing.
    pub(crate) fn trace_group_mut(&mut self) -> &mut TraceGroup {
        &mut self.trace_group
    }

    /// Clear all relational links and revert an ambiguity resolution.
    pub(crate) fn reset(&mut self) {
        self.label = self.base_label;
        self.template = self.base_label.template();
        self.parent = None;
        self.previous = None;
        self.next = None;
        self.children = vec![Vec::new(); self.template.slots.len()];
    }

    /// Rebind to another label (ambiguity resolution). Children are
    /// re-sliced to the new template; existing attachments are dropped.
    pub(crate) fn rebind(&mut self, label: Label) {
        self.label = label;
        self.template = label.template();
        self.children = vec![Vec::new(); self.template.slots.len()];
    }
}

/// Arena of symbols with id-based links.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena from a symbol list; ids follow list order.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the arena holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All ids, in insertion order.
    pub fn ids(&self) -> Vec<SymbolId> {
        (0..self.symbols.len()).map(SymbolId).collect()
    }

    /// Borrow a symbol.
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    /// Iterate the symbols in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Move the symbols out, leaving the arena empty. Link ids become
    /// meaningless once outside; the next parse resets them.
    pub fn take_symbols(&mut self) -> Vec<Symbol> {
        std::mem::take(&mut self.symbols)
    }

    /// Clear every symbol's links (and ambiguity resolutions).
    pub fn reset_all(&mut self) {
        for symbol in &mut self.symbols {
            symbol.reset();
        }
    }

    /// Collapse every unresolved ambiguous symbol to its preferred
    /// alternative.
    pub fn resolve_ambiguous(&mut self) {
        for symbol in &mut self.symbols {
            if let Some(&preferred) = symbol.template.alternatives.first() {
                symbol.rebind(preferred);
            }
        }
    }

    /// Qualitative position of `b` relative to `a`, canonicalized by
    /// `a`'s template.
    ///
    /// The nine sectors around `a`'s bounding box are resolved against
    /// `b`'s center of mass; the center sector splits into INSIDE or
    /// OUTSIDE by area. Wide operators (horizontal bars) use +-45
    /// degree diagonal sectors on their flanks so anything rightward
    /// reads as a successor and anything over or under the bar reads
    /// as ABOVE / BELOW.
    pub fn relative_position(&self, a: SymbolId, b: SymbolId) -> ArgumentPosition {
        let base = self.get(a);
        let other = self.get(b);
        let bounds = base.bounds;
        let target = other.center_of_mass;
        let inside_or_outside = if other.bounds.area() > bounds.area() {
            ArgumentPosition::Outside
        } else {
            ArgumentPosition::Inside
        };

        let mut position = if base.template.wide {
            wide_position(&bounds, target, inside_or_outside)
        } else {
            standard_position(&bounds, target, inside_or_outside)
        };

        for &(from, to) in base.template.remaps {
            if position == from {
                position = to;
                break;
            }
        }
        position
    }

    /// Offer `b` to `a` at the given relative position.
    ///
    /// Routes into a child slot when the position names one and the
    /// candidate's class and geometry pass the slot's rule; RIGHT
    /// without a slot chains the baseline. Ambiguous symbols try each
    /// alternative template and commit to the first that accepts a
    /// child.
    pub fn set_argument(
        &mut self,
        a: SymbolId,
        position: ArgumentPosition,
        b: SymbolId,
    ) -> Relation {
        if self.get(a).is_ambiguous() {
            return self.set_argument_ambiguous(a, position, b);
        }

        let template = self.get(a).template;
        if let Some(slot) = template.slots.iter().position(|s| s.position == position) {
            if self.slot_accepts(template, slot, a, b) {
                if !self.symbols[a.0].children[slot].contains(&b) {
                    self.symbols[a.0].children[slot].push(b);
                }
                return Relation::Child;
            }
            return Relation::None;
        }

        if position == ArgumentPosition::Right {
            self.set_next(a, Some(b));
            return Relation::NextSymbol;
        }
        Relation::None
    }

    fn set_argument_ambiguous(
        &mut self,
        a: SymbolId,
        position: ArgumentPosition,
        b: SymbolId,
    ) -> Relation {
        let alternatives = self.get(a).template.alternatives;
        for &alternative in alternatives {
            let template = alternative.template();
            if let Some(slot) = template.slots.iter().position(|s| s.position == position)
                && self.slot_accepts(template, slot, a, b)
            {
                self.symbols[a.0].rebind(alternative);
                self.symbols[a.0].children[slot].push(b);
                return Relation::Child;
            }
        }

        if position == ArgumentPosition::Right {
            self.set_next(a, Some(b));
            return Relation::NextSymbol;
        }
        Relation::None
    }

    fn slot_accepts(
        &self,
        template: &'static SymbolTemplate,
        slot: usize,
        a: SymbolId,
        b: SymbolId,
    ) -> bool {
        let candidate = self.get(b);
        template.slots[slot]
            .accepts
            .iter()
            .find(|(class, _)| *class == candidate.class())
            .is_some_and(|(_, rule)| {
                rule.accepts(&self.get(a).bounds, &candidate.bounds, candidate.label)
            })
    }

    /// Reparent `child`; the old parent's slot entry is removed.
    pub fn set_parent(&mut self, child: SymbolId, parent: Option<SymbolId>) {
        if let Some(old) = self.symbols[child.0].parent
            && Some(old) != parent
        {
            self.remove_child(old, child);
        }
        self.symbols[child.0].parent = parent;
    }

    /// Link or clear the baseline successor of `a`.
    pub fn set_next(&mut self, a: SymbolId, next: Option<SymbolId>) {
        match next {
            Some(b) => {
                self.symbols[a.0].next = Some(b);
                self.symbols[b.0].previous = Some(a);
            }
            None => {
                // Clear the back-reference only if it still points here;
                // another symbol may have claimed the successor since.
                if let Some(b) = self.symbols[a.0].next
                    && self.symbols[b.0].previous == Some(a)
                {
                    self.symbols[b.0].previous = None;
                }
                self.symbols[a.0].next = None;
            }
        }
    }

    /// Detach `child` from `parent`'s slots. The chain link of the
    /// preceding sibling is cleared when it pointed at the removed
    /// child.
    pub fn remove_child(&mut self, parent: SymbolId, child: SymbolId) {
        for slot in 0..self.symbols[parent.0].children.len() {
            if let Some(position) = self.symbols[parent.0].children[slot]
                .iter()
                .position(|&c| c == child)
            {
                self.symbols[parent.0].children[slot].remove(position);
                if position > 0 {
                    let predecessor = self.symbols[parent.0].children[slot][position - 1];
                    if self.symbols[predecessor.0].next == Some(child) {
                        self.set_next(predecessor, None);
                    }
                }
                break;
            }
        }
    }

    /// Replace the child list of one slot (used after recursive slot
    /// parsing re-filters children).
    pub(crate) fn set_slot_children(&mut self, id: SymbolId, slot: usize, children: Vec<SymbolId>) {
        self.symbols[id.0].children[slot] = children;
    }
}

fn standard_position(
    bounds: &BoundingBox,
    target: Point,
    inside_or_outside: ArgumentPosition,
) -> ArgumentPosition {
    let vertical = if target.y < bounds.min_y {
        -1
    } else if target.y <= bounds.max_y {
        0
    } else {
        1
    };
    let horizontal = if target.x < bounds.min_x {
        -1
    } else if target.x <= bounds.max_x {
        0
    } else {
        1
    };

    match (vertical, horizontal) {
        (1, -1) => ArgumentPosition::AboveLeft,
        (1, 0) => ArgumentPosition::Above,
        (1, 1) => ArgumentPosition::AboveRight,
        (0, -1) => ArgumentPosition::Left,
        (0, 1) => ArgumentPosition::Right,
        (-1, -1) => ArgumentPosition::BelowLeft,
        (-1, 0) => ArgumentPosition::Below,
        (-1, 1) => ArgumentPosition::BelowRight,
        _ => inside_or_outside,
    }
}

/// Sector geometry for wide horizontal bars. Left of the bar the
/// flanks open at +-45 degrees from the bar's left end; anything to
/// the right reads as RIGHT so successors drawn slightly high or low
/// still chain.
fn wide_position(
    bounds: &BoundingBox,
    target: Point,
    inside_or_outside: ArgumentPosition,
) -> ArgumentPosition {
    if target.x < bounds.min_x {
        let dx = target.x - bounds.min_x;
        return if target.y < bounds.max_y + dx {
            ArgumentPosition::BelowLeft
        } else if target.y <= bounds.max_y - dx {
            ArgumentPosition::Left
        } else {
            ArgumentPosition::AboveLeft
        };
    }
    if target.x > bounds.max_x {
        return ArgumentPosition::Right;
    }

    if target.y < bounds.min_y {
        ArgumentPosition::Below
    } else if target.y <= bounds.max_y {
        inside_or_outside
    } else {
        ArgumentPosition::Above
    }
}
