//! Symbol templates
//!
//! Every symbol kind is described by a static template: which child
//! slots it offers, which symbol classes each slot accepts under which
//! acceptance rule, how ambiguous relative positions are canonicalized,
//! and how the symbol serializes to TeX. Dispatch is a match on the
//! label - there is no inheritance and no runtime registration.

use scrawl_core::BoundingBox;

use super::Label;

/// Qualitative spatial relationship between two symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentPosition {
    Above,
    AboveRight,
    Right,
    BelowRight,
    Below,
    BelowLeft,
    Left,
    AboveLeft,
    Inside,
    Outside,
}

/// Outcome of offering one symbol to another as an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// No structural relation
    None,
    /// The candidate was attached into a child slot
    Child,
    /// The candidate is the baseline successor
    NextSymbol,
}

/// Coarse symbol category used for slot admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolClass {
    Number,
    Letter,
    Variable,
    Operator,
    Ambiguous,
}

/// Geometric admission rule for a child slot.
///
/// "Size" compares bounding-box areas, "width" horizontal extents; a
/// child passes when the parent is at least twice as large on the
/// compared dimension. Square-root and fraction-line candidates are
/// exempt from the combined rule so long sub-expressions still attach
/// as exponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptanceRule {
    /// Accept unconditionally
    Any,
    /// Parent area must exceed twice the child area
    Size,
    /// Parent width must exceed twice the child width
    Width,
    /// Both the size and the width rule
    SizeWidth,
    /// Size and width, except square roots and fraction lines which
    /// are always accepted
    SizeWidthExceptWide,
}

impl AcceptanceRule {
    /// Apply the rule to a candidate child.
    pub fn accepts(self, parent: &BoundingBox, child: &BoundingBox, child_label: Label) -> bool {
        let size = || parent.area() > 2.0 * child.area();
        let width = || parent.width() > 2.0 * child.width();
        match self {
            AcceptanceRule::Any => true,
            AcceptanceRule::Size => size(),
            AcceptanceRule::Width => width(),
            AcceptanceRule::SizeWidth => size() && width(),
            AcceptanceRule::SizeWidthExceptWide => {
                matches!(child_label, Label::SquareRoot | Label::FractionLine)
                    || (size() && width())
            }
        }
    }
}

/// One child slot of a symbol template.
#[derive(Debug)]
pub struct SlotSpec {
    /// Relative position that routes a candidate into this slot
    pub position: ArgumentPosition,
    /// Accepted classes and their admission rules
    pub accepts: &'static [(SymbolClass, AcceptanceRule)],
}

/// TeX serialization shape of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderShape {
    /// The glyph alone
    Plain,
    /// Glyph with an optional exponent (slot 0)
    Exponent,
    /// Glyph with an optional exponent (slot 0) and index (slot 1)
    ExponentIndex,
    /// `\sqrt{slot 0}` with an optional exponent (slot 1)
    Root,
    /// `\frac{slot 0}{slot 1}`
    Fraction,
}

/// Static description of one symbol kind.
#[derive(Debug)]
pub struct SymbolTemplate {
    /// Coarse category of the symbol
    pub class: SymbolClass,
    /// Child slots, in render order
    pub slots: &'static [SlotSpec],
    /// Canonicalization of ambiguous relative positions, applied after
    /// the geometric sectors are resolved
    pub remaps: &'static [(ArgumentPosition, ArgumentPosition)],
    /// Whether the wide-operator diagonal sector geometry applies
    /// (horizontal bars: minus, fraction line)
    pub wide: bool,
    /// TeX serialization shape
    pub render: RenderShape,
    /// Alternative interpretations of an ambiguous symbol, preferred
    /// first; empty for concrete symbols
    pub alternatives: &'static [Label],
}

/// Exponent slot admission shared by numbers, variables and letters
/// with slots: anything clearly smaller than the base, with the wide
/// exemption for operators so long roots and fractions can be raised.
const EXPONENT_ACCEPTS: &[(SymbolClass, AcceptanceRule)] = &[
    (SymbolClass::Number, AcceptanceRule::Size),
    (SymbolClass::Letter, AcceptanceRule::Size),
    (SymbolClass::Variable, AcceptanceRule::Size),
    (SymbolClass::Operator, AcceptanceRule::SizeWidthExceptWide),
    (SymbolClass::Ambiguous, AcceptanceRule::SizeWidth),
];

/// Index slot admission: numbers and letters only.
const INDEX_ACCEPTS: &[(SymbolClass, AcceptanceRule)] = &[
    (SymbolClass::Number, AcceptanceRule::Size),
    (SymbolClass::Letter, AcceptanceRule::Size),
    (SymbolClass::Variable, AcceptanceRule::Size),
];

/// Root content admission: anything at most half the root's size.
const ROOT_ACCEPTS: &[(SymbolClass, AcceptanceRule)] = &[
    (SymbolClass::Number, AcceptanceRule::Size),
    (SymbolClass::Letter, AcceptanceRule::Size),
    (SymbolClass::Variable, AcceptanceRule::Size),
    (SymbolClass::Operator, AcceptanceRule::Size),
    (SymbolClass::Ambiguous, AcceptanceRule::Size),
];

/// Fraction numerator/denominator admission: anything.
const FRACTION_ACCEPTS: &[(SymbolClass, AcceptanceRule)] = &[
    (SymbolClass::Number, AcceptanceRule::Any),
    (SymbolClass::Letter, AcceptanceRule::Any),
    (SymbolClass::Variable, AcceptanceRule::Any),
    (SymbolClass::Operator, AcceptanceRule::Any),
    (SymbolClass::Ambiguous, AcceptanceRule::Any),
];

/// Numbers: an exponent slot above-right. An exponent drawn slightly
/// left of center must still attach, so ABOVE canonicalizes to
/// ABOVE_RIGHT; a successor drawn slightly low still chains, so
/// BELOW_RIGHT canonicalizes to RIGHT.
pub static NUMBER_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Number,
    slots: &[SlotSpec {
        position: ArgumentPosition::AboveRight,
        accepts: EXPONENT_ACCEPTS,
    }],
    remaps: &[
        (ArgumentPosition::Above, ArgumentPosition::AboveRight),
        (ArgumentPosition::BelowRight, ArgumentPosition::Right),
    ],
    wide: false,
    render: RenderShape::Exponent,
    alternatives: &[],
};

/// Variables: exponent above-right, index below-right.
pub static VARIABLE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Variable,
    slots: &[
        SlotSpec {
            position: ArgumentPosition::AboveRight,
            accepts: EXPONENT_ACCEPTS,
        },
        SlotSpec {
            position: ArgumentPosition::BelowRight,
            accepts: INDEX_ACCEPTS,
        },
    ],
    remaps: &[
        (ArgumentPosition::Above, ArgumentPosition::AboveRight),
        (ArgumentPosition::Below, ArgumentPosition::BelowRight),
    ],
    wide: false,
    render: RenderShape::ExponentIndex,
    alternatives: &[],
};

/// Letters: no structural slots.
pub static LETTER_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Letter,
    slots: &[],
    remaps: &[],
    wide: false,
    render: RenderShape::Plain,
    alternatives: &[],
};

/// Plain operators (plus, equals, parentheses, comparisons, dot).
pub static OPERATOR_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Operator,
    slots: &[],
    remaps: &[],
    wide: false,
    render: RenderShape::Plain,
    alternatives: &[],
};

/// Minus: a wide horizontal bar, no slots.
pub static MINUS_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Operator,
    slots: &[],
    remaps: &[],
    wide: true,
    render: RenderShape::Plain,
    alternatives: &[],
};

/// Square root: content inside, exponent above-right.
pub static SQUARE_ROOT_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Operator,
    slots: &[
        SlotSpec {
            position: ArgumentPosition::Inside,
            accepts: ROOT_ACCEPTS,
        },
        SlotSpec {
            position: ArgumentPosition::AboveRight,
            accepts: ROOT_ACCEPTS,
        },
    ],
    remaps: &[(ArgumentPosition::BelowRight, ArgumentPosition::Right)],
    wide: false,
    render: RenderShape::Root,
    alternatives: &[],
};

/// Fraction line: a wide bar with numerator above and denominator
/// below.
pub static FRACTION_LINE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Operator,
    slots: &[
        SlotSpec {
            position: ArgumentPosition::Above,
            accepts: FRACTION_ACCEPTS,
        },
        SlotSpec {
            position: ArgumentPosition::Below,
            accepts: FRACTION_ACCEPTS,
        },
    ],
    remaps: &[],
    wide: true,
    render: RenderShape::Fraction,
    alternatives: &[],
};

/// A lone horizontal bar: minus until something lands above or below,
/// then a fraction line.
pub static HORIZONTAL_LINE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Ambiguous,
    slots: &[],
    remaps: &[],
    wide: true,
    render: RenderShape::Plain,
    alternatives: &[Label::Minus, Label::FractionLine],
};

/// A lone vertical bar: the digit one or a lowercase l.
pub static VERTICAL_LINE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Ambiguous,
    slots: &[],
    remaps: &[],
    wide: false,
    render: RenderShape::Plain,
    alternatives: &[Label::One, Label::LowerL],
};

/// An s-shaped stroke: lowercase s or the digit five.
pub static S_LIKE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Ambiguous,
    slots: &[],
    remaps: &[],
    wide: false,
    render: RenderShape::Plain,
    alternatives: &[Label::LowerS, Label::Five],
};

/// A g-shaped stroke: lowercase g or the digit nine.
pub static G_LIKE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Ambiguous,
    slots: &[],
    remaps: &[],
    wide: false,
    render: RenderShape::Plain,
    alternatives: &[Label::LowerG, Label::Nine],
};

/// A c-shaped stroke: lowercase c or an opening parenthesis.
pub static C_LIKE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Ambiguous,
    slots: &[],
    remaps: &[],
    wide: false,
    render: RenderShape::Plain,
    alternatives: &[Label::LowerC, Label::LeftParenthesis],
};

/// A closed loop: lowercase o or the digit zero.
pub static CIRCLE_TEMPLATE: SymbolTemplate = SymbolTemplate {
    class: SymbolClass::Ambiguous,
    slots: &[],
    remaps: &[],
    wide: false,
    render: RenderShape::Plain,
    alternatives: &[Label::LowerO, Label::Zero],
};
