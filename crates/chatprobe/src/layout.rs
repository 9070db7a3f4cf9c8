//! Responsive layout heuristics for the card list.
//!
//! Narrow viewports should stack cards in one column; wide viewports should
//! show at least two. Columns come from the container's grid tracks when it
//! is a grid, otherwise from the number of distinct card left offsets.

use std::collections::BTreeSet;

use crate::dom::{Document, NodeId};
use crate::policy::{ColumnDetection, Policy};

/// Check name for narrow viewports
pub const MOBILE_LAYOUT: &str = "Mobile layout (stacked)";

/// Check name for wide viewports
pub const DESKTOP_LAYOUT: &str = "Desktop layout (>=2 columns)";

/// What the layout check concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVerdict {
    /// Nothing to evaluate
    NoCards,
    /// Narrow viewport; stacked iff a single column
    Mobile {
        /// Columns observed
        columns: usize,
    },
    /// Wide viewport; ok iff two or more columns
    Desktop {
        /// Columns observed
        columns: usize,
    },
}

impl LayoutVerdict {
    /// Check name, if there is a verdict
    #[must_use]
    pub const fn check_name(&self) -> Option<&'static str> {
        match self {
            Self::NoCards => None,
            Self::Mobile { .. } => Some(MOBILE_LAYOUT),
            Self::Desktop { .. } => Some(DESKTOP_LAYOUT),
        }
    }

    /// Whether the layout meets the expectation for its viewport
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        match self {
            Self::NoCards => false,
            Self::Mobile { columns } => *columns <= 1,
            Self::Desktop { columns } => *columns >= 2,
        }
    }

    /// Columns observed
    #[must_use]
    pub const fn columns(&self) -> usize {
        match self {
            Self::NoCards => 0,
            Self::Mobile { columns } | Self::Desktop { columns } => *columns,
        }
    }
}

/// Evaluate the layout of `cards`
pub fn evaluate_layout<D: Document>(doc: &D, cards: &[NodeId], policy: &Policy) -> LayoutVerdict {
    let Some(&first) = cards.first() else {
        return LayoutVerdict::NoCards;
    };
    let offsets = distinct_offsets(doc, cards);

    if doc.viewport_width() < policy.config.mobile_breakpoint {
        return LayoutVerdict::Mobile { columns: offsets };
    }

    let grid = doc
        .parent(first)
        .map(|parent| doc.computed_style(parent))
        .filter(|style| style.is_grid());
    let columns = match (policy.config.column_detection, grid) {
        (ColumnDetection::GridThenOffsets, Some(style)) => {
            count_grid_tracks(&style.grid_template_columns)
        }
        _ => offsets,
    };
    LayoutVerdict::Desktop { columns }
}

/// Distinct left offsets, at one decimal
fn distinct_offsets<D: Document>(doc: &D, cards: &[NodeId]) -> usize {
    cards
        .iter()
        .map(|&card| doc.bounding_box(card).left_key())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Number of column tracks in a `grid-template-columns` value.
///
/// Computed styles list one size per track. Authored values may use
/// `repeat(N, ...)`, which counts as N times its inner tracks. `none` is one
/// implicit column.
pub fn count_grid_tracks(template: &str) -> usize {
    split_top_level(template.trim())
        .iter()
        .map(|token| track_count(token))
        .sum::<usize>()
        .max(1)
}

fn track_count(token: &str) -> usize {
    // Line names such as `[main-start]` are not tracks.
    if token.starts_with('[') {
        return 0;
    }
    let lower = token.to_ascii_lowercase();
    if let Some(inner) = lower
        .strip_prefix("repeat(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        if let Some((count, tracks)) = inner.split_once(',') {
            let per_repeat = split_top_level(tracks.trim())
                .iter()
                .map(|t| track_count(t))
                .sum::<usize>();
            // auto-fill / auto-fit depend on the container width; count one
            // repetition.
            let times = count.trim().parse::<usize>().unwrap_or(1);
            return times * per_repeat;
        }
    }
    1
}

/// Split on whitespace outside parentheses and brackets
fn split_top_level(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundingBox, ComputedStyle, MemoryDocument};

    fn cards_at(lefts: &[f32], width: f32, parent_style: ComputedStyle) -> (MemoryDocument, Vec<NodeId>) {
        let mut doc = MemoryDocument::new().with_viewport_width(width);
        let body = doc.body();
        let list = doc.append_element(body, "div").unwrap();
        doc.set_style(list, parent_style).unwrap();
        let cards = lefts
            .iter()
            .map(|&x| {
                let card = doc.append_element(list, "div").unwrap();
                doc.set_bounding_box(card, BoundingBox::new(x, 0.0, 100.0, 50.0))
                    .unwrap();
                card
            })
            .collect();
        (doc, cards)
    }

    fn grid(template: &str) -> ComputedStyle {
        ComputedStyle {
            display: "grid".to_string(),
            grid_template_columns: template.to_string(),
        }
    }

    #[test]
    fn test_no_cards() {
        let doc = MemoryDocument::new();
        assert_eq!(evaluate_layout(&doc, &[], &Policy::default()), LayoutVerdict::NoCards);
    }

    #[test]
    fn test_mobile_stacked() {
        let (doc, cards) = cards_at(&[16.0, 16.04, 16.0], 375.0, ComputedStyle::default());
        let verdict = evaluate_layout(&doc, &cards, &Policy::default());
        assert_eq!(verdict, LayoutVerdict::Mobile { columns: 1 });
        assert!(verdict.is_ok());
    }

    #[test]
    fn test_mobile_side_by_side_fails() {
        let (doc, cards) = cards_at(&[0.0, 180.0], 375.0, ComputedStyle::default());
        assert!(!evaluate_layout(&doc, &cards, &Policy::default()).is_ok());
    }

    #[test]
    fn test_breakpoint_is_exclusive() {
        let (doc, cards) = cards_at(&[0.0, 300.0], 768.0, ComputedStyle::default());
        assert_eq!(
            evaluate_layout(&doc, &cards, &Policy::default()),
            LayoutVerdict::Desktop { columns: 2 }
        );
    }

    #[test]
    fn test_desktop_grid_tracks() {
        let (doc, cards) = cards_at(&[0.0, 0.0], 1280.0, grid("240px 240px 240px"));
        assert_eq!(
            evaluate_layout(&doc, &cards, &Policy::default()),
            LayoutVerdict::Desktop { columns: 3 }
        );
    }

    #[test]
    fn test_desktop_offsets_policy_ignores_grid() {
        let (doc, cards) = cards_at(&[0.0, 0.0], 1280.0, grid("1fr 1fr"));
        let policy = crate::policy::PolicyConfig {
            column_detection: ColumnDetection::Offsets,
            ..Default::default()
        }
        .compile()
        .unwrap();
        assert_eq!(
            evaluate_layout(&doc, &cards, &policy),
            LayoutVerdict::Desktop { columns: 1 }
        );
    }

    #[test]
    fn test_track_counting() {
        assert_eq!(count_grid_tracks("none"), 1);
        assert_eq!(count_grid_tracks(""), 1);
        assert_eq!(count_grid_tracks("1fr"), 1);
        assert_eq!(count_grid_tracks("minmax(0, 1fr) 2fr"), 2);
        assert_eq!(count_grid_tracks("repeat(3, 1fr)"), 3);
        assert_eq!(count_grid_tracks("repeat(2, 100px 1fr) 50px"), 5);
        assert_eq!(count_grid_tracks("[a] 1fr [b] 1fr [c]"), 2);
        assert_eq!(count_grid_tracks("repeat(auto-fill, minmax(200px, 1fr))"), 1);
    }
}
