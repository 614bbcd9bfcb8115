//! Table with proportional column/row sizes and merged cells.
//!
//! Merges are validated in declaration order: spans are clamped to the grid
//! and a merge overlapping an earlier one is dropped. Cells covered by a
//! merge are not rendered; the anchor spans the summed segment sizes.

use super::segments::{normalize_segments, offsets};
use super::{clamp_rect, font, framed};
use crate::metadata::{CellMerge, TableMetadata};
use crate::model::{Composite, Stroke, non_negative, styled_rect, text};
use kurbo::Rect;

/// What occupies one grid position after merges are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSlot {
    /// Top-left cell of a region spanning `rows × cols`.
    Anchor { rows: usize, cols: usize },
    /// Hidden behind an anchor.
    Covered,
}

/// Resolve the merge list into a `rows × columns` occupancy grid.
pub fn resolve_merges(rows: usize, columns: usize, merges: &[CellMerge]) -> Vec<Vec<CellSlot>> {
    let mut grid = vec![vec![CellSlot::Anchor { rows: 1, cols: 1 }; columns]; rows];
    let mut taken = vec![vec![false; columns]; rows];

    for m in merges {
        if m.row >= rows || m.column >= columns || m.row_span == 0 || m.col_span == 0 {
            log::debug!("dropping out-of-range merge {m:?}");
            continue;
        }
        let rs = m.row_span.min(rows - m.row);
        let cs = m.col_span.min(columns - m.column);
        if rs == 1 && cs == 1 {
            continue;
        }
        let overlaps = (m.row..m.row + rs).any(|r| (m.column..m.column + cs).any(|c| taken[r][c]));
        if overlaps {
            log::debug!("dropping overlapping merge {m:?}");
            continue;
        }
        for r in m.row..m.row + rs {
            for c in m.column..m.column + cs {
                taken[r][c] = true;
                grid[r][c] = CellSlot::Covered;
            }
        }
        grid[m.row][m.column] = CellSlot::Anchor { rows: rs, cols: cs };
    }
    grid
}

pub fn build_table(meta: &TableMetadata) -> Composite {
    let size = meta.size.sanitized();
    let mut c = framed(
        "table",
        size,
        meta.background_color,
        meta.border_color,
        meta.border_width,
        meta.corner_radius,
    );
    if meta.rows == 0 || meta.columns == 0 {
        return c;
    }

    let widths = normalize_segments(size.width, meta.columns, meta.column_widths.as_deref());
    let heights = normalize_segments(size.height, meta.rows, meta.row_heights.as_deref());
    let xs = offsets(0.0, &widths);
    let ys = offsets(0.0, &heights);
    let slots = resolve_merges(meta.rows, meta.columns, &meta.merges);
    let frame = Rect::new(0.0, 0.0, size.width, size.height);
    let border = (non_negative(meta.border_width) > 0.0).then(|| Stroke::solid(meta.border_color, meta.border_width));
    let pad = non_negative(meta.cell_padding);
    let last = meta.rows - 1;

    for (r, row) in slots.iter().enumerate() {
        let is_header = meta.header_row && r == 0;
        let is_footer = meta.footer_row && r == last && !is_header;
        let body_index = r.saturating_sub(usize::from(meta.header_row));

        let (fill, text_color, weight) = if is_header {
            (meta.header_fill, meta.header_text_color, 600)
        } else if is_footer {
            (meta.footer_fill, meta.footer_text_color, 600)
        } else if meta.stripe_rows && body_index % 2 == 1 {
            (meta.stripe_fill, meta.cell_text_color, 400)
        } else {
            (meta.cell_fill, meta.cell_text_color, 400)
        };

        for (col, slot) in row.iter().enumerate() {
            let CellSlot::Anchor { rows: rs, cols: cs } = *slot else {
                continue;
            };
            let bounds = clamp_rect(Rect::new(xs[col], ys[r], xs[col + cs], ys[r + rs]), frame);
            c.push(styled_rect(bounds, Some(fill), border.clone(), 0.0));

            let content = meta
                .cell_contents
                .as_ref()
                .and_then(|rows| rows.get(r))
                .and_then(|cells| cells.get(col))
                .filter(|s| !s.is_empty());
            if let Some(content) = content {
                let p = pad.min(bounds.width() / 2.0).min(bounds.height() / 2.0);
                let area = Rect::new(bounds.x0 + p, bounds.y0 + p, bounds.x1 - p, bounds.y1 - p);
                c.push(text(
                    area,
                    content.as_str(),
                    font(&meta.font_family, non_negative(meta.font_size).min(area.height()), weight),
                    text_color,
                    meta.text_align,
                ));
            }
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Shape, Size};
    use pretty_assertions::assert_eq;

    fn merge(row: usize, column: usize, row_span: usize, col_span: usize) -> CellMerge {
        CellMerge {
            row,
            column,
            row_span,
            col_span,
        }
    }

    fn cell_rects(c: &Composite) -> Vec<(f64, f64, f64, f64)> {
        c.primitives()
            .skip(1)
            .filter_map(|p| match &p.shape {
                Shape::Rect(r) => Some((r.left, r.top, r.width, r.height)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn merge_spans_summed_segments_and_hides_covered() {
        let m = TableMetadata {
            size: Size::new(300.0, 300.0),
            merges: vec![merge(0, 0, 2, 2)],
            ..Default::default()
        };
        let c = build_table(&m);
        let rects = cell_rects(&c);
        assert_eq!(rects.len(), 6);
        assert_eq!(rects[0], (0.0, 0.0, 200.0, 200.0));
        assert!(!rects.contains(&(100.0, 0.0, 100.0, 100.0)));
        assert!(!rects.contains(&(0.0, 100.0, 100.0, 100.0)));
        assert!(!rects.contains(&(100.0, 100.0, 100.0, 100.0)));
    }

    #[test]
    fn overlapping_merge_is_ignored() {
        let grid = resolve_merges(3, 3, &[merge(0, 0, 2, 2), merge(1, 1, 2, 2)]);
        assert_eq!(grid[0][0], CellSlot::Anchor { rows: 2, cols: 2 });
        assert_eq!(grid[1][1], CellSlot::Covered);
        assert_eq!(grid[2][2], CellSlot::Anchor { rows: 1, cols: 1 });
    }

    #[test]
    fn spans_are_clamped_to_grid() {
        let grid = resolve_merges(3, 3, &[merge(1, 1, 9, 9)]);
        assert_eq!(grid[1][1], CellSlot::Anchor { rows: 2, cols: 2 });
        assert_eq!(grid[2][2], CellSlot::Covered);
    }

    #[test]
    fn out_of_range_anchor_is_dropped() {
        let grid = resolve_merges(2, 2, &[merge(5, 0, 1, 2)]);
        assert!(grid.iter().flatten().all(|s| *s == CellSlot::Anchor { rows: 1, cols: 1 }));
    }

    #[test]
    fn explicit_widths_are_normalized() {
        let m = TableMetadata {
            size: Size::new(400.0, 100.0),
            rows: 1,
            columns: 2,
            column_widths: Some(vec![1.0, 3.0]),
            ..Default::default()
        };
        let rects = cell_rects(&build_table(&m));
        assert_eq!(rects, vec![(0.0, 0.0, 100.0, 100.0), (100.0, 0.0, 300.0, 100.0)]);
    }

    #[test]
    fn zero_rows_renders_only_frame() {
        let m = TableMetadata {
            rows: 0,
            ..Default::default()
        };
        assert_eq!(build_table(&m).children.len(), 1);
    }

    #[test]
    fn header_footer_and_stripes() {
        let m = TableMetadata {
            rows: 5,
            columns: 1,
            footer_row: true,
            stripe_rows: true,
            ..Default::default()
        };
        let c = build_table(&m);
        let fills: Vec<_> = c
            .primitives()
            .skip(1)
            .filter_map(|p| match &p.shape {
                Shape::Rect(r) => r.fill,
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![m.header_fill, m.cell_fill, m.stripe_fill, m.cell_fill, m.footer_fill]
        );
    }

    #[test]
    fn contents_render_in_anchor_cells() {
        let m = TableMetadata {
            cell_contents: Some(vec![vec!["A".into(), "B".into(), "C".into()]]),
            merges: vec![merge(0, 0, 1, 2)],
            ..Default::default()
        };
        let c = build_table(&m);
        assert_eq!(c.texts(), vec!["A", "C"]);
    }
}
