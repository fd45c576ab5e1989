//! Scroll-target alignment and cut detection for keyboard navigation.

use crate::model::RenderingModel;

/// Where a repositioned item lands inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Item top aligns with the viewport top.
    Start,
    /// Item is centered within the viewport.
    Center,
    /// Item bottom aligns with the viewport bottom.
    End,
}

/// Visibility of a materialized item relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutState {
    /// Item top is above the scroll offset (clipped at the top).
    Above,
    /// Item bounds fit fully within the viewport.
    Visible,
    /// Item bottom is below the viewport bottom (clipped at the bottom).
    Below,
}

/// Scroll offset that brings `index` into view with the given alignment.
///
/// The result is clamped into `[0, total_height]` and rounded to whole
/// pixels. An out-of-range index resolves to 0 (transient geometry errors
/// are recovered locally, never propagated).
#[must_use]
pub fn scroll_target(
    model: &RenderingModel,
    index: usize,
    alignment: Alignment,
    viewport: f64,
) -> f64 {
    let Some(entry) = model.entry(index) else {
        return 0.0;
    };

    let target = match alignment {
        Alignment::Start => entry.top,
        Alignment::Center => entry.top - viewport / 2.0 + entry.height / 2.0,
        Alignment::End => entry.top + entry.height - viewport,
    };

    target.clamp(0.0, model.total_height()).round()
}

/// Whether the item at `index` is fully visible or clipped ("cut").
///
/// The bottom check allows one pixel of slack for fractional layouts. An
/// out-of-range index reports `Visible` so callers degrade to a no-op.
#[must_use]
pub fn cut_state(
    model: &RenderingModel,
    index: usize,
    scroll_offset: f64,
    viewport: f64,
) -> CutState {
    let Some(entry) = model.entry(index) else {
        return CutState::Visible;
    };

    if entry.top < scroll_offset {
        CutState::Above
    } else if entry.bottom() > scroll_offset + viewport + 1.0 {
        CutState::Below
    } else {
        CutState::Visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, height: f64) -> RenderingModel {
        let items: Vec<f64> = (0..n).map(|_| height).collect();
        RenderingModel::build(&items, |h| *h)
    }

    #[test]
    fn start_aligns_item_top() {
        let model = uniform(100, 20.0);
        assert_eq!(scroll_target(&model, 10, Alignment::Start, 100.0), 200.0);
        assert_eq!(scroll_target(&model, 0, Alignment::Start, 100.0), 0.0);
    }

    #[test]
    fn end_aligns_item_bottom() {
        let model = uniform(100, 20.0);
        // Item 10 spans [200, 220]; bottom at viewport bottom → offset 120.
        assert_eq!(scroll_target(&model, 10, Alignment::End, 100.0), 120.0);
    }

    #[test]
    fn center_centers_the_item() {
        let model = uniform(100, 20.0);
        // Item 10: top 200, center 210; viewport 100 → offset 160.
        assert_eq!(scroll_target(&model, 10, Alignment::Center, 100.0), 160.0);
    }

    #[test]
    fn targets_clamp_to_content_bounds() {
        let model = uniform(10, 20.0);
        // Item 0 centered would need a negative offset.
        assert_eq!(scroll_target(&model, 0, Alignment::Center, 100.0), 0.0);
        assert_eq!(scroll_target(&model, 0, Alignment::End, 100.0), 0.0);
        // Out-of-range index recovers to 0.
        assert_eq!(scroll_target(&model, 50, Alignment::Start, 100.0), 0.0);
    }

    #[test]
    fn fractional_targets_round_to_whole_pixels() {
        let heights = [15.0, 21.0, 18.0, 33.0];
        let model = RenderingModel::build(&heights, |h| *h);
        // Item 2: top 36, height 18 → center target 36 - 50 + 9 = -5 → 0.
        assert_eq!(scroll_target(&model, 2, Alignment::Center, 100.0), 0.0);
        // Item 3: top 54, height 33 → center 54 - 25 + 16.5 = 45.5 → 46.
        assert_eq!(scroll_target(&model, 3, Alignment::Center, 50.0), 46.0);
    }

    #[test]
    fn cut_detection() {
        let model = uniform(100, 20.0);
        // Viewport shows [100, 200).
        assert_eq!(cut_state(&model, 4, 100.0, 100.0), CutState::Above);
        assert_eq!(cut_state(&model, 5, 100.0, 100.0), CutState::Visible);
        assert_eq!(cut_state(&model, 9, 100.0, 100.0), CutState::Visible);
        assert_eq!(cut_state(&model, 10, 100.0, 100.0), CutState::Below);
    }

    #[test]
    fn bottom_check_allows_one_pixel_of_slack() {
        let heights = [100.5];
        let model = RenderingModel::build(&heights, |h| *h);
        assert_eq!(cut_state(&model, 0, 0.0, 100.0), CutState::Visible);
    }

    #[test]
    fn out_of_range_index_reports_visible() {
        let model = uniform(3, 20.0);
        assert_eq!(cut_state(&model, 99, 0.0, 100.0), CutState::Visible);
    }
}
