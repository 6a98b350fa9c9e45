//! Pixel geometry of the line chart, independent of the canvas API.

const MARGIN_LEFT: f64 = 96.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 56.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn within(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (canvas_width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (canvas_height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn x_at(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.left + self.width / 2.0;
        }
        self.left + self.width * index as f64 / (count - 1) as f64
    }

    pub fn y_at(&self, value: f64, max: f64) -> f64 {
        if max <= 0.0 {
            return self.bottom();
        }
        self.bottom() - (value / max).clamp(0.0, 1.0) * self.height
    }
}

/// Rounds `value` up to 1, 2 or 5 times a power of ten.
pub fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    [1.0, 2.0, 5.0]
        .iter()
        .map(|step| step * magnitude)
        .find(|candidate| *candidate >= value)
        .unwrap_or(10.0 * magnitude)
}

pub fn ticks(max: f64, divisions: usize) -> Vec<f64> {
    let divisions = divisions.max(1);
    (0..=divisions)
        .map(|idx| max * idx as f64 / divisions as f64)
        .collect()
}

/// Formats a count with thousands separators.
pub fn format_count(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && digits != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ceiling_rounds_up() {
        assert_eq!(nice_ceiling(13_515_271.0), 20_000_000.0);
        assert_eq!(nice_ceiling(4_200.0), 5_000.0);
        assert_eq!(nice_ceiling(1_000.0), 1_000.0);
        assert_eq!(nice_ceiling(0.0), 1.0);
    }

    #[test]
    fn x_positions_span_the_area() {
        let area = PlotArea::within(800.0, 400.0);
        assert_eq!(area.x_at(0, 13), area.left);
        assert_eq!(area.x_at(12, 13), area.right());
        assert_eq!(area.x_at(0, 1), area.left + area.width / 2.0);
    }

    #[test]
    fn y_positions_are_inverted_and_clamped() {
        let area = PlotArea::within(800.0, 400.0);
        assert_eq!(area.y_at(0.0, 100.0), area.bottom());
        assert_eq!(area.y_at(100.0, 100.0), area.top);
        assert_eq!(area.y_at(250.0, 100.0), area.top);
        assert_eq!(area.y_at(50.0, 0.0), area.bottom());
    }

    #[test]
    fn ticks_include_both_ends() {
        assert_eq!(ticks(20.0, 4), vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn counts_are_grouped_by_thousands() {
        assert_eq!(format_count(13_515_271.0), "13,515,271");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1_000.0), "1,000");
        assert_eq!(format_count(0.0), "0");
    }
}
