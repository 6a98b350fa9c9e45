use prefpop_core::{ChartData, ChartDataset};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::plot::{PlotArea, format_count, nice_ceiling, ticks};

const CANVAS_BG: &str = "#ffffff";
const AXIS_COLOR: &str = "#334155";
const GRID_COLOR: &str = "#e2e8f0";
const TEXT_PRIMARY: &str = "#0f172a";
const TEXT_SECONDARY: &str = "#64748b";
const LABEL_FONT: &str = "12px 'Segoe UI', sans-serif";
const TITLE_FONT: &str = "13px 'Segoe UI', sans-serif";
const Y_DIVISIONS: usize = 5;

pub struct ChartRenderer {
    width: f64,
    height: f64,
}

impl ChartRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn draw(&self, context: &CanvasRenderingContext2d, chart: &ChartData) -> Result<(), JsValue> {
        context.set_fill_style_str(CANVAS_BG);
        context.fill_rect(0.0, 0.0, self.width, self.height);

        let area = PlotArea::within(self.width, self.height);
        let max = nice_ceiling(chart.max_value().unwrap_or(0.0));

        self.draw_grid(context, &area, max)?;
        self.draw_x_axis(context, &area, &chart.years)?;
        self.draw_axis_titles(context, &area, chart)?;

        if chart.is_empty() {
            context.set_fill_style_str(TEXT_SECONDARY);
            context.set_font(TITLE_FONT);
            context.set_text_align("center");
            context.fill_text(
                "都道府県を選択してください",
                area.left + area.width / 2.0,
                area.top + area.height / 2.0,
            )?;
            return Ok(());
        }

        for dataset in &chart.datasets {
            self.draw_line(context, &area, dataset, max);
        }
        Ok(())
    }

    fn draw_grid(
        &self,
        context: &CanvasRenderingContext2d,
        area: &PlotArea,
        max: f64,
    ) -> Result<(), JsValue> {
        context.set_font(LABEL_FONT);
        context.set_text_align("right");
        context.set_line_width(1.0);
        for tick in ticks(max, Y_DIVISIONS) {
            let y = area.y_at(tick, max);
            context.set_stroke_style_str(GRID_COLOR);
            context.begin_path();
            context.move_to(area.left, y);
            context.line_to(area.right(), y);
            context.stroke();

            context.set_fill_style_str(TEXT_SECONDARY);
            context.fill_text(&format_count(tick), area.left - 8.0, y + 4.0)?;
        }

        context.set_stroke_style_str(AXIS_COLOR);
        context.begin_path();
        context.move_to(area.left, area.top);
        context.line_to(area.left, area.bottom());
        context.line_to(area.right(), area.bottom());
        context.stroke();
        Ok(())
    }

    fn draw_x_axis(
        &self,
        context: &CanvasRenderingContext2d,
        area: &PlotArea,
        years: &[i32],
    ) -> Result<(), JsValue> {
        context.set_fill_style_str(TEXT_SECONDARY);
        context.set_font(LABEL_FONT);
        context.set_text_align("center");
        for (idx, year) in years.iter().enumerate() {
            let x = area.x_at(idx, years.len());
            context.fill_text(&year.to_string(), x, area.bottom() + 18.0)?;
        }
        Ok(())
    }

    fn draw_axis_titles(
        &self,
        context: &CanvasRenderingContext2d,
        area: &PlotArea,
        chart: &ChartData,
    ) -> Result<(), JsValue> {
        context.set_fill_style_str(TEXT_PRIMARY);
        context.set_font(TITLE_FONT);
        context.set_text_align("center");
        context.fill_text(
            chart.x_label,
            area.left + area.width / 2.0,
            area.bottom() + 42.0,
        )?;

        context.save();
        context.translate(16.0, area.top + area.height / 2.0)?;
        context.rotate(-std::f64::consts::FRAC_PI_2)?;
        let result = context.fill_text(chart.y_label, 0.0, 0.0);
        context.restore();
        result
    }

    // Years without a value break the line instead of dropping to zero.
    fn draw_line(
        &self,
        context: &CanvasRenderingContext2d,
        area: &PlotArea,
        dataset: &ChartDataset,
        max: f64,
    ) {
        let color = dataset.css_color();
        context.set_stroke_style_str(&color);
        context.set_fill_style_str(&color);
        context.set_line_width(2.0);
        context.begin_path();
        let mut pen_down = false;
        for (idx, value) in dataset.values.iter().enumerate() {
            let Some(value) = value else {
                pen_down = false;
                continue;
            };
            let x = area.x_at(idx, dataset.values.len());
            let y = area.y_at(*value, max);
            if pen_down {
                context.line_to(x, y);
            } else {
                context.move_to(x, y);
                pen_down = true;
            }
        }
        context.stroke();

        for (idx, value) in dataset.values.iter().enumerate() {
            if let Some(value) = value {
                context.fill_rect(
                    area.x_at(idx, dataset.values.len()) - 2.5,
                    area.y_at(*value, max) - 2.5,
                    5.0,
                    5.0,
                );
            }
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use prefpop_core::{Prefecture, Session};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::HtmlCanvasElement;

    wasm_bindgen_test_configure!(run_in_browser);

    fn context() -> CanvasRenderingContext2d {
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .unwrap()
            .dyn_into()
            .unwrap();
        canvas.set_width(640);
        canvas.set_height(360);
        canvas
            .get_context("2d")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn draws_empty_chart() {
        let chart = Session::new().chart();
        ChartRenderer::new(640.0, 360.0)
            .draw(&context(), &chart)
            .unwrap();
    }

    #[wasm_bindgen_test]
    fn draws_selected_prefecture_without_series() {
        let mut session = Session::new();
        session.apply_catalog(Ok(vec![Prefecture {
            pref_code: 13,
            pref_name: "東京都".to_string(),
        }]));
        session.toggle(13, true);
        ChartRenderer::new(640.0, 360.0)
            .draw(&context(), &session.chart())
            .unwrap();
    }
}
