#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod canvas;
#[cfg(target_arch = "wasm32")]
mod fetch;
mod plot;

use prefpop_core::ApiConfig;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use prefpop_core::{ChartData, FetchError, FetchRequest, PrefCode, SeriesStatus, Session};

#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;

#[cfg(target_arch = "wasm32")]
use crate::canvas::ChartRenderer;

#[cfg(target_arch = "wasm32")]
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement};

const CHART_WIDTH: u32 = 880;
const CHART_HEIGHT: u32 = 440;

// Read at build time, the same way a bundler inlines environment variables.
fn api_config() -> ApiConfig {
    let config = ApiConfig::new(option_env!("RESAS_API_KEY").unwrap_or_default());
    match option_env!("RESAS_BASE_URL") {
        Some(base_url) => config.with_base_url(base_url),
        None => config,
    }
}

#[cfg(target_arch = "wasm32")]
fn report(err: &FetchError) {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
}

#[cfg(target_arch = "wasm32")]
fn spawn_series_fetch(session: Rc<RefCell<Session>>, request: FetchRequest, refresh: Callback<()>) {
    spawn_local(async move {
        let result = fetch::fetch_population(&api_config(), request.pref_code).await;
        if let Err(err) = &result {
            report(err);
        }
        session
            .borrow_mut()
            .apply_series(request.pref_code, result);
        refresh.emit(());
    });
}

#[cfg(target_arch = "wasm32")]
#[derive(Properties, PartialEq)]
struct LineChartProps {
    chart: ChartData,
}

#[cfg(target_arch = "wasm32")]
fn draw_chart(canvas: &HtmlCanvasElement, chart: &ChartData) -> Result<(), JsValue> {
    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("could not acquire 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ChartRenderer::new(canvas.width() as f64, canvas.height() as f64).draw(&context, chart)
}

#[cfg(target_arch = "wasm32")]
#[function_component(LineChart)]
fn line_chart(props: &LineChartProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(props.chart.clone(), move |chart| {
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                if let Err(err) = draw_chart(&canvas, chart) {
                    web_sys::console::error_1(&err);
                }
            }
            || ()
        });
    }

    html! {
        <figure class="chart">
            <canvas ref={canvas_ref} width={CHART_WIDTH.to_string()} height={CHART_HEIGHT.to_string()} />
            <figcaption class="legend">
                { for props.chart.datasets.iter().map(|dataset| {
                    let swatch = format!("background-color: {}", dataset.css_color());
                    html! {
                        <span class="legend-item" key={dataset.pref_code}>
                            <span class="swatch" style={swatch}></span>
                            { &dataset.label }
                        </span>
                    }
                }) }
            </figcaption>
        </figure>
    }
}

#[cfg(target_arch = "wasm32")]
fn status_class(status: SeriesStatus) -> &'static str {
    match status {
        SeriesStatus::NotFetched | SeriesStatus::Loaded => "",
        SeriesStatus::Loading => "loading",
        SeriesStatus::Failed => "failed",
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
fn app() -> Html {
    let session = use_mut_ref(Session::new);
    let refresh = use_state(|| 0u32);

    let force_refresh = {
        let refresh = refresh.clone();
        Callback::from(move |_| {
            refresh.set(refresh.wrapping_add(1));
        })
    };

    {
        let session = session.clone();
        let force_refresh = force_refresh.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let result = fetch::fetch_prefectures(&api_config()).await;
                if let Err(err) = &result {
                    report(err);
                }
                session.borrow_mut().apply_catalog(result);
                force_refresh.emit(());
            });
            || ()
        });
    }

    let on_toggle = {
        let session = session.clone();
        let force_refresh = force_refresh.clone();
        Callback::from(move |(pref_code, checked): (PrefCode, bool)| {
            let request = session.borrow_mut().toggle(pref_code, checked);
            if let Some(request) = request {
                spawn_series_fetch(session.clone(), request, force_refresh.clone());
            }
            force_refresh.emit(());
        })
    };

    let session_snapshot = session.borrow();
    let chart = session_snapshot.chart();
    let loading = session_snapshot.series().loading_count();

    let checkboxes = session_snapshot
        .catalog()
        .iter()
        .map(|pref| {
            let pref_code = pref.pref_code;
            let onchange = {
                let on_toggle = on_toggle.clone();
                Callback::from(move |event: Event| {
                    if let Some(input) = event
                        .target()
                        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                    {
                        on_toggle.emit((pref_code, input.checked()));
                    }
                })
            };
            let class = classes!("prefecture", status_class(session_snapshot.status(pref_code)));
            html! {
                <label class={class} key={pref_code}>
                    <input
                        type="checkbox"
                        checked={session_snapshot.is_selected(pref_code)}
                        {onchange}
                    />
                    { &pref.pref_name }
                </label>
            }
        })
        .collect::<Html>();

    let catalog_view = if !session_snapshot.catalog_loaded() {
        html! { <p class="notice">{ "都道府県一覧を読み込んでいます…" }</p> }
    } else if session_snapshot.catalog().is_empty() {
        html! { <p class="notice">{ "選択できる都道府県がありません。" }</p> }
    } else {
        html! { <div class="prefectures">{ checkboxes }</div> }
    };

    html! {
        <div class="app">
            <header>
                <h1>{ "都道府県別 総人口推移" }</h1>
                if loading > 0 {
                    <p class="loading">{ format!("{} 件の人口データを取得中", loading) }</p>
                }
            </header>

            <section class="selector">
                <h2>{ "都道府県" }</h2>
                { catalog_view }
            </section>

            <section class="graph">
                <LineChart chart={chart} />
            </section>
        </div>
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    yew::Renderer::<App>::new().render();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn start() {
    panic!("prefpop-web は wasm32-unknown-unknown ターゲットでのみ利用できます。");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_time_config_targets_population_endpoint() {
        let config = api_config();
        assert!(config.population_url(1).contains("prefCode=1"));
        assert!(config.prefectures_url().ends_with("/api/v1/prefectures"));
    }
}
