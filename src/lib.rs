#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod anim;
pub mod export;
pub mod geom;
pub mod parse;
pub mod sample;

use std::fmt;

use anim::{MorphDriver, RenderOptions};
use geom::ShapeParameters;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // A second call finds the logger already installed.
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Animator {
    driver: MorphDriver,
    labels: [String; 3],
}

#[wasm_bindgen]
impl Animator {
    /// Bouw een animator uit vormparameters en optionele render-opties.
    ///
    /// Ontbrekende velden vallen terug op de standaardwaarden.
    #[wasm_bindgen(constructor)]
    pub fn new(params: JsValue, options: JsValue) -> Result<Animator, JsValue> {
        let params: ShapeParameters = if params.is_undefined() || params.is_null() {
            ShapeParameters::default()
        } else {
            serde_wasm_bindgen::from_value(params).map_err(to_js_error)?
        };
        let options: RenderOptions = if options.is_undefined() || options.is_null() {
            RenderOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };
        let driver = MorphDriver::new(&params, options).map_err(to_js_error)?;
        debug_log!("animator: {} frames", driver.total_frames());
        Ok(Animator {
            driver,
            labels: default_labels(),
        })
    }

    /// Bouw een animator uit een laagtekst (`~p0140~p1140!...`).
    #[wasm_bindgen(js_name = fromLayers)]
    pub fn from_layers(layers: &str, index: usize) -> Result<Animator, JsValue> {
        let (driver, labels) = driver_from_layers(layers, index).map_err(|err| js_error(&err))?;
        Ok(Animator { driver, labels })
    }

    /// Bouw een animator met willekeurige maar reproduceerbare parameters.
    #[wasm_bindgen(js_name = fromSeed)]
    pub fn from_seed(seed: u32) -> Result<Animator, JsValue> {
        let driver = driver_from_seed(u64::from(seed)).map_err(|err| js_error(&err))?;
        Ok(Animator {
            driver,
            labels: default_labels(),
        })
    }

    /// Aantal frames van een volledige afspeelbeurt.
    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.driver.total_frames()
    }

    /// Frame `index` als JavaScript-object.
    #[wasm_bindgen]
    pub fn frame(&self, index: usize) -> Result<JsValue, JsValue> {
        let frame = self.driver.frame_at(index);
        serde_wasm_bindgen::to_value(&frame).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Frame `index` als SVG-document.
    #[wasm_bindgen(js_name = frameSvg)]
    pub fn frame_svg(&self, index: usize) -> String {
        export::frame_to_svg(&self.driver.frame_at(index), self.driver.options())
    }

    /// Toestand van de animatie bij frame `index`.
    #[wasm_bindgen]
    pub fn state(&self, index: usize) -> String {
        format!("{:?}", self.driver.state_at(index))
    }

    /// Beschrijving van de parameters, één regel per waarde.
    #[wasm_bindgen]
    pub fn description(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.driver.params().description_lines())
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// De drie bijschriften van de laag (`-` als er geen zijn).
    #[wasm_bindgen]
    pub fn labels(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.labels).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

fn default_labels() -> [String; 3] {
    ["-".to_owned(), "-".to_owned(), "-".to_owned()]
}

fn driver_from_layers(layers: &str, index: usize) -> Result<(MorphDriver, [String; 3]), String> {
    let layer = parse::select_layer(layers, index).map_err(|err| err.to_string())?;
    let options = layer.render_options(RenderOptions::default());
    let driver = MorphDriver::new(&layer.params, options).map_err(|err| err.to_string())?;
    Ok((driver, layer.labels))
}

fn driver_from_seed(seed: u64) -> Result<MorphDriver, String> {
    let shape = sample::random_shape(seed);
    let options = RenderOptions {
        line_color: shape.line_color.to_owned(),
        ..RenderOptions::default()
    };
    MorphDriver::new(&shape.params, options).map_err(|err| err.to_string())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
