//! Application event loop.
//!
//! Glues the platform (a winit window natively, the `#c` canvas on the web)
//! to the [`AnimationDriver`]. The window's redraw request is the frame
//! scheduler: the driver requests a redraw at the end of every frame and
//! winit answers with `RedrawRequested` before the next repaint.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and initialises the GPU context
//!    (blocking natively, via `spawn_local` + a user event on WASM)
//! 2. the scene is built from the [`DemoConfig`] and the driver is started
//! 3. every `RedrawRequested` runs exactly one driver frame
//! 4. a render error is logged and ends the event loop

use std::sync::Arc;

use anyhow::Context as _;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    animation::{AnimationDriver, FrameContext},
    camera::Camera,
    config::DemoConfig,
    context::Context,
    data_structures::scene::build_scene_from_config,
    render::GpuRenderer,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Id of the canvas element the demo renders into on the web.
#[cfg(target_arch = "wasm32")]
pub const CANVAS_ID: &str = "c";

/// Everything that exists once the GPU is up.
#[derive(Debug)]
pub struct AppState {
    renderer: GpuRenderer,
    frame: FrameContext,
    driver: AnimationDriver<Arc<Window>>,
}

impl AppState {
    pub fn new(ctx: Context, config: &DemoConfig) -> Self {
        let window = ctx.window().clone();
        let camera = Camera::from(&config.camera);
        let (scene, cubes) = build_scene_from_config(config);
        log::info!(
            "Scene built with {} cubes and {} light(s)",
            scene.meshes().len(),
            scene.lights().len()
        );
        let renderer = GpuRenderer::new(ctx, &scene, &camera, config.clear_colour());
        let driver = AnimationDriver::new(window, config.resize);
        Self {
            renderer,
            frame: FrameContext {
                scene,
                camera,
                cubes,
            },
            driver,
        }
    }

    pub fn frame(&mut self, t_ms: f64) -> anyhow::Result<()> {
        self.driver.frame(t_ms, &mut self.frame, &mut self.renderer)
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(anyhow::Result<Box<AppState>>),
}

impl std::fmt::Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(Ok(_)) => f.write_str("Initialized(Ok)"),
            Self::Initialized(Err(e)) => write!(f, "Initialized(Err({}))", e),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: DemoConfig,
    state: Option<AppState>,
    // Epoch of the timestamps handed to the driver.
    epoch: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: DemoConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime =
            tokio::runtime::Runtime::new().context("Cannot start the async runtime")?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            state: None,
            epoch: Instant::now(),
        })
    }

    fn initialized(&mut self, event_loop: &ActiveEventLoop, state: anyhow::Result<Box<AppState>>) {
        let mut state = match state {
            Ok(state) => *state,
            Err(e) => {
                log::error!("App initialization failed: {:#}", e);
                event_loop.exit();
                return;
            }
        };
        if let Err(e) = state.driver.start() {
            log::error!("{:#}", e);
            event_loop.exit();
            return;
        }
        self.state = Some(state);
    }
}

#[cfg(target_arch = "wasm32")]
fn canvas_attributes(
    window_attributes: winit::window::WindowAttributes,
) -> anyhow::Result<winit::window::WindowAttributes> {
    use wasm_bindgen::JsCast;
    use winit::platform::web::WindowAttributesExtWebSys;

    let window = web_sys::window().context("No browser window")?;
    let document = window.document().context("No document")?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .with_context(|| format!("No element with id '{}'", CANVAS_ID))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("Element '{}' is not a canvas", CANVAS_ID))?;
    Ok(window_attributes.with_canvas(Some(canvas)))
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.config.title);

        #[cfg(target_arch = "wasm32")]
        {
            window_attributes = match canvas_attributes(window_attributes) {
                Ok(attributes) => attributes,
                Err(e) => {
                    log::error!("Cannot find the render target: {:#}", e);
                    event_loop.exit();
                    return;
                }
            };
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let config = self.config.clone();
        let init_future = async move {
            let ctx = Context::new(window)
                .await
                .context("Cannot create the main context")?;
            Ok::<_, anyhow::Error>(Box::new(AppState::new(ctx, &config)))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = self.async_runtime.block_on(init_future);
            self.initialized(event_loop, state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = init_future.await;
                if proxy.send_event(FlowEvent::Initialized(state)).is_err() {
                    log::error!("Event loop closed before the app was initialized");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(state) => self.initialized(event_loop, state),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            // The size is picked up by the next frame's display size check.
            WindowEvent::Resized(size) => log::debug!("Window resized to {:?}", size),
            WindowEvent::RedrawRequested => {
                let t_ms = self.epoch.elapsed().as_secs_f64() * 1000.0;
                if let Err(e) = state.frame(t_ms) {
                    log::error!("Unable to render {:#}", e);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

/// Open a window (or attach to the canvas on the web) and run the demo until
/// the window is closed.
pub fn run(config: DemoConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {}", e).into());
        }
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

/// WASM entry point: runs the responsive demo on the `#c` canvas.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run(DemoConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
