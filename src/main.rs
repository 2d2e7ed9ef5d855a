use anyhow::{anyhow, Result};
use std::ffi::CString;
use std::num::NonZeroU32;

use flipabout::app::{load_metadata, AboutHost};
use flipabout::config::Config;
use flipabout::credits::SystemOpener;
use flipabout::egui_integration::EguiIntegration;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext},
    display::{GetGlDisplay, GlDisplay},
    prelude::{GlSurface, NotCurrentGlContext},
    surface::{Surface as GlutinSurface, SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

/// Field order matters: the surface and context drop before the window.
struct Env {
    gl_surface: GlutinSurface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

struct App {
    egui: EguiIntegration,
    env: Env,
    host: AboutHost,
}

impl App {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let size = self.env.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }

        let ctx = self.egui.begin_frame(&self.env.window);
        let actions = flipabout::ui::build_ui(&ctx, &self.host.about_label());
        self.host.show(&ctx);
        self.egui.end_frame(&self.env.window);

        unsafe {
            gl::ClearColor(0.92, 0.92, 0.92, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
        self.egui.paint(&self.env.window);
        if let Err(e) = self.env.gl_surface.swap_buffers(&self.env.gl_context) {
            log::error!("Failed to swap buffers: {}", e);
        }

        let had_actions = !actions.is_empty();
        for action in actions {
            if !self.host.handle(&ctx, action) {
                log::info!("Quit requested");
                event_loop.exit();
            }
        }

        if had_actions || self.egui.wants_repaint() {
            self.env.window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let response = self.egui.handle_event(&self.env.window, &event);
        if response.repaint {
            self.env.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(physical_size) => {
                let (width, height): (u32, u32) = physical_size.into();
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(width), NonZeroU32::new(height))
                {
                    self.env
                        .gl_surface
                        .resize(&self.env.gl_context, width, height);
                }
                self.env.window.request_redraw();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value.max(1)).unwrap_or(NonZeroU32::MIN)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load();
    let metadata = load_metadata(&config, &flipabout::cargo_descriptor!());
    let host = AboutHost::new(config, metadata, Box::new(SystemOpener));
    let metadata = host.metadata();
    log::info!(
        "Starting {} {} ({})",
        metadata.app_name,
        metadata.version_marketing,
        metadata.version_build
    );
    let title = metadata.app_name.clone();

    // Set up winit + glutin
    let el = EventLoop::new()?;

    let window_attributes = Window::default_attributes()
        .with_inner_size(LogicalSize::new(480.0, 320.0))
        .with_resizable(true)
        .with_title(title);

    let template = ConfigTemplateBuilder::new().with_alpha_size(8);

    let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes));
    let (window, gl_config) = display_builder
        .build(&el, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() < accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .expect("display offered no GL configs")
        })
        .map_err(|e| anyhow!("Could not create GL display: {}", e))?;
    let window = window.ok_or_else(|| anyhow!("Could not create window with OpenGL context"))?;
    let raw_window_handle = window.window_handle()?.as_raw();

    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let fallback_context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(None))
        .build(Some(raw_window_handle));

    let display = gl_config.display();
    let not_current_gl_context = unsafe {
        match display.create_context(&gl_config, &context_attributes) {
            Ok(context) => context,
            Err(_) => display.create_context(&gl_config, &fallback_context_attributes)?,
        }
    };

    let (width, height): (u32, u32) = window.inner_size().into();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        non_zero(width),
        non_zero(height),
    );
    let gl_surface = unsafe { display.create_window_surface(&gl_config, &attrs)? };
    let gl_context = not_current_gl_context.make_current(&gl_surface)?;

    gl::load_with(|s| match CString::new(s) {
        Ok(name) => display.get_proc_address(name.as_c_str()),
        Err(_) => std::ptr::null(),
    });

    let egui = EguiIntegration::new(&window, &gl_context)?;

    let mut app = App {
        egui,
        env: Env {
            gl_surface,
            gl_context,
            window,
        },
        host,
    };

    el.run_app(&mut app)?;

    Ok(())
}
