use anyhow::Result;
use egui_winit::EventResponse;
use glutin::display::{GetGlDisplay, GlDisplay};
use std::sync::Arc;

/// Glue between winit events, the egui context and the glow painter.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    winit_state: egui_winit::State,
    painter: egui_glow::Painter,
    shapes: Vec<egui::epaint::ClippedShape>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl EguiIntegration {
    /// The GL context must be current before calling this.
    pub fn new(
        window: &winit::window::Window,
        gl_context: &glutin::context::PossiblyCurrentContext,
    ) -> Result<Self> {
        let display = gl_context.display();
        let glow_context = unsafe {
            glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s).cast())
        };

        let painter = egui_glow::Painter::new(Arc::new(glow_context), "", None, false)?;

        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Self {
            ctx,
            winit_state,
            painter,
            shapes: Default::default(),
            textures_delta: Default::default(),
            pixels_per_point: window.scale_factor() as f32,
        })
    }

    pub fn handle_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> EventResponse {
        self.winit_state.on_window_event(window, event)
    }

    pub fn begin_frame(&mut self, window: &winit::window::Window) -> egui::Context {
        let raw_input = self.winit_state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
        self.ctx.clone()
    }

    pub fn end_frame(&mut self, window: &winit::window::Window) {
        // end_pass() clears the input state
        self.pixels_per_point = self.ctx.input(|i| i.pixels_per_point);

        let output = self.ctx.end_pass();
        self.winit_state
            .handle_platform_output(window, output.platform_output);
        self.shapes = output.shapes;
        self.textures_delta = output.textures_delta;
    }

    /// Paint the last finished frame into the current framebuffer.
    pub fn paint(&mut self, window: &winit::window::Window) {
        let shapes = std::mem::take(&mut self.shapes);
        let textures_delta = std::mem::take(&mut self.textures_delta);
        let meshes = self.ctx.tessellate(shapes, self.pixels_per_point);

        let size = window.inner_size();
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            self.pixels_per_point,
            &meshes,
            &textures_delta,
        );
    }

    /// True while something (e.g. a flip animation) asked for another frame.
    pub fn wants_repaint(&self) -> bool {
        self.ctx.has_requested_repaint()
    }
}

impl Drop for EguiIntegration {
    fn drop(&mut self) {
        self.painter.destroy();
    }
}
