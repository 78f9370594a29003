//! Pairs a renderer with a status mirror so the controller can address
//! both through one `ui` argument.

use crate::app::ports::{RenderPort, StatusMirrorPort, StatusUpdate};

pub struct Frontend<R, M> {
    pub render: R,
    pub mirror: M,
}

impl<R, M> Frontend<R, M> {
    pub fn new(render: R, mirror: M) -> Self {
        Self { render, mirror }
    }
}

impl<R: RenderPort, M> RenderPort for Frontend<R, M> {
    fn draw_quantity_per_kit(&mut self, value: u8, highlighted: bool, running: bool) {
        self.render.draw_quantity_per_kit(value, highlighted, running);
    }

    fn draw_kit_count(&mut self, value: u8, highlighted: bool, running: bool) {
        self.render.draw_kit_count(value, highlighted, running);
    }

    fn draw_progress(&mut self, percent: u8, visible: bool) {
        self.render.draw_progress(percent, visible);
    }

    fn draw_start_stop(&mut self, highlighted: bool, running: bool) {
        self.render.draw_start_stop(highlighted, running);
    }

    fn draw_paused(&mut self) {
        self.render.draw_paused();
    }
}

impl<R, M: StatusMirrorPort> StatusMirrorPort for Frontend<R, M> {
    fn update_status(&mut self, status: &StatusUpdate) {
        self.mirror.update_status(status);
    }
}
