//! LCD render adapter.
//!
//! Implements [`RenderPort`] on the 84x48 panel.  Each region owns a
//! 12-row band, so redrawing one region never disturbs another; the four
//! bands tile the whole screen and the paused overlay simply clears it.
//!
//! ```text
//!  y= 0 │ R per kit: [ 7]      │ quantity-per-kit
//!  y=12 │     Kits: [42]       │ kit count
//!  y=24 │ [████ 35%        ]   │ progress (running only)
//!  y=36 │       [Start]        │ start / stop
//! ```
//!
//! Every operation flushes the frame.  A failed flush is logged and the
//! next draw tries again with the full frame.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_6X9, FONT_9X15_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use log::warn;

use crate::app::ports::RenderPort;
use crate::drivers::pcd8544::{FrameBuffer, FrameFlush, WIDTH};

const BAND_HEIGHT: u32 = 12;
const FIELD_BOX: Size = Size::new(15, 11);

const ROW_QUANTITY_Y: i32 = 0;
const ROW_KITS_Y: i32 = 12;
const ROW_PROGRESS_Y: i32 = 24;
const ROW_BUTTON_Y: i32 = 36;

/// Progress bar interior width in pixels at 100 %.
const BAR_WIDTH: u32 = 75;

const PAUSED_HINT: [&str; 3] = ["Safety switch", "flipped; please", "resolve the issue!"];

fn paint<D: Drawable<Color = BinaryColor>>(frame: &mut FrameBuffer, item: &D) {
    // Drawing into RAM is infallible.
    let _ = item.draw(frame);
}

fn text_style(font: &'static MonoFont<'static>, inverted: bool) -> MonoTextStyle<'static, BinaryColor> {
    if inverted {
        MonoTextStyleBuilder::new()
            .font(font)
            .text_color(BinaryColor::Off)
            .background_color(BinaryColor::On)
            .build()
    } else {
        MonoTextStyle::new(font, BinaryColor::On)
    }
}

pub struct LcdDisplay<F> {
    panel: F,
    frame: FrameBuffer,
    flush_failures: u32,
}

impl<F: FrameFlush> LcdDisplay<F> {
    pub fn new(panel: F) -> Self {
        Self {
            panel,
            frame: FrameBuffer::new(),
            flush_failures: 0,
        }
    }

    /// The frame as last drawn (flushed or not).
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn flush_failures(&self) -> u32 {
        self.flush_failures
    }

    pub fn panel(&self) -> &F {
        &self.panel
    }

    fn flush(&mut self) {
        if let Err(e) = self.panel.flush(&self.frame) {
            self.flush_failures = self.flush_failures.wrapping_add(1);
            warn!("LCD flush failed: {} ({} total)", e, self.flush_failures);
        }
    }

    fn clear_band(&mut self, y: i32) {
        self.frame
            .clear_rect(Rectangle::new(Point::new(0, y), Size::new(WIDTH as u32, BAND_HEIGHT)));
    }

    /// One labelled number field.  The value box is shown only when not
    /// running; a highlighted box is filled and its number inverted.
    fn draw_field(&mut self, y: i32, label: &str, label_x: i32, box_x: i32, value: u8, highlighted: bool, running: bool) {
        self.clear_band(y);
        paint(
            &mut self.frame,
            &Text::with_baseline(label, Point::new(label_x, y + 2), text_style(&FONT_6X9, false), Baseline::Top),
        );

        let inverted = !running && highlighted;
        if !running {
            let style = if highlighted {
                PrimitiveStyle::with_fill(BinaryColor::On)
            } else {
                PrimitiveStyle::with_stroke(BinaryColor::On, 1)
            };
            paint(
                &mut self.frame,
                &Rectangle::new(Point::new(box_x, y), FIELD_BOX).into_styled(style),
            );
        }

        let mut digits: heapless::String<4> = heapless::String::new();
        let _ = write!(digits, "{}", value);
        let x = if value < 10 { box_x + 5 } else { box_x + 1 };
        paint(
            &mut self.frame,
            &Text::with_baseline(&digits, Point::new(x, y + 2), text_style(&FONT_6X9, inverted), Baseline::Top),
        );

        self.flush();
    }
}

impl<F: FrameFlush> RenderPort for LcdDisplay<F> {
    fn draw_quantity_per_kit(&mut self, value: u8, highlighted: bool, running: bool) {
        self.draw_field(ROW_QUANTITY_Y, "R per kit:", 4, 64, value, highlighted, running);
    }

    fn draw_kit_count(&mut self, value: u8, highlighted: bool, running: bool) {
        self.draw_field(ROW_KITS_Y, "Kits:", 20, 50, value, highlighted, running);
    }

    fn draw_progress(&mut self, percent: u8, visible: bool) {
        self.clear_band(ROW_PROGRESS_Y);
        if visible {
            let percent = percent.min(100);
            let y = ROW_PROGRESS_Y;
            paint(
                &mut self.frame,
                &Rectangle::new(Point::new(4, y), Size::new(77, 11))
                    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)),
            );

            let mut label: heapless::String<5> = heapless::String::new();
            let _ = write!(label, "{}%", percent);
            let x = match percent {
                0..=9 => 36,
                10..=99 => 33,
                _ => 30,
            };
            paint(
                &mut self.frame,
                &Text::with_baseline(&label, Point::new(x, y + 2), text_style(&FONT_6X9, false), Baseline::Top),
            );

            // Inverting keeps the label readable where the bar covers it.
            let filled = u32::from(percent) * BAR_WIDTH / 100;
            self.frame
                .invert_rect(Rectangle::new(Point::new(5, y + 1), Size::new(filled, 9)));
        }
        self.flush();
    }

    fn draw_start_stop(&mut self, highlighted: bool, running: bool) {
        self.clear_band(ROW_BUTTON_Y);
        let style = if highlighted {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        paint(
            &mut self.frame,
            &Rectangle::new(Point::new(25, ROW_BUTTON_Y + 1), Size::new(33, 11)).into_styled(style),
        );

        let (label, x) = if running { ("Stop", 30) } else { ("Start", 27) };
        paint(
            &mut self.frame,
            &Text::with_baseline(
                label,
                Point::new(x, ROW_BUTTON_Y + 3),
                text_style(&FONT_6X9, highlighted),
                Baseline::Top,
            ),
        );
        self.flush();
    }

    fn draw_paused(&mut self) {
        self.frame.clear_all();
        paint(
            &mut self.frame,
            &Text::with_baseline("PAUSED", Point::new(15, 0), text_style(&FONT_9X15_BOLD, false), Baseline::Top),
        );
        paint(
            &mut self.frame,
            &Line::new(Point::new(0, 15), Point::new(WIDTH as i32 - 1, 15))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)),
        );
        for (i, line) in PAUSED_HINT.iter().enumerate() {
            paint(
                &mut self.frame,
                &Text::with_baseline(line, Point::new(0, 18 + 7 * i as i32), text_style(&FONT_4X6, false), Baseline::Top),
            );
        }
        self.flush();
    }
}
