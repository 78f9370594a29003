//! PCD8544 (Nokia 5110) LCD driver.
//!
//! 84x48 monochrome, driven over SPI with a separate data/command line.
//! Drawing happens in a RAM [`FrameBuffer`] that implements
//! `embedded_graphics::DrawTarget`; [`Pcd8544::flush`] pushes the whole
//! buffer (504 bytes) in one transfer.
//!
//! ## Memory layout
//!
//! Six horizontal banks of 8 rows.  Byte `x + bank * 84` holds column `x`
//! of that bank, LSB at the top.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::error::DisplayError;

pub const WIDTH: usize = 84;
pub const HEIGHT: usize = 48;
const BANKS: usize = HEIGHT / 8;
pub const BUFFER_LEN: usize = WIDTH * BANKS;

/// PCD8544 instruction set.
#[allow(dead_code)]
mod cmd {
    /// Function set; OR with `EXTENDED` for the extended instruction set.
    pub const FUNCTION_SET: u8 = 0x20;
    pub const EXTENDED: u8 = 0x01;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const DISPLAY_NORMAL: u8 = 0x04;
    pub const DISPLAY_INVERTED: u8 = 0x05;
    pub const SET_Y: u8 = 0x40;
    pub const SET_X: u8 = 0x80;

    // Extended set
    pub const SET_TEMP_COEFF: u8 = 0x04;
    pub const SET_BIAS: u8 = 0x10;
    pub const SET_VOP: u8 = 0x80;
}

/// Operating voltage (contrast).  0x31 suits most 3.3 V modules.
const DEFAULT_VOP: u8 = 0x31;
/// Bias 1:48.
const DEFAULT_BIAS: u8 = 0x04;

// ---------------------------------------------------------------------------
// FrameBuffer
// ---------------------------------------------------------------------------

/// RAM copy of the panel.  `On` is a dark pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_LEN],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer").field("len", &BUFFER_LEN).finish()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_LEN],
        }
    }

    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.bytes
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((x + (y / 8) * WIDTH, 1 << (y % 8)))
    }

    /// Pixel state; out-of-bounds reads are off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        Self::locate(x, y).is_some_and(|(idx, mask)| self.bytes[idx] & mask != 0)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some((idx, mask)) = Self::locate(x, y) {
            if on {
                self.bytes[idx] |= mask;
            } else {
                self.bytes[idx] &= !mask;
            }
        }
    }

    /// Flip every pixel in the rectangle, clipped to the panel.
    pub fn invert_rect(&mut self, area: Rectangle) {
        for p in area.points() {
            if let Some((idx, mask)) = Self::locate(p.x, p.y) {
                self.bytes[idx] ^= mask;
            }
        }
    }

    /// Turn every pixel in the rectangle off.
    pub fn clear_rect(&mut self, area: Rectangle) {
        for p in area.points() {
            self.set_pixel(p.x, p.y, false);
        }
    }

    pub fn clear_all(&mut self) {
        self.bytes.fill(0);
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            self.set_pixel(p.x, p.y, color.is_on());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Panel flush
// ---------------------------------------------------------------------------

/// Anything that can push a frame to glass.
pub trait FrameFlush {
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError>;
}

/// PCD8544 over SPI.  Chip select is owned by the `SpiDevice`.
pub struct Pcd8544<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
}

impl<SPI, DC, RST> Pcd8544<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Hardware reset followed by the controller setup sequence.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;

        self.commands(&[
            cmd::FUNCTION_SET | cmd::EXTENDED,
            cmd::SET_VOP | DEFAULT_VOP,
            cmd::SET_TEMP_COEFF,
            cmd::SET_BIAS | DEFAULT_BIAS,
            cmd::FUNCTION_SET,
            cmd::DISPLAY_CONTROL | cmd::DISPLAY_NORMAL,
        ])
    }

    /// Set the contrast (0..=0x7F).
    pub fn set_contrast(&mut self, vop: u8) -> Result<(), DisplayError> {
        self.commands(&[
            cmd::FUNCTION_SET | cmd::EXTENDED,
            cmd::SET_VOP | (vop & 0x7F),
            cmd::FUNCTION_SET,
        ])
    }

    fn commands(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(bytes).map_err(|_| DisplayError::Bus)
    }
}

impl<SPI, DC, RST> FrameFlush for Pcd8544<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.commands(&[cmd::SET_X, cmd::SET_Y])?;
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        self.spi.write(frame.as_bytes()).map_err(|_| DisplayError::Bus)
    }
}
