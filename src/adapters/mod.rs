//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `access_point` | —                  | ESP-IDF soft-AP, HTTP, DNS   |
//! | `display`      | RenderPort         | PCD8544 LCD over SPI         |
//! | `frontend`     | RenderPort         | display + status mirror      |
//! |                | StatusMirrorPort   |                              |
//! | `hardware`     | InputPort          | ESP32 ADC, GPIO interlock    |
//! | `listener`     | RunStateListener   | embassy-sync channel         |
//! | `log_sink`     | EventSink          | Serial log output            |
//! | `status_page`  | StatusMirrorPort   | Shared state for HTTP        |
//! | `time`         | —                  | ESP32 system timer           |

pub mod access_point;
pub mod display;
pub mod frontend;
pub mod hardware;
pub mod listener;
pub mod log_sink;
pub mod status_page;
pub mod time;
