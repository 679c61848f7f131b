//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                 | Connects to                 |
//! |-------------|----------------------------|-----------------------------|
//! | `hardware`  | Input/Output/Lcd/Clock/    | GPIO, encoder ISR, LCD,     |
//! |             | Timer/SystemPort (`Board`) | esp_timer, esp_restart      |
//! | `log_sink`  | bus `Listener`             | Serial log output           |
//! | `nvs`       | StorePort                  | NVS / in-memory store       |
//! | `time`      | ClockPort                  | ESP32 system timer          |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
