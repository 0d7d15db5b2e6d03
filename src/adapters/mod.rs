//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                     |
//! |---------------|---------------|---------------------------------|
//! | `config_file` | ConfigPort    | JSON file on disk               |
//! | `log_sink`    | EventSink     | `log` facade                    |
//! | `rpi`         | HardwarePort  | rppal GPIO + MCP3004 over SPI   |
//! | `sim`         | HardwarePort  | Simulated room and DHT11        |

pub mod config_file;
pub mod log_sink;
#[cfg(all(target_os = "linux", feature = "rpi"))]
pub mod rpi;
pub mod sim;
