//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements          | Connects to                  |
//! |----------------|---------------------|------------------------------|
//! | `hardware`     | SensorPort          | ESP32 ADC1 (four probes)     |
//! |                | ActuatorPort        | LEDC servo, relay GPIO       |
//! | `log_sink`     | EventSink           | Serial log output            |
//! | `tcp`          | Acceptor/Connection | lwIP sockets via `std::net`  |
//! | `time`         | TimePort, DelayNs   | ESP32 system timer, FreeRTOS |
//! | `wifi`         | ConnectivityPort    | ESP-IDF WiFi STA             |

pub mod hardware;
pub mod log_sink;
pub mod tcp;
pub mod time;
pub mod wifi;
