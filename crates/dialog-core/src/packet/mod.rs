//! Decoded packet model, accessors and export loading
//!
//! Packets are produced by an external dissector, either as decoded records
//! or as raw tshark JSON layers that [`tshark`] maps onto the same model.

pub mod accessors;
pub mod loader;
pub mod model;
pub mod tshark;

pub use accessors::SubscriberIds;
pub use loader::{load_packets_json, load_packets_path};
pub use model::{
    CapInfo, ComponentKind, DecodedPacket, GsmMapInfo, MessageKind, TcapComponent, TcapInfo,
};
