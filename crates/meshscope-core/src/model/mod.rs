// ── Domain model ──
//
// Canonical value types shared by every analysis stage. Nothing here holds
// state across analysis passes.

pub mod bssid;
pub mod event;
pub mod observation;
pub mod topology;

pub use bssid::{BaseId, Bssid, Oui};
pub use event::{ConnectionEvent, EventType, NO_SIGNAL_DBM};
pub use observation::{ApObservation, Band, CurrentConnection, HIDDEN_SSID};
pub use topology::{
    CoverageDetails, MeshNode, MeshReport, MeshType, MultipleApsReport, NetworkKind, Radio,
    SignalQuality, SingleApReport, TopologyResult,
};
