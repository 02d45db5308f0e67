//! Request and response shapes of the Konnect management API

mod cloud_gateways;
mod control_planes;
mod gateway;

pub use cloud_gateways::*;
pub use control_planes::*;
pub use gateway::*;
