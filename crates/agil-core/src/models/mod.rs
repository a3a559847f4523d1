//! Plain data carried through the initialization pipeline.
//!
//! Every value here is built once and flows forward; nothing is mutated
//! after construction.

mod address;
mod location;
mod message;
mod permission;
mod platform;

pub use address::AddressComponents;
pub use location::{LocationFix, LocationOptions};
pub use message::{MessageOrigin, PushMessage};
pub use permission::{PermissionKind, PermissionResult, PermissionStatus};
pub use platform::{AppMetadata, Platform};
