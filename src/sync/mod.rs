//! Device synchronization
//!
//! - `state`: snapshot + optimistic control state transitions
//! - `view`: render state derived from both
//! - `controller`: poll loop and command dispatch task

pub mod controller;
pub mod state;
pub mod view;

pub use controller::{PanelController, PanelHandle};
pub use state::{ControlState, DeviceCommand, RunningState, SyncState, UserAction};
pub use view::PanelView;
