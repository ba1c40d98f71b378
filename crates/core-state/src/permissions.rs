//! Interaction permissions and lifecycle flags.

bitflags::bitflags! {
    /// Modifiers that prevent categories of host-side item movement.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u8 {
        const PREVENT_PLACE = 1;
        const PREVENT_TAKE = 1 << 1;
        const PREVENT_SWAP = 1 << 2;
        const PREVENT_DROP = 1 << 3;
        const PREVENT_OTHER = 1 << 4;
    }
}

impl Permissions {
    /// Every modifier set: no interaction may change the panel.
    pub fn locked() -> Self {
        Self::all()
    }

    pub fn is_locked(self) -> bool {
        self == Self::all()
    }
}

/// Booleans that suppress side effects during internal re-renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelFlags {
    /// Set while the panel recreates its surface and reopens it for prior
    /// viewers; open/close handlers do not run.
    pub updating: bool,
    /// Cleared only for the duration of a deferred close that asked not to
    /// run the close handler.
    pub run_close_action: bool,
    pub run_open_action: bool,
    pub title_updates_on_item_click: bool,
}

impl Default for PanelFlags {
    fn default() -> Self {
        Self {
            updating: false,
            run_close_action: true,
            run_open_action: true,
            title_updates_on_item_click: false,
        }
    }
}
