//! Tree-wide layout options.

use serde::{Deserialize, Serialize};

/// Options shared by every engine working on one [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// When capturing a right (bottom) anchor whose new offset lies past the
    /// container edge, keep the previous negative offset instead. Hosts that
    /// rescale a parent after a monitor change enable this so that children
    /// are not pushed past the trailing edge.
    pub dpi_rescale_compat: bool,
    /// Passes a container may run after its first one when layout is
    /// requested again while it is already laying out.
    pub max_follow_up_passes: u8,
    /// Memoize preferred sizes until the element or a descendant changes.
    pub cache_preferred_sizes: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            dpi_rescale_compat: false,
            max_follow_up_passes: 1,
            cache_preferred_sizes: true,
        }
    }
}
