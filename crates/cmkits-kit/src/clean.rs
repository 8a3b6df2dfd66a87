//! Whether a kit switch invalidates an existing build tree.

use cmkits_types::Kit;
use tracing::debug;

/// `true` when moving from `old` to `new` changes the compilers in use, so
/// the CMake cache must be cleared.
///
/// The first selection (no `old` kit) never needs a clean. Only the kit's
/// identity (compilers, Visual Studio instance and architecture, toolchain
/// file) is compared; name, generator, cache settings, and environment are
/// not.
pub fn kit_change_needs_clean(new: &Kit, old: Option<&Kit>) -> bool {
    let Some(old) = old else {
        debug!("No prior kit; no clean needed for {}", new.name);
        return false;
    };

    let needs_clean = new.identity != old.identity;
    if needs_clean {
        debug!("Switching from {} to {} requires a clean", old.name, new.name);
    }
    needs_clean
}
