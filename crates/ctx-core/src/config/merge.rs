//! Field-wise merge of a context with an overlay

use crate::context::{Context, ContextPatch};

/// Merge `overlay` onto `base`.
///
/// Per field: `Keep` leaves the base value, `Clear` deletes it, `Set`
/// replaces it wholesale. `activeApp` is replaced as a unit, never merged
/// member by member.
pub fn merge(base: &Context, overlay: &ContextPatch) -> Context {
    Context {
        account: overlay.account.apply(base.account.as_ref()),
        team: overlay.team.apply(base.team.as_ref()),
        moniker: overlay.moniker.apply(base.moniker.as_ref()),
        provider: overlay.provider.apply(base.provider.as_ref()),
        region: overlay.region.apply(base.region.as_ref()),
        active_app: overlay.active_app.apply(base.active_app.as_ref()),
    }
}
