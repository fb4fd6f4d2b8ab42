//! Shared server state, injected into every request's depot.

use std::sync::Arc;

use jiff::Timestamp;

use megano_app::context::AppContext;

pub(crate) struct State {
    pub(crate) app: AppContext,

    /// When this process began serving.
    pub(crate) started_at: Timestamp,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self {
            app,
            started_at: Timestamp::now(),
        })
    }
}
