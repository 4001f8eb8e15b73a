use tracing::debug;

use super::HandlerContext;
use crate::common::errors::Result;
use crate::common::traits::ReplayEventHandler;
use crate::decoder::DemoEvent;
use crate::events::GameEvent;

/// Unclassified decoder events are logged and dropped
pub struct GenericEventHandler;

impl ReplayEventHandler for GenericEventHandler {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        if let DemoEvent::Generic { name, data } = event {
            debug!(
                name = %name,
                fields = data.len(),
                tick = ctx.tick(),
                "Dropping generic event"
            );
        }
        Ok(None)
    }
}
