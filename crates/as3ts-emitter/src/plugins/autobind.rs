//! Decorates every class with `@autobind` so methods passed as callbacks keep
//! their receiver.

use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::plugin::Plugin;
use as3ts_ast::{NodeIndex, NodeKind};

const DECORATOR: &str = "autobind";
const MODULE: &str = "autobind-decorator";

#[derive(Clone, Copy, Debug, Default)]
pub struct AutobindPlugin;

impl AutobindPlugin {
    pub const NAME: &'static str = "autobind";
}

impl Plugin for AutobindPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// Inserts the decorator on its own line above the class and lets the
    /// default handler emit the class itself.
    fn visit(&self, emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
        let tree = emitter.tree();
        if tree.kind(node) != NodeKind::Class {
            return Ok(false);
        }
        let name = emitter.required_kind(node, NodeKind::Name)?;
        let name_start = tree.start(name) as usize;
        let line_start = emitter
            .source()
            .get(..name_start)
            .and_then(|head| head.rfind('\n'))
            .map_or(0, |pos| pos + 1);

        emitter.catchup(line_start as u32)?;
        emitter.ensure_import(DECORATOR, Some(MODULE), true)?;
        let separator = &emitter.options().line_separator;
        emitter.insert(&format!("@{DECORATOR}{separator}"));
        Ok(false)
    }
}
