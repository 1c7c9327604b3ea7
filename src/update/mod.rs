// Submodules for separation of concerns
mod commit;
mod exec;
mod mods;
mod parse;
mod types;

// Public API re-exports
pub use exec::apply_update;
pub use mods::plan;
pub use parse::parse_update_json;
pub use types::{
    ArrayEnd, ChangeLog, ChangeLogEntry, Effect, Modifier, ModifierGroup, Transaction,
    UpdateOptions, UpdateSpec,
};
