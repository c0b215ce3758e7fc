use serde::{Deserialize, Serialize};
use spellweave_core::{ActorDescriptor, EnvironmentalContext, SpellDescriptor};

/// One spell combination to analyze, as read from a query file.
///
/// ```json
/// {
///   "primary": { "name": "Fireball", "school": "evocation", "level": 3, "tags": ["damage"] },
///   "secondary": { "name": "Shield", "school": "abjuration", "level": 1 },
///   "actor": { "id": "wizard-1", "class": "wizard", "level": 10 },
///   "context": { "terrain": "dungeon", "difficulty": "moderate" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct InteractionQuery {
    pub(crate) primary: SpellDescriptor,
    pub(crate) secondary: SpellDescriptor,
    pub(crate) actor: ActorDescriptor,
    pub(crate) context: EnvironmentalContext,
}
