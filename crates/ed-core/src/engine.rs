//! The game state machine: applying one classified intent to a session.
//!
//! [`apply`] is the only place session state is mutated during play. It is
//! synchronous and fast; anything that can block (narration, persistence)
//! happens in the layers above, after the transition has been decided.

use chrono::Utc;

use crate::ability;
use crate::error::CoreResult;
use crate::intent::{Direction, Intent};
use crate::outcome::{BlockedReason, ExitRefusal, Outcome, TakeFailure};
use crate::session::{DefeatReason, GameStatus, Session};
use crate::world::{ExitTarget, WorldGraph};

/// Apply one intent to a session, returning what happened.
///
/// Every processed command advances `turn_count` by exactly one, including
/// reads and unrecognized input. Errors are returned only for internal
/// world-data inconsistencies; every in-game failure is an [`Outcome`].
/// Callers must not persist a session after an error.
pub fn apply(session: &mut Session, intent: &Intent, world: &WorldGraph) -> CoreResult<Outcome> {
    // A session pointing at a room outside the graph is corrupt data, not a
    // player mistake. Refuse before touching anything.
    world.room(&session.location)?;

    let was_collapsed = session.collapse_triggered;
    session.turn_count += 1;

    // Terminal absorption: the game is over. Reads stay available,
    // everything else just restates the ending.
    if session.is_terminal() && intent.is_mutating() {
        session.updated_at = Utc::now();
        return Ok(Outcome::Ended {
            status: session.game_status,
        });
    }

    let outcome = match intent {
        Intent::Move { direction } => do_move(session, *direction, world)?,
        Intent::Take { item } => do_take(session, item, world)?,
        Intent::Drop { item } => do_drop(session, item, world)?,
        Intent::Examine { target } => do_examine(session, target.as_deref(), world)?,
        Intent::Use { target } => do_use(session, target, world)?,
        Intent::Inventory => Outcome::InventoryList {
            items: session.inventory.clone(),
        },
        Intent::Exit => do_exit(session, world)?,
        Intent::Unknown { raw } => Outcome::Unrecognized { raw: raw.clone() },
    };

    // Defeat is evaluated on every processed command, after the
    // intent-specific mutation. Nothing on the default path damages the
    // character, but narrative events may have.
    let outcome = if session.game_status == GameStatus::InProgress && session.health.is_depleted() {
        session.game_status = GameStatus::Defeat;
        session.defeat_reason = Some(DefeatReason::HealthDepleted);
        Outcome::Defeated {
            reason: DefeatReason::HealthDepleted,
        }
    } else {
        outcome
    };

    // The escape counter is informational flavor; it runs from the command
    // after the collapse starts until the game ends.
    if was_collapsed && session.game_status == GameStatus::InProgress {
        session.turns_since_collapse += 1;
    }

    session.updated_at = Utc::now();
    Ok(outcome)
}

fn do_move(session: &mut Session, direction: Direction, world: &WorldGraph) -> CoreResult<Outcome> {
    let room = world.room(&session.location)?;
    let Some(edge) = room.exits.get(&direction) else {
        return Ok(Outcome::Blocked {
            direction,
            reason: BlockedReason::NoExit,
        });
    };

    if let Some(flag) = &edge.requires_flag
        && !session.flag(flag)
    {
        return Ok(Outcome::Blocked {
            direction,
            reason: BlockedReason::CrossingRequired { flag: flag.clone() },
        });
    }

    match &edge.to {
        ExitTarget::Outside => {
            // Walking out of the cave is an explicit leave action; it wins
            // exactly when an EXIT command would.
            let treasure = world.terminal_treasure()?;
            if session.has_item(&treasure.id) {
                session.game_status = GameStatus::Victory;
                Ok(Outcome::Left)
            } else {
                Ok(Outcome::Blocked {
                    direction,
                    reason: BlockedReason::TreasureRequired,
                })
            }
        }
        ExitTarget::Room(dest) => {
            world.room(dest)?;
            let first_visit = !session.visited_rooms.contains(dest);
            session.visit(dest.clone());
            Ok(Outcome::Arrived {
                room: dest.clone(),
                first_visit,
            })
        }
    }
}

fn do_take(session: &mut Session, item_text: &str, world: &WorldGraph) -> CoreResult<Outcome> {
    if let Some(held) = world.resolve_item(item_text, &session.inventory) {
        return Ok(Outcome::TakeFailed {
            item: held.clone(),
            reason: TakeFailure::AlreadyHeld,
        });
    }

    let available = world.items_available(&session.location, session)?;
    let Some(item_id) = world.resolve_item(item_text, &available).cloned() else {
        return Ok(Outcome::TakeFailed {
            item: item_text.to_string(),
            reason: TakeFailure::NotHere,
        });
    };

    // Items dropped here return to the pool they came from; anything else
    // leaves its original room for the rest of the session.
    let from_dropped = session
        .dropped_items
        .get_mut(&session.location)
        .map(|dropped| {
            if let Some(pos) = dropped.iter().position(|id| *id == item_id) {
                dropped.remove(pos);
                true
            } else {
                false
            }
        })
        .unwrap_or(false);
    if !from_dropped {
        session.taken_items.insert(item_id.clone());
    }
    session.add_item(item_id.clone());

    let def = world.item(&item_id)?;
    let triggered_collapse = def.is_terminal_treasure && !session.collapse_triggered;
    if triggered_collapse {
        session.collapse_triggered = true;
        session.turns_since_collapse = 0;
    }

    Ok(Outcome::Taken {
        item: item_id,
        triggered_collapse,
    })
}

fn do_drop(session: &mut Session, item_text: &str, world: &WorldGraph) -> CoreResult<Outcome> {
    let Some(item_id) = world.resolve_item(item_text, &session.inventory).cloned() else {
        return Ok(Outcome::DropFailed {
            item: item_text.to_string(),
        });
    };

    session.remove_item(&item_id);
    session
        .dropped_items
        .entry(session.location.clone())
        .or_default()
        .push(item_id.clone());

    Ok(Outcome::Dropped { item: item_id })
}

fn do_examine(
    session: &Session,
    target: Option<&str>,
    world: &WorldGraph,
) -> CoreResult<Outcome> {
    let room = world.room(&session.location)?;

    let Some(target) = target else {
        return Ok(Outcome::Description {
            target: room.name.clone(),
            text: room.description.clone(),
            items_present: world.items_available(&room.id, session)?,
            exits: room.exits.keys().copied().collect(),
        });
    };

    let mut candidates = session.inventory.clone();
    candidates.extend(world.items_available(&room.id, session)?);
    if let Some(item_id) = world.resolve_item(target, &candidates) {
        let def = world.item(item_id)?;
        return Ok(Outcome::Description {
            target: def.name.clone(),
            text: def.description.clone(),
            items_present: Vec::new(),
            exits: Vec::new(),
        });
    }

    // "examine alcove" while standing in the alcove describes the room.
    let room_names = [room.id.clone()];
    if world.resolve_item(target, &room_names).is_some() {
        return Ok(Outcome::Description {
            target: room.name.clone(),
            text: room.description.clone(),
            items_present: world.items_available(&room.id, session)?,
            exits: room.exits.keys().copied().collect(),
        });
    }

    Ok(Outcome::NothingFound {
        target: target.to_string(),
    })
}

fn do_use(session: &mut Session, target: &str, world: &WorldGraph) -> CoreResult<Outcome> {
    if let Some(found) = ability::lookup(session.character_class, target) {
        return Ok(Outcome::AbilityUsed {
            ability: found.name.to_string(),
            class: session.character_class,
        });
    }

    let Some(item_id) = world.resolve_item(target, &session.inventory).cloned() else {
        return Ok(Outcome::UseFailed {
            target: target.to_string(),
        });
    };

    let def = world.item(&item_id)?;
    let enabled_flag = def.use_effect.as_ref().and_then(|effect| {
        (effect.at_room == session.location).then(|| effect.sets_flag.clone())
    });
    if let Some(flag) = &enabled_flag {
        session.set_flag(flag.clone(), true);
    }

    Ok(Outcome::ItemUsed {
        item: item_id,
        enabled_flag,
    })
}

fn do_exit(session: &mut Session, world: &WorldGraph) -> CoreResult<Outcome> {
    if session.location != world.entry_room {
        return Ok(Outcome::ExitRefused {
            reason: ExitRefusal::NotAtExit,
        });
    }

    let treasure = world.terminal_treasure()?;
    if !session.has_item(&treasure.id) {
        return Ok(Outcome::ExitRefused {
            reason: ExitRefusal::TreasureMissing,
        });
    }

    session.game_status = GameStatus::Victory;
    Ok(Outcome::Left)
}
