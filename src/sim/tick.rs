//! Simulation tick
//!
//! Order within a tick:
//! 1. apply the buffered move to the active player
//! 2. count down a pending collision reset
//! 3. advance bugs and refresh player positions
//! 4. check gear pickup and bug hits for the active player
//! 5. apply a requested full reset

use super::collision;
use super::level::{Effect, GameStatus, Signal, transition};
use super::player::{Move, MoveOutcome};
use super::state::{GameEvent, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest unconsumed move from the host
    pub mv: Option<Move>,
    /// Restart key / game-won dialog dismissed
    pub reset: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if input.reset {
        state.request_reset();
    }

    if let Some(mv) = input.mv {
        if state.status == GameStatus::Playing {
            let active = state.active;
            let carrying = state.item.collected;
            match state.players[active].handle_input(mv, &state.grid, carrying, &state.docks) {
                MoveOutcome::Goal(col) => apply_signal(state, Signal::GoalReached { player: active, col }),
                MoveOutcome::Moved => log::debug!("Player {} moved {:?}", active, mv),
                MoveOutcome::Rejected => {}
            }
        } else {
            log::debug!("Move {:?} dropped while {:?}", mv, state.status);
        }
    }

    // The collision frame stays visible until the countdown runs out; a
    // pending reset takes over instead
    if state.status == GameStatus::GameLost && !state.reset_requested {
        state.loss_ticks = state.loss_ticks.saturating_sub(1);
        if state.loss_ticks == 0 {
            apply_signal(state, Signal::LossDelayElapsed);
        }
    }

    for obstacle in &mut state.obstacles {
        obstacle.update(dt);
    }
    for player in &mut state.players {
        player.update(&state.grid);
    }

    if state.status == GameStatus::Playing {
        let player = &state.players[state.active];
        let contacts = collision::detect(&state.obstacles, &state.item, player);

        if contacts.item_picked {
            state.item.collect();
            state.events.push(GameEvent::ItemCollected { player: state.active });
            log::debug!("Player {} picked up the gear", state.active);
        }

        if contacts.hit {
            apply_signal(state, Signal::Collision);
            state.loss_ticks = state.config.collision_delay_ticks;
            if state.loss_ticks == 0 {
                apply_signal(state, Signal::LossDelayElapsed);
            }
        }
    }

    if state.reset_requested {
        apply_signal(state, Signal::Reset);
    }
}

/// Run the level state machine and apply its effects
pub fn apply_signal(state: &mut GameState, signal: Signal) {
    let from = state.status;
    let next = transition(from, signal, state.roster());

    match signal {
        Signal::Collision if next.status == GameStatus::GameLost => {
            log::info!("Player {} hit by a bug", state.active);
            state.events.push(GameEvent::Collision { player: state.active });
        }
        Signal::GoalReached { player, col } if from == GameStatus::Playing && player == state.active => {
            log::info!("Player {} filled dock {}", player, col);
            state.events.push(GameEvent::LevelWon { player, col });
            if next.status == GameStatus::GameWon {
                log::info!("Game won!");
                state.events.push(GameEvent::GameWon { player, col });
            }
        }
        Signal::Reset => state.events.push(GameEvent::Reset),
        _ => {}
    }

    state.status = next.status;
    for effect in next.effects {
        apply_effect(state, effect);
    }
}

fn apply_effect(state: &mut GameState, effect: Effect) {
    match effect {
        Effect::FillDock(col) => state.docks.fill(col),
        Effect::RestartItem { fresh } => {
            let player = &state.players[state.active];
            state.item.restart(player, fresh, &state.config, &mut state.rng);
        }
        Effect::RestartPlayer => state.players[state.active].restart(&state.grid),
        Effect::AdvanceRoster => {
            state.advance_roster();
        }
        Effect::RegenerateObstacles => state.regenerate_obstacles(),
        Effect::Notify { modal, visible } => state.events.push(GameEvent::Notify { modal, visible }),
        Effect::FullReset => state.reinitialize(),
    }
}
