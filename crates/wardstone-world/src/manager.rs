//! The top-level world-event state manager.
//!
//! [`WorldStateManager`] is constructed once by the embedding server and
//! handed to everything that needs it: the tick driver calls
//! [`update`](WorldStateManager::update) once per frame on the dedicated
//! tick thread, while connection-handling threads call the mutators as
//! entities move, fight, and act.
//!
//! # Locking domains
//!
//! Mutable state is split into two independent domains so unrelated
//! subsystems never contend:
//!
//! - **encounters** -- rotation and harbinger machines, puzzle
//!   conditions, the war-chant timer, banner trophies, and the frontier,
//!   sanctum, and area audiences;
//! - **festival** -- holiday counters and the capital-zone audience.
//!
//! Each lock is held for the minimum scope. Deferred actions may be
//! *enqueued* while a lock is held (enqueueing never blocks), but action
//! bodies always run later on their partition's own thread, so no
//! lock-ordering cycle with partition-owned locks can form.
//!
//! # Durability
//!
//! Records are re-persisted at state-transition edges, not every tick.
//! Write failures are logged and swallowed: in-memory state is the
//! source of truth going forward, so a transient persistence failure
//! risks only the most recent checkpoint, never live correctness.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use wardstone_persist::{
    ConditionRecord, FestivalRecord, HarbingerRecord, PersistError, RecordBackend,
    RotationRecord, decode_era, encode_era,
};
use wardstone_types::{
    AreaId, CalendarEvent, ConditionId, EffectId, EntityHandle, Era, Faction, FestivalLeader,
    RoamerKind, SaveId, WorldStateId, ZoneId,
};

use crate::collaborators::{EntityDirectory, EventCalendar, HolidayCalendar};
use crate::conditions::ConditionFlagStore;
use crate::config::{
    self, EFFECT_DAWN_BANNER, EFFECT_DUSK_BANNER, EFFECT_WAR_CHANT, EventTuning,
    FERRY_CONDITION_SEEDS,
};
use crate::dispatch::{PartitionAction, PartitionRouter};
use crate::error::WorldError;
use crate::festival::FestivalCounters;
use crate::membership::{Audience, MembershipRegistry};
use crate::rotation::{DefeatOutcome, RotationMachine};
use crate::single_spawn::HarbingerMachine;
use crate::timer::TimedEvent;

/// A defeat notification for one of the tracked world encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefeatEvent {
    /// One of the rotation roamers was defeated.
    Roamer(RoamerKind),
    /// The harbinger was defeated.
    Harbinger,
}

/// Buff granted by a faction's banner trophy.
const fn banner_effect(faction: Faction) -> EffectId {
    match faction {
        Faction::Dawn => EFFECT_DAWN_BANNER,
        Faction::Dusk => EFFECT_DUSK_BANNER,
    }
}

/// Raised banner trophies, at most one per faction.
#[derive(Debug, Default)]
struct BannerState {
    /// Handle of the raised Dawn trophy, if any.
    dawn: Option<EntityHandle>,
    /// Handle of the raised Dusk trophy, if any.
    dusk: Option<EntityHandle>,
}

impl BannerState {
    const fn slot_mut(&mut self, faction: Faction) -> &mut Option<EntityHandle> {
        match faction {
            Faction::Dawn => &mut self.dawn,
            Faction::Dusk => &mut self.dusk,
        }
    }

    const fn raised(&self, faction: Faction) -> Option<EntityHandle> {
        match faction {
            Faction::Dawn => self.dawn,
            Faction::Dusk => self.dusk,
        }
    }
}

/// Encounter-side locking domain.
struct EncounterDomain {
    /// Four-way rotation event machine.
    rotation: RotationMachine,
    /// Harbinger single-spawn machine.
    harbinger: HarbingerMachine,
    /// Puzzle condition states.
    conditions: ConditionFlagStore,
    /// War-chant aura countdown.
    war_chant: TimedEvent,
    /// Raised banner trophies.
    banners: BannerState,
    /// Frontier, sanctum, and area audiences.
    audiences: MembershipRegistry<Audience>,
    /// Current world era.
    era: Era,
}

/// Festival-side locking domain.
struct FestivalDomain {
    /// Holiday leader counters.
    counters: FestivalCounters,
    /// Capital-zone audience.
    capitals: MembershipRegistry<Audience>,
}

/// Persistent, thread-safe world-event state manager.
pub struct WorldStateManager {
    /// Encounter-side state (rotation, harbinger, conditions, auras).
    encounters: Mutex<EncounterDomain>,
    /// Festival-side state (counters, capital audience).
    festival: Mutex<FestivalDomain>,
    /// Per-partition deferred-action queues.
    router: PartitionRouter,
    /// Durable record storage.
    backend: Arc<dyn RecordBackend>,
    /// Weak-handle resolution against the live world.
    directory: Arc<dyn EntityDirectory>,
    /// Holiday activation queries.
    holidays: Arc<dyn HolidayCalendar>,
    /// Scripted event calendar control.
    calendar: Arc<dyn EventCalendar>,
    /// Durations and the configured starting era.
    tuning: EventTuning,
}

impl WorldStateManager {
    /// Construct a manager with safe defaults; call
    /// [`load`](Self::load) once before the first tick.
    pub fn new(
        backend: Arc<dyn RecordBackend>,
        router: PartitionRouter,
        directory: Arc<dyn EntityDirectory>,
        holidays: Arc<dyn HolidayCalendar>,
        calendar: Arc<dyn EventCalendar>,
        tuning: EventTuning,
    ) -> Self {
        Self {
            encounters: Mutex::new(EncounterDomain {
                rotation: RotationMachine::default(),
                harbinger: HarbingerMachine::default(),
                conditions: ConditionFlagStore::new(&FERRY_CONDITION_SEEDS),
                war_chant: TimedEvent::new(),
                banners: BannerState::default(),
                audiences: MembershipRegistry::new(),
                era: tuning.initial_era,
            }),
            festival: Mutex::new(FestivalDomain {
                counters: FestivalCounters::default(),
                capitals: MembershipRegistry::new(),
            }),
            router,
            backend,
            directory,
            holidays,
            calendar,
            tuning,
        }
    }

    // =====================================================================
    // Startup
    // =====================================================================

    /// Single startup load pass: read every persisted record, reconcile
    /// timestamps against `now`, then run the startup respawn and era
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] only when the backend itself fails;
    /// malformed record *content* is self-healing (defaults + log).
    pub fn load(&self, now: DateTime<Utc>) -> Result<(), PersistError> {
        let rows = self.backend.load_all()?;
        let payload = |id: SaveId| rows.get(&id).map_or("", String::as_str);

        {
            let Some(mut enc) = self.lock_encounters() else {
                return Err(PersistError::Backend {
                    message: "encounter domain mutex poisoned".to_owned(),
                });
            };
            enc.rotation =
                RotationMachine::from_record(&RotationRecord::decode(payload(SaveId::Rotation), now));
            enc.harbinger = HarbingerMachine::from_record(&HarbingerRecord::decode(
                payload(SaveId::Harbinger),
                now,
            ));
            enc.conditions
                .apply_record(&ConditionRecord::decode(payload(SaveId::Transport)));
            enc.era = decode_era(payload(SaveId::Era)).unwrap_or(self.tuning.initial_era);

            self.startup_rotation_pass(&mut enc);
            self.startup_era_pass(&mut enc);
        }

        let Some(mut fest) = self.lock_festival() else {
            return Err(PersistError::Backend {
                message: "festival domain mutex poisoned".to_owned(),
            });
        };
        fest.counters = FestivalCounters::from_record(&FestivalRecord::decode(
            payload(SaveId::Festival),
        ));

        info!("world state loaded");
        Ok(())
    }

    /// Re-assert the rotation's current cycle at startup, beginning a
    /// fresh one first when the whole group is dead with no cooldown
    /// pending (fresh world, or a cooldown that lapsed during downtime).
    fn startup_rotation_pass(&self, enc: &mut EncounterDomain) {
        if enc.rotation.cycle_is_due() {
            let mut rng = rand::rng();
            enc.rotation.begin_cycle(&mut rng);
            self.persist_rotation(&enc.rotation);
        }
        let actions = enc.rotation.respawn_actions();
        info!(
            alive_mask = enc.rotation.alive_mask(),
            spawns = actions.len(),
            "rotation startup pass"
        );
        for (partition, action) in actions {
            self.router.dispatch(partition, action);
        }
    }

    /// Start the era's calendar event and, in the founding era, force
    /// the harbinger's first occurrence.
    fn startup_era_pass(&self, enc: &mut EncounterDomain) {
        match enc.era {
            Era::Founding => {
                self.calendar.start_event(CalendarEvent::GatheringStorm);
                // A respawn countdown in flight means the harbinger is
                // merely between occurrences, not missing.
                if enc.harbinger.respawn_remaining_ms() == 0 {
                    let mut rng = rand::rng();
                    let (changed, (partition, action)) = enc.harbinger.assert_spawn(&mut rng);
                    if changed {
                        self.persist_harbinger(&enc.harbinger);
                    }
                    info!(
                        position = enc.harbinger.position(),
                        ?partition,
                        "harbinger asserted for founding era"
                    );
                    self.router.dispatch(partition, action);
                }
            }
            Era::Riftwar => self.calendar.start_event(CalendarEvent::EchoesBelow),
            Era::Frostfall => {}
        }
    }

    // =====================================================================
    // Tick
    // =====================================================================

    /// Advance all countdowns by `delta_ms` and run expiry transitions.
    ///
    /// Called once per simulation frame, on the tick thread only. `now`
    /// is wall-clock time, used to stamp the absolute fire-times of any
    /// records persisted by an expiry.
    pub fn update(&self, delta_ms: u64, now: DateTime<Utc>) {
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };

        if enc.war_chant.update(delta_ms) {
            info!("war chant faded");
            enc.audiences
                .for_each_resolvable(Audience::Sanctum, self.directory.as_ref(), |handle| {
                    self.dispatch_to_entity(handle, PartitionAction::ClearEffect {
                        target: handle,
                        effect: EFFECT_WAR_CHANT,
                    });
                });
        }

        if enc.rotation.update(delta_ms) {
            let mut rng = rand::rng();
            enc.rotation.begin_cycle(&mut rng);
            self.persist_rotation_at(&enc.rotation, now);
            let actions = enc.rotation.respawn_actions();
            info!(order = ?enc.rotation.chosen_order(), "rotation cooldown expired, new cycle");
            for (partition, action) in actions {
                self.router.dispatch(partition, action);
            }
        }

        if enc.harbinger.update(delta_ms) {
            let mut rng = rand::rng();
            let (changed, (partition, action)) = enc.harbinger.assert_spawn(&mut rng);
            if changed {
                self.persist_harbinger_at(&enc.harbinger, now);
            }
            info!(
                position = enc.harbinger.position(),
                ?partition,
                "harbinger respawned"
            );
            self.router.dispatch(partition, action);
        }
    }

    // =====================================================================
    // Defeat notifications
    // =====================================================================

    /// Record a defeat notification from an encounter script.
    ///
    /// Safe to call from any thread; replayed notifications for an
    /// already-dead encounter are no-ops.
    pub fn handle_defeat(&self, event: DefeatEvent, now: DateTime<Utc>) {
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };
        match event {
            DefeatEvent::Roamer(kind) => {
                match enc
                    .rotation
                    .record_defeat(kind, self.tuning.rotation_cooldown_ms)
                {
                    DefeatOutcome::AlreadyDead => {
                        debug!(?kind, "duplicate roamer defeat ignored");
                    }
                    DefeatOutcome::Recorded => {
                        info!(?kind, alive_mask = enc.rotation.alive_mask(), "roamer defeated");
                        self.persist_rotation_at(&enc.rotation, now);
                    }
                    DefeatOutcome::CycleComplete => {
                        info!(
                            ?kind,
                            cooldown_ms = enc.rotation.cooldown_remaining_ms(),
                            "rotation cycle complete, cooldown armed"
                        );
                        self.persist_rotation_at(&enc.rotation, now);
                    }
                }
            }
            DefeatEvent::Harbinger => {
                let mut rng = rand::rng();
                let duration = enc.harbinger.record_defeat(
                    &mut rng,
                    self.tuning.harbinger_respawn_min_ms,
                    self.tuning.harbinger_respawn_max_ms,
                );
                info!(respawn_ms = duration, "harbinger defeated");
                self.persist_harbinger_at(&enc.harbinger, now);
            }
        }
    }

    // =====================================================================
    // Zone and area movement
    // =====================================================================

    /// Track an entity entering a zone, applying any zone-wide effect
    /// that is currently active there.
    pub fn handle_entity_enter_zone(&self, zone: ZoneId, handle: EntityHandle) {
        if config::is_capital_zone(zone) {
            let Some(mut fest) = self.lock_festival() else {
                return;
            };
            fest.capitals.enter(Audience::Capitals, handle);
        } else if config::is_frontier_zone(zone) {
            let Some(mut enc) = self.lock_encounters() else {
                return;
            };
            if let Some(faction) = self.directory.faction_of(handle) {
                if enc.banners.raised(faction).is_some() {
                    self.dispatch_to_entity(handle, PartitionAction::ApplyEffect {
                        target: handle,
                        effect: banner_effect(faction),
                    });
                }
            }
            enc.audiences.enter(Audience::Frontier, handle);
        } else if config::is_sanctum_zone(zone) {
            let Some(mut enc) = self.lock_encounters() else {
                return;
            };
            if enc.war_chant.is_armed() {
                self.dispatch_to_entity(handle, PartitionAction::ApplyEffect {
                    target: handle,
                    effect: EFFECT_WAR_CHANT,
                });
            }
            enc.audiences.enter(Audience::Sanctum, handle);
        }
    }

    /// Track an entity leaving a zone, clearing any zone-bound effect.
    pub fn handle_entity_leave_zone(&self, zone: ZoneId, handle: EntityHandle) {
        if config::is_capital_zone(zone) {
            let Some(mut fest) = self.lock_festival() else {
                return;
            };
            fest.capitals.leave(Audience::Capitals, handle);
        } else if config::is_frontier_zone(zone) {
            let Some(mut enc) = self.lock_encounters() else {
                return;
            };
            // Cleared unconditionally: cheaper than tracking whether the
            // buff was ever applied, and clearing an absent effect is a
            // no-op in the effect engine.
            if let Some(faction) = self.directory.faction_of(handle) {
                self.dispatch_to_entity(handle, PartitionAction::ClearEffect {
                    target: handle,
                    effect: banner_effect(faction),
                });
            }
            enc.audiences.leave(Audience::Frontier, handle);
        } else if config::is_sanctum_zone(zone) {
            let Some(mut enc) = self.lock_encounters() else {
                return;
            };
            self.dispatch_to_entity(handle, PartitionAction::ClearEffect {
                target: handle,
                effect: EFFECT_WAR_CHANT,
            });
            enc.audiences.leave(Audience::Sanctum, handle);
        }
    }

    /// Track an entity entering one of the scripted areas.
    pub fn handle_entity_enter_area(&self, area: AreaId, handle: EntityHandle) {
        if !config::is_tracked_area(area) {
            return;
        }
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };
        enc.audiences.enter(Audience::Area(area), handle);
    }

    /// Track an entity leaving one of the scripted areas.
    pub fn handle_entity_leave_area(&self, area: AreaId, handle: EntityHandle) {
        if !config::is_tracked_area(area) {
            return;
        }
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };
        enc.audiences.leave(Audience::Area(area), handle);
    }

    /// Invoke `f` once per currently-resolvable member of a tracked
    /// area, under the encounter domain's lock.
    ///
    /// `f` must not call back into this manager's encounter-side
    /// operations.
    pub fn execute_on_area_members<F>(&self, area: AreaId, f: F)
    where
        F: FnMut(EntityHandle),
    {
        let Some(enc) = self.lock_encounters() else {
            return;
        };
        enc.audiences
            .for_each_resolvable(Audience::Area(area), self.directory.as_ref(), f);
    }

    // =====================================================================
    // Puzzle conditions
    // =====================================================================

    /// Overwrite a puzzle condition's state code and persist the family.
    pub fn set_condition_state(&self, id: ConditionId, state: u32) -> Result<(), WorldError> {
        let Some(mut enc) = self.lock_encounters() else {
            return Err(WorldError::DomainPoisoned);
        };
        enc.conditions.set_state(id, state)?;
        self.persist(SaveId::Transport, enc.conditions.to_record().encode());
        Ok(())
    }

    /// Whether a puzzle condition currently equals the expected code.
    pub fn is_condition_fulfilled(&self, id: ConditionId, expected: u32) -> Result<bool, WorldError> {
        let Some(enc) = self.lock_encounters() else {
            return Err(WorldError::DomainPoisoned);
        };
        enc.conditions.is_fulfilled(id, expected)
    }

    // =====================================================================
    // Banner trophies and war chant
    // =====================================================================

    /// Raise a faction's banner trophy, buffing that faction's current
    /// frontier audience.
    pub fn raise_banner(&self, faction: Faction, trophy: EntityHandle) {
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };
        *enc.banners.slot_mut(faction) = Some(trophy);
        info!(?faction, "banner raised");
        let effect = banner_effect(faction);
        let directory = self.directory.as_ref();
        enc.audiences
            .for_each_resolvable(Audience::Frontier, directory, |handle| {
                if directory.faction_of(handle) == Some(faction) {
                    self.dispatch_to_entity(handle, PartitionAction::ApplyEffect {
                        target: handle,
                        effect,
                    });
                }
            });
    }

    /// Lower whichever banner trophy `trophy` is, dispelling its buff
    /// from the owning faction's frontier audience. Unknown trophies are
    /// ignored.
    pub fn lower_banner(&self, trophy: EntityHandle) {
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };
        for faction in [Faction::Dawn, Faction::Dusk] {
            if enc.banners.raised(faction) != Some(trophy) {
                continue;
            }
            *enc.banners.slot_mut(faction) = None;
            info!(?faction, "banner lowered");
            let effect = banner_effect(faction);
            let directory = self.directory.as_ref();
            enc.audiences
                .for_each_resolvable(Audience::Frontier, directory, |handle| {
                    if directory.faction_of(handle) == Some(faction) {
                        self.dispatch_to_entity(handle, PartitionAction::ClearEffect {
                            target: handle,
                            effect,
                        });
                    }
                });
        }
    }

    /// Arm the war-chant aura and buff the current sanctum audience.
    pub fn trigger_war_chant(&self) {
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };
        enc.war_chant.arm(self.tuning.war_chant_duration_ms);
        info!(duration_ms = self.tuning.war_chant_duration_ms, "war chant raised");
        enc.audiences
            .for_each_resolvable(Audience::Sanctum, self.directory.as_ref(), |handle| {
                self.dispatch_to_entity(handle, PartitionAction::ApplyEffect {
                    target: handle,
                    effect: EFFECT_WAR_CHANT,
                });
            });
    }

    // =====================================================================
    // Festival counters
    // =====================================================================

    /// Bump a festival leader's counter, persist, and broadcast the new
    /// value and its faction total to the capital audience.
    pub fn increment_festival_counter(&self, leader: FestivalLeader) {
        let Some(mut fest) = self.lock_festival() else {
            return;
        };
        let value = fest.counters.increment(leader);
        self.persist(SaveId::Festival, fest.counters.to_record().encode());
        info!(?leader, value, "festival counter incremented");

        let pairs = fest.counters.broadcast_pairs(leader);
        fest.capitals
            .for_each_resolvable(Audience::Capitals, self.directory.as_ref(), |handle| {
                for (state, value) in pairs {
                    self.dispatch_to_entity(handle, PartitionAction::PushWorldState {
                        target: handle,
                        state,
                        value,
                    });
                }
            });
    }

    /// Batched initial world-state fill for a client joining `zone`.
    ///
    /// Empty unless the festival holiday is active and the zone is a
    /// capital.
    pub fn fill_initial_world_states(&self, zone: ZoneId) -> Vec<(WorldStateId, u32)> {
        if !self.holidays.is_festival_active() || !config::is_capital_zone(zone) {
            return Vec::new();
        }
        let Some(fest) = self.lock_festival() else {
            return Vec::new();
        };
        fest.counters.initial_fill()
    }

    // =====================================================================
    // Era
    // =====================================================================

    /// Set the world era, persist it, and re-assert the matching
    /// calendar events.
    pub fn set_era(&self, era: Era) {
        let Some(mut enc) = self.lock_encounters() else {
            return;
        };
        enc.era = era;
        self.persist(SaveId::Era, encode_era(era));
        info!(?era, "era changed");

        if era == Era::Founding {
            self.calendar.start_event(CalendarEvent::GatheringStorm);
        } else {
            self.calendar.stop_event(CalendarEvent::GatheringStorm);
        }
        if era == Era::Riftwar {
            self.calendar.start_event(CalendarEvent::EchoesBelow);
        } else {
            self.calendar.stop_event(CalendarEvent::EchoesBelow);
        }
    }

    /// Current world era.
    pub fn era(&self) -> Era {
        self.lock_encounters()
            .map_or(self.tuning.initial_era, |enc| enc.era)
    }

    // =====================================================================
    // Inspection
    // =====================================================================

    /// Snapshot of the rotation machine's durable state.
    pub fn rotation_record(&self) -> RotationRecord {
        self.lock_encounters()
            .map_or_else(RotationRecord::defaults, |enc| enc.rotation.to_record())
    }

    /// Snapshot of the harbinger machine's durable state.
    pub fn harbinger_record(&self) -> HarbingerRecord {
        self.lock_encounters()
            .map_or_else(HarbingerRecord::defaults, |enc| enc.harbinger.to_record())
    }

    /// Current counter of one festival leader.
    pub fn festival_counter(&self, leader: FestivalLeader) -> u32 {
        self.lock_festival()
            .map_or(0, |fest| fest.counters.counter(leader))
    }

    /// Current aggregate total of one faction's festival counters.
    pub fn festival_faction_total(&self, faction: Faction) -> u32 {
        self.lock_festival()
            .map_or(0, |fest| fest.counters.faction_total(faction))
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Acquire the encounter domain, logging instead of panicking if a
    /// prior holder panicked.
    fn lock_encounters(&self) -> Option<MutexGuard<'_, EncounterDomain>> {
        match self.encounters.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("encounter domain mutex poisoned, operation skipped");
                None
            }
        }
    }

    /// Acquire the festival domain, logging instead of panicking if a
    /// prior holder panicked.
    fn lock_festival(&self) -> Option<MutexGuard<'_, FestivalDomain>> {
        match self.festival.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("festival domain mutex poisoned, operation skipped");
                None
            }
        }
    }

    /// Enqueue an action onto the partition currently hosting `handle`,
    /// silently skipping handles that no longer resolve.
    fn dispatch_to_entity(&self, handle: EntityHandle, action: PartitionAction) {
        if let Some(partition) = self.directory.partition_of(handle) {
            self.router.dispatch(partition, action);
        }
    }

    /// Persist the rotation record stamped against the current wall
    /// clock (startup path).
    fn persist_rotation(&self, rotation: &RotationMachine) {
        self.persist_rotation_at(rotation, Utc::now());
    }

    /// Persist the rotation record stamped against `now`.
    fn persist_rotation_at(&self, rotation: &RotationMachine, now: DateTime<Utc>) {
        self.persist(SaveId::Rotation, rotation.to_record().encode(now));
    }

    /// Persist the harbinger record stamped against the current wall
    /// clock (startup path).
    fn persist_harbinger(&self, harbinger: &HarbingerMachine) {
        self.persist_harbinger_at(harbinger, Utc::now());
    }

    /// Persist the harbinger record stamped against `now`.
    fn persist_harbinger_at(&self, harbinger: &HarbingerMachine, now: DateTime<Utc>) {
        self.persist(SaveId::Harbinger, harbinger.to_record().encode(now));
    }

    /// Fire-and-forget persistence: failures are logged, never
    /// propagated, and never roll back in-memory state.
    fn persist(&self, id: SaveId, payload: String) {
        if let Err(err) = self.backend.replace(id, &payload) {
            warn!(save_id = ?id, %err, "persist failed, continuing with in-memory state");
        }
    }
}
