//! Versioned text payload codecs for each persisted record family.
//!
//! Payloads are whitespace-separated integers behind a leading version
//! tag (`v1 ...`). The format is deliberately primitive: it must stay
//! stable across process restarts and remain hand-inspectable in the
//! backing store.
//!
//! Countdown timers are persisted as *absolute* UNIX timestamps (the
//! moment the timer would fire) and reconciled back into relative
//! millisecond countdowns against "now" at load time, so downtime counts
//! against the timer.

use chrono::{DateTime, Utc};
use tracing::warn;
use wardstone_types::{ConditionId, Era, RoamerKind};

/// Version tag expected at the head of every payload.
const VERSION_TAG: &str = "v1";

/// Split a payload into its data fields, validating the version tag.
///
/// Returns `None` for an empty payload (never persisted: silent
/// defaults) and for an unknown version tag (logged, defaults).
fn data_fields<'a>(payload: &'a str, record: &'static str) -> Option<Vec<&'a str>> {
    let mut parts = payload.split_whitespace();
    match parts.next() {
        None => None,
        Some(tag) if tag == VERSION_TAG => Some(parts.collect()),
        Some(other) => {
            warn!(record, version = other, "unknown record version, resetting to defaults");
            None
        }
    }
}

/// Convert a stored absolute fire-time into a relative countdown.
///
/// Zero means "no timer pending" and stays zero. A nonzero timestamp
/// always arms the countdown: a fire-time that passed while the process
/// was down clamps to 1 ms so it fires on the first tick.
fn countdown_from_epoch(epoch_secs: i64, now: DateTime<Utc>) -> u64 {
    if epoch_secs == 0 {
        return 0;
    }
    let remaining_secs = epoch_secs.saturating_sub(now.timestamp());
    if remaining_secs <= 0 {
        return 1;
    }
    u64::try_from(remaining_secs)
        .unwrap_or(0)
        .saturating_mul(1000)
}

/// Convert a relative countdown into an absolute fire-time for storage.
///
/// Zero (inactive) stays zero; otherwise the countdown is rounded up to
/// whole seconds so a reload never fires earlier than the live timer
/// would have.
fn epoch_from_countdown(remaining_ms: u64, now: DateTime<Utc>) -> i64 {
    if remaining_ms == 0 {
        return 0;
    }
    let remaining_secs = i64::try_from(remaining_ms.div_ceil(1000)).unwrap_or(i64::MAX);
    now.timestamp().saturating_add(remaining_secs)
}

// =========================================================================
// Rotation event group
// =========================================================================

/// Durable state of the four-way rotation event group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationRecord {
    /// Alive mask: bit set means that kind is alive / not yet defeated
    /// this cycle.
    pub alive_mask: u8,
    /// Remaining cooldown before the group respawns, in milliseconds.
    pub cooldown_ms: u64,
    /// Kind assigned to each of the four fixed position slots.
    pub chosen_order: [RoamerKind; 4],
}

impl RotationRecord {
    /// Defaults for a never-persisted world: all four defeated with no
    /// cooldown pending, so a fresh server immediately performs a
    /// respawn pass.
    pub const fn defaults() -> Self {
        Self {
            alive_mask: 0,
            cooldown_ms: 0,
            chosen_order: RoamerKind::ALL,
        }
    }

    /// Decode a stored payload, reconciling the cooldown against `now`.
    pub fn decode(payload: &str, now: DateTime<Utc>) -> Self {
        let Some(fields) = data_fields(payload, "rotation") else {
            return Self::defaults();
        };
        match Self::parse(&fields, now) {
            Some(record) => record,
            None => {
                warn!(payload, "malformed rotation record, resetting to defaults");
                Self::defaults()
            }
        }
    }

    /// Field-level parse; `None` on any malformed field.
    fn parse(fields: &[&str], now: DateTime<Utc>) -> Option<Self> {
        let mut iter = fields.iter();
        let alive_mask: u8 = iter.next()?.parse().ok()?;
        if alive_mask > 0xF {
            return None;
        }
        let epoch: i64 = iter.next()?.parse().ok()?;

        let mut chosen_order = RoamerKind::ALL;
        for slot in &mut chosen_order {
            let index: u8 = iter.next()?.parse().ok()?;
            *slot = RoamerKind::try_from_index(index)?;
        }
        if iter.next().is_some() {
            return None;
        }

        Some(Self {
            alive_mask,
            cooldown_ms: countdown_from_epoch(epoch, now),
            chosen_order,
        })
    }

    /// Encode for storage, converting the cooldown into an absolute
    /// fire-time.
    pub fn encode(&self, now: DateTime<Utc>) -> String {
        let epoch = epoch_from_countdown(self.cooldown_ms, now);
        let order = self.chosen_order.map(|kind| kind.index().to_string());
        format!(
            "{VERSION_TAG} {} {epoch} {}",
            self.alive_mask,
            order.join(" ")
        )
    }
}

// =========================================================================
// Harbinger single-spawn event
// =========================================================================

/// Durable state of the harbinger single-spawn event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarbingerRecord {
    /// Whether the harbinger is currently up.
    pub spawned: bool,
    /// Index into the fixed position table of the current/last spawn.
    pub position: u8,
    /// Remaining respawn countdown in milliseconds (zero when inactive).
    pub respawn_ms: u64,
}

impl HarbingerRecord {
    /// Defaults for a never-persisted world: not spawned, nothing
    /// pending. The first occurrence is forced by era gating, not by
    /// this record.
    pub const fn defaults() -> Self {
        Self {
            spawned: false,
            position: 0,
            respawn_ms: 0,
        }
    }

    /// Decode a stored payload, reconciling the countdown against `now`.
    pub fn decode(payload: &str, now: DateTime<Utc>) -> Self {
        let Some(fields) = data_fields(payload, "harbinger") else {
            return Self::defaults();
        };
        match Self::parse(&fields, now) {
            Some(record) => record,
            None => {
                warn!(payload, "malformed harbinger record, resetting to defaults");
                Self::defaults()
            }
        }
    }

    /// Field-level parse; `None` on any malformed field.
    fn parse(fields: &[&str], now: DateTime<Utc>) -> Option<Self> {
        let [spawned, position, epoch] = fields else {
            return None;
        };
        let spawned: u8 = spawned.parse().ok()?;
        if spawned > 1 {
            return None;
        }
        Some(Self {
            spawned: spawned == 1,
            position: position.parse().ok()?,
            respawn_ms: countdown_from_epoch(epoch.parse().ok()?, now),
        })
    }

    /// Encode for storage.
    pub fn encode(&self, now: DateTime<Utc>) -> String {
        let epoch = epoch_from_countdown(self.respawn_ms, now);
        format!(
            "{VERSION_TAG} {} {} {epoch}",
            u8::from(self.spawned),
            self.position
        )
    }
}

// =========================================================================
// Festival counters
// =========================================================================

/// Durable festival leader counters, one slot per leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FestivalRecord {
    /// Monotonic token counters in leader-slot order.
    pub counters: [u32; 6],
}

impl FestivalRecord {
    /// Defaults: all counters at zero.
    pub const fn defaults() -> Self {
        Self { counters: [0; 6] }
    }

    /// Decode a stored payload.
    pub fn decode(payload: &str) -> Self {
        let Some(fields) = data_fields(payload, "festival") else {
            return Self::defaults();
        };
        match Self::parse(&fields) {
            Some(record) => record,
            None => {
                warn!(payload, "malformed festival record, resetting to defaults");
                Self::defaults()
            }
        }
    }

    /// Field-level parse; `None` on any malformed field.
    fn parse(fields: &[&str]) -> Option<Self> {
        if fields.len() != 6 {
            return None;
        }
        let mut counters = [0u32; 6];
        for (slot, field) in counters.iter_mut().zip(fields) {
            *slot = field.parse().ok()?;
        }
        Some(Self { counters })
    }

    /// Encode for storage.
    pub fn encode(&self) -> String {
        let values = self.counters.map(|c| c.to_string());
        format!("{VERSION_TAG} {}", values.join(" "))
    }
}

// =========================================================================
// Puzzle condition states
// =========================================================================

/// Durable puzzle-condition states as `(id, state)` pairs.
///
/// The manager only applies pairs whose id it registered at startup;
/// stale ids from older content are skipped there, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionRecord {
    /// Stored condition states in persisted order.
    pub states: Vec<(ConditionId, u32)>,
}

impl ConditionRecord {
    /// Decode a stored payload.
    pub fn decode(payload: &str) -> Self {
        let Some(fields) = data_fields(payload, "conditions") else {
            return Self::default();
        };
        match Self::parse(&fields) {
            Some(record) => record,
            None => {
                warn!(payload, "malformed condition record, resetting to defaults");
                Self::default()
            }
        }
    }

    /// Field-level parse; `None` on any malformed field or odd count.
    fn parse(fields: &[&str]) -> Option<Self> {
        if fields.len() % 2 != 0 {
            return None;
        }
        let mut states = Vec::with_capacity(fields.len() / 2);
        let mut iter = fields.iter();
        while let (Some(id), Some(state)) = (iter.next(), iter.next()) {
            states.push((ConditionId::new(id.parse().ok()?), state.parse().ok()?));
        }
        Some(Self { states })
    }

    /// Encode for storage.
    pub fn encode(&self) -> String {
        let mut payload = String::from(VERSION_TAG);
        for (id, state) in &self.states {
            payload.push_str(&format!(" {} {state}", id.into_inner()));
        }
        payload
    }
}

// =========================================================================
// Era
// =========================================================================

/// Decode the stored era; `None` means "never persisted, use the
/// configured default".
pub fn decode_era(payload: &str) -> Option<Era> {
    let fields = data_fields(payload, "era")?;
    let [field] = fields.as_slice() else {
        warn!(payload, "malformed era record, using configured default");
        return None;
    };
    let parsed = field.parse::<u8>().ok().and_then(Era::try_from_index);
    if parsed.is_none() {
        warn!(payload, "malformed era record, using configured default");
    }
    parsed
}

/// Encode the era for storage.
pub fn encode_era(era: Era) -> String {
    format!("{VERSION_TAG} {}", era.index())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().unwrap()
    }

    #[test]
    fn empty_rotation_payload_yields_respawn_ready_defaults() {
        let record = RotationRecord::decode("", now());
        assert_eq!(record.alive_mask, 0);
        assert_eq!(record.cooldown_ms, 0);
        assert_eq!(record.chosen_order, RoamerKind::ALL);
    }

    #[test]
    fn rotation_round_trips_through_absolute_time() {
        let record = RotationRecord {
            alive_mask: 0b1010,
            cooldown_ms: 90_000,
            chosen_order: [
                RoamerKind::Sablegaze,
                RoamerKind::Veilwing,
                RoamerKind::Emberhide,
                RoamerKind::Mournfang,
            ],
        };
        let restored = RotationRecord::decode(&record.encode(now()), now());
        assert_eq!(restored.alive_mask, record.alive_mask);
        assert_eq!(restored.chosen_order, record.chosen_order);
        assert_eq!(restored.cooldown_ms, record.cooldown_ms);
    }

    #[test]
    fn overdue_timestamp_arms_a_one_millisecond_countdown() {
        // Fire-time an hour in the past: must fire on the first tick,
        // not decode to "inactive".
        let payload = format!("v1 0 {} 0 1 2 3", now().timestamp() - 3600);
        let record = RotationRecord::decode(&payload, now());
        assert_eq!(record.cooldown_ms, 1);
    }

    #[test]
    fn zero_timestamp_means_no_timer_pending() {
        let record = RotationRecord::decode("v1 15 0 0 1 2 3", now());
        assert_eq!(record.alive_mask, 0xF);
        assert_eq!(record.cooldown_ms, 0);
    }

    #[test]
    fn malformed_rotation_payload_resets_to_defaults() {
        for payload in ["v1 99 0 0 1 2 3", "v1 3 soon 0 1 2 3", "v1 3", "v2 3 0 0 1 2 3"] {
            assert_eq!(RotationRecord::decode(payload, now()), RotationRecord::defaults());
        }
    }

    #[test]
    fn harbinger_round_trips() {
        let record = HarbingerRecord {
            spawned: false,
            position: 7,
            respawn_ms: 4 * 3600 * 1000,
        };
        let restored = HarbingerRecord::decode(&record.encode(now()), now());
        assert_eq!(restored, record);
    }

    #[test]
    fn festival_defaults_and_malformed_reset() {
        assert_eq!(FestivalRecord::decode(""), FestivalRecord::defaults());
        assert_eq!(
            FestivalRecord::decode("v1 1 2 three 4 5 6"),
            FestivalRecord::defaults()
        );

        let record = FestivalRecord {
            counters: [5, 0, 12, 3, 3, 9],
        };
        assert_eq!(FestivalRecord::decode(&record.encode()), record);
    }

    #[test]
    fn condition_pairs_round_trip() {
        let record = ConditionRecord {
            states: vec![(ConditionId::new(310), 2), (ConditionId::new(311), 4)],
        };
        assert_eq!(ConditionRecord::decode(&record.encode()), record);
        // Odd field count is malformed.
        assert_eq!(ConditionRecord::decode("v1 310 2 311"), ConditionRecord::default());
    }

    #[test]
    fn era_decodes_or_defers_to_default() {
        assert_eq!(decode_era(&encode_era(Era::Riftwar)), Some(Era::Riftwar));
        assert_eq!(decode_era(""), None);
        assert_eq!(decode_era("v1 9"), None);
    }
}
