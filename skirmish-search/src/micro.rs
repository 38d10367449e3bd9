//! Targeting and positioning helpers shared by the reference policies

use skirmish_core::{GameEnvironment, Hex, Unit};

/// Snapshot of enemy positions and their attack values.
///
/// Taken once per decision; a unit killed mid-decision keeps its entry, so a
/// follow-up query can still run away from (or rule out) its last position.
pub fn enemy_values(env: &GameEnvironment, enemies: &[Hex]) -> Vec<(Hex, f32)> {
    enemies
        .iter()
        .filter_map(|&pos| env.state.unit_at(pos).map(|u| (pos, u.combat_value())))
        .collect()
}

/// Position of the highest-value enemy within `unit`'s sensor range.
///
/// Strictly-greater comparison: on equal values the earliest entry wins.
pub fn best_value_in_range(unit: &Unit, values: &[(Hex, f32)]) -> Option<Hex> {
    let mut best: Option<(Hex, f32)> = None;
    for &(pos, value) in values {
        if unit.position.distance(pos) as f32 <= unit.sensors_energy
            && best.map_or(true, |(_, best_value)| best_value < value)
        {
            best = Some((pos, value));
        }
    }
    best.map(|(pos, _)| pos)
}

/// The candidate closest to `position`; earliest wins ties
pub fn closest(position: Hex, candidates: &[Hex]) -> Option<Hex> {
    let mut closest: Option<Hex> = None;
    let mut closest_distance = i32::MAX;
    for &candidate in candidates {
        let distance = position.distance(candidate);
        if closest.is_none() || distance < closest_distance {
            closest = Some(candidate);
            closest_distance = distance;
        }
    }
    closest
}

/// Closest reachable hex from which `unit` would have `target` at the edge
/// of its sensor range
pub fn pos_in_weapons_range(target: Hex, unit: &Unit, env: &GameEnvironment) -> Option<Hex> {
    let radius = unit.sensors_energy as i16;
    let mut found: Option<Hex> = None;
    let mut closest_distance = i32::MAX;
    for candidate in target.ring(radius) {
        let distance = unit.position.distance(candidate);
        if env.is_passable(candidate)
            && distance as f32 <= unit.avail_engines_energy
            && (found.is_none() || distance < closest_distance)
        {
            found = Some(candidate);
            closest_distance = distance;
        }
    }
    found
}

/// A reachable hex near `target`, scanning rings outward from `radius`.
///
/// Returns `target` itself when passable; gives up once the ring radius
/// reaches the unit's own distance to the target.
pub fn pos_near(target: Hex, unit: &Unit, env: &GameEnvironment, radius: i16) -> Option<Hex> {
    if env.is_passable(target) {
        return Some(target);
    }

    let mut radius = radius;
    let unit_to_target = unit.position.distance(target);
    let mut found = None;
    while i32::from(radius) < unit_to_target && found.is_none() {
        for candidate in target.ring(radius) {
            if env.is_passable(candidate)
                && unit.position.distance(candidate) as f32 <= unit.avail_engines_energy
            {
                found = Some(candidate);
                break;
            }
        }
        radius += 1;
    }
    found
}

/// A hex in weapons range of `target` if one is reachable, otherwise any
/// reachable hex near it
pub fn pos_near_pref_weapons_range(
    target: Hex,
    unit: &Unit,
    env: &GameEnvironment,
) -> Option<Hex> {
    pos_in_weapons_range(target, unit, env)
        .or_else(|| pos_near(target, unit, env, unit.sensors_energy as i16))
}

/// Stop condition for approach moves: stop as soon as the target is within
/// the acting unit's sensor range
pub fn within_sensor_range(
    hex: Hex,
    target: Hex,
    unit: Option<&Unit>,
    _env: &GameEnvironment,
) -> bool {
    match unit {
        Some(unit) => hex.distance(target) as f32 <= unit.sensors_energy,
        None => hex == target,
    }
}
