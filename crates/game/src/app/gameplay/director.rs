#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum DirectorError {
    #[error("enemy {id:?} registered without threat points")]
    MissingPoints { id: EntityId },
    #[error("enemy {id:?} registered with invalid threat points {points}")]
    InvalidPoints { id: EntityId, points: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DirectorSlot {
    offset: Vec2,
    position: Vec2,
    occupant: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DirectorCandidate {
    id: EntityId,
    points: i32,
    slot: Option<usize>,
}

/// Hands out ring slots around the player so that the threat points of
/// engaged enemies never exceed `max_points`.
///
/// Candidates keep registration order; each tick the unassigned ones are
/// served greedily, each taking the free slot nearest to it.
#[derive(Debug, Clone)]
struct EnemyDirector {
    slots: Vec<DirectorSlot>,
    candidates: Vec<DirectorCandidate>,
    max_points: i32,
}

impl EnemyDirector {
    fn new(max_points: i32) -> Self {
        Self::with_offsets(
            max_points,
            ring_offsets(SLOT_COUNT, SLOT_RADIUS_X, SLOT_RADIUS_Y),
        )
    }

    fn with_offsets(max_points: i32, offsets: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            slots: offsets
                .into_iter()
                .map(|offset| DirectorSlot {
                    offset,
                    position: offset,
                    occupant: None,
                })
                .collect(),
            candidates: Vec::new(),
            max_points,
        }
    }

    /// Adds an enemy to the pool. The player sentinel is skipped and
    /// re-registering is a no-op; both return `Ok(false)`.
    fn register(&mut self, id: EntityId, points: Option<i32>) -> Result<bool, DirectorError> {
        let points = points.ok_or(DirectorError::MissingPoints { id })?;
        if points == PLAYER_THREAT_POINTS {
            return Ok(false);
        }
        if points < 0 {
            return Err(DirectorError::InvalidPoints { id, points });
        }
        if self.is_registered(id) {
            return Ok(false);
        }
        self.candidates.push(DirectorCandidate {
            id,
            points,
            slot: None,
        });
        debug!(entity = id.0, points, "director_registered");
        Ok(true)
    }

    /// Frees the enemy's slot and drops it from the pool. Safe to repeat.
    fn unregister(&mut self, id: EntityId) -> bool {
        for slot in &mut self.slots {
            if slot.occupant == Some(id) {
                slot.occupant = None;
            }
        }
        let before = self.candidates.len();
        self.candidates.retain(|candidate| candidate.id != id);
        let removed = self.candidates.len() != before;
        if removed {
            debug!(entity = id.0, "director_unregistered");
        }
        removed
    }

    fn is_registered(&self, id: EntityId) -> bool {
        self.candidates.iter().any(|candidate| candidate.id == id)
    }

    fn update(
        &mut self,
        player: Vec2,
        mut position_of: impl FnMut(EntityId) -> Option<Vec2>,
        mut is_dead: impl FnMut(EntityId) -> bool,
    ) {
        for slot in &mut self.slots {
            slot.position = player + slot.offset;
        }

        let fallen: Vec<EntityId> = self
            .slots
            .iter()
            .filter_map(|slot| slot.occupant)
            .filter(|occupant| is_dead(*occupant))
            .collect();
        for id in fallen {
            self.unregister(id);
        }

        let mut current = self.current_points();
        if current >= self.max_points {
            return;
        }

        for index in 0..self.candidates.len() {
            let candidate = self.candidates[index];
            if candidate.slot.is_some() || current + candidate.points > self.max_points {
                continue;
            }
            if is_dead(candidate.id) {
                continue;
            }
            let Some(position) = position_of(candidate.id) else {
                continue;
            };
            let Some(slot_index) = self.nearest_free_slot(position) else {
                break;
            };
            self.slots[slot_index].occupant = Some(candidate.id);
            self.candidates[index].slot = Some(slot_index);
            current += candidate.points;
            debug!(
                entity = candidate.id.0,
                slot = slot_index,
                current_points = current,
                max_points = self.max_points,
                "director_slot_assigned"
            );
        }
    }

    fn nearest_free_slot(&self, from: Vec2) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.occupant.is_none())
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(from)
                    .total_cmp(&b.position.distance_squared(from))
            })
            .map(|(index, _)| index)
    }

    fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.candidates
            .iter()
            .find(|candidate| candidate.id == id)
            .and_then(|candidate| candidate.slot)
    }

    /// Absolute position of the enemy's slot, as of the last update.
    fn target_of(&self, id: EntityId) -> Option<Vec2> {
        self.slot_of(id).map(|index| self.slots[index].position)
    }

    fn current_points(&self) -> i32 {
        self.candidates
            .iter()
            .filter(|candidate| candidate.slot.is_some())
            .map(|candidate| candidate.points)
            .sum()
    }

    fn max_points(&self) -> i32 {
        self.max_points
    }

    fn slots(&self) -> &[DirectorSlot] {
        &self.slots
    }
}

/// Evenly spaced offsets on an ellipse, wider than tall.
fn ring_offsets(count: usize, radius_x: f64, radius_y: f64) -> Vec<Vec2> {
    (0..count)
        .map(|index| {
            let angle = TAU * index as f64 / count as f64;
            Vec2::new(angle.cos() * radius_x, angle.sin() * radius_y)
        })
        .collect()
}
