use crate::catalog::{Catalog, MoveData, SpeciesTemplate};
use crate::errors::{InvariantViolation, ValidationError};
use log::debug;
use schema::PokemonType;
use std::fmt;
use std::sync::Arc;

/// Maximum number of move slots on a combatant.
pub const MAX_MOVES: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct MoveInstance {
    pub move_: Arc<MoveData>,
    pub pp: u16,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(move_: Arc<MoveData>) -> Self {
        let pp = move_.max_pp;
        MoveInstance { move_, pp }
    }

    pub fn max_pp(&self) -> u16 {
        self.move_.max_pp
    }

    pub fn is_usable(&self) -> bool {
        self.pp > 0
    }

    /// Use the move (decrease PP). Returns false if no PP was left.
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    pub fn restore_pp(&mut self) {
        self.pp = self.max_pp();
    }
}

/// A battle-ready monster: a species template plus live HP and move slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    species: Arc<SpeciesTemplate>,
    current_hp: u32,
    moves: [Option<MoveInstance>; MAX_MOVES],
}

impl Combatant {
    /// Create a combatant at full HP with the given moves in slot order.
    pub fn new(species: Arc<SpeciesTemplate>, moves: Vec<Arc<MoveData>>) -> Result<Self, ValidationError> {
        if moves.len() > MAX_MOVES {
            return Err(ValidationError::TooManyMoves(moves.len()));
        }

        let mut move_array = [const { None }; MAX_MOVES];
        for (i, move_) in moves.into_iter().enumerate() {
            move_array[i] = Some(MoveInstance::new(move_));
        }

        Ok(Combatant {
            current_hp: species.base_stats.hp,
            species,
            moves: move_array,
        })
    }

    /// Roster assembly: resolve up to four moves by name or catalog number.
    ///
    /// Assigning no moves at all hands out the catalog's fallback move so the
    /// combatant always has something to use.
    pub fn assemble<S: AsRef<str>>(
        catalog: &Catalog,
        species: &Arc<SpeciesTemplate>,
        move_queries: &[S],
    ) -> Result<Self, ValidationError> {
        if move_queries.len() > MAX_MOVES {
            return Err(ValidationError::TooManyMoves(move_queries.len()));
        }

        let mut moves = Vec::with_capacity(MAX_MOVES);
        for query in move_queries {
            let move_ = catalog.find_move(query.as_ref())?;
            if !species.can_learn(&move_.name) {
                return Err(ValidationError::NotLearnable {
                    species: species.name.clone(),
                    move_name: move_.name.clone(),
                });
            }
            moves.push(Arc::clone(move_));
        }

        if moves.is_empty() {
            debug!(
                "No moves chosen for {}; assigning {}",
                species.name,
                catalog.fallback_move().name
            );
            moves.push(Arc::clone(catalog.fallback_move()));
        }

        Self::new(Arc::clone(species), moves)
    }

    pub fn species(&self) -> &Arc<SpeciesTemplate> {
        &self.species
    }

    pub fn name(&self) -> &str {
        &self.species.name
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.species.base_stats.hp
    }

    pub fn attack(&self) -> u32 {
        self.species.base_stats.attack
    }

    pub fn defense(&self) -> u32 {
        self.species.base_stats.defense
    }

    pub fn speed(&self) -> u32 {
        self.species.base_stats.speed
    }

    pub fn primary_type(&self) -> PokemonType {
        self.species.primary_type
    }

    pub fn secondary_type(&self) -> Option<PokemonType> {
        self.species.secondary_type
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.species.has_type(pokemon_type)
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn moves(&self) -> &[Option<MoveInstance>; MAX_MOVES] {
        &self.moves
    }

    /// Slot numbers (1-based) that can currently be selected.
    pub fn usable_slots(&self) -> Vec<usize> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.as_ref().is_some_and(MoveInstance::is_usable))
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves
            .iter()
            .flatten()
            .any(MoveInstance::is_usable)
    }

    /// Validate a 1-based slot selection and return the move in it.
    pub fn select_move(&self, slot: usize) -> Result<&Arc<MoveData>, ValidationError> {
        if self.is_fainted() {
            return Err(ValidationError::Fainted(self.name().to_string()));
        }
        let instance = self.slot(slot)?;
        if !instance.is_usable() {
            return Err(ValidationError::NoPpRemaining(slot));
        }
        Ok(&instance.move_)
    }

    /// Spend one PP from a 1-based slot; returns the PP left.
    pub fn apply_use(&mut self, slot: usize) -> Result<u16, ValidationError> {
        self.slot(slot)?;
        let instance = self.moves[slot - 1]
            .as_mut()
            .ok_or(ValidationError::EmptySlot(slot))?;
        if !instance.use_move() {
            return Err(ValidationError::NoPpRemaining(slot));
        }
        Ok(instance.pp)
    }

    /// Subtract damage, clamping at zero. A fainted combatant takes nothing.
    /// Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        if self.is_fainted() {
            return 0;
        }
        let applied = amount.min(self.current_hp);
        self.current_hp -= applied;
        applied
    }

    /// Full heal and PP refill.
    pub fn restore(&mut self) {
        self.current_hp = self.max_hp();
        for instance in self.moves.iter_mut().flatten() {
            instance.restore_pp();
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.current_hp > self.max_hp() {
            return Err(InvariantViolation::HpOutOfRange {
                name: self.name().to_string(),
                hp: self.current_hp,
                max_hp: self.max_hp(),
            });
        }
        for (i, instance) in self.moves.iter().enumerate() {
            if let Some(instance) = instance {
                if instance.pp > instance.max_pp() {
                    return Err(InvariantViolation::PpOutOfRange {
                        name: self.name().to_string(),
                        slot: i + 1,
                        pp: instance.pp,
                        max_pp: instance.max_pp(),
                    });
                }
            }
        }
        Ok(())
    }

    fn slot(&self, slot: usize) -> Result<&MoveInstance, ValidationError> {
        if !(1..=MAX_MOVES).contains(&slot) {
            return Err(ValidationError::SlotOutOfRange(slot));
        }
        self.moves[slot - 1]
            .as_ref()
            .ok_or(ValidationError::EmptySlot(slot))
    }

    #[cfg(test)]
    pub(crate) fn set_current_hp(&mut self, hp: u32) {
        self.current_hp = hp;
    }

    #[cfg(test)]
    pub(crate) fn set_pp(&mut self, slot: usize, pp: u16) {
        if let Some(instance) = self.moves[slot - 1].as_mut() {
            instance.pp = pp;
        }
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HP {}/{})", self.name(), self.current_hp, self.max_hp())
    }
}
