use crate::combatant::Combatant;
use crate::errors::ValidationError;
use log::info;
use std::fmt;

/// The player's roster, in capture order. Members are only ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    members: Vec<Combatant>,
    active: usize,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_starter(starter: Combatant) -> Self {
        let mut inventory = Self::new();
        inventory.push(starter);
        inventory
    }

    /// Append a combatant and return its slot.
    pub fn push(&mut self, combatant: Combatant) -> usize {
        info!("{} joined the roster", combatant.name());
        self.members.push(combatant);
        self.members.len() - 1
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Combatant] {
        &self.members
    }

    pub fn get(&self, slot: usize) -> Result<&Combatant, ValidationError> {
        self.members
            .get(slot)
            .ok_or(ValidationError::InvalidInventorySlot(slot))
    }

    /// The combatant sent into encounters.
    pub fn active(&self) -> Result<&Combatant, ValidationError> {
        self.members
            .get(self.active)
            .ok_or(ValidationError::NoActiveCombatant)
    }

    pub fn active_slot(&self) -> usize {
        self.active
    }

    pub fn set_active(&mut self, slot: usize) -> Result<(), ValidationError> {
        self.get(slot)?;
        self.active = slot;
        Ok(())
    }

    pub fn last(&self) -> Option<&Combatant> {
        self.members.last()
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, member) in self.members.iter().enumerate() {
            let marker = if slot == self.active { "*" } else { " " };
            writeln!(f, "{}{}. {}", marker, slot + 1, member)?;
        }
        Ok(())
    }
}
