//! Local mirror of server-reported players and avatars

use std::collections::HashMap;

use crate::ws::protocol::{Avatar, Player};

/// Keyed tables of players (by id) and avatar templates (by name).
///
/// The tables are only mutated through the delta operations below, each
/// applied fully before returning. Nothing here is authoritative: any later
/// snapshot or delta from the server overrides it.
#[derive(Debug, Default)]
pub struct EntityStore {
    players: HashMap<String, Player>,
    avatars: HashMap<String, Avatar>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both tables with the join snapshot
    pub fn apply_snapshot(
        &mut self,
        players: HashMap<String, Player>,
        avatars: HashMap<String, Avatar>,
    ) {
        self.players = players;
        self.avatars = avatars;
    }

    pub fn upsert_player(&mut self, player: Player) {
        self.players.insert(player.id.clone(), player);
    }

    /// Insert or replace an avatar by name, returning the one it replaced
    pub fn upsert_avatar(&mut self, avatar: Avatar) -> Option<Avatar> {
        self.avatars.insert(avatar.name.clone(), avatar)
    }

    /// Overwrite each listed player with its new record; unlisted ids are kept.
    /// Arrival order is trusted, there is no version check.
    pub fn merge_players(&mut self, partial: HashMap<String, Player>) {
        self.players.extend(partial);
    }

    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        self.players.remove(id)
    }

    pub fn count(&self) -> usize {
        self.players.len()
    }

    pub fn avatar_count(&self) -> usize {
        self.avatars.len()
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn avatar(&self, name: &str) -> Option<&Avatar> {
        self.avatars.get(name)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    #[cfg(test)]
    pub(crate) fn player_table(&self) -> &HashMap<String, Player> {
        &self.players
    }

    #[cfg(test)]
    pub(crate) fn avatar_table(&self) -> &HashMap<String, Avatar> {
        &self.avatars
    }
}
