// Shared in-memory tick store

use std::collections::BTreeMap;
use tidepool_tick::{TickInfo, TickStorage};
use tidepool_math::U256;

#[derive(Default)]
pub struct MemoryTicks {
    pub ticks: BTreeMap<i32, TickInfo>,
    pub words: BTreeMap<i16, U256>,
}

impl TickStorage for MemoryTicks {
    fn read_tick(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).copied().unwrap_or_default()
    }

    fn write_tick(&mut self, tick: i32, info: &TickInfo) {
        self.ticks.insert(tick, *info);
    }

    fn remove_tick(&mut self, tick: i32) {
        self.ticks.remove(&tick);
    }

    fn read_tick_word(&self, word_pos: i16) -> U256 {
        self.words.get(&word_pos).copied().unwrap_or(U256::ZERO)
    }

    fn write_tick_word(&mut self, word_pos: i16, word: U256) {
        self.words.insert(word_pos, word);
    }
}
