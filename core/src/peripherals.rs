use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::display::frame::PixelGrid;
use crate::error::MalformedUpdate;
use crate::io::keypad::KeyFlags;

/// One inbound state update from the emulator core.
#[derive(Debug, Clone, PartialEq)]
pub struct PeripheralUpdate {
    /// The packed screen, `None` if the screen did not change with this update.
    pub screen: Option<Vec<u8>>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub keys: KeyFlags,
    pub sound: bool,
}

/// A copy of the shared display state as of a single read.
#[derive(Debug, Clone)]
pub struct DisplaySnapshot {
    pub grid: Arc<PixelGrid>,
    pub keys: KeyFlags,
    pub sound: bool,
    /// Amount of screens received so far, bumps every time `grid` is replaced.
    pub generation: u64,
}

/// Holds the most recent display state, written by the ingest thread and read by the render
/// thread.
///
/// There is no queue, every write replaces what was there before.
/// The lock is only held for the swap or copy itself, decoding happens before it is taken.
#[derive(Debug)]
pub struct PeripheralStateStore {
    state: Mutex<DisplaySnapshot>,
}

impl PeripheralStateStore {
    pub fn new(initial: PixelGrid) -> Self {
        PeripheralStateStore {
            state: Mutex::new(DisplaySnapshot {
                grid: Arc::new(initial),
                keys: KeyFlags::empty(),
                sound: false,
                generation: 0,
            }),
        }
    }

    /// Applies `update`.
    ///
    /// Keys and sound are always replaced, the grid only if the update carries a screen.
    /// An update with a malformed screen is rejected as a whole and leaves the state untouched.
    pub fn write(&self, update: PeripheralUpdate) -> Result<(), MalformedUpdate> {
        let grid = match update.screen {
            Some(packed) => Some(Arc::new(PixelGrid::decode(&packed, update.screen_width, update.screen_height)?)),
            None => None,
        };

        let mut state = self.lock();
        state.keys = update.keys;
        state.sound = update.sound;
        if let Some(grid) = grid {
            state.grid = grid;
            state.generation += 1;
        }

        Ok(())
    }

    pub fn read_snapshot(&self) -> DisplaySnapshot {
        self.lock().clone()
    }

    /// Every write replaces whole fields, a panic while holding the lock can't leave the state
    /// half written.
    fn lock(&self) -> MutexGuard<'_, DisplaySnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
