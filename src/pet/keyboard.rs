//! PET keyboard matrix and the PIA1 port wiring that scans it.
//!
//! The keyboard is a 10-row matrix read through PIA1: port 0 selects a row
//! in its low nibble, port 2 returns that row with pressed keys pulled low.
//!
//! Key events come from the host input thread over a bounded channel. The
//! instruction-loop thread owns the matrix; it drains at most one event per
//! IRQ poll and never blocks. Producers use `try_send` and get a full buffer
//! reported back instead of blocking.

use crate::devices::PortHandler;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError, TrySendError};

/// Number of rows in the scan matrix.
pub const ROWS: usize = 10;

/// Pending key events the handoff buffer holds.
pub const KEY_BUFFER: usize = 1;

/// Row 8, bit 0.
pub const LEFT_SHIFT: Key = Key { row: 8, bit: 0 };

/// Position of a key in the scan matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub row: u8,
    pub bit: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

/// A key transition delivered to the emulated keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
    /// Hold left shift with the key (released with it on `Up`)
    pub shift: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Down,
            shift: false,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Up,
            shift: false,
        }
    }
}

/// Maps a character to its key on the PET graphics keyboard.
///
/// Letters are matched case-insensitively. `\r` is RETURN, ESC is STOP,
/// backspace (0x08) is DEL.
pub fn key_for(c: char) -> Option<Key> {
    let (row, bit) = match c.to_ascii_lowercase() {
        '=' => (9, 7),
        '.' => (9, 6),
        '\x1b' => (9, 4),
        '<' => (9, 3),
        ' ' => (9, 2),
        '[' => (9, 1),
        '\x12' => (9, 0),

        '-' => (8, 7),
        '0' => (8, 6),
        '>' => (8, 4),
        ']' => (8, 2),
        '@' => (8, 1),

        '+' => (7, 7),
        '2' => (7, 6),
        '?' => (7, 4),
        ',' => (7, 3),
        'n' => (7, 2),
        'v' => (7, 1),
        'x' => (7, 0),

        '3' => (6, 7),
        '1' => (6, 6),
        '\r' => (6, 5),
        ';' => (6, 4),
        'm' => (6, 3),
        'b' => (6, 2),
        'c' => (6, 1),
        'z' => (6, 0),

        '*' => (5, 7),
        '5' => (5, 6),
        ':' => (5, 4),
        'k' => (5, 3),
        'h' => (5, 2),
        'f' => (5, 1),
        's' => (5, 0),

        '6' => (4, 7),
        '4' => (4, 6),
        'l' => (4, 4),
        'j' => (4, 3),
        'g' => (4, 2),
        'd' => (4, 1),
        'a' => (4, 0),

        '/' => (3, 7),
        '8' => (3, 6),
        'p' => (3, 4),
        'i' => (3, 3),
        'y' => (3, 2),
        'r' => (3, 1),
        'w' => (3, 0),

        '9' => (2, 7),
        '7' => (2, 6),
        '^' => (2, 5),
        'o' => (2, 4),
        'u' => (2, 3),
        't' => (2, 2),
        'e' => (2, 1),
        'q' => (2, 0),

        '\x08' => (1, 7),
        '\x11' => (1, 6),
        ')' => (1, 4),
        '\\' => (1, 3),
        '\'' => (1, 2),
        '$' => (1, 1),
        '"' => (1, 0),

        '\x1d' => (0, 7),
        '\x13' => (0, 6),
        '(' => (0, 4),
        '&' => (0, 3),
        '%' => (0, 2),
        '#' => (0, 1),
        '!' => (0, 0),

        _ => return None,
    };
    Some(Key { row, bit })
}

/// The scan matrix. Rows idle at 0xFF; a pressed key clears its bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetKeyboard {
    rows: [u8; ROWS],
}

impl PetKeyboard {
    pub fn new() -> Self {
        Self {
            rows: [0xFF; ROWS],
        }
    }

    /// Releases every key.
    pub fn reset(&mut self) {
        self.rows = [0xFF; ROWS];
    }

    pub fn press(&mut self, key: Key) {
        if let Some(row) = self.rows.get_mut(key.row as usize) {
            *row &= !(1 << (key.bit & 7));
        }
    }

    pub fn release(&mut self, key: Key) {
        if let Some(row) = self.rows.get_mut(key.row as usize) {
            *row |= 1 << (key.bit & 7);
        }
    }

    /// Row state; rows past the matrix read as 0xFF.
    pub fn row(&self, row: u8) -> u8 {
        self.rows.get(row as usize).copied().unwrap_or(0xFF)
    }

    /// Applies a key transition, including the shift modifier.
    pub fn apply(&mut self, event: KeyEvent) {
        match event.state {
            KeyState::Down => {
                self.press(event.key);
                if event.shift {
                    self.press(LEFT_SHIFT);
                }
            }
            KeyState::Up => {
                self.release(event.key);
                if !event.shift {
                    self.release(LEFT_SHIFT);
                }
            }
        }
    }
}

impl Default for PetKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of the key event handoff.
#[derive(Debug, Clone)]
pub struct KeySender {
    tx: SyncSender<KeyEvent>,
}

impl KeySender {
    /// Offers an event without blocking.
    ///
    /// Returns the event back if the buffer is full or the machine is gone;
    /// the caller decides whether to retry.
    pub fn send(&self, event: KeyEvent) -> Result<(), KeyEvent> {
        self.tx.try_send(event).map_err(|err| match err {
            TrySendError::Full(event) | TrySendError::Disconnected(event) => event,
        })
    }
}

/// Creates the bounded key event handoff.
pub fn key_channel() -> (KeySender, Receiver<KeyEvent>) {
    let (tx, rx) = sync_channel(KEY_BUFFER);
    (KeySender { tx }, rx)
}

/// PIA1 port behavior: keyboard scanning and the retrace interrupt.
///
/// Port 0 (`DICcKKKK`): bit 7 (diagnostic sense) always reads high, the low
/// nibble selects a keyboard row. Port 2 returns the selected row.
/// Port 3 bit 7 is the CB1 retrace flag.
pub struct KeyboardPorts {
    ports: [u8; 4],
    irq: bool,
    keyboard: PetKeyboard,
    events: Receiver<KeyEvent>,
}

impl KeyboardPorts {
    pub fn new(events: Receiver<KeyEvent>) -> Self {
        Self {
            ports: [0; 4],
            irq: false,
            keyboard: PetKeyboard::new(),
            events,
        }
    }

    pub fn keyboard(&self) -> &PetKeyboard {
        &self.keyboard
    }

    /// Drives the CB1 line from the video retrace.
    ///
    /// Rising sets port 3 bit 7 and requests an interrupt; falling clears
    /// both.
    pub fn retrace(&mut self, active: bool) {
        if active {
            self.ports[3] |= 0x80;
        } else {
            self.ports[3] &= !0x80;
        }
        self.irq = active;
    }
}

impl PortHandler for KeyboardPorts {
    fn port_read(&self, port: usize) -> u8 {
        match port {
            0 => self.ports[0] | 0x80,
            2 => self.keyboard.row(self.ports[0] & 0x0F),
            _ => self.ports[port],
        }
    }

    fn port_write(&mut self, port: usize, value: u8) {
        self.ports[port] = value;
    }

    /// Reports and clears the pending request. A key event waiting in the
    /// handoff is applied to the matrix and also raises the line.
    fn irq(&mut self) -> bool {
        let pending = std::mem::take(&mut self.irq);

        match self.events.try_recv() {
            Ok(event) => {
                self.keyboard.apply(event);
                true
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => pending,
        }
    }
}
