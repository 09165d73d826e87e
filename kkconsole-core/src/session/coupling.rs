//! State a running session shares with the wizard

/// Ordered log lines of the most recent session.
///
/// The epoch increments every time the buffer is cleared so that observers
/// holding an index into an older run can detect the reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBuffer {
    lines: Vec<String>,
    epoch: u64,
}

impl LogBuffer {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
        self.epoch += 1;
    }
}

/// Tracks which lines of a [`LogBuffer`] an observer has already seen
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCursor {
    epoch: u64,
    seen: usize,
}

impl LogCursor {
    pub fn new(buffer: &LogBuffer) -> Self {
        Self {
            epoch: buffer.epoch(),
            seen: buffer.len(),
        }
    }

    /// Feed lines appended since the last call to `emit`
    pub fn emit(&mut self, buffer: &LogBuffer, mut emit: impl FnMut(&str)) {
        if buffer.epoch() != self.epoch {
            self.epoch = buffer.epoch();
            self.seen = 0;
        }
        for line in buffer.lines().iter().skip(self.seen) {
            emit(line);
        }
        self.seen = buffer.len();
    }
}

/// Flags the session writes and the navigator reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCoupling {
    pub(crate) in_flight: bool,
    pub(crate) safe_to_navigate_away: bool,
    pub(crate) logs: LogBuffer,
}

impl Default for SessionCoupling {
    fn default() -> Self {
        Self {
            in_flight: false,
            safe_to_navigate_away: true,
            logs: LogBuffer::default(),
        }
    }
}

impl SessionCoupling {
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn safe_to_navigate_away(&self) -> bool {
        self.safe_to_navigate_away
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }
}
