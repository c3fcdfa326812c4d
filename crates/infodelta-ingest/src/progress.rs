/// Logs a line count every `every` lines; `0` disables logging.
#[derive(Debug)]
pub(crate) struct Progress {
    label: &'static str,
    every: usize,
    lines: usize,
}

impl Progress {
    pub(crate) fn new(label: &'static str, every: usize) -> Self {
        Self {
            label,
            every,
            lines: 0,
        }
    }

    /// Count one line and return its 1-based number.
    pub(crate) fn tick(&mut self) -> usize {
        self.lines += 1;
        if self.every > 0 && self.lines % self.every == 0 {
            tracing::info!(pass = self.label, lines = self.lines, "progress");
        }
        self.lines
    }

    pub(crate) fn lines(&self) -> usize {
        self.lines
    }
}
