use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static LINE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether a console bar currently owns the last stderr line.
pub fn line_active() -> bool {
    LINE_ACTIVE.load(Ordering::Relaxed)
}

/// Progress reporting for loops over many pages.
pub trait Progress {
    fn begin(&mut self, _total: usize) {}
    fn advance(&mut self) {}
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Single-line textual bar redrawn on stderr.
pub struct ConsoleProgress {
    label: &'static str,
    total: usize,
    done: usize,
}

const BAR_WIDTH: usize = 30;

impl ConsoleProgress {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            total: 0,
            done: 0,
        }
    }

    fn render(&self) -> String {
        let filled = if self.total == 0 {
            BAR_WIDTH
        } else {
            self.done * BAR_WIDTH / self.total
        };
        format!(
            "\r{} [{}{}] {}/{}",
            self.label,
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            self.done,
            self.total
        )
    }

    fn draw(&self) {
        let mut err = io::stderr().lock();
        let _ = err.write_all(self.render().as_bytes());
        let _ = err.flush();
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        LINE_ACTIVE.store(true, Ordering::Relaxed);
        self.draw();
    }

    fn advance(&mut self) {
        self.done = (self.done + 1).min(self.total);
        self.draw();
    }

    fn finish(&mut self) {
        LINE_ACTIVE.store(false, Ordering::Relaxed);
        let _ = writeln!(io::stderr());
    }
}

/// Picks the console bar or the no-op sink.
pub fn progress_for(label: &'static str, enabled: bool) -> Box<dyn Progress> {
    if enabled {
        Box::new(ConsoleProgress::new(label))
    } else {
        Box::new(NullProgress)
    }
}
