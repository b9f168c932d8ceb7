use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

pub struct StepSpinner {
    bar: Option<ProgressBar>,
    start: Instant,
    step: u8,
    total_steps: u8,
    step_start: Instant,
}

impl StepSpinner {
    pub fn new(total_steps: u8) -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            start: now,
            step: 0,
            total_steps,
            step_start: now,
        }
    }

    fn advance(&mut self) -> String {
        self.clear();
        self.step += 1;
        self.step_start = Instant::now();
        format!("[{}/{}]", self.step, self.total_steps)
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    pub fn step(&mut self, description: &str) {
        let prefix = self.advance();
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("invalid template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!("{prefix} {description}..."));
        self.bar = Some(bar);
    }

    /// Starts a step with a counted bar of `len` items.
    pub fn counted_step(&mut self, description: &str, len: u64) -> ProgressBar {
        let prefix = self.advance();
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.cyan} {msg} [{bar:24.cyan/blue}] {pos}/{len} ({eta})")
                .expect("invalid template")
                .progress_chars("━╸ "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message(format!("{prefix} {description}"));
        self.bar = Some(bar.clone());
        bar
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[String]) {
        self.clear();

        let elapsed = self.step_start.elapsed();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>6.1}s",
            description,
            elapsed.as_secs_f64()
        );
        for substep in substeps {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {substep}");
        }
    }

    pub fn finish(mut self) {
        self.clear();
        print_footer(self.start.elapsed());
    }
}

fn print_footer(elapsed: Duration) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
    );
    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m Run complete {:>37}",
        format!("Total: {:.2}s", elapsed.as_secs_f64())
    );
    let _ = writeln!(stderr);
}

pub enum Progress {
    Interactive(StepSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(StepSpinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.step(description);
        }
    }

    /// A counted bar for the step, or a hidden one when silent.
    pub fn counted_step(&mut self, description: &str, len: u64) -> ProgressBar {
        match self {
            Self::Interactive(s) => s.counted_step(description, len),
            Self::Silent => ProgressBar::hidden(),
        }
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[String]) {
        if let Self::Interactive(s) = self {
            s.complete_step(description, substeps);
        }
    }

    pub fn finish(self) {
        if let Self::Interactive(s) = self {
            s.finish();
        }
    }
}
