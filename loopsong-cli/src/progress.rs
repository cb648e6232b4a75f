use std::io::Write;

use loopsong_lib::playback::Report;

/// Single stderr line showing the time left, rewritten every tick.
pub struct ProgressLine {
    quiet: bool,
    open: bool,
}

impl ProgressLine {
    pub fn new(quiet: bool) -> Self {
        Self { quiet, open: false }
    }

    pub fn update(&mut self, report: Report) {
        if self.quiet {
            return;
        }

        match report {
            Report::Tick { time_left, .. } => {
                let mut stderr = std::io::stderr().lock();
                let _ = write!(stderr, "\r{}", status_text(time_left));
                let _ = stderr.flush();
                self.open = true;
            }
            // Transitions are logged on their own line.
            _ => self.finish(),
        }
    }

    /// Terminate the progress line so later output starts on a fresh line.
    pub fn finish(&mut self) {
        if self.open {
            eprintln!();
            self.open = false;
        }
    }
}

fn status_text(time_left: f64) -> String {
    format!("Time left: {:.2} ({})", time_left, format_time(time_left))
}

fn format_time(time: f64) -> String {
    // Seconds rounded up
    let seconds = time.max(0.0).ceil() as u32;
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
