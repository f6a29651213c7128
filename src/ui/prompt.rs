use std::io::{
    self,
    BufRead,
    Write,
};

use crossterm::style::Stylize;
use dirsweep::{
    Confirm,
    ScanSummary,
};

/// Only an explicit `y` counts as agreement.
pub fn is_affirmative(response: &str) -> bool {
    response.trim().eq_ignore_ascii_case("y")
}

/// Asks on the terminal before anything gets deleted.
pub struct StdinConfirm;

impl StdinConfirm {
    fn ask(&self) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(
            stdout,
            "\n{}",
            "Are you sure you want to delete these directories? (y/N): ".yellow()
        )?;
        stdout.flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        Ok(is_affirmative(&response))
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, _summary: &ScanSummary) -> bool {
        match self.ask() {
            Ok(confirmed) => confirmed,
            Err(error) => {
                log::warn!("Failed to read confirmation: {:#}", error);
                false
            }
        }
    }
}
