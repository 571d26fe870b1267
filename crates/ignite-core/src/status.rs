//! Text shown on the status label, counter label and toast.

use crate::counter::CounterReading;

#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
    Idle,
    Loading {
        url: String,
        attempt: usize,
        total: usize,
    },
    Loaded {
        url: String,
    },
    Failed {
        tried: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub message: String,
    pub expires_at_ms: f64,
}

#[derive(Clone, Debug)]
pub struct StatusBoard {
    load: LoadStatus,
    warnings: Vec<String>,
    counter: Option<CounterReading>,
    toast: Option<Toast>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            load: LoadStatus::Idle,
            warnings: Vec::new(),
            counter: None,
            toast: None,
        }
    }
}

impl StatusBoard {
    pub fn load(&self) -> &LoadStatus {
        &self.load
    }

    pub fn set_load(&mut self, load: LoadStatus) {
        self.load = load;
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn set_counter(&mut self, reading: CounterReading) {
        self.counter = Some(reading);
    }

    pub fn counter(&self) -> Option<CounterReading> {
        self.counter
    }

    pub fn show_toast(&mut self, message: impl Into<String>, now_ms: f64, duration_ms: f64) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at_ms: now_ms + duration_ms,
        });
    }

    /// The toast message if it has not yet expired at `now_ms`.
    pub fn active_toast(&self, now_ms: f64) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| now_ms < t.expires_at_ms)
            .map(|t| t.message.as_str())
    }

    /// Drop an expired toast. Returns true when one was removed.
    pub fn expire_toast(&mut self, now_ms: f64) -> bool {
        match &self.toast {
            Some(t) if now_ms >= t.expires_at_ms => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }

    /// Status label text: load state followed by any warnings.
    pub fn status_text(&self) -> String {
        let mut text = match &self.load {
            LoadStatus::Idle => String::from("Ready"),
            LoadStatus::Loading {
                url,
                attempt,
                total,
            } => format!("Loading {} ({}/{})…", url, attempt + 1, total),
            LoadStatus::Loaded { url } => format!("Loaded {}", url),
            LoadStatus::Failed { .. } => String::from("Could not load model"),
        };
        for w in &self.warnings {
            text.push_str(" · ");
            text.push_str(w);
        }
        text
    }

    pub fn counter_text(&self) -> String {
        match &self.counter {
            Some(reading) => reading.label(),
            None => String::from("…"),
        }
    }
}
