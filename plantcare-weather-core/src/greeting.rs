use chrono::{Local, Timelike};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Greeting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Greeting::Morning => "Good Morning",
            Greeting::Afternoon => "Good Afternoon",
            Greeting::Evening => "Good Evening",
            Greeting::Night => "Good Night",
        }
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Greeting for an hour of the day. Ranges are `[5,12)`, `[12,18)`, `[18,22)`;
/// anything else, including out-of-range hours, is night.
pub fn greeting_for_hour(hour: u32) -> Greeting {
    match hour {
        5..=11 => Greeting::Morning,
        12..=17 => Greeting::Afternoon,
        18..=21 => Greeting::Evening,
        _ => Greeting::Night,
    }
}

/// Greeting for the current local hour.
pub fn greeting_now() -> Greeting {
    greeting_for_hour(Local::now().hour())
}
