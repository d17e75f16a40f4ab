use std::fmt;
use std::str::FromStr;

/// Application to start once the installation has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    Desktop, // Start_Desktop launcher
    Web,     // Start_Web launcher
}

impl LaunchTarget {
    /// File stem of the launcher this target runs.
    pub fn script_name(self) -> &'static str {
        match self {
            LaunchTarget::Desktop => "Start_Desktop",
            LaunchTarget::Web => "Start_Web",
        }
    }
}

impl FromStr for LaunchTarget {
    type Err = String;

    /// Parses a launch target (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "desktop" => Ok(LaunchTarget::Desktop),
            "web" => Ok(LaunchTarget::Web),
            _ => Err(format!("Invalid launch target '{s}'. Must be one of: desktop, web")),
        }
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LaunchTarget::Desktop => write!(f, "desktop"),
            LaunchTarget::Web => write!(f, "web"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_targets() {
        assert_eq!("WEB".parse::<LaunchTarget>(), Ok(LaunchTarget::Web));
        assert_eq!("desktop".parse::<LaunchTarget>(), Ok(LaunchTarget::Desktop));
        assert!("both".parse::<LaunchTarget>().is_err());
    }
}
