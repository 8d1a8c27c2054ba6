// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use dxterm_core::types::Medication;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    // Toggle the help popup
    Help,
    Theme(String),
    // Replace the consultation notes; empty text clears them
    Note(String),
    // Add a medication row
    Med(Medication),
    // Submit the consultation
    Save,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// An empty string returns `Err("")` as a sentinel meaning "close without
    /// acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "w" | "save" => Ok(Command::Save),
            "note" => Ok(Command::Note(rest.to_string())),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "med" => parse_medication(rest).map(Command::Med),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

const MED_USAGE: &str = "usage: med <name>; <dosage>; <frequency>; <duration>";

/// `name; dosage; frequency; duration`. Only the name is required.
fn parse_medication(rest: &str) -> Result<Medication, String> {
    let mut parts = rest.split(';').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(MED_USAGE.to_string());
    }
    let mut next = || parts.next().unwrap_or_default().to_string();
    let med = Medication {
        name: name.to_string(),
        dosage: next(),
        frequency: next(),
        duration: next(),
    };
    if parts.next().is_some() {
        return Err(MED_USAGE.to_string());
    }
    Ok(med)
}
