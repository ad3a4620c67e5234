//! Configuration command handler.
//!
//! Prints every resolved setting with the layer it came from:
//!
//! ```json
//! {
//!   "seed": { "value": null, "source": "default" },
//!   "target_score": { "value": 11, "source": "env" },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": { "value": config.seed, "source": sources.seed },
        "deck": { "value": config.deck, "source": sources.deck },
        "ai": { "value": config.ai, "source": sources.ai },
        "target_score": { "value": config.target_score, "source": sources.target_score },
        "hand_size": { "value": config.hand_size, "source": sources.hand_size },
        "initial_table_size": {
            "value": config.initial_table_size,
            "source": sources.initial_table_size,
        },
    });
    let json_str = serde_json::to_string_pretty(&display)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfg_displays_json_output() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_cfg_command(&mut out, &mut err).unwrap();

        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&output).expect("cfg output should be valid JSON");
        for key in ["seed", "deck", "ai", "target_score", "hand_size", "initial_table_size"] {
            assert!(json[key].get("value").is_some(), "missing {key}");
            assert!(json[key].get("source").is_some(), "missing {key} source");
        }
        assert!(err.is_empty(), "should not write to stderr on success");
    }
}
