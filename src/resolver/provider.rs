// src/resolver/provider.rs

//! Interactive selection between multiple satisfying providers
//!
//! When an expression is satisfied by more than one AUR candidate the
//! user picks one from a numbered menu on stderr. Empty input and
//! no-confirm mode both select the first entry; a read failure yields no
//! selection and the caller decides whether that is fatal.

use crate::config::Config;
use crate::package::SourcePackage;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Ask the user to choose between `providers` for `dep`
///
/// `providers` is expected in the caller's preferred order (the pool
/// sorts by popularity descending, then name). Returns `None` only when
/// no provider exists or input could not be read.
pub fn provider_menu<'a>(
    dep: &str,
    providers: &[&'a SourcePackage],
    config: &Config,
) -> Option<&'a SourcePackage> {
    match providers {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    let mut menu = format!(
        ":: There are {} providers available for {}:\n",
        providers.len(),
        dep
    );
    menu.push_str(":: Repository AUR\n    ");
    for (i, pkg) in providers.iter().enumerate() {
        menu.push_str(&format!("{}) {} ", i + 1, pkg.name));
    }
    eprintln!("{}", menu.trim_end());

    loop {
        eprint!("\nEnter a number (default=1): ");
        let _ = io::stderr().flush();

        if config.no_confirm {
            eprintln!("1");
            return Some(providers[0]);
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) => {
                warn!("provider selection aborted: stdin closed");
                return None;
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("{}", err);
                return None;
            }
        }

        match parse_choice(input.trim(), providers.len()) {
            Ok(choice) => return Some(providers[choice - 1]),
            Err(message) => eprintln!("error: {}", message),
        }
    }
}

/// Validate menu input against `1..=max`
///
/// Empty input selects 1. The error string is the single reprompt line.
fn parse_choice(input: &str, max: usize) -> Result<usize, String> {
    if input.is_empty() {
        return Ok(1);
    }

    let choice: usize = input
        .parse()
        .map_err(|_| format!("invalid number: {}", input))?;

    if choice < 1 || choice > max {
        return Err(format!(
            "invalid value: {} is not between 1 and {}",
            choice, max
        ));
    }

    Ok(choice)
}
