// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `grievance portal`: a terminal front-end for the form flow.
//!
//! Hidden passphrase prompt, line-edited text fields, numbered menus for
//! mood and severity, then a confirmation screen.

use colored::Colorize;
use grievance_client::{
    Choice, DeviceLocator, FixedLocation, HttpPortalClient, MOOD_OPTIONS, NoDeviceLocation,
    Portal, SEVERITY_OPTIONS, Stage,
};
use grievance_config::{GrievanceConfig, PortalConfig};
use grievance_core::{Coordinates, GrievanceError};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub async fn run_portal(
    config: GrievanceConfig,
    position: Option<(f64, f64)>,
) -> Result<(), GrievanceError> {
    let client = HttpPortalClient::new(&config.portal.server_url)?;
    let locator: Box<dyn DeviceLocator> = match position {
        Some((latitude, longitude)) => Box::new(FixedLocation(Coordinates {
            latitude,
            longitude,
        })),
        None => Box::new(NoDeviceLocation),
    };
    let mut portal = Portal::new(config.portal.passphrase.clone(), Box::new(client), locator);

    let mut rl = DefaultEditor::new()
        .map_err(|e| GrievanceError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "Grievance Portal".bold().magenta());
    println!("Press Ctrl+D at any prompt to leave.\n");

    loop {
        let next = match portal.stage().clone() {
            Stage::Locked { error } => locked(&mut portal, error.as_deref()),
            Stage::Form => form(&mut portal, &mut rl).await,
            Stage::Submitted => submitted(&mut portal, &mut rl, &config.portal),
        };
        match next {
            Ok(Step::Continue) => {}
            Ok(Step::Quit) => break,
            Err(e) => return Err(e),
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

enum Step {
    Continue,
    Quit,
}

fn locked(portal: &mut Portal, error: Option<&str>) -> Result<Step, GrievanceError> {
    if let Some(error) = error {
        println!("{}", error.red());
    }
    let attempt = match rpassword::prompt_password("Please enter the secret code to continue: ") {
        Ok(attempt) => attempt,
        Err(_) => return Ok(Step::Quit),
    };
    portal.keystroke();
    // A wrong code is carried by the stage and shown on the next pass.
    let _ = portal.unlock(&attempt);
    Ok(Step::Continue)
}

async fn form(portal: &mut Portal, rl: &mut DefaultEditor) -> Result<Step, GrievanceError> {
    if let Some(message) = portal.message() {
        println!("{}", message.red());
    }
    let current = portal.fields().clone();

    let Some(title) = prompt(rl, "Title: ", &current.title)? else {
        return Ok(Step::Quit);
    };
    let Some(description) = prompt(rl, "What's bothering you? ", &current.description)? else {
        return Ok(Step::Quit);
    };
    let Some(mood) = menu(rl, "Mood", MOOD_OPTIONS)? else {
        return Ok(Step::Quit);
    };
    let Some(severity) = menu(rl, "How bad is it?", SEVERITY_OPTIONS)? else {
        return Ok(Step::Quit);
    };

    if let Some(fields) = portal.fields_mut() {
        fields.title = title;
        fields.description = description;
        fields.mood = mood;
        fields.severity = severity;
    }

    println!("{}", "Sending...".dimmed());
    if portal.submit().await.is_ok() {
        println!("{}", "Submitted!".green());
    }
    Ok(Step::Continue)
}

fn submitted(
    portal: &mut Portal,
    rl: &mut DefaultEditor,
    names: &PortalConfig,
) -> Result<Step, GrievanceError> {
    println!();
    println!("{}", format!("Thank you, {} ❤️", names.sender_name).bold().magenta());
    println!("Your grievance has been lovingly delivered to {} 💌", names.recipient_name.bold());
    println!("{}\n", "They'll get right on it... probably.".dimmed());

    let Some(answer) = prompt(rl, "Submit another? [y/N] ", "")? else {
        return Ok(Step::Quit);
    };
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(Step::Quit);
    }
    portal
        .reset()
        .map_err(|e| GrievanceError::Internal(e.to_string()))?;
    Ok(Step::Continue)
}

/// One line of input, prefilled with `initial`. `None` on Ctrl+C or Ctrl+D.
fn prompt(
    rl: &mut DefaultEditor,
    label: &str,
    initial: &str,
) -> Result<Option<String>, GrievanceError> {
    match rl.readline_with_initial(label, (initial, "")) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(GrievanceError::Internal(format!("readline failed: {e}"))),
    }
}

/// Numbered menu with an "Other..." entry. Blank input leaves it unset.
fn menu(
    rl: &mut DefaultEditor,
    label: &str,
    options: &'static [&'static str],
) -> Result<Option<Choice>, GrievanceError> {
    println!("{}", label.bold());
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    println!("  {}. Other...", options.len() + 1);

    loop {
        let Some(answer) = prompt(rl, "> ", "")? else {
            return Ok(None);
        };
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(Some(Choice::Unset));
        }

        match answer.parse().ok().and_then(|i| Choice::from_menu(options, i)) {
            Some(Choice::Custom(_)) => {
                let Some(text) = prompt(rl, "Describe it: ", "")? else {
                    return Ok(None);
                };
                return Ok(Some(Choice::Custom(text)));
            }
            Some(choice) => return Ok(Some(choice)),
            None => println!("{}", format!("pick 1-{}", options.len() + 1).yellow()),
        }
    }
}
