//! Interactive console session.
//!
//! A plain menu loop over stdin/stdout. All decisions live in
//! `AuthService`; this module only gathers input and renders each outcome
//! as a distinct message. Passwords are read without echo.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::auth::{AuthError, AuthService};

pub fn run(service: &mut AuthService) -> Result<()> {
    println!("credkeep - local credential manager");

    loop {
        println!();
        println!("  1) Register a new user");
        println!("  2) Log in");
        println!("  3) Statistics");
        println!("  4) Quit");

        let choice = match read_line("> ")? {
            Some(line) => line,
            None => break, // stdin closed
        };

        match choice.as_str() {
            "1" => register(service)?,
            "2" => login(service)?,
            "3" => show_stats(service),
            "4" | "q" | "quit" => break,
            "" => {}
            other => println!("Unrecognized option: {}", other),
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn register(service: &mut AuthService) -> Result<()> {
    let username = match read_line("Username: ")? {
        Some(username) => username,
        None => return Ok(()),
    };
    let password = rpassword::prompt_password("Password: ")?;
    let confirmation = rpassword::prompt_password("Confirm password: ")?;

    match service.register(&username, &password, &confirmation) {
        Ok(()) => println!("Welcome, {}! Your account has been created.", username),
        Err(e) => println!("Registration failed: {}", describe(&e)),
    }
    Ok(())
}

fn login(service: &mut AuthService) -> Result<()> {
    let username = match read_line("Username: ")? {
        Some(username) => username,
        None => return Ok(()),
    };
    let password = rpassword::prompt_password("Password: ")?;

    match service.authenticate(&username, &password) {
        Ok(user) => {
            println!("Login successful. Welcome back, {}!", user.username);
            println!(
                "Member since {}",
                user.created_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        Err(e) => println!("Login failed: {}", describe(&e)),
    }
    Ok(())
}

fn show_stats(service: &AuthService) {
    println!("Registered users: {}", service.user_count());
    for (username, created_at) in service.users() {
        println!("  {} (since {})", username, created_at.format("%Y-%m-%d"));
    }
    println!(
        "Lockout threshold: {} failed attempts",
        service.policy().max_failed_attempts
    );
    println!("Data file: {}", service.store_path().display());
}

/// One distinct, actionable message per error kind.
fn describe(error: &AuthError) -> String {
    match error {
        AuthError::Validation(rule) => rule.to_string(),
        AuthError::DuplicateUsername(username) => {
            format!("the username '{}' is already taken", username)
        }
        AuthError::UserNotFound(username) => format!("no account named '{}'", username),
        AuthError::InvalidCredentials { attempts_remaining: 0 } => {
            "wrong password; the account is now locked for this session".to_string()
        }
        AuthError::InvalidCredentials { attempts_remaining } => {
            format!("wrong password; {} attempts remaining", attempts_remaining)
        }
        AuthError::AccountLocked => {
            "this account is locked; restart the program to try again".to_string()
        }
        AuthError::Store(e) => format!("could not save your changes: {}", e),
    }
}

/// Prompt and read one trimmed line. `None` means stdin reached EOF.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
