use std::{error::Error, io, process::exit};

use clap::Parser;
use rusqlite::Connection;

use billed::{PasswordHash, UserType, ValidatedPassword, create_user, initialize_db};

/// A utility for registering an admin account.
///
/// Admins cannot sign up from the log-in page, so their accounts are created here.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email the admin logs in with.
    #[arg(long)]
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let email = args.email.trim();

    if email.is_empty() {
        print_error("The email must not be empty.");
        exit(1);
    }

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    println!("Creating admin account for {email}");

    let Some(password_hash) = get_new_password_hash(email) else {
        return Ok(());
    };

    match create_user(email, UserType::Admin, password_hash, &connection) {
        Ok(user) => println!("Created admin account #{} for {}", user.id, user.email),
        Err(billed::Error::DuplicateEmail) => {
            print_error(format!("{email} is already registered."));
            exit(1);
        }
        Err(error) => return Err(error.into()),
    }

    Ok(())
}

/// Prompt for a password twice until it is strong enough and both entries match.
///
/// Returns `None` if stdin is closed or cannot be read.
fn get_new_password_hash(email: &str) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a password: ")?;

        let password = match ValidatedPassword::new(&first_password, &[email]) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => print_error(format!("Could not hash password: {error}. Try again.")),
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
