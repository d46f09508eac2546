use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use famstory::config::Config;
use famstory::db::{Database, Photo};
use famstory::error::Error;
use famstory::{imaging, logging, rolemap};

fn print_help() {
    println!(
        r#"famstory - shared family photo album

USAGE:
    famstory [OPTIONS] <COMMAND>

COMMANDS:
    init                        Create the database and demo accounts
    register <EMAIL> <PASSWORD> <ROLE>
                                Create a new account
    login <EMAIL> <PASSWORD>    Check credentials
    users                       List all family members
    role-map                    Show members grouped by family role
    upload [FLAGS] <FILE>       Add a photo to the album
    list [--grid]               Show the album, newest first
    search <QUERY>              Search titles, stories, locations and tags

UPLOAD FLAGS:
    --title TEXT
    --description TEXT
    --date YYYY-MM-DD           Defaults to today
    --location TEXT
    --people ID,ID,...          User ids of the people in the photo
    --tags TAG,TAG,...
    --uploader ID               Required; must be an existing user

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    FAMSTORY_LOG        Log level (trace, debug, info, warn, error)"#
    );
}

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut config_path = None;
    while let Some(first) = args.first().cloned() {
        match first.as_str() {
            "--help" | "-h" => {
                print_help();
                return;
            }
            "--version" | "-V" => {
                println!("famstory {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--config" | "-c" => {
                args.remove(0);
                if args.is_empty() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(PathBuf::from(args.remove(0)));
            }
            _ => break,
        }
    }

    if args.is_empty() {
        print_help();
        std::process::exit(1);
    }

    if let Err(e) = run(config_path, args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(config_path: Option<PathBuf>, args: Vec<String>) -> Result<()> {
    let config = Config::load(config_path)?;
    logging::init(None)?;

    let db = Database::open(&config.db_path)?;
    let command = args[0].as_str();
    let rest = &args[1..];

    match command {
        "init" => {
            db.initialize(config.seed.demo_accounts)?;
            println!("Database ready at {:?}", db.path());
        }
        "register" => {
            let [email, password, role] = rest else {
                bail!("usage: famstory register <EMAIL> <PASSWORD> <ROLE>");
            };
            match db.register_user(email, password, role) {
                Ok(id) => println!("Account created (user {id}). Please login."),
                Err(e) if e.downcast_ref::<Error>() == Some(&Error::DuplicateEmail) => {
                    eprintln!("Email already exists");
                    std::process::exit(1);
                }
                Err(e) => return Err(e),
            }
        }
        "login" => {
            let [email, password] = rest else {
                bail!("usage: famstory login <EMAIL> <PASSWORD>");
            };
            match db.authenticate(email, password)? {
                Some((_, role)) => println!("Welcome, {email} ({role})"),
                None => {
                    // Wrong email and wrong password get the same message.
                    eprintln!("Invalid credentials");
                    std::process::exit(1);
                }
            }
        }
        "users" => {
            for user in db.list_users()? {
                println!("{}\t{} ({})", user.id, user.email, user.role);
            }
        }
        "role-map" => {
            for (role, emails) in rolemap::build_role_map(&db.list_users()?) {
                println!("{role}: {}", emails.join(", "));
            }
        }
        "upload" => cmd_upload(&config, &db, rest)?,
        "list" => {
            let photos = db.list_photos()?;
            if rest.first().map(String::as_str) == Some("--grid") {
                render_grid(&photos);
            } else {
                render_timeline(&db, &photos)?;
            }
        }
        "search" => {
            let [query] = rest else {
                bail!("usage: famstory search <QUERY>");
            };
            render_timeline(&db, &db.search_photos(query)?)?;
        }
        other => bail!("unknown command: {other} (try --help)"),
    }

    Ok(())
}

fn cmd_upload(config: &Config, db: &Database, args: &[String]) -> Result<()> {
    let mut title = String::new();
    let mut description = String::new();
    let mut date = Local::now().date_naive();
    let mut location = String::new();
    let mut people: Vec<i64> = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    let mut uploader: Option<i64> = None;
    let mut file: Option<PathBuf> = None;

    fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a String> {
        args.get(i + 1)
            .with_context(|| format!("{} requires a value", args[i]))
    }

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--title" => {
                title = flag_value(args, i)?.clone();
                i += 1;
            }
            "--description" => {
                description = flag_value(args, i)?.clone();
                i += 1;
            }
            "--date" => {
                date = NaiveDate::parse_from_str(flag_value(args, i)?, "%Y-%m-%d")
                    .context("--date must be YYYY-MM-DD")?;
                i += 1;
            }
            "--location" => {
                location = flag_value(args, i)?.clone();
                i += 1;
            }
            "--people" => {
                people = flag_value(args, i)?
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| s.trim().parse().context("--people takes numeric user ids"))
                    .collect::<Result<_>>()?;
                i += 1;
            }
            "--tags" => {
                tags = flag_value(args, i)?
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                i += 1;
            }
            "--uploader" => {
                uploader = Some(flag_value(args, i)?.parse().context("--uploader takes a user id")?);
                i += 1;
            }
            flag if flag.starts_with("--") => bail!("unknown upload flag: {flag}"),
            path => file = Some(PathBuf::from(path)),
        }
        i += 1;
    }

    let uploader = uploader.context("--uploader is required")?;
    let file = file.context("upload needs an image file argument")?;

    // The store itself does not validate the uploader; the front end does.
    if db.get_user(uploader)?.is_none() {
        return Err(Error::UserNotFound(uploader).into());
    }

    let raw = std::fs::read(&file).with_context(|| format!("reading {file:?}"))?;
    let normalized = imaging::normalize(&raw, config.images.max_dimension, config.images.jpeg_quality)?;
    let image_data = imaging::to_base64(&normalized);

    let id = db.save_photo(
        &title,
        &description,
        date,
        &location,
        &people,
        &tags,
        uploader,
        &image_data,
    )?;
    println!("Photo saved (photo {id})");
    Ok(())
}

fn render_timeline(db: &Database, photos: &[Photo]) -> Result<()> {
    for photo in photos {
        println!("{} - {}", photo.title, photo.date);
        if !photo.description.is_empty() {
            println!("  Story:       {}", photo.description);
        }
        if !photo.location.is_empty() {
            println!("  Location:    {}", photo.location);
        }
        let people = db.resolve_people(&photo.people)?;
        if !people.is_empty() {
            let emails: Vec<&str> = people.iter().map(|u| u.email.as_str()).collect();
            println!("  People:      {}", emails.join(", "));
        }
        if !photo.tags.is_empty() {
            println!("  Tags:        {}", photo.tags.join(", "));
        }
        match db.get_user(photo.uploader_id)? {
            Some(user) => println!("  Uploaded by: {} ({})", user.email, user.role),
            None => println!("  Uploaded by: (unknown)"),
        }
        println!();
    }
    Ok(())
}

fn render_grid(photos: &[Photo]) {
    const COLUMNS: usize = 3;
    const CELL_WIDTH: usize = 28;

    for row in photos.chunks(COLUMNS) {
        for photo in row {
            let mut cell = format!("{} ({})", photo.title, photo.date);
            if cell.chars().count() > CELL_WIDTH - 2 {
                cell = cell.chars().take(CELL_WIDTH - 3).collect();
                cell.push('…');
            }
            print!("{:<width$}", cell, width = CELL_WIDTH);
        }
        println!();
    }
}
