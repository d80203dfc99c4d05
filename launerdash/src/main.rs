//! Entry point for the launerdash TUI. Parses args, resolves the backend and runs the App.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use launerdash::app::App;
use launerdash::gateway::{parse_base_url, Gateway};
use launerdash::guard::{Route, Router};
use launerdash::logging::{default_log_path, init_logging};
use launerdash::profiles::{
    load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile,
};
use launerdash::session::{FileSessionStorage, SessionStorage, SessionStore, SystemClock};

#[derive(Debug, Default)]
struct ParsedArgs {
    base_url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    user: Option<String>,
    log_file: Option<PathBuf>,
    save: bool,
    logout: bool,
    dry_run: bool,
}

enum Parsed {
    Run(ParsedArgs),
    Help(String),
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] [--user NAME|-u NAME] [--log-file PATH] [--logout] [--dry-run] [http(s)://HOST:PORT/api]"
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Parsed, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "launerdash".into());
    let mut out = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Parsed::Help(usage(&prog))),
            "--tls-ca" | "-t" => out.tls_ca = it.next(),
            "--profile" | "-P" => out.profile = it.next(),
            "--user" | "-u" => out.user = it.next(),
            "--log-file" => out.log_file = it.next().map(PathBuf::from),
            "--save" => out.save = true,
            "--logout" => out.logout = true,
            "--dry-run" => out.dry_run = true,
            _ if arg.starts_with("--tls-ca=") => out.tls_ca = value_of(&arg),
            _ if arg.starts_with("--profile=") => out.profile = value_of(&arg),
            _ if arg.starts_with("--user=") => out.user = value_of(&arg),
            _ if arg.starts_with("--log-file=") => out.log_file = value_of(&arg).map(PathBuf::from),
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'. {}", usage(&prog)));
            }
            _ => {
                if out.base_url.is_none() {
                    out.base_url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
            }
        }
    }
    Ok(Parsed::Run(out))
}

fn value_of(arg: &str) -> Option<String> {
    arg.split_once('=')
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(Parsed::Run(v)) => v,
        Ok(Parsed::Help(msg)) => {
            println!("{msg}");
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let Some((base_url, tls_ca)) = resolve_target(&parsed)? else {
        return Ok(());
    };
    let url = parse_base_url(&base_url).with_context(|| format!("invalid backend URL '{base_url}'"))?;

    let log_path = parsed.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path)?;
    info!(%url, "resolved backend");

    if parsed.dry_run {
        println!("{url}");
        return Ok(());
    }

    if parsed.logout {
        FileSessionStorage::for_origin(&url)
            .clear()
            .context("removing stored session")?;
        info!(%url, "stored session removed");
        eprintln!("Logged out of {url}");
        return Ok(());
    }

    let session = Arc::new(SessionStore::restore(
        Box::new(FileSessionStorage::for_origin(&url)),
        Arc::new(SystemClock),
    ));
    let router = Arc::new(Router::new(session.clone()));
    let gateway = Arc::new(Gateway::new(url, tls_ca.as_deref(), session, router.clone())?);

    // A restored, still valid session lands directly on the dashboard
    router.navigate(Route::Dashboard);

    let mut app = App::new(router, gateway).with_username(parsed.user.clone());
    app.run().await
}

/// Profile resolution, prompting and saving. `None` means the user aborted.
fn resolve_target(parsed: &ParsedArgs) -> anyhow::Result<Option<(String, Option<String>)>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        base_url: parsed.base_url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };
    let mut profiles_mut = profiles_file.clone();

    let target = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(u, t) => {
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry {
                    base_url: u.clone(),
                    tls_ca: t.clone(),
                };
                let write = match profiles_mut.profiles.get(name) {
                    // New profile: auto-save immediately
                    None => true,
                    Some(existing) if *existing != entry => {
                        parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ))
                    }
                    Some(_) => false,
                };
                if write {
                    profiles_mut.profiles.insert(name.clone(), entry);
                    save_profiles(&profiles_mut).context("saving profiles")?;
                }
            }
            (u, t)
        }
        ResolveProfile::Loaded(u, t) => (u, t),
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
                .and_then(|name| profiles_mut.profiles.get(name));
            match picked {
                Some(entry) => (entry.base_url.clone(), entry.tls_ca.clone()),
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter backend URL (http://HOST:PORT/api or https://...): ")?;
            let url = url.trim().to_string();
            if url.is_empty() {
                return Ok(None);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca_opt = Some(ca.trim().to_string()).filter(|c| !c.is_empty());
            profiles_mut.profiles.insert(
                name,
                ProfileEntry {
                    base_url: url.clone(),
                    tls_ca: ca_opt.clone(),
                },
            );
            save_profiles(&profiles_mut).context("saving profiles")?;
            (url, ca_opt)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(target))
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
