use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // The JWT secret, bot token and webhook URL are never printed
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "CKO_HOST",
        "CKO_PORT",
        "CKO_DATABASE_URL",
        "CKO_STRICT_TOTALS",
        "CKO_STORE_NAME",
        "CKO_CURRENCY_SYMBOL",
        "CKO_DISCORD_API_URL",
        "CKO_DISCORD_TIMEOUT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
